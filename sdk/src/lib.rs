//! Yield Market SDK
//!
//! Client-side library for the Yield Market program: decodes deal and config
//! accounts, filters deal listings, validates listing input, builds
//! instructions and classifies program errors.
//!
//! ```no_run
//! use yield_market_sdk::{DealFilter, SdkConfig, YieldMarketClient};
//!
//! # async fn run() -> yield_market_sdk::SdkResult<()> {
//! let client = YieldMarketClient::new(&SdkConfig::devnet());
//! let open = client
//!     .yield_deals
//!     .get_deals(Some(&DealFilter::available()))
//!     .await?;
//! println!("{} deals for sale", open.len());
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod client;
pub mod config;
pub mod core;
pub mod instructions;
pub mod prelude;
pub mod protocol;
pub mod testing;
pub mod transport;
pub mod validation;

pub use accounts::{DecodeRecord, RecordKind};
pub use client::{
    BaseClient, DealFilter, LpDealService, PreparedDeal, ProtocolService, StatusFilter,
    YieldDealService, YieldMarketClient,
};
pub use config::SdkConfig;
pub use crate::core::*;
pub use protocol::*;
pub use transport::{RpcTransport, Transport};
pub use validation::*;
