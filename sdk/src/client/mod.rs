pub mod base;
pub mod filter;
pub mod lp_deal;
pub mod protocol;
pub mod yield_deal;

use std::sync::Arc;

use crate::prelude::*;
use solana_sdk::{
    instruction::Instruction,
    signature::{Keypair, Signature},
};

use crate::{
    config::SdkConfig,
    core::{ErrorContext, SdkResult},
    protocol::PdaBuilder,
    transport::{RpcTransport, Transport},
};

pub use base::BaseClient;
pub use filter::{DealFilter, StatusFilter};
pub use lp_deal::LpDealService;
pub use protocol::ProtocolService;
pub use yield_deal::YieldDealService;

/// Listing instructions together with the identifier they will claim
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedDeal {
    pub deal_id: u64,
    pub address: Pubkey,
    pub instructions: Vec<Instruction>,
}

/// Main Yield Market client with service-based architecture
pub struct YieldMarketClient {
    /// Shared transport wrapper
    pub base: Arc<BaseClient>,
    /// Protocol configuration and admin
    pub protocol: ProtocolService,
    /// Yield-receipt deals
    pub yield_deals: YieldDealService,
    /// Meteora LP-position deals
    pub lp_deals: LpDealService,
    /// PDA builder
    pub pda: Arc<PdaBuilder>,
}

impl YieldMarketClient {
    /// Client over JSON-RPC using `config`
    pub fn new(config: &SdkConfig) -> Self {
        Self::with_transport(Arc::new(RpcTransport::new(config)), config.program_id)
    }

    /// Client over any transport, e.g. `testing::MemoryTransport`
    pub fn with_transport(transport: Arc<dyn Transport>, program_id: Pubkey) -> Self {
        let base = Arc::new(BaseClient::new(transport, program_id));
        let pda = Arc::new(PdaBuilder::new(program_id));

        Self {
            protocol: ProtocolService::new(base.clone(), pda.clone()),
            yield_deals: YieldDealService::new(base.clone(), pda.clone()),
            lp_deals: LpDealService::new(base.clone(), pda.clone()),
            base,
            pda,
        }
    }

    pub fn program_id(&self) -> Pubkey {
        self.base.program_id()
    }

    /// Submit instructions built by the services, classifying any fault with `context`
    pub async fn send(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
        context: &ErrorContext,
    ) -> SdkResult<Signature> {
        self.base.send(instructions, signers, context).await
    }
}
