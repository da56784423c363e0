//! Ledger access used by the clients
//!
//! The transport owns networking concerns (timeouts, commitment, encoding).
//! It reports absence as `Ok(None)` where it can and every other problem as a
//! [`TransportFault`], which the client layer classifies.

pub mod rpc;

use async_trait::async_trait;
use solana_sdk::{instruction::Instruction, signature::Keypair, signature::Signature};

use crate::accounts::RecordKind;
use crate::core::TransportFault;
use crate::prelude::*;

pub use rpc::RpcTransport;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Raw account bytes, or `None` when the account does not exist
    async fn fetch_raw_record(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, TransportFault>;

    /// Every account of `kind` owned by `program_id`, in the order the node returns them
    async fn fetch_all_raw_records(
        &self,
        program_id: &Pubkey,
        kind: RecordKind,
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, TransportFault>;

    /// Sign with `signers` (the first pays fees) and submit
    async fn submit(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<Signature, TransportFault>;
}
