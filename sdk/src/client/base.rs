use std::sync::Arc;

use chrono::Utc;
use solana_sdk::{
    instruction::Instruction,
    signature::{Keypair, Signature},
};
use tracing::{debug, info, warn};

use crate::accounts::DecodeRecord;
use crate::core::{classify_fault, ErrorContext, SdkError, SdkResult};
use crate::prelude::*;
use crate::transport::Transport;

/// Transport wrapper shared by the services
pub struct BaseClient {
    transport: Arc<dyn Transport>,
    program_id: Pubkey,
}

impl BaseClient {
    pub fn new(transport: Arc<dyn Transport>, program_id: Pubkey) -> Self {
        Self {
            transport,
            program_id,
        }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// Fetch and decode one account; a missing account is `Ok(None)`
    pub async fn fetch_one<T: DecodeRecord>(&self, address: &Pubkey) -> SdkResult<Option<T>> {
        let kind = T::KIND.name();
        match self.transport.fetch_raw_record(address).await {
            Ok(Some(data)) => T::decode(*address, &data, Utc::now()).map(Some),
            Ok(None) => {
                debug!(kind, %address, "account not found");
                Ok(None)
            }
            // Some transports report absence only through the error text
            Err(fault) if fault.is_not_found() => {
                debug!(kind, %address, "account not found: {}", fault);
                Ok(None)
            }
            Err(fault) => {
                warn!(kind, %address, "fetch failed: {}", fault);
                Err(SdkError::Fetch {
                    target: format!("{} {}", kind, address),
                    source: fault,
                })
            }
        }
    }

    /// Like [`fetch_one`](Self::fetch_one), but absence is an error
    pub async fn fetch_required<T: DecodeRecord>(
        &self,
        address: &Pubkey,
        what: impl Into<String>,
    ) -> SdkResult<T> {
        self.fetch_one(address)
            .await?
            .ok_or_else(|| SdkError::AccountNotFound(what.into()))
    }

    /// Fetch and decode every account of `T`'s kind, in transport order
    pub async fn fetch_all<T: DecodeRecord>(&self) -> SdkResult<Vec<T>> {
        let kind = T::KIND.name();
        let raw = self
            .transport
            .fetch_all_raw_records(&self.program_id, T::KIND)
            .await
            .map_err(|fault| {
                warn!(kind, "fetch all failed: {}", fault);
                SdkError::Fetch {
                    target: format!("{} accounts", kind),
                    source: fault,
                }
            })?;
        debug!(kind, count = raw.len(), "decoding accounts");

        let now = Utc::now();
        raw.iter()
            .map(|(address, data)| T::decode(*address, data, now))
            .collect()
    }

    /// Submit instructions; a fault is classified against `context`
    pub async fn send(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
        context: &ErrorContext,
    ) -> SdkResult<Signature> {
        match self.transport.submit(instructions, signers).await {
            Ok(signature) => {
                info!(%signature, operation = ?context.operation, "transaction confirmed");
                Ok(signature)
            }
            Err(fault) => {
                let error = classify_fault(fault, context);
                warn!(
                    code = ?error.code(),
                    operation = ?context.operation,
                    "transaction failed: {}",
                    error
                );
                Err(error)
            }
        }
    }
}
