use std::sync::Arc;

use crate::prelude::*;
use solana_sdk::instruction::Instruction;
use tracing::debug;

use crate::{
    core::{ProtocolConfig, SdkError, SdkResult},
    instructions::{InitializeProtocolParams, ProtocolInstructionBuilder, UpdateProtocolConfigParams},
    protocol::PdaBuilder,
};

use super::BaseClient;

/// Protocol configuration reads and admin instructions
pub struct ProtocolService {
    base: Arc<BaseClient>,
    pda: Arc<PdaBuilder>,
    builder: ProtocolInstructionBuilder,
}

impl ProtocolService {
    pub fn new(base: Arc<BaseClient>, pda: Arc<PdaBuilder>) -> Self {
        Self {
            builder: ProtocolInstructionBuilder::new(pda.program_id),
            base,
            pda,
        }
    }

    /// Protocol config, or `None` before initialization
    pub async fn get_config(&self) -> SdkResult<Option<ProtocolConfig>> {
        let (address, _) = self.pda.protocol_config();
        self.base.fetch_one(&address).await
    }

    /// Protocol config; absence is an error
    pub async fn require_config(&self) -> SdkResult<ProtocolConfig> {
        let (address, _) = self.pda.protocol_config();
        self.base
            .fetch_required(&address, format!("protocol config {} (not initialized)", address))
            .await
    }

    pub async fn is_paused(&self) -> SdkResult<bool> {
        let paused = self.require_config().await?.is_paused;
        debug!(paused, "protocol pause state");
        Ok(paused)
    }

    /// One-time setup of the protocol config
    pub fn initialize_protocol_ixs(
        &self,
        authority: Pubkey,
        treasury: Pubkey,
        params: InitializeProtocolParams,
    ) -> SdkResult<Vec<Instruction>> {
        Ok(vec![self.builder.initialize_protocol(authority, treasury, params)?])
    }

    pub fn update_protocol_config_ixs(
        &self,
        authority: Pubkey,
        params: UpdateProtocolConfigParams,
    ) -> SdkResult<Vec<Instruction>> {
        if params == UpdateProtocolConfigParams::default() {
            return Err(SdkError::InvalidInput(
                "config update changes nothing".to_string(),
            ));
        }
        Ok(vec![self.builder.update_protocol_config(authority, params)?])
    }

    pub fn set_paused_ixs(&self, authority: Pubkey, paused: bool) -> SdkResult<Vec<Instruction>> {
        Ok(vec![self.builder.set_paused(authority, paused)?])
    }

    pub fn add_to_whitelist_ixs(&self, authority: Pubkey, mint: Pubkey) -> SdkResult<Vec<Instruction>> {
        Ok(vec![self.builder.add_to_whitelist(authority, mint)?])
    }

    pub fn remove_from_whitelist_ixs(
        &self,
        authority: Pubkey,
        mint: Pubkey,
    ) -> SdkResult<Vec<Instruction>> {
        Ok(vec![self.builder.remove_from_whitelist(authority, mint)?])
    }
}
