use crate::prelude::*;
use solana_sdk::instruction::Instruction;

use crate::{
    core::{SdkError, SdkResult, BPS_DENOMINATOR},
    impl_instruction,
    instructions::YieldMarketInstructionBuilder,
    protocol::PdaBuilder,
};

// Instruction discriminators
const INITIALIZE_PROTOCOL_DISCRIMINATOR: [u8; 8] = [188, 233, 252, 106, 134, 146, 202, 91];
const UPDATE_PROTOCOL_CONFIG_DISCRIMINATOR: [u8; 8] = [197, 97, 123, 54, 221, 168, 11, 135];
const SET_PAUSED_DISCRIMINATOR: [u8; 8] = [91, 60, 125, 192, 176, 225, 166, 218];
const ADD_TO_WHITELIST_DISCRIMINATOR: [u8; 8] = [157, 211, 52, 54, 144, 81, 5, 55];
const REMOVE_FROM_WHITELIST_DISCRIMINATOR: [u8; 8] = [7, 144, 216, 239, 243, 236, 193, 235];

/// Parameters for initializing the protocol config
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitializeProtocolParams {
    pub fee_bps: u16,
    pub min_duration_days: u16,
    pub max_duration_days: u16,
    pub min_penalty_bps: u16,
    pub max_penalty_bps: u16,
}

impl_instruction!(InitializeProtocolParams, INITIALIZE_PROTOCOL_DISCRIMINATOR);

/// Parameters for updating the protocol config; `None` keeps the current value
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateProtocolConfigParams {
    pub new_treasury: Option<Pubkey>,
    pub new_fee_bps: Option<u16>,
    pub new_min_duration_days: Option<u16>,
    pub new_max_duration_days: Option<u16>,
    pub new_min_penalty_bps: Option<u16>,
    pub new_max_penalty_bps: Option<u16>,
}

impl_instruction!(UpdateProtocolConfigParams, UPDATE_PROTOCOL_CONFIG_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetPausedParams {
    pub paused: bool,
}

impl_instruction!(SetPausedParams, SET_PAUSED_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct AddToWhitelistParams {
    pub mint: Pubkey,
}

impl_instruction!(AddToWhitelistParams, ADD_TO_WHITELIST_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RemoveFromWhitelistParams {
    pub mint: Pubkey,
}

impl_instruction!(RemoveFromWhitelistParams, REMOVE_FROM_WHITELIST_DISCRIMINATOR);

fn check_bounds(name: &str, min: u16, max: u16) -> SdkResult<()> {
    if min > max {
        return Err(SdkError::InvalidInput(format!(
            "minimum {} ({}) is above the maximum ({})",
            name, min, max
        )));
    }
    Ok(())
}

fn check_rate(name: &str, bps: u16) -> SdkResult<()> {
    if u64::from(bps) > BPS_DENOMINATOR {
        return Err(SdkError::InvalidInput(format!(
            "{} of {} bps exceeds 100%",
            name, bps
        )));
    }
    Ok(())
}

/// Protocol admin instruction builder
pub struct ProtocolInstructionBuilder {
    pda: PdaBuilder,
}

impl ProtocolInstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            pda: PdaBuilder::new(program_id),
        }
    }

    fn admin(&self, authority: Pubkey) -> YieldMarketInstructionBuilder {
        let (protocol_config, _) = self.pda.protocol_config();
        YieldMarketInstructionBuilder::new(self.pda.program_id)
            .add_signer(authority)
            .add_writable(protocol_config)
    }

    /// Build initialize protocol instruction
    pub fn initialize_protocol(
        &self,
        authority: Pubkey,
        treasury: Pubkey,
        params: InitializeProtocolParams,
    ) -> SdkResult<Instruction> {
        check_rate("fee", params.fee_bps)?;
        check_rate("maximum penalty", params.max_penalty_bps)?;
        check_bounds("duration", params.min_duration_days, params.max_duration_days)?;
        check_bounds("penalty", params.min_penalty_bps, params.max_penalty_bps)?;

        Ok(self
            .admin(authority)
            .add_readonly(treasury)
            .add_readonly(solana_sdk::system_program::id())
            .with_args(&params)?
            .build())
    }

    /// Build update protocol config instruction
    pub fn update_protocol_config(
        &self,
        authority: Pubkey,
        params: UpdateProtocolConfigParams,
    ) -> SdkResult<Instruction> {
        if let Some(fee_bps) = params.new_fee_bps {
            check_rate("fee", fee_bps)?;
        }
        if let Some(max_penalty_bps) = params.new_max_penalty_bps {
            check_rate("maximum penalty", max_penalty_bps)?;
        }

        Ok(self.admin(authority).with_args(&params)?.build())
    }

    pub fn set_paused(&self, authority: Pubkey, paused: bool) -> SdkResult<Instruction> {
        Ok(self
            .admin(authority)
            .with_args(&SetPausedParams { paused })?
            .build())
    }

    pub fn add_to_whitelist(&self, authority: Pubkey, mint: Pubkey) -> SdkResult<Instruction> {
        Ok(self
            .admin(authority)
            .with_args(&AddToWhitelistParams { mint })?
            .build())
    }

    pub fn remove_from_whitelist(&self, authority: Pubkey, mint: Pubkey) -> SdkResult<Instruction> {
        Ok(self
            .admin(authority)
            .with_args(&RemoveFromWhitelistParams { mint })?
            .build())
    }
}
