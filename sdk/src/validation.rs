//! Local checks on deal-creation input
//!
//! These run before any instruction is assembled; a failure here never
//! reaches the transport.

use crate::core::{Amount, DealDuration, ProtocolConfig, SdkError, SdkResult, SourceProtocol};
use crate::prelude::*;

/// Caller input for listing a yield-receipt deal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateYieldDealParams {
    /// Receipt token locked into the deal vault
    pub yield_token_mint: Pubkey,
    pub payment_mint: Pubkey,
    pub source_protocol: SourceProtocol,
    /// Receipt tokens moved into the vault
    pub locked_token_amount: Amount,
    /// Value of the locked tokens at listing, in payment units
    pub locked_value: Amount,
    /// Yield the buyer should receive over the duration
    pub expected_yield: Amount,
    pub selling_price: Amount,
    pub duration: DealDuration,
}

/// Caller input for listing a Meteora LP position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateMeteoraLpDealParams {
    pub pool: Pubkey,
    pub position: Pubkey,
    pub position_nft_mint: Pubkey,
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub payment_mint: Pubkey,
    /// Fees already claimable when the position is locked
    pub fee_a_at_lock: Amount,
    pub fee_b_at_lock: Amount,
    pub expected_fee_a: Amount,
    pub expected_fee_b: Amount,
    pub expected_total_value: Amount,
    pub selling_price: Amount,
    pub duration: DealDuration,
}

fn require_positive(value: Amount, field: &str) -> SdkResult<()> {
    if value.is_zero() {
        return Err(SdkError::InvalidInput(format!(
            "{} must be greater than zero",
            field
        )));
    }
    Ok(())
}

fn require_not_above(price: Amount, ceiling: Amount, ceiling_name: &str) -> SdkResult<()> {
    if price > ceiling {
        return Err(SdkError::InvalidInput(format!(
            "selling price ({}) cannot exceed {} ({})",
            price, ceiling_name, ceiling
        )));
    }
    Ok(())
}

/// Business rules for a yield-receipt listing
///
/// Non-negativity of the expected yield is carried by the unsigned type.
pub fn validate_yield_deal_params(params: &CreateYieldDealParams) -> SdkResult<()> {
    require_positive(params.locked_token_amount, "locked token amount")?;
    require_positive(params.locked_value, "locked value")?;
    require_positive(params.selling_price, "selling price")?;
    require_not_above(params.selling_price, params.expected_yield, "expected yield")
}

/// Business rules for an LP-position listing
pub fn validate_lp_deal_params(params: &CreateMeteoraLpDealParams) -> SdkResult<()> {
    require_positive(params.expected_total_value, "expected total value")?;
    require_positive(params.selling_price, "selling price")?;
    require_not_above(
        params.selling_price,
        params.expected_total_value,
        "expected total value",
    )
}

/// Map a day count onto one of the allowed durations
pub fn validate_duration(days: u16) -> SdkResult<DealDuration> {
    DealDuration::from_days(days)
}

/// Buyback penalty must lie within the configured bounds
pub fn validate_penalty(penalty_bps: u16, config: &ProtocolConfig) -> SdkResult<u16> {
    if !(config.min_penalty_bps..=config.max_penalty_bps).contains(&penalty_bps) {
        return Err(SdkError::InvalidInput(format!(
            "penalty of {} bps is outside the allowed range {}..={} bps",
            penalty_bps, config.min_penalty_bps, config.max_penalty_bps
        )));
    }
    Ok(penalty_bps)
}
