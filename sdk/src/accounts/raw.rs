//! On-ledger account layouts, as written by the program
//!
//! Enum fields are kept as their raw variant index so that an unknown tag is
//! reported as a version mismatch instead of a generic borsh failure.

use crate::core::{discriminators, SdkError, SdkResult};
use crate::prelude::*;

/// Account types the SDK knows how to fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    ProtocolConfig,
    YieldDeal,
    MeteoraLpDeal,
}

impl RecordKind {
    pub fn discriminator(self) -> [u8; 8] {
        match self {
            RecordKind::ProtocolConfig => discriminators::PROTOCOL_CONFIG,
            RecordKind::YieldDeal => discriminators::YIELD_DEAL,
            RecordKind::MeteoraLpDeal => discriminators::METEORA_LP_DEAL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RecordKind::ProtocolConfig => "ProtocolConfig",
            RecordKind::YieldDeal => "YieldDeal",
            RecordKind::MeteoraLpDeal => "MeteoraLpDeal",
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RawProtocolConfig {
    pub authority: Pubkey,
    pub treasury: Pubkey,
    pub fee_bps: u16,
    pub min_duration_days: u16,
    pub max_duration_days: u16,
    pub min_penalty_bps: u16,
    pub max_penalty_bps: u16,
    pub is_paused: bool,
    pub deal_counter: u64,
    pub whitelist: Vec<Pubkey>,
    pub bump: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RawYieldDeal {
    pub deal_id: u64,
    pub seller: Pubkey,
    /// `Pubkey::default()` until purchased
    pub buyer: Pubkey,
    pub yield_token_mint: Pubkey,
    pub source_protocol: u8,
    pub locked_token_amount: u64,
    pub locked_value: u64,
    pub expected_yield: u64,
    pub selling_price: u64,
    pub payment_mint: Pubkey,
    pub duration_days: u16,
    pub created_at: i64,
    /// Zero until purchased
    pub purchased_at: i64,
    /// Zero until purchased
    pub ends_at: i64,
    pub status: u8,
    pub bump: u8,
    pub vault_bump: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RawMeteoraLpDeal {
    pub deal_id: u64,
    pub seller: Pubkey,
    pub buyer: Pubkey,
    pub pool: Pubkey,
    pub position: Pubkey,
    pub position_nft_mint: Pubkey,
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub fee_a_at_lock: u64,
    pub fee_b_at_lock: u64,
    pub expected_fee_a: u64,
    pub expected_fee_b: u64,
    pub expected_total_value: u64,
    pub selling_price: u64,
    pub payment_mint: Pubkey,
    pub duration_days: u16,
    pub created_at: i64,
    pub purchased_at: i64,
    pub ends_at: i64,
    pub status: u8,
    pub bump: u8,
    pub vault_bump: u8,
}

/// Layout with a known account discriminator
pub trait RawAccount: AnchorDeserialize + AnchorSerialize {
    const KIND: RecordKind;

    /// Check the 8-byte discriminator and deserialize the body
    fn decode(data: &[u8]) -> SdkResult<Self> {
        let expected = Self::KIND.discriminator();
        if data.len() < expected.len() {
            return Err(SdkError::DeserializationError(format!(
                "{} account is {} bytes, shorter than its discriminator",
                Self::KIND.name(),
                data.len()
            )));
        }
        let (discriminator, mut body) = data.split_at(expected.len());
        if discriminator != expected {
            return Err(SdkError::DeserializationError(format!(
                "account discriminator does not match {}",
                Self::KIND.name()
            )));
        }
        Self::deserialize(&mut body)
            .map_err(|e| SdkError::DeserializationError(format!("{}: {}", Self::KIND.name(), e)))
    }

    /// Discriminator followed by the borsh body
    fn encode(&self) -> SdkResult<Vec<u8>> {
        let mut data = Self::KIND.discriminator().to_vec();
        self.serialize(&mut data)
            .map_err(|e| SdkError::SerializationError(e.to_string()))?;
        Ok(data)
    }
}

impl RawAccount for RawProtocolConfig {
    const KIND: RecordKind = RecordKind::ProtocolConfig;
}

impl RawAccount for RawYieldDeal {
    const KIND: RecordKind = RecordKind::YieldDeal;
}

impl RawAccount for RawMeteoraLpDeal {
    const KIND: RecordKind = RecordKind::MeteoraLpDeal;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_checks_discriminator() {
        let raw = RawYieldDeal {
            deal_id: 4,
            ..RawYieldDeal::default()
        };
        let data = raw.encode().unwrap();
        assert_eq!(RawYieldDeal::decode(&data).unwrap(), raw);

        assert!(matches!(
            RawMeteoraLpDeal::decode(&data),
            Err(SdkError::DeserializationError(_))
        ));
        assert!(RawYieldDeal::decode(&data[..4]).is_err());
    }

    #[test]
    fn test_decode_tolerates_trailing_padding() {
        let raw = RawProtocolConfig {
            whitelist: vec![Pubkey::new_unique()],
            ..RawProtocolConfig::default()
        };
        let mut data = raw.encode().unwrap();
        data.extend_from_slice(&[0u8; 64]);
        assert_eq!(RawProtocolConfig::decode(&data).unwrap(), raw);
    }
}
