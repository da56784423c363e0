use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::core::{
    classifier::duration_message, Amount, Diagnostics, SdkError, SdkResult,
    ALLOWED_DURATION_DAYS, SECONDS_PER_DAY,
};
use crate::prelude::*;

/// Deal lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DealStatus {
    /// Listed and available for purchase
    Created,
    /// Purchased, yield accruing to the buyer
    Active,
    Settled,
    Cancelled,
    BoughtBack,
}

impl DealStatus {
    pub const ALL: [DealStatus; 5] = [
        Self::Created,
        Self::Active,
        Self::Settled,
        Self::Cancelled,
        Self::BoughtBack,
    ];

    /// Decode the on-ledger variant index
    pub fn from_tag(tag: u8) -> SdkResult<Self> {
        Self::ALL
            .get(tag as usize)
            .copied()
            .ok_or(SdkError::UnknownVariant {
                field: "status",
                tag: u64::from(tag),
            })
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Active => "active",
            Self::Settled => "settled",
            Self::Cancelled => "cancelled",
            Self::BoughtBack => "boughtBack",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Settled | Self::Cancelled | Self::BoughtBack)
    }

    /// Whether the program allows moving from `self` to `next`
    pub fn can_transition_to(self, next: DealStatus) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Active)
                | (Self::Created, Self::Cancelled)
                | (Self::Active, Self::Settled)
                | (Self::Active, Self::BoughtBack)
        )
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for DealStatus {
    type Err = SdkError;

    fn from_str(s: &str) -> SdkResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SdkError::InvalidArgument(format!("unknown deal status {:?}", s)))
    }
}

/// Category of the venue whose receipt token backs a yield deal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProtocolCategory {
    Lending,
    Staking,
    LiquidityProvision,
    FeeStream,
}

/// Origin protocol of a yield-bearing receipt token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceProtocol {
    KaminoLend,
    Marginfi,
    Solend,
    DriftLend,
    Marinade,
    Jito,
    Sanctum,
    Blaze,
    Raydium,
    Orca,
    Meteora,
    JupiterPerps,
    Phoenix,
}

impl SourceProtocol {
    pub const ALL: [SourceProtocol; 13] = [
        Self::KaminoLend,
        Self::Marginfi,
        Self::Solend,
        Self::DriftLend,
        Self::Marinade,
        Self::Jito,
        Self::Sanctum,
        Self::Blaze,
        Self::Raydium,
        Self::Orca,
        Self::Meteora,
        Self::JupiterPerps,
        Self::Phoenix,
    ];

    pub fn from_tag(tag: u8) -> SdkResult<Self> {
        Self::ALL
            .get(tag as usize)
            .copied()
            .ok_or(SdkError::UnknownVariant {
                field: "source_protocol",
                tag: u64::from(tag),
            })
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn category(self) -> ProtocolCategory {
        match self {
            Self::KaminoLend | Self::Marginfi | Self::Solend | Self::DriftLend => {
                ProtocolCategory::Lending
            }
            Self::Marinade | Self::Jito | Self::Sanctum | Self::Blaze => ProtocolCategory::Staking,
            Self::Raydium | Self::Orca | Self::Meteora => ProtocolCategory::LiquidityProvision,
            Self::JupiterPerps | Self::Phoenix => ProtocolCategory::FeeStream,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::KaminoLend => "kaminoLend",
            Self::Marginfi => "marginfi",
            Self::Solend => "solend",
            Self::DriftLend => "driftLend",
            Self::Marinade => "marinade",
            Self::Jito => "jito",
            Self::Sanctum => "sanctum",
            Self::Blaze => "blaze",
            Self::Raydium => "raydium",
            Self::Orca => "orca",
            Self::Meteora => "meteora",
            Self::JupiterPerps => "jupiterPerps",
            Self::Phoenix => "phoenix",
        }
    }
}

impl fmt::Display for SourceProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl std::str::FromStr for SourceProtocol {
    type Err = SdkError;

    fn from_str(s: &str) -> SdkResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SdkError::InvalidArgument(format!("unknown source protocol {:?}", s)))
    }
}

/// Lock duration of a deal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DealDuration {
    Days30,
    Days60,
    Days90,
    Days180,
    Days365,
}

impl DealDuration {
    pub const ALL: [DealDuration; 5] = [
        Self::Days30,
        Self::Days60,
        Self::Days90,
        Self::Days180,
        Self::Days365,
    ];

    /// Map a day count onto the allowed set
    pub fn from_days(days: u16) -> SdkResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.days() == days)
            .ok_or_else(|| SdkError::InvalidDuration {
                days: Some(u64::from(days)),
                message: duration_message(Some(u64::from(days))),
                diagnostics: Diagnostics::none(),
            })
    }

    pub fn days(self) -> u16 {
        ALLOWED_DURATION_DAYS[self as usize]
    }

    pub fn seconds(self) -> i64 {
        i64::from(self.days()) * SECONDS_PER_DAY
    }
}

impl Serialize for DealDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.days())
    }
}

/// Yield-receipt deal
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldDeal {
    #[serde(serialize_with = "serialize_pubkey")]
    pub address: Pubkey,
    pub deal_id: u64,
    #[serde(serialize_with = "serialize_pubkey")]
    pub seller: Pubkey,
    #[serde(serialize_with = "serialize_optional_pubkey")]
    pub buyer: Option<Pubkey>,
    #[serde(serialize_with = "serialize_pubkey")]
    pub yield_token_mint: Pubkey,
    pub source_protocol: SourceProtocol,
    pub locked_token_amount: Amount,
    pub locked_value: Amount,
    pub expected_yield: Amount,
    pub selling_price: Amount,
    #[serde(serialize_with = "serialize_pubkey")]
    pub payment_mint: Pubkey,
    pub duration: DealDuration,
    pub created_at: DateTime<Utc>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub status: DealStatus,
    pub is_available: bool,
    pub is_expired: bool,
}

/// Meteora liquidity-position deal
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeteoraLpDeal {
    #[serde(serialize_with = "serialize_pubkey")]
    pub address: Pubkey,
    pub deal_id: u64,
    #[serde(serialize_with = "serialize_pubkey")]
    pub seller: Pubkey,
    #[serde(serialize_with = "serialize_optional_pubkey")]
    pub buyer: Option<Pubkey>,
    #[serde(serialize_with = "serialize_pubkey")]
    pub pool: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub position: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub position_nft_mint: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub token_a_mint: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub token_b_mint: Pubkey,
    pub fee_a_at_lock: Amount,
    pub fee_b_at_lock: Amount,
    pub expected_fee_a: Amount,
    pub expected_fee_b: Amount,
    pub expected_total_value: Amount,
    pub selling_price: Amount,
    #[serde(serialize_with = "serialize_pubkey")]
    pub payment_mint: Pubkey,
    pub duration: DealDuration,
    pub created_at: DateTime<Utc>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub status: DealStatus,
    pub is_available: bool,
    pub is_expired: bool,
}

/// Singleton protocol configuration
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolConfig {
    #[serde(serialize_with = "serialize_pubkey")]
    pub address: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub authority: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub treasury: Pubkey,
    pub fee_bps: u16,
    pub min_duration_days: u16,
    pub max_duration_days: u16,
    pub min_penalty_bps: u16,
    pub max_penalty_bps: u16,
    pub is_paused: bool,
    /// Identifier the next created deal will receive
    pub deal_counter: u64,
    #[serde(serialize_with = "serialize_pubkeys")]
    pub whitelist: Vec<Pubkey>,
}

impl ProtocolConfig {
    pub fn next_deal_id(&self) -> u64 {
        self.deal_counter
    }

    pub fn is_whitelisted(&self, mint: &Pubkey) -> bool {
        self.whitelist.contains(mint)
    }

    pub fn allows_duration(&self, duration: DealDuration) -> bool {
        (self.min_duration_days..=self.max_duration_days).contains(&duration.days())
    }
}

/// Fields shared by both deal kinds, used by query filters
pub trait DealRecord {
    fn deal_id(&self) -> u64;
    fn address(&self) -> Pubkey;
    fn status(&self) -> DealStatus;
    fn seller(&self) -> Pubkey;
    fn buyer(&self) -> Option<Pubkey>;
    /// Only yield deals carry a source protocol
    fn source_protocol(&self) -> Option<SourceProtocol>;
    fn selling_price(&self) -> Amount;
}

impl DealRecord for YieldDeal {
    fn deal_id(&self) -> u64 {
        self.deal_id
    }

    fn address(&self) -> Pubkey {
        self.address
    }

    fn status(&self) -> DealStatus {
        self.status
    }

    fn seller(&self) -> Pubkey {
        self.seller
    }

    fn buyer(&self) -> Option<Pubkey> {
        self.buyer
    }

    fn source_protocol(&self) -> Option<SourceProtocol> {
        Some(self.source_protocol)
    }

    fn selling_price(&self) -> Amount {
        self.selling_price
    }
}

impl DealRecord for MeteoraLpDeal {
    fn deal_id(&self) -> u64 {
        self.deal_id
    }

    fn address(&self) -> Pubkey {
        self.address
    }

    fn status(&self) -> DealStatus {
        self.status
    }

    fn seller(&self) -> Pubkey {
        self.seller
    }

    fn buyer(&self) -> Option<Pubkey> {
        self.buyer
    }

    fn source_protocol(&self) -> Option<SourceProtocol> {
        None
    }

    fn selling_price(&self) -> Amount {
        self.selling_price
    }
}

fn serialize_pubkey<S: Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(key)
}

fn serialize_optional_pubkey<S: Serializer>(
    key: &Option<Pubkey>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match key {
        Some(key) => serializer.collect_str(key),
        None => serializer.serialize_none(),
    }
}

fn serialize_pubkeys<S: Serializer>(keys: &[Pubkey], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(keys.iter().map(|k| k.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tags() {
        for (tag, status) in DealStatus::ALL.iter().enumerate() {
            assert_eq!(DealStatus::from_tag(tag as u8).unwrap(), *status);
            assert_eq!(status.tag() as usize, tag);
        }
        assert!(matches!(
            DealStatus::from_tag(5),
            Err(SdkError::UnknownVariant { field: "status", tag: 5 })
        ));
    }

    #[test]
    fn test_lifecycle_transitions() {
        assert!(DealStatus::Created.can_transition_to(DealStatus::Active));
        assert!(DealStatus::Created.can_transition_to(DealStatus::Cancelled));
        assert!(DealStatus::Active.can_transition_to(DealStatus::BoughtBack));
        assert!(!DealStatus::Active.can_transition_to(DealStatus::Cancelled));
        assert!(!DealStatus::Settled.can_transition_to(DealStatus::Active));

        // Terminal statuses have no outgoing transition
        for status in DealStatus::ALL {
            let has_next = DealStatus::ALL.iter().any(|next| status.can_transition_to(*next));
            assert_eq!(status.is_terminal(), !has_next, "{}", status);
        }
    }

    #[test]
    fn test_protocol_categories() {
        let count = |category| {
            SourceProtocol::ALL
                .iter()
                .filter(|p| p.category() == category)
                .count()
        };
        assert_eq!(count(ProtocolCategory::Lending), 4);
        assert_eq!(count(ProtocolCategory::Staking), 4);
        assert_eq!(count(ProtocolCategory::LiquidityProvision), 3);
        assert_eq!(count(ProtocolCategory::FeeStream), 2);
        assert!(SourceProtocol::from_tag(13).is_err());
        assert_eq!("JITO".parse::<SourceProtocol>().unwrap(), SourceProtocol::Jito);
    }

    #[test]
    fn test_durations() {
        for days in ALLOWED_DURATION_DAYS {
            assert_eq!(DealDuration::from_days(days).unwrap().days(), days);
        }
        assert_eq!(DealDuration::Days30.seconds(), 30 * 86_400);
        match DealDuration::from_days(45) {
            Err(SdkError::InvalidDuration { days, message, .. }) => {
                assert_eq!(days, Some(45));
                assert!(message.contains("45"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
