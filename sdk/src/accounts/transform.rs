//! Raw account → domain entity translation
//!
//! Every function here is pure: the evaluation time is passed in, nothing is
//! fetched or logged.

use chrono::{DateTime, Utc};

use super::raw::{RawAccount, RawMeteoraLpDeal, RawProtocolConfig, RawYieldDeal, RecordKind};
use crate::core::{
    timestamp_to_moment, to_amount, Amount, DealDuration, DealStatus, MeteoraLpDeal,
    ProtocolConfig, SdkError, SdkResult, SourceProtocol, YieldDeal,
};
use crate::prelude::*;

/// Domain entity decodable from account bytes
pub trait DecodeRecord: Sized {
    const KIND: RecordKind;

    fn decode(address: Pubkey, data: &[u8], now: DateTime<Utc>) -> SdkResult<Self>;
}

/// Timestamps shared by both deal kinds after decoding
struct Timeline {
    created_at: DateTime<Utc>,
    purchased_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
}

impl Timeline {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.ends_at.is_some_and(|ends_at| ends_at < now)
    }
}

/// A stored timestamp the chain could never have written is corrupt data
fn moment(kind: RecordKind, field: &str, raw: i64) -> SdkResult<Option<DateTime<Utc>>> {
    to_amount(raw)
        .and_then(timestamp_to_moment)
        .map_err(|_| {
            SdkError::DeserializationError(format!(
                "{} has invalid {} timestamp {}",
                kind.name(),
                field,
                raw
            ))
        })
}

fn decode_timeline(
    kind: RecordKind,
    created_at: i64,
    purchased_at: i64,
    ends_at: i64,
) -> SdkResult<Timeline> {
    let created_at = moment(kind, "created_at", created_at)?.ok_or_else(|| {
        SdkError::DeserializationError(format!("{} has no creation time", kind.name()))
    })?;
    let purchased_at = moment(kind, "purchased_at", purchased_at)?;
    let ends_at = moment(kind, "ends_at", ends_at)?;

    if purchased_at.is_some() != ends_at.is_some() {
        return Err(SdkError::DeserializationError(format!(
            "{} has only one of purchase and end time",
            kind.name()
        )));
    }

    Ok(Timeline {
        created_at,
        purchased_at,
        ends_at,
    })
}

/// The default key marks an unset buyer
fn decode_buyer(raw: Pubkey) -> Option<Pubkey> {
    (raw != Pubkey::default()).then_some(raw)
}

fn decode_duration(days: u16) -> SdkResult<DealDuration> {
    DealDuration::from_days(days).map_err(|_| SdkError::UnknownVariant {
        field: "duration_days",
        tag: u64::from(days),
    })
}

impl DecodeRecord for YieldDeal {
    const KIND: RecordKind = RecordKind::YieldDeal;

    fn decode(address: Pubkey, data: &[u8], now: DateTime<Utc>) -> SdkResult<Self> {
        let raw = RawYieldDeal::decode(data)?;
        let status = DealStatus::from_tag(raw.status)?;
        let source_protocol = SourceProtocol::from_tag(raw.source_protocol)?;
        let timeline = decode_timeline(Self::KIND, raw.created_at, raw.purchased_at, raw.ends_at)?;

        Ok(YieldDeal {
            address,
            deal_id: raw.deal_id,
            seller: raw.seller,
            buyer: decode_buyer(raw.buyer),
            yield_token_mint: raw.yield_token_mint,
            source_protocol,
            locked_token_amount: Amount::from(raw.locked_token_amount),
            locked_value: Amount::from(raw.locked_value),
            expected_yield: Amount::from(raw.expected_yield),
            selling_price: Amount::from(raw.selling_price),
            payment_mint: raw.payment_mint,
            duration: decode_duration(raw.duration_days)?,
            is_available: status == DealStatus::Created,
            is_expired: timeline.is_expired(now),
            created_at: timeline.created_at,
            purchased_at: timeline.purchased_at,
            ends_at: timeline.ends_at,
            status,
        })
    }
}

impl DecodeRecord for MeteoraLpDeal {
    const KIND: RecordKind = RecordKind::MeteoraLpDeal;

    fn decode(address: Pubkey, data: &[u8], now: DateTime<Utc>) -> SdkResult<Self> {
        let raw = RawMeteoraLpDeal::decode(data)?;
        let status = DealStatus::from_tag(raw.status)?;
        let timeline = decode_timeline(Self::KIND, raw.created_at, raw.purchased_at, raw.ends_at)?;

        Ok(MeteoraLpDeal {
            address,
            deal_id: raw.deal_id,
            seller: raw.seller,
            buyer: decode_buyer(raw.buyer),
            pool: raw.pool,
            position: raw.position,
            position_nft_mint: raw.position_nft_mint,
            token_a_mint: raw.token_a_mint,
            token_b_mint: raw.token_b_mint,
            fee_a_at_lock: Amount::from(raw.fee_a_at_lock),
            fee_b_at_lock: Amount::from(raw.fee_b_at_lock),
            expected_fee_a: Amount::from(raw.expected_fee_a),
            expected_fee_b: Amount::from(raw.expected_fee_b),
            expected_total_value: Amount::from(raw.expected_total_value),
            selling_price: Amount::from(raw.selling_price),
            payment_mint: raw.payment_mint,
            duration: decode_duration(raw.duration_days)?,
            is_available: status == DealStatus::Created,
            is_expired: timeline.is_expired(now),
            created_at: timeline.created_at,
            purchased_at: timeline.purchased_at,
            ends_at: timeline.ends_at,
            status,
        })
    }
}

impl DecodeRecord for ProtocolConfig {
    const KIND: RecordKind = RecordKind::ProtocolConfig;

    fn decode(address: Pubkey, data: &[u8], _now: DateTime<Utc>) -> SdkResult<Self> {
        let raw = RawProtocolConfig::decode(data)?;
        Ok(ProtocolConfig {
            address,
            authority: raw.authority,
            treasury: raw.treasury,
            fee_bps: raw.fee_bps,
            min_duration_days: raw.min_duration_days,
            max_duration_days: raw.max_duration_days,
            min_penalty_bps: raw.min_penalty_bps,
            max_penalty_bps: raw.max_penalty_bps,
            is_paused: raw.is_paused,
            deal_counter: raw.deal_counter,
            whitelist: raw.whitelist,
        })
    }
}
