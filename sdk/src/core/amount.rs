//! Fixed-point amount codec
//!
//! Amounts are unsigned integers with an implicit decimal scale. They stay in
//! integer form until an explicit conversion at the presentation boundary;
//! nothing here goes through floating point.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{SdkError, SdkResult, BPS_DENOMINATOR, DEFAULT_DECIMALS};

/// Unsigned fixed-point quantity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(u128::MAX);

    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Basis-point share of this amount, rounded down
    pub fn bps(self, bps: u16) -> SdkResult<Amount> {
        self.0
            .checked_mul(u128::from(bps))
            .map(|v| Amount(v / u128::from(BPS_DENOMINATOR)))
            .ok_or_else(|| SdkError::overflow(format!("{} * {} bps overflows", self, bps)))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl TryFrom<Amount> for u64 {
    type Error = SdkError;

    fn try_from(amount: Amount) -> SdkResult<u64> {
        to_safe_integer(amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = SdkError;

    /// Parses a raw integer amount (no decimal point)
    fn from_str(s: &str) -> SdkResult<Self> {
        if s.contains('.') {
            return Err(SdkError::InvalidAmountFormat(s.to_string()));
        }
        parse_decimal(s, 0)
    }
}

// The operator impls saturate so they never panic; use the `checked_*`
// methods wherever an out-of-range result must be reported.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Zero for Amount {
    fn zero() -> Self {
        Amount::ZERO
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl CheckedAdd for Amount {
    fn checked_add(&self, v: &Self) -> Option<Self> {
        self.0.checked_add(v.0).map(Amount)
    }
}

impl CheckedSub for Amount {
    fn checked_sub(&self, v: &Self) -> Option<Self> {
        self.0.checked_sub(v.0).map(Amount)
    }
}

impl std::ops::Mul for Amount {
    type Output = Amount;

    fn mul(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_mul(rhs.0))
    }
}

impl CheckedMul for Amount {
    fn checked_mul(&self, v: &Self) -> Option<Self> {
        self.0.checked_mul(v.0).map(Amount)
    }
}

// Serialized as a decimal string so JSON consumers never lose precision
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Convert a signed integer to an amount, rejecting negatives
pub fn to_amount(value: impl Into<i128>) -> SdkResult<Amount> {
    let value = value.into();
    if value < 0 {
        return Err(SdkError::NegativeValue(value));
    }
    Ok(Amount(value as u128))
}

/// Convert to the native on-ledger width (u64)
pub fn to_safe_integer(amount: Amount) -> SdkResult<u64> {
    checked_safe_integer(amount).ok_or_else(|| SdkError::PrecisionOverflow(amount.to_string()))
}

/// Non-failing variant of [`to_safe_integer`]
pub fn checked_safe_integer(amount: Amount) -> Option<u64> {
    u64::try_from(amount.0).ok()
}

/// Seconds-since-epoch to a moment; zero means the event never happened
pub fn timestamp_to_moment(timestamp: Amount) -> SdkResult<Option<DateTime<Utc>>> {
    if timestamp.is_zero() {
        return Ok(None);
    }
    i64::try_from(timestamp.0)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(Some)
        .ok_or_else(|| SdkError::PrecisionOverflow(timestamp.to_string()))
}

/// Moment to whole seconds since epoch (sub-second part truncated)
pub fn moment_to_timestamp(moment: DateTime<Utc>) -> SdkResult<Amount> {
    to_amount(moment.timestamp())
}

/// Render `amount` as `integer.fraction` with exactly `decimals` fraction digits
pub fn format_decimal(amount: Amount, decimals: u32) -> String {
    let digits = amount.0.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };
    let split = padded.len() - decimals;
    format!("{}.{}", &padded[..split], &padded[split..])
}

/// Format with the default six-decimal scale
pub fn format_default(amount: Amount) -> String {
    format_decimal(amount, DEFAULT_DECIMALS)
}

/// Parse a non-negative decimal string into a fixed-point amount.
///
/// Accepts `digits` or `digits.digits` after trimming whitespace. Fraction
/// digits beyond `decimals` are truncated, never rounded.
pub fn parse_decimal(input: &str, decimals: u32) -> SdkResult<Amount> {
    let trimmed = input.trim();
    let invalid = || SdkError::InvalidAmountFormat(input.to_string());

    let (integer, fraction) = match trimmed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (trimmed, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer) || !fraction.map_or(true, all_digits) {
        return Err(invalid());
    }

    let decimals = decimals as usize;
    let fraction = fraction.unwrap_or("");
    let mut scaled = String::with_capacity(integer.len() + decimals);
    scaled.push_str(integer);
    if fraction.len() >= decimals {
        scaled.push_str(&fraction[..decimals]);
    } else {
        scaled.push_str(fraction);
        scaled.extend(std::iter::repeat('0').take(decimals - fraction.len()));
    }

    scaled
        .parse::<u128>()
        .map(Amount)
        .map_err(|_| SdkError::PrecisionOverflow(trimmed.to_string()))
}

/// Non-failing variant of [`parse_decimal`]
pub fn try_parse_decimal(input: &str, decimals: u32) -> Option<Amount> {
    parse_decimal(input, decimals).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(Amount::new(1), 6), "0.000001");
        assert_eq!(format_decimal(Amount::ZERO, 6), "0.000000");
        assert_eq!(format_decimal(Amount::new(1_500_000), 6), "1.500000");
        assert_eq!(format_decimal(Amount::new(123), 0), "123");
        assert_eq!(format_default(Amount::new(10_000_000)), "10.000000");
    }

    #[test]
    fn test_parse_truncates() {
        assert_eq!(parse_decimal("1.123456789", 6).unwrap(), Amount::new(1_123_456));
        assert_eq!(parse_decimal("  2.5 ", 6).unwrap(), Amount::new(2_500_000));
        assert_eq!(parse_decimal("7", 6).unwrap(), Amount::new(7_000_000));
        assert_eq!(parse_decimal("0.9", 0).unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "   ", "abc", "100abc", "-100", "100.50.25", "1.", ".5", "+1", "1e6"] {
            match parse_decimal(input, 6) {
                Err(SdkError::InvalidAmountFormat(_)) => {}
                other => panic!("{:?} parsed as {:?}", input, other),
            }
            assert_eq!(try_parse_decimal(input, 6), None);
        }
    }

    #[test]
    fn test_parse_accepts_wide_scale() {
        let tiny = format!("0.{}1", "0".repeat(38));
        assert_eq!(parse_decimal(&tiny, 39).unwrap(), Amount::new(1));
        assert_eq!(parse_decimal("0", 39).unwrap(), Amount::ZERO);
        assert_eq!(format_decimal(Amount::new(1), 39), tiny);
        assert!(matches!(
            parse_decimal("1", 39),
            Err(SdkError::PrecisionOverflow(_))
        ));
    }

    #[test]
    fn test_parse_overflow() {
        let too_big = format!("{}0", u128::MAX);
        assert!(matches!(
            parse_decimal(&too_big, 0),
            Err(SdkError::PrecisionOverflow(_))
        ));
    }

    #[test]
    fn test_safe_integer_bounds() {
        assert_eq!(to_safe_integer(Amount::from(u64::MAX)).unwrap(), u64::MAX);
        assert!(matches!(
            to_safe_integer(Amount::new(u64::MAX as u128 + 1)),
            Err(SdkError::PrecisionOverflow(_))
        ));
        assert_eq!(checked_safe_integer(Amount::new(u128::MAX)), None);
    }

    #[test]
    fn test_to_amount_rejects_negative() {
        assert!(matches!(to_amount(-1i64), Err(SdkError::NegativeValue(-1))));
        assert_eq!(to_amount(42u32).unwrap(), Amount::new(42));
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(timestamp_to_moment(Amount::ZERO).unwrap(), None);
        let moment = timestamp_to_moment(Amount::new(1_700_000_000)).unwrap().unwrap();
        assert_eq!(moment.timestamp(), 1_700_000_000);
        assert_eq!(moment_to_timestamp(moment).unwrap(), Amount::new(1_700_000_000));
        assert!(timestamp_to_moment(Amount::new(u128::MAX)).is_err());
    }

    #[test]
    fn test_operators_saturate() {
        assert_eq!(Amount::MAX + Amount::new(1), Amount::MAX);
        assert_eq!(Amount::new(1) - Amount::new(2), Amount::ZERO);
        assert_eq!(Amount::MAX * Amount::new(2), Amount::MAX);
        assert_eq!(Amount::new(1).checked_sub(&Amount::new(2)), None);
        assert_eq!(Amount::MAX.checked_add(&Amount::new(1)), None);
    }

    #[test]
    fn test_bps_share() {
        assert_eq!(Amount::new(1_000_000).bps(250).unwrap(), Amount::new(25_000));
        let full = u16::try_from(BPS_DENOMINATOR).unwrap();
        assert_eq!(Amount::new(123_456).bps(full).unwrap(), Amount::new(123_456));
        assert!(Amount::MAX.bps(2).is_err());
    }

    #[test]
    fn test_json_is_string() {
        let json = serde_json::to_string(&Amount::new(u128::from(u64::MAX) + 5)).unwrap();
        assert_eq!(json, "\"18446744073709551620\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Amount::new(u128::from(u64::MAX) + 5));
    }
}
