//! Fixed-point amount codec properties

use proptest::prelude::*;
use yield_market_sdk::{
    checked_safe_integer, format_decimal, parse_decimal, to_amount, to_safe_integer,
    try_parse_decimal, Amount, SdkError,
};

proptest! {
    #[test]
    fn prop_format_then_parse_is_identity(value in any::<u128>(), decimals in 0u32..=80) {
        let amount = Amount::new(value);
        let rendered = format_decimal(amount, decimals);
        prop_assert_eq!(parse_decimal(&rendered, decimals).unwrap(), amount);
    }

    #[test]
    fn prop_safe_integer_round_trip(value in any::<u64>()) {
        let amount = to_amount(value).unwrap();
        prop_assert_eq!(to_safe_integer(amount).unwrap(), value);
    }

    #[test]
    fn prop_negative_values_rejected(value in i64::MIN..0i64) {
        let rejected = matches!(to_amount(value), Err(SdkError::NegativeValue(v)) if v == i128::from(value));
        prop_assert!(rejected);
    }

    #[test]
    fn prop_above_u64_overflows(excess in 1u128..=u128::from(u64::MAX)) {
        let amount = Amount::new(u128::from(u64::MAX) + excess);
        prop_assert!(matches!(to_safe_integer(amount), Err(SdkError::PrecisionOverflow(_))));
        prop_assert_eq!(checked_safe_integer(amount), None);
    }
}

#[test]
fn test_format_examples() {
    assert_eq!(format_decimal(Amount::new(1), 6), "0.000001");
    assert_eq!(format_decimal(Amount::ZERO, 6), "0.000000");
    assert_eq!(format_decimal(Amount::new(1_500_000), 6), "1.500000");
}

#[test]
fn test_parse_truncates_extra_fraction_digits() {
    assert_eq!(parse_decimal("1.123456789", 6).unwrap(), Amount::new(1_123_456));
    assert_eq!(parse_decimal("  2.5 ", 6).unwrap(), Amount::new(2_500_000));
}

#[test]
fn test_parse_rejects_malformed_input() {
    for input in ["", "   ", "abc", "100abc", "-100", "100.50.25"] {
        assert!(
            matches!(parse_decimal(input, 6), Err(SdkError::InvalidAmountFormat(_))),
            "{:?} should be rejected",
            input
        );
        assert_eq!(try_parse_decimal(input, 6), None);
    }
}

#[test]
fn test_parse_beyond_u128_digits() {
    let one_unit = format!("0.{}1", "0".repeat(38));
    assert_eq!(parse_decimal(&one_unit, 39).unwrap(), Amount::new(1));
    assert_eq!(parse_decimal("0", 39).unwrap(), Amount::ZERO);
    assert!(matches!(
        parse_decimal("1", 39),
        Err(SdkError::PrecisionOverflow(_))
    ));
}
