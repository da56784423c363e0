use num_traits::{CheckedAdd, CheckedSub};
use serde::Serialize;

use crate::core::{Amount, ProtocolConfig, SdkError, SdkResult, BPS_DENOMINATOR};

/// What a purchase moves, at the selling price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseQuote {
    /// Paid by the buyer
    pub price: Amount,
    /// Sent to the protocol treasury
    pub protocol_fee: Amount,
    /// Received by the seller
    pub seller_proceeds: Amount,
}

/// What the seller pays to buy a deal back before it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuybackQuote {
    pub price: Amount,
    pub penalty: Amount,
    pub total_cost: Amount,
}

fn check_bps(bps: u16, what: &str) -> SdkResult<()> {
    if u64::from(bps) > BPS_DENOMINATOR {
        return Err(SdkError::InvalidInput(format!(
            "{} of {} bps exceeds 100%",
            what, bps
        )));
    }
    Ok(())
}

/// Split a selling price into protocol fee and seller proceeds
pub fn quote_purchase(price: Amount, fee_bps: u16) -> SdkResult<PurchaseQuote> {
    check_bps(fee_bps, "Fee rate")?;
    let protocol_fee = price.bps(fee_bps)?;
    let seller_proceeds = price
        .checked_sub(&protocol_fee)
        .ok_or_else(|| SdkError::overflow("protocol fee exceeds price"))?;

    Ok(PurchaseQuote {
        price,
        protocol_fee,
        seller_proceeds,
    })
}

/// Price plus the early-exit penalty
pub fn quote_buyback(price: Amount, penalty_bps: u16) -> SdkResult<BuybackQuote> {
    let penalty = price.bps(penalty_bps)?;
    let total_cost = price
        .checked_add(&penalty)
        .ok_or_else(|| SdkError::overflow(format!("buyback cost of {} overflows", price)))?;

    Ok(BuybackQuote {
        price,
        penalty,
        total_cost,
    })
}

/// Quote a purchase using the configured protocol fee
pub fn quote_purchase_with_config(price: Amount, config: &ProtocolConfig) -> SdkResult<PurchaseQuote> {
    quote_purchase(price, config.fee_bps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_quote() {
        let quote = quote_purchase(Amount::new(10_000_000), 250).unwrap();
        assert_eq!(quote.protocol_fee, Amount::new(250_000));
        assert_eq!(quote.seller_proceeds, Amount::new(9_750_000));
        assert_eq!(
            quote.protocol_fee.value() + quote.seller_proceeds.value(),
            quote.price.value()
        );
    }

    #[test]
    fn test_purchase_quote_rounds_fee_down() {
        let quote = quote_purchase(Amount::new(999), 100).unwrap();
        assert_eq!(quote.protocol_fee, Amount::new(9));
        assert_eq!(quote.seller_proceeds, Amount::new(990));
    }

    #[test]
    fn test_fee_over_100_percent_rejected() {
        assert!(matches!(
            quote_purchase(Amount::new(1), 10_001),
            Err(SdkError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_buyback_quote() {
        let quote = quote_buyback(Amount::new(2_000_000), 500).unwrap();
        assert_eq!(quote.penalty, Amount::new(100_000));
        assert_eq!(quote.total_cost, Amount::new(2_100_000));
        assert!(matches!(
            quote_buyback(Amount::MAX, 1),
            Err(SdkError::Overflow { .. })
        ));
    }
}
