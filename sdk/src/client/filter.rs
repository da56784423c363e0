//! In-memory deal filtering
//!
//! A filter is a conjunction: every field that is set must match, unset
//! fields impose nothing. Filtering keeps the relative order of its input.

use crate::core::{Amount, DealRecord, DealStatus, SourceProtocol};
use crate::prelude::*;

/// Status constraint: one value or membership in a set
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    One(DealStatus),
    AnyOf(Vec<DealStatus>),
}

impl StatusFilter {
    pub fn matches(&self, status: DealStatus) -> bool {
        match self {
            StatusFilter::One(expected) => *expected == status,
            StatusFilter::AnyOf(allowed) => allowed.contains(&status),
        }
    }
}

impl From<DealStatus> for StatusFilter {
    fn from(status: DealStatus) -> Self {
        StatusFilter::One(status)
    }
}

impl From<Vec<DealStatus>> for StatusFilter {
    fn from(statuses: Vec<DealStatus>) -> Self {
        StatusFilter::AnyOf(statuses)
    }
}

impl<const N: usize> From<[DealStatus; N]> for StatusFilter {
    fn from(statuses: [DealStatus; N]) -> Self {
        StatusFilter::AnyOf(statuses.to_vec())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DealFilter {
    pub status: Option<StatusFilter>,
    pub seller: Option<Pubkey>,
    pub buyer: Option<Pubkey>,
    /// Deals without a source protocol never match a set value
    pub source_protocol: Option<SourceProtocol>,
    /// Inclusive lower bound on the selling price
    pub min_price: Option<Amount>,
    /// Inclusive upper bound on the selling price
    pub max_price: Option<Amount>,
}

impl DealFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deals still open for purchase
    pub fn available() -> Self {
        Self::new().status(DealStatus::Created)
    }

    pub fn status(mut self, status: impl Into<StatusFilter>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn seller(mut self, seller: Pubkey) -> Self {
        self.seller = Some(seller);
        self
    }

    pub fn buyer(mut self, buyer: Pubkey) -> Self {
        self.buyer = Some(buyer);
        self
    }

    pub fn source_protocol(mut self, protocol: SourceProtocol) -> Self {
        self.source_protocol = Some(protocol);
        self
    }

    pub fn min_price(mut self, price: Amount) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn max_price(mut self, price: Amount) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches<D: DealRecord>(&self, deal: &D) -> bool {
        let price = deal.selling_price();

        self.status.as_ref().map_or(true, |s| s.matches(deal.status()))
            && self.seller.map_or(true, |seller| deal.seller() == seller)
            && self.buyer.map_or(true, |buyer| deal.buyer() == Some(buyer))
            && self
                .source_protocol
                .map_or(true, |protocol| deal.source_protocol() == Some(protocol))
            && self.min_price.map_or(true, |min| price >= min)
            && self.max_price.map_or(true, |max| price <= max)
    }

    pub fn apply<D: DealRecord>(&self, deals: Vec<D>) -> Vec<D> {
        deals.into_iter().filter(|deal| self.matches(deal)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Listing {
        id: u64,
        status: DealStatus,
        seller: Pubkey,
        buyer: Option<Pubkey>,
        protocol: Option<SourceProtocol>,
        price: u128,
    }

    impl DealRecord for Listing {
        fn deal_id(&self) -> u64 {
            self.id
        }
        fn address(&self) -> Pubkey {
            Pubkey::default()
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
            self.protocol
        }
        fn selling_price(&self) -> Amount {
            Amount::new(self.price)
        }
    }

    fn listings(seller: Pubkey, buyer: Pubkey) -> Vec<Listing> {
        vec![
            Listing {
                id: 0,
                status: DealStatus::Created,
                seller,
                buyer: None,
                protocol: Some(SourceProtocol::Jito),
                price: 100,
            },
            Listing {
                id: 1,
                status: DealStatus::Active,
                seller,
                buyer: Some(buyer),
                protocol: Some(SourceProtocol::Solend),
                price: 200,
            },
            Listing {
                id: 2,
                status: DealStatus::Created,
                seller: buyer,
                buyer: None,
                protocol: None,
                price: 300,
            },
            Listing {
                id: 3,
                status: DealStatus::Settled,
                seller,
                buyer: Some(buyer),
                protocol: Some(SourceProtocol::Jito),
                price: 400,
            },
        ]
    }

    fn ids(deals: &[Listing]) -> Vec<u64> {
        deals.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let all = listings(Pubkey::new_unique(), Pubkey::new_unique());
        assert!(DealFilter::new().is_empty());
        assert_eq!(ids(&DealFilter::new().apply(all)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_status_one_and_any_of() {
        let (seller, buyer) = (Pubkey::new_unique(), Pubkey::new_unique());
        assert_eq!(ids(&DealFilter::available().apply(listings(seller, buyer))), vec![0, 2]);

        let terminal_or_active = DealFilter::new().status([DealStatus::Active, DealStatus::Settled]);
        assert_eq!(ids(&terminal_or_active.apply(listings(seller, buyer))), vec![1, 3]);
    }

    #[test]
    fn test_fields_are_conjunctive() {
        let (seller, buyer) = (Pubkey::new_unique(), Pubkey::new_unique());
        let filter = DealFilter::new()
            .seller(seller)
            .source_protocol(SourceProtocol::Jito)
            .min_price(Amount::new(150));
        assert_eq!(ids(&filter.apply(listings(seller, buyer))), vec![3]);

        let by_buyer = DealFilter::new().buyer(buyer).max_price(Amount::new(200));
        assert_eq!(ids(&by_buyer.apply(listings(seller, buyer))), vec![1]);
    }

    #[test]
    fn test_protocol_filter_skips_deals_without_protocol() {
        let (seller, buyer) = (Pubkey::new_unique(), Pubkey::new_unique());
        let filter = DealFilter::new().seller(buyer).source_protocol(SourceProtocol::Jito);
        assert!(filter.apply(listings(seller, buyer)).is_empty());
    }
}
