use std::sync::Arc;

use crate::prelude::*;
use solana_sdk::instruction::Instruction;
use tracing::debug;

use crate::{
    client::{BaseClient, DealFilter, PreparedDeal},
    core::{ProtocolConfig, SdkResult, SourceProtocol, YieldDeal},
    instructions::YieldDealInstructionBuilder,
    protocol::PdaBuilder,
    validation::{validate_penalty, CreateYieldDealParams},
};

/// Service for yield-receipt deals
pub struct YieldDealService {
    base: Arc<BaseClient>,
    pda: Arc<PdaBuilder>,
    builder: YieldDealInstructionBuilder,
}

impl YieldDealService {
    pub fn new(base: Arc<BaseClient>, pda: Arc<PdaBuilder>) -> Self {
        Self {
            builder: YieldDealInstructionBuilder::new(pda.program_id),
            base,
            pda,
        }
    }

    /// Deal by identifier, `None` if it was never created
    pub async fn get_deal(&self, deal_id: u64) -> SdkResult<Option<YieldDeal>> {
        let (address, _) = self.pda.yield_deal(deal_id);
        self.base.fetch_one(&address).await
    }

    pub async fn get_deal_by_address(&self, address: &Pubkey) -> SdkResult<Option<YieldDeal>> {
        self.base.fetch_one(address).await
    }

    /// All deals matching `filter`, in the order the transport returned them
    pub async fn get_deals(&self, filter: Option<&DealFilter>) -> SdkResult<Vec<YieldDeal>> {
        let deals = self.base.fetch_all::<YieldDeal>().await?;
        let total = deals.len();
        let deals = match filter {
            Some(filter) => filter.apply(deals),
            None => deals,
        };
        debug!(total, matched = deals.len(), "filtered yield deals");
        Ok(deals)
    }

    pub async fn get_available_deals(&self) -> SdkResult<Vec<YieldDeal>> {
        self.get_deals(Some(&DealFilter::available())).await
    }

    pub async fn get_deals_by_seller(&self, seller: Pubkey) -> SdkResult<Vec<YieldDeal>> {
        self.get_deals(Some(&DealFilter::new().seller(seller))).await
    }

    pub async fn get_deals_by_buyer(&self, buyer: Pubkey) -> SdkResult<Vec<YieldDeal>> {
        self.get_deals(Some(&DealFilter::new().buyer(buyer))).await
    }

    pub async fn get_deals_by_protocol(&self, protocol: SourceProtocol) -> SdkResult<Vec<YieldDeal>> {
        self.get_deals(Some(&DealFilter::new().source_protocol(protocol)))
            .await
    }

    async fn config(&self) -> SdkResult<ProtocolConfig> {
        let (address, _) = self.pda.protocol_config();
        self.base
            .fetch_required(&address, format!("protocol config {}", address))
            .await
    }

    async fn require_deal(&self, deal_id: u64) -> SdkResult<YieldDeal> {
        let (address, _) = self.pda.yield_deal(deal_id);
        self.base
            .fetch_required(&address, format!("yield deal {} at {}", deal_id, address))
            .await
    }

    /// List a new deal under the config's next identifier
    ///
    /// The counter is read now; a concurrent listing can take the same id
    /// first, in which case the program rejects this transaction.
    pub async fn create_deal_ixs(
        &self,
        seller: Pubkey,
        params: &CreateYieldDealParams,
    ) -> SdkResult<PreparedDeal> {
        let deal_id = self.config().await?.next_deal_id();
        let instructions = self.builder.create_yield_deal(seller, deal_id, params)?;
        let (address, _) = self.pda.yield_deal(deal_id);
        debug!(deal_id, %address, "prepared yield deal listing");

        Ok(PreparedDeal {
            deal_id,
            address,
            instructions,
        })
    }

    pub async fn buy_deal_ixs(&self, buyer: Pubkey, deal_id: u64) -> SdkResult<Vec<Instruction>> {
        let config = self.config().await?;
        let deal = self.require_deal(deal_id).await?;
        self.builder.buy_yield_deal(buyer, &deal, config.treasury)
    }

    pub async fn settle_deal_ixs(&self, payer: Pubkey, deal_id: u64) -> SdkResult<Vec<Instruction>> {
        let deal = self.require_deal(deal_id).await?;
        self.builder.settle_yield_deal(payer, &deal)
    }

    pub async fn cancel_deal_ixs(&self, deal_id: u64) -> SdkResult<Vec<Instruction>> {
        let deal = self.require_deal(deal_id).await?;
        self.builder.cancel_yield_deal(&deal)
    }

    /// Early exit by the seller at `penalty_bps`, checked against the config bounds
    pub async fn buyback_deal_ixs(
        &self,
        deal_id: u64,
        penalty_bps: u16,
    ) -> SdkResult<Vec<Instruction>> {
        let config = self.config().await?;
        validate_penalty(penalty_bps, &config)?;
        let deal = self.require_deal(deal_id).await?;
        self.builder
            .buyback_yield_deal(&deal, config.treasury, penalty_bps)
    }
}
