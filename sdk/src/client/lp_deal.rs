use std::sync::Arc;

use crate::prelude::*;
use solana_sdk::instruction::Instruction;
use tracing::debug;

use crate::{
    client::{BaseClient, DealFilter, PreparedDeal},
    core::{MeteoraLpDeal, ProtocolConfig, SdkResult},
    instructions::LpDealInstructionBuilder,
    protocol::PdaBuilder,
    validation::{validate_penalty, CreateMeteoraLpDealParams},
};

/// Service for Meteora LP-position deals
pub struct LpDealService {
    base: Arc<BaseClient>,
    pda: Arc<PdaBuilder>,
    builder: LpDealInstructionBuilder,
}

impl LpDealService {
    pub fn new(base: Arc<BaseClient>, pda: Arc<PdaBuilder>) -> Self {
        Self {
            builder: LpDealInstructionBuilder::new(pda.program_id),
            base,
            pda,
        }
    }

    pub async fn get_deal(&self, deal_id: u64) -> SdkResult<Option<MeteoraLpDeal>> {
        let (address, _) = self.pda.meteora_lp_deal(deal_id);
        self.base.fetch_one(&address).await
    }

    pub async fn get_deal_by_address(&self, address: &Pubkey) -> SdkResult<Option<MeteoraLpDeal>> {
        self.base.fetch_one(address).await
    }

    pub async fn get_deals(&self, filter: Option<&DealFilter>) -> SdkResult<Vec<MeteoraLpDeal>> {
        let deals = self.base.fetch_all::<MeteoraLpDeal>().await?;
        let total = deals.len();
        let deals = match filter {
            Some(filter) => filter.apply(deals),
            None => deals,
        };
        debug!(total, matched = deals.len(), "filtered LP deals");
        Ok(deals)
    }

    pub async fn get_available_deals(&self) -> SdkResult<Vec<MeteoraLpDeal>> {
        self.get_deals(Some(&DealFilter::available())).await
    }

    pub async fn get_deals_by_seller(&self, seller: Pubkey) -> SdkResult<Vec<MeteoraLpDeal>> {
        self.get_deals(Some(&DealFilter::new().seller(seller))).await
    }

    pub async fn get_deals_by_buyer(&self, buyer: Pubkey) -> SdkResult<Vec<MeteoraLpDeal>> {
        self.get_deals(Some(&DealFilter::new().buyer(buyer))).await
    }

    async fn config(&self) -> SdkResult<ProtocolConfig> {
        let (address, _) = self.pda.protocol_config();
        self.base
            .fetch_required(&address, format!("protocol config {}", address))
            .await
    }

    async fn require_deal(&self, deal_id: u64) -> SdkResult<MeteoraLpDeal> {
        let (address, _) = self.pda.meteora_lp_deal(deal_id);
        self.base
            .fetch_required(&address, format!("LP deal {} at {}", deal_id, address))
            .await
    }

    /// Lock a position and list it under the config's next identifier
    pub async fn create_deal_ixs(
        &self,
        seller: Pubkey,
        params: &CreateMeteoraLpDealParams,
    ) -> SdkResult<PreparedDeal> {
        let deal_id = self.config().await?.next_deal_id();
        let instructions = self.builder.create_meteora_lp_deal(seller, deal_id, params)?;
        let (address, _) = self.pda.meteora_lp_deal(deal_id);
        debug!(deal_id, %address, "prepared LP deal listing");

        Ok(PreparedDeal {
            deal_id,
            address,
            instructions,
        })
    }

    pub async fn buy_deal_ixs(&self, buyer: Pubkey, deal_id: u64) -> SdkResult<Vec<Instruction>> {
        let config = self.config().await?;
        let deal = self.require_deal(deal_id).await?;
        self.builder.buy_meteora_lp_deal(buyer, &deal, config.treasury)
    }

    pub async fn settle_deal_ixs(&self, payer: Pubkey, deal_id: u64) -> SdkResult<Vec<Instruction>> {
        let deal = self.require_deal(deal_id).await?;
        self.builder.settle_meteora_lp_deal(payer, &deal)
    }

    pub async fn cancel_deal_ixs(&self, deal_id: u64) -> SdkResult<Vec<Instruction>> {
        let deal = self.require_deal(deal_id).await?;
        self.builder.cancel_meteora_lp_deal(&deal)
    }

    pub async fn buyback_deal_ixs(
        &self,
        deal_id: u64,
        penalty_bps: u16,
    ) -> SdkResult<Vec<Instruction>> {
        let config = self.config().await?;
        validate_penalty(penalty_bps, &config)?;
        let deal = self.require_deal(deal_id).await?;
        self.builder
            .buyback_meteora_lp_deal(&deal, config.treasury, penalty_bps)
    }
}
