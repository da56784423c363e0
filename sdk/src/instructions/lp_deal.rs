use crate::prelude::*;
use solana_sdk::instruction::Instruction;

use crate::{
    core::{MeteoraLpDeal, SdkError, SdkResult},
    impl_instruction,
    instructions::{
        builder::ledger_amount, associated_token_address, create_token_account_idempotent,
        YieldMarketInstructionBuilder,
    },
    protocol::PdaBuilder,
    validation::{validate_lp_deal_params, CreateMeteoraLpDealParams},
};

// Instruction discriminators
const CREATE_METEORA_LP_DEAL_DISCRIMINATOR: [u8; 8] = [200, 60, 129, 175, 155, 62, 24, 62];
const BUY_METEORA_LP_DEAL_DISCRIMINATOR: [u8; 8] = [94, 186, 141, 79, 1, 136, 151, 241];
const SETTLE_METEORA_LP_DEAL_DISCRIMINATOR: [u8; 8] = [195, 32, 60, 155, 142, 18, 234, 240];
const CANCEL_METEORA_LP_DEAL_DISCRIMINATOR: [u8; 8] = [231, 205, 1, 32, 38, 51, 147, 110];
const BUYBACK_METEORA_LP_DEAL_DISCRIMINATOR: [u8; 8] = [6, 111, 147, 145, 77, 54, 118, 85];

/// On-ledger arguments of `create_meteora_lp_deal`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateMeteoraLpDealArgs {
    pub fee_a_at_lock: u64,
    pub fee_b_at_lock: u64,
    pub expected_fee_a: u64,
    pub expected_fee_b: u64,
    pub expected_total_value: u64,
    pub selling_price: u64,
    pub duration_days: u16,
}

impl_instruction!(CreateMeteoraLpDealArgs, CREATE_METEORA_LP_DEAL_DISCRIMINATOR);

impl CreateMeteoraLpDealArgs {
    pub fn from_params(params: &CreateMeteoraLpDealParams) -> SdkResult<Self> {
        Ok(Self {
            fee_a_at_lock: ledger_amount(params.fee_a_at_lock, "fee A at lock")?,
            fee_b_at_lock: ledger_amount(params.fee_b_at_lock, "fee B at lock")?,
            expected_fee_a: ledger_amount(params.expected_fee_a, "expected fee A")?,
            expected_fee_b: ledger_amount(params.expected_fee_b, "expected fee B")?,
            expected_total_value: ledger_amount(params.expected_total_value, "expected total value")?,
            selling_price: ledger_amount(params.selling_price, "selling price")?,
            duration_days: params.duration.days(),
        })
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct BuyMeteoraLpDealArgs {}

impl_instruction!(BuyMeteoraLpDealArgs, BUY_METEORA_LP_DEAL_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SettleMeteoraLpDealArgs {}

impl_instruction!(SettleMeteoraLpDealArgs, SETTLE_METEORA_LP_DEAL_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CancelMeteoraLpDealArgs {}

impl_instruction!(CancelMeteoraLpDealArgs, CANCEL_METEORA_LP_DEAL_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct BuybackMeteoraLpDealArgs {
    pub penalty_bps: u16,
}

impl_instruction!(BuybackMeteoraLpDealArgs, BUYBACK_METEORA_LP_DEAL_DISCRIMINATOR);

/// Meteora LP deal instruction builder
pub struct LpDealInstructionBuilder {
    pda: PdaBuilder,
}

impl LpDealInstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            pda: PdaBuilder::new(program_id),
        }
    }

    fn instruction(&self) -> YieldMarketInstructionBuilder {
        YieldMarketInstructionBuilder::new(self.pda.program_id)
    }

    /// Lock a position NFT and list it under `deal_id`
    pub fn create_meteora_lp_deal(
        &self,
        seller: Pubkey,
        deal_id: u64,
        params: &CreateMeteoraLpDealParams,
    ) -> SdkResult<Vec<Instruction>> {
        validate_lp_deal_params(params)?;
        let args = CreateMeteoraLpDealArgs::from_params(params)?;

        let (protocol_config, _) = self.pda.protocol_config();
        let (deal, _) = self.pda.meteora_lp_deal(deal_id);
        let (nft_vault, _) = self.pda.meteora_nft_vault(&deal);

        let ix = self
            .instruction()
            .add_signer(seller)
            .add_writable(protocol_config)
            .add_writable(deal)
            .add_writable(nft_vault)
            .add_readonly(params.pool)
            .add_readonly(params.position)
            .add_readonly(params.position_nft_mint)
            .add_writable(associated_token_address(&seller, &params.position_nft_mint))
            .add_readonly(params.token_a_mint)
            .add_readonly(params.token_b_mint)
            .add_readonly(params.payment_mint)
            .add_token_programs()
            .with_args(&args)?
            .build();

        Ok(vec![ix])
    }

    pub fn buy_meteora_lp_deal(
        &self,
        buyer: Pubkey,
        deal: &MeteoraLpDeal,
        treasury: Pubkey,
    ) -> SdkResult<Vec<Instruction>> {
        let (protocol_config, _) = self.pda.protocol_config();
        let mint = deal.payment_mint;

        let ix = self
            .instruction()
            .add_signer(buyer)
            .add_readonly(protocol_config)
            .add_writable(deal.address)
            .add_readonly(deal.seller)
            .add_readonly(mint)
            .add_writable(associated_token_address(&buyer, &mint))
            .add_writable(associated_token_address(&deal.seller, &mint))
            .add_writable(associated_token_address(&treasury, &mint))
            .add_token_programs()
            .with_args(&BuyMeteoraLpDealArgs {})?
            .build();

        Ok(vec![
            create_token_account_idempotent(&buyer, &deal.seller, &mint),
            create_token_account_idempotent(&buyer, &treasury, &mint),
            ix,
        ])
    }

    /// Hand the position NFT to the buyer once the deal has ended
    pub fn settle_meteora_lp_deal(
        &self,
        payer: Pubkey,
        deal: &MeteoraLpDeal,
    ) -> SdkResult<Vec<Instruction>> {
        let buyer = deal.buyer.ok_or_else(|| {
            SdkError::InvalidInput(format!("deal {} has no buyer to settle to", deal.deal_id))
        })?;
        let (nft_vault, _) = self.pda.meteora_nft_vault(&deal.address);
        let nft = deal.position_nft_mint;

        let ix = self
            .instruction()
            .add_signer(payer)
            .add_writable(deal.address)
            .add_writable(nft_vault)
            .add_readonly(deal.position)
            .add_readonly(nft)
            .add_readonly(buyer)
            .add_writable(associated_token_address(&buyer, &nft))
            .add_token_programs()
            .with_args(&SettleMeteoraLpDealArgs {})?
            .build();

        Ok(vec![create_token_account_idempotent(&payer, &buyer, &nft), ix])
    }

    pub fn cancel_meteora_lp_deal(&self, deal: &MeteoraLpDeal) -> SdkResult<Vec<Instruction>> {
        let (nft_vault, _) = self.pda.meteora_nft_vault(&deal.address);
        let nft = deal.position_nft_mint;

        let ix = self
            .instruction()
            .add_signer(deal.seller)
            .add_writable(deal.address)
            .add_writable(nft_vault)
            .add_readonly(nft)
            .add_writable(associated_token_address(&deal.seller, &nft))
            .add_token_programs()
            .with_args(&CancelMeteoraLpDealArgs {})?
            .build();

        Ok(vec![ix])
    }

    pub fn buyback_meteora_lp_deal(
        &self,
        deal: &MeteoraLpDeal,
        treasury: Pubkey,
        penalty_bps: u16,
    ) -> SdkResult<Vec<Instruction>> {
        let buyer = deal.buyer.ok_or_else(|| {
            SdkError::InvalidInput(format!("deal {} has no buyer to buy back from", deal.deal_id))
        })?;
        let (protocol_config, _) = self.pda.protocol_config();
        let (nft_vault, _) = self.pda.meteora_nft_vault(&deal.address);
        let payment = deal.payment_mint;
        let nft = deal.position_nft_mint;

        let ix = self
            .instruction()
            .add_signer(deal.seller)
            .add_readonly(protocol_config)
            .add_writable(deal.address)
            .add_writable(nft_vault)
            .add_readonly(nft)
            .add_writable(associated_token_address(&deal.seller, &nft))
            .add_readonly(payment)
            .add_writable(associated_token_address(&deal.seller, &payment))
            .add_readonly(buyer)
            .add_writable(associated_token_address(&buyer, &payment))
            .add_writable(associated_token_address(&treasury, &payment))
            .add_token_programs()
            .with_args(&BuybackMeteoraLpDealArgs { penalty_bps })?
            .build();

        Ok(vec![
            create_token_account_idempotent(&deal.seller, &buyer, &payment),
            create_token_account_idempotent(&deal.seller, &deal.seller, &nft),
            ix,
        ])
    }
}
