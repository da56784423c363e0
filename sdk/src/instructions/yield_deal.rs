use crate::prelude::*;
use solana_sdk::instruction::Instruction;

use crate::{
    core::{SdkError, SdkResult, YieldDeal},
    impl_instruction,
    instructions::{
        builder::ledger_amount, associated_token_address, create_token_account_idempotent,
        YieldMarketInstructionBuilder,
    },
    protocol::PdaBuilder,
    validation::{validate_yield_deal_params, CreateYieldDealParams},
};

// Instruction discriminators
const CREATE_YIELD_DEAL_DISCRIMINATOR: [u8; 8] = [74, 139, 71, 195, 7, 231, 35, 35];
const BUY_YIELD_DEAL_DISCRIMINATOR: [u8; 8] = [26, 52, 182, 105, 206, 201, 22, 160];
const SETTLE_YIELD_DEAL_DISCRIMINATOR: [u8; 8] = [41, 120, 0, 190, 132, 45, 17, 240];
const CANCEL_YIELD_DEAL_DISCRIMINATOR: [u8; 8] = [0, 79, 18, 116, 45, 86, 19, 55];
const BUYBACK_YIELD_DEAL_DISCRIMINATOR: [u8; 8] = [58, 89, 142, 51, 163, 163, 159, 182];

/// On-ledger arguments of `create_yield_deal`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateYieldDealArgs {
    pub source_protocol: u8,
    pub locked_token_amount: u64,
    pub locked_value: u64,
    pub expected_yield: u64,
    pub selling_price: u64,
    pub duration_days: u16,
}

impl_instruction!(CreateYieldDealArgs, CREATE_YIELD_DEAL_DISCRIMINATOR);

impl CreateYieldDealArgs {
    pub fn from_params(params: &CreateYieldDealParams) -> SdkResult<Self> {
        Ok(Self {
            source_protocol: params.source_protocol.tag(),
            locked_token_amount: ledger_amount(params.locked_token_amount, "locked token amount")?,
            locked_value: ledger_amount(params.locked_value, "locked value")?,
            expected_yield: ledger_amount(params.expected_yield, "expected yield")?,
            selling_price: ledger_amount(params.selling_price, "selling price")?,
            duration_days: params.duration.days(),
        })
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct BuyYieldDealArgs {}

impl_instruction!(BuyYieldDealArgs, BUY_YIELD_DEAL_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SettleYieldDealArgs {}

impl_instruction!(SettleYieldDealArgs, SETTLE_YIELD_DEAL_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CancelYieldDealArgs {}

impl_instruction!(CancelYieldDealArgs, CANCEL_YIELD_DEAL_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct BuybackYieldDealArgs {
    pub penalty_bps: u16,
}

impl_instruction!(BuybackYieldDealArgs, BUYBACK_YIELD_DEAL_DISCRIMINATOR);

/// Yield deal instruction builder
///
/// Every method returns the instructions in submission order; nothing is sent.
pub struct YieldDealInstructionBuilder {
    pda: PdaBuilder,
}

impl YieldDealInstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            pda: PdaBuilder::new(program_id),
        }
    }

    fn instruction(&self) -> YieldMarketInstructionBuilder {
        YieldMarketInstructionBuilder::new(self.pda.program_id)
    }

    /// List a new deal under `deal_id`, which must be the config's current counter
    pub fn create_yield_deal(
        &self,
        seller: Pubkey,
        deal_id: u64,
        params: &CreateYieldDealParams,
    ) -> SdkResult<Vec<Instruction>> {
        validate_yield_deal_params(params)?;
        let args = CreateYieldDealArgs::from_params(params)?;

        let (protocol_config, _) = self.pda.protocol_config();
        let (deal, _) = self.pda.yield_deal(deal_id);
        let (vault, _) = self.pda.yield_vault(&deal);

        let ix = self
            .instruction()
            .add_signer(seller)
            .add_writable(protocol_config)
            .add_writable(deal)
            .add_writable(vault)
            .add_readonly(params.yield_token_mint)
            .add_writable(associated_token_address(&seller, &params.yield_token_mint))
            .add_readonly(params.payment_mint)
            .add_token_programs()
            .with_args(&args)?
            .build();

        Ok(vec![ix])
    }

    /// Pay the selling price; seller and treasury payment accounts are created if missing
    pub fn buy_yield_deal(
        &self,
        buyer: Pubkey,
        deal: &YieldDeal,
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
            .with_args(&BuyYieldDealArgs {})?
            .build();

        Ok(vec![
            create_token_account_idempotent(&buyer, &deal.seller, &mint),
            create_token_account_idempotent(&buyer, &treasury, &mint),
            ix,
        ])
    }

    /// Release the locked receipt tokens to the buyer once the deal has ended
    pub fn settle_yield_deal(&self, payer: Pubkey, deal: &YieldDeal) -> SdkResult<Vec<Instruction>> {
        let buyer = deal.buyer.ok_or_else(|| {
            SdkError::InvalidInput(format!("deal {} has no buyer to settle to", deal.deal_id))
        })?;
        let (vault, _) = self.pda.yield_vault(&deal.address);
        let mint = deal.yield_token_mint;

        let ix = self
            .instruction()
            .add_signer(payer)
            .add_writable(deal.address)
            .add_writable(vault)
            .add_readonly(mint)
            .add_readonly(buyer)
            .add_writable(associated_token_address(&buyer, &mint))
            .add_token_programs()
            .with_args(&SettleYieldDealArgs {})?
            .build();

        Ok(vec![create_token_account_idempotent(&payer, &buyer, &mint), ix])
    }

    /// Withdraw an unsold listing; signed by the seller
    pub fn cancel_yield_deal(&self, deal: &YieldDeal) -> SdkResult<Vec<Instruction>> {
        let (vault, _) = self.pda.yield_vault(&deal.address);
        let mint = deal.yield_token_mint;

        let ix = self
            .instruction()
            .add_signer(deal.seller)
            .add_writable(deal.address)
            .add_writable(vault)
            .add_readonly(mint)
            .add_writable(associated_token_address(&deal.seller, &mint))
            .add_token_programs()
            .with_args(&CancelYieldDealArgs {})?
            .build();

        Ok(vec![ix])
    }

    /// Seller repays price plus penalty to the buyer and recovers the receipt tokens
    pub fn buyback_yield_deal(
        &self,
        deal: &YieldDeal,
        treasury: Pubkey,
        penalty_bps: u16,
    ) -> SdkResult<Vec<Instruction>> {
        let buyer = deal.buyer.ok_or_else(|| {
            SdkError::InvalidInput(format!("deal {} has no buyer to buy back from", deal.deal_id))
        })?;
        let (protocol_config, _) = self.pda.protocol_config();
        let (vault, _) = self.pda.yield_vault(&deal.address);
        let payment = deal.payment_mint;
        let receipt = deal.yield_token_mint;

        let ix = self
            .instruction()
            .add_signer(deal.seller)
            .add_readonly(protocol_config)
            .add_writable(deal.address)
            .add_writable(vault)
            .add_readonly(receipt)
            .add_writable(associated_token_address(&deal.seller, &receipt))
            .add_readonly(payment)
            .add_writable(associated_token_address(&deal.seller, &payment))
            .add_readonly(buyer)
            .add_writable(associated_token_address(&buyer, &payment))
            .add_writable(associated_token_address(&treasury, &payment))
            .add_token_programs()
            .with_args(&BuybackYieldDealArgs { penalty_bps })?
            .build();

        Ok(vec![
            create_token_account_idempotent(&deal.seller, &buyer, &payment),
            create_token_account_idempotent(&deal.seller, &deal.seller, &receipt),
            ix,
        ])
    }
}
