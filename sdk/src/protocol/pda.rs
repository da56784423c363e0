use crate::core::constants::*;
use crate::prelude::*;

/// Unified PDA builder for all program addresses.
///
/// Every method is a pure function of its seeds and the program id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PdaBuilder {
    pub program_id: Pubkey,
}

impl PdaBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    /// Derive an address from raw seeds
    pub fn derive(&self, seeds: &[&[u8]]) -> (Pubkey, u8) {
        Pubkey::find_program_address(seeds, &self.program_id)
    }

    pub fn protocol_config(&self) -> (Pubkey, u8) {
        self.derive(&[seeds::PROTOCOL_CONFIG])
    }

    pub fn yield_deal(&self, deal_id: u64) -> (Pubkey, u8) {
        self.derive(&[seeds::YIELD_DEAL, &deal_id.to_le_bytes()])
    }

    /// Token vault holding the receipt tokens locked by a yield deal
    pub fn yield_vault(&self, deal: &Pubkey) -> (Pubkey, u8) {
        self.derive(&[seeds::VAULT, deal.as_ref()])
    }

    pub fn meteora_lp_deal(&self, deal_id: u64) -> (Pubkey, u8) {
        self.derive(&[seeds::METEORA_LP_DEAL, &deal_id.to_le_bytes()])
    }

    /// Vault holding the position NFT locked by an LP deal
    pub fn meteora_nft_vault(&self, deal: &Pubkey) -> (Pubkey, u8) {
        self.derive(&[seeds::METEORA_NFT_VAULT, deal.as_ref()])
    }
}

impl Default for PdaBuilder {
    fn default() -> Self {
        Self::new(program_id())
    }
}

/// Convenience functions for one-off PDA derivations against the default program
pub fn find_protocol_config_address() -> (Pubkey, u8) {
    PdaBuilder::default().protocol_config()
}

pub fn find_yield_deal_address(deal_id: u64) -> (Pubkey, u8) {
    PdaBuilder::default().yield_deal(deal_id)
}

pub fn find_yield_vault_address(deal: &Pubkey) -> (Pubkey, u8) {
    PdaBuilder::default().yield_vault(deal)
}

pub fn find_meteora_lp_deal_address(deal_id: u64) -> (Pubkey, u8) {
    PdaBuilder::default().meteora_lp_deal(deal_id)
}

pub fn find_meteora_nft_vault_address(deal: &Pubkey) -> (Pubkey, u8) {
    PdaBuilder::default().meteora_nft_vault(deal)
}
