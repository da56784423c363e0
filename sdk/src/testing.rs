//! Testing utilities for Yield Market integrations
//!
//! `MemoryTransport` stands in for an RPC node so clients can be exercised
//! without a validator. Fixture builders produce raw accounts that decode
//! into realistic deals.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use solana_sdk::{
    instruction::Instruction,
    signature::{Keypair, Signature},
};

use crate::accounts::{RawAccount, RawMeteoraLpDeal, RawProtocolConfig, RawYieldDeal, RecordKind};
use crate::core::{DealStatus, SdkResult, SourceProtocol, TransportFault};
use crate::prelude::*;
use crate::protocol::PdaBuilder;
use crate::transport::Transport;

/// Where a raw fault should be injected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultTarget {
    Fetch,
    FetchAll,
    Submit,
}

#[derive(Default)]
struct State {
    /// Insertion order is the order returned by `fetch_all_raw_records`
    accounts: Vec<(Pubkey, Vec<u8>)>,
    faults: HashMap<FaultTarget, TransportFault>,
    submitted: Vec<Vec<Instruction>>,
}

/// In-memory transport keyed by account address
#[derive(Default)]
pub struct MemoryTransport {
    state: Mutex<State>,
    /// Report missing accounts as a fault message instead of `Ok(None)`
    not_found_as_fault: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Behave like RPC clients that raise "account does not exist" errors
    pub fn with_not_found_faults() -> Self {
        Self {
            not_found_as_fault: true,
            ..Self::default()
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert or replace raw account bytes
    pub fn insert(&self, address: Pubkey, data: Vec<u8>) {
        let mut state = self.state();
        match state.accounts.iter_mut().find(|(key, _)| *key == address) {
            Some(entry) => entry.1 = data,
            None => state.accounts.push((address, data)),
        }
    }

    /// Encode and insert a raw account
    pub fn insert_account<T: RawAccount>(&self, address: Pubkey, account: &T) -> SdkResult<()> {
        self.insert(address, account.encode()?);
        Ok(())
    }

    pub fn remove(&self, address: &Pubkey) {
        self.state().accounts.retain(|(key, _)| key != address);
    }

    /// Fail every following call to `target` with `fault`
    pub fn fail(&self, target: FaultTarget, fault: TransportFault) {
        self.state().faults.insert(target, fault);
    }

    pub fn clear_faults(&self) {
        self.state().faults.clear();
    }

    /// Instruction batches passed to `submit`, oldest first
    pub fn submitted(&self) -> Vec<Vec<Instruction>> {
        self.state().submitted.clone()
    }

    fn injected(&self, target: FaultTarget) -> Result<(), TransportFault> {
        match self.state().faults.get(&target) {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn fetch_raw_record(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, TransportFault> {
        self.injected(FaultTarget::Fetch)?;
        let found = self
            .state()
            .accounts
            .iter()
            .find(|(key, _)| key == address)
            .map(|(_, data)| data.clone());

        match found {
            None if self.not_found_as_fault => Err(TransportFault::new(format!(
                "Account does not exist {}",
                address
            ))),
            other => Ok(other),
        }
    }

    async fn fetch_all_raw_records(
        &self,
        _program_id: &Pubkey,
        kind: RecordKind,
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, TransportFault> {
        self.injected(FaultTarget::FetchAll)?;
        let discriminator = kind.discriminator();
        Ok(self
            .state()
            .accounts
            .iter()
            .filter(|(_, data)| data.starts_with(&discriminator))
            .cloned()
            .collect())
    }

    async fn submit(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<Signature, TransportFault> {
        self.injected(FaultTarget::Submit)?;
        if signers.is_empty() {
            return Err(TransportFault::new("No fee payer among signers"));
        }

        let mut state = self.state();
        state.submitted.push(instructions.to_vec());
        let mut bytes = [0u8; 64];
        bytes[..8].copy_from_slice(&(state.submitted.len() as u64).to_le_bytes());
        Ok(Signature::from(bytes))
    }
}

/// Creation time used by the fixtures (2023-11-14T22:13:20Z)
pub const FIXTURE_CREATED_AT: i64 = 1_700_000_000;

/// Listed yield deal backed by a Jito receipt, 90 days
pub fn listed_yield_deal(deal_id: u64, seller: Pubkey) -> RawYieldDeal {
    RawYieldDeal {
        deal_id,
        seller,
        yield_token_mint: Pubkey::new_unique(),
        source_protocol: SourceProtocol::Jito.tag(),
        locked_token_amount: 1_000_000_000,
        locked_value: 1_000_000_000,
        expected_yield: 80_000_000,
        selling_price: 70_000_000,
        payment_mint: Pubkey::new_unique(),
        duration_days: 90,
        created_at: FIXTURE_CREATED_AT,
        status: DealStatus::Created.tag(),
        ..RawYieldDeal::default()
    }
}

/// Mark a raw yield deal as bought at `purchased_at`
pub fn purchased(mut deal: RawYieldDeal, buyer: Pubkey, purchased_at: i64) -> RawYieldDeal {
    deal.buyer = buyer;
    deal.status = DealStatus::Active.tag();
    deal.purchased_at = purchased_at;
    deal.ends_at = purchased_at + i64::from(deal.duration_days) * 86_400;
    deal
}

/// Listed LP deal over a fresh pool and position
pub fn listed_lp_deal(deal_id: u64, seller: Pubkey) -> RawMeteoraLpDeal {
    RawMeteoraLpDeal {
        deal_id,
        seller,
        pool: Pubkey::new_unique(),
        position: Pubkey::new_unique(),
        position_nft_mint: Pubkey::new_unique(),
        token_a_mint: Pubkey::new_unique(),
        token_b_mint: Pubkey::new_unique(),
        expected_fee_a: 40_000_000,
        expected_fee_b: 60_000_000,
        expected_total_value: 100_000_000,
        selling_price: 90_000_000,
        payment_mint: Pubkey::new_unique(),
        duration_days: 30,
        created_at: FIXTURE_CREATED_AT,
        status: DealStatus::Created.tag(),
        ..RawMeteoraLpDeal::default()
    }
}

/// Unpaused config with the full duration range and a 2.5% fee
pub fn protocol_config(authority: Pubkey, deal_counter: u64) -> RawProtocolConfig {
    RawProtocolConfig {
        authority,
        treasury: Pubkey::new_unique(),
        fee_bps: 250,
        min_duration_days: 30,
        max_duration_days: 365,
        min_penalty_bps: 100,
        max_penalty_bps: 2_000,
        is_paused: false,
        deal_counter,
        whitelist: Vec::new(),
        bump: 255,
    }
}

/// Store a yield deal at its derived address and return that address
pub fn seed_yield_deal(
    transport: &MemoryTransport,
    pda: &PdaBuilder,
    deal: &RawYieldDeal,
) -> SdkResult<Pubkey> {
    let (address, _) = pda.yield_deal(deal.deal_id);
    transport.insert_account(address, deal)?;
    Ok(address)
}

/// Store an LP deal at its derived address and return that address
pub fn seed_lp_deal(
    transport: &MemoryTransport,
    pda: &PdaBuilder,
    deal: &RawMeteoraLpDeal,
) -> SdkResult<Pubkey> {
    let (address, _) = pda.meteora_lp_deal(deal.deal_id);
    transport.insert_account(address, deal)?;
    Ok(address)
}

/// Store the protocol config at its derived address
pub fn seed_config(
    transport: &MemoryTransport,
    pda: &PdaBuilder,
    config: &RawProtocolConfig,
) -> SdkResult<Pubkey> {
    let (address, _) = pda.protocol_config();
    transport.insert_account(address, config)?;
    Ok(address)
}
