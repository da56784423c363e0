use crate::prelude::*;
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::core::{to_safe_integer, Amount, SdkError, SdkResult};

/// Trait for building instructions with consistent patterns
pub trait InstructionBuilder: AnchorSerialize {
    /// The 8-byte instruction discriminator (`sha256("global:<name>")[..8]`)
    const DISCRIMINATOR: [u8; 8];

    /// Build the instruction data (discriminator + serialized args)
    fn build_data(&self) -> SdkResult<Vec<u8>> {
        let mut data = Self::DISCRIMINATOR.to_vec();
        self.serialize(&mut data)
            .map_err(|e| SdkError::SerializationError(e.to_string()))?;
        Ok(data)
    }
}

/// Account list and data for one Yield Market instruction
pub struct YieldMarketInstructionBuilder {
    program_id: Pubkey,
    accounts: Vec<AccountMeta>,
    data: Vec<u8>,
}

impl YieldMarketInstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            accounts: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Add a writable signer account
    pub fn add_signer(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new(pubkey, true));
        self
    }

    /// Add a writable non-signer account
    pub fn add_writable(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new(pubkey, false));
        self
    }

    /// Add a readonly account
    pub fn add_readonly(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new_readonly(pubkey, false));
        self
    }

    /// SPL token, associated token and system programs, in that order
    pub fn add_token_programs(self) -> Self {
        self.add_readonly(spl_token::id())
            .add_readonly(spl_associated_token_account::id())
            .add_readonly(solana_sdk::system_program::id())
    }

    pub fn with_args<T: InstructionBuilder>(mut self, args: &T) -> SdkResult<Self> {
        self.data = args.build_data()?;
        Ok(self)
    }

    pub fn build(self) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: self.accounts,
            data: self.data,
        }
    }
}

/// Narrow an amount to the on-ledger `u64`
pub(crate) fn ledger_amount(amount: Amount, field: &str) -> SdkResult<u64> {
    to_safe_integer(amount).map_err(|_| {
        SdkError::PrecisionOverflow(format!("{} of {} does not fit in u64", field, amount))
    })
}

/// Macro for implementing InstructionBuilder for an args struct
#[macro_export]
macro_rules! impl_instruction {
    ($name:ident, $discriminator:expr) => {
        impl $crate::instructions::InstructionBuilder for $name {
            const DISCRIMINATOR: [u8; 8] = $discriminator;
        }
    };
}
