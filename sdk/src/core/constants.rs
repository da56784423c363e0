use crate::prelude::*;

/// Program ID for the Yield Market program
pub const PROGRAM_ID: Pubkey = solana_program::pubkey!("5WMq1Q9cHWLzPxt1FiR3V15ZN1wkqXrr7MvXBKzTAoBE");

/// Get the program ID as a Pubkey
pub fn program_id() -> Pubkey {
    PROGRAM_ID
}

/// Seeds for program-derived addresses
pub mod seeds {
    pub const PROTOCOL_CONFIG: &[u8] = b"protocol_config";
    pub const YIELD_DEAL: &[u8] = b"yield_deal";
    pub const VAULT: &[u8] = b"vault";
    pub const METEORA_LP_DEAL: &[u8] = b"meteora_lp_deal";
    pub const METEORA_NFT_VAULT: &[u8] = b"meteora_nft_vault";
}

/// Account discriminators (`sha256("account:<Name>")[..8]`)
pub mod discriminators {
    pub const PROTOCOL_CONFIG: [u8; 8] = [207, 91, 250, 28, 152, 179, 215, 209];
    pub const YIELD_DEAL: [u8; 8] = [216, 238, 159, 168, 226, 65, 200, 38];
    pub const METEORA_LP_DEAL: [u8; 8] = [88, 16, 225, 179, 189, 254, 44, 170];
}

/// Deal durations accepted by the program, in days
pub const ALLOWED_DURATION_DAYS: [u16; 5] = [30, 60, 90, 180, 365];

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Basis point denominator
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Default decimal scale for payment amounts (USDC-style stablecoins)
pub const DEFAULT_DECIMALS: u32 = 6;

/// Largest display scale a config may carry (10^38 is the largest power of ten in u128)
pub const MAX_DECIMALS: u32 = 38;

/// First custom error code emitted by the program
pub const PROGRAM_ERROR_OFFSET: u32 = 6000;
