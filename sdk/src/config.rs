use solana_sdk::commitment_config::CommitmentLevel;
use solana_sdk::pubkey::Pubkey;
use std::{env, str::FromStr, time::Duration};

use crate::core::{program_id, SdkError, SdkResult, DEFAULT_DECIMALS, MAX_DECIMALS};

pub const ENV_RPC_URL: &str = "YIELD_MARKET_RPC_URL";
pub const ENV_PROGRAM_ID: &str = "YIELD_MARKET_PROGRAM_ID";
pub const ENV_COMMITMENT: &str = "YIELD_MARKET_COMMITMENT";
pub const ENV_TIMEOUT_SECS: &str = "YIELD_MARKET_TIMEOUT_SECS";

/// SDK configuration for connecting to the Yield Market program
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SdkConfig {
    /// RPC endpoint URL
    pub rpc_url: String,

    /// Yield Market program ID
    pub program_id: Pubkey,

    /// Commitment used for reads and preflight
    pub commitment: CommitmentLevel,

    /// Request timeout in seconds, enforced by the transport
    pub timeout_secs: u64,

    /// Decimal scale used when displaying payment amounts
    pub decimals: u32,
}

impl SdkConfig {
    fn with_url(rpc_url: &str) -> Self {
        Self {
            rpc_url: rpc_url.to_string(),
            program_id: program_id(),
            commitment: CommitmentLevel::Confirmed,
            timeout_secs: 30,
            decimals: DEFAULT_DECIMALS,
        }
    }

    pub fn localnet() -> Self {
        Self::with_url("http://localhost:8899")
    }

    pub fn devnet() -> Self {
        Self::with_url("https://api.devnet.solana.com")
    }

    pub fn mainnet() -> Self {
        Self::with_url("https://api.mainnet-beta.solana.com")
    }

    /// Devnet defaults overridden by `YIELD_MARKET_*` environment variables
    pub fn from_env() -> SdkResult<Self> {
        let mut config = Self::devnet();

        if let Ok(url) = env::var(ENV_RPC_URL) {
            config.rpc_url = url;
        }
        if let Ok(id) = env::var(ENV_PROGRAM_ID) {
            config.program_id = Pubkey::from_str(&id)
                .map_err(|e| SdkError::Config(format!("{}: {}", ENV_PROGRAM_ID, e)))?;
        }
        if let Ok(level) = env::var(ENV_COMMITMENT) {
            config.commitment = parse_commitment(&level)?;
        }
        if let Ok(secs) = env::var(ENV_TIMEOUT_SECS) {
            config.timeout_secs = secs
                .parse()
                .map_err(|e| SdkError::Config(format!("{}: {}", ENV_TIMEOUT_SECS, e)))?;
        }

        Ok(config)
    }

    pub fn with_rpc_url(mut self, url: String) -> Self {
        self.rpc_url = url;
        self
    }

    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_commitment(mut self, commitment: CommitmentLevel) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_decimals(mut self, decimals: u32) -> SdkResult<Self> {
        if decimals > MAX_DECIMALS {
            return Err(SdkError::Config(format!(
                "decimals must be at most {}, got {}",
                MAX_DECIMALS, decimals
            )));
        }
        self.decimals = decimals;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self::devnet()
    }
}

pub fn parse_commitment(level: &str) -> SdkResult<CommitmentLevel> {
    match level.trim().to_ascii_lowercase().as_str() {
        "processed" => Ok(CommitmentLevel::Processed),
        "confirmed" => Ok(CommitmentLevel::Confirmed),
        "finalized" => Ok(CommitmentLevel::Finalized),
        other => Err(SdkError::Config(format!("unknown commitment level {:?}", other))),
    }
}

/// Name used in JSON-RPC request options
pub fn commitment_name(level: CommitmentLevel) -> &'static str {
    match level {
        CommitmentLevel::Processed => "processed",
        CommitmentLevel::Confirmed => "confirmed",
        CommitmentLevel::Finalized => "finalized",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(SdkConfig::localnet().rpc_url, "http://localhost:8899");
        assert_eq!(SdkConfig::mainnet().program_id, program_id());
        assert_eq!(SdkConfig::default(), SdkConfig::devnet());
        assert_eq!(SdkConfig::devnet().timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_builders() {
        let id = Pubkey::new_unique();
        let config = SdkConfig::localnet()
            .with_program_id(id)
            .with_commitment(CommitmentLevel::Finalized)
            .with_timeout_secs(5)
            .with_decimals(9)
            .unwrap();
        assert_eq!(config.program_id, id);
        assert_eq!(commitment_name(config.commitment), "finalized");
        assert_eq!(config.decimals, 9);
        assert!(SdkConfig::localnet().with_decimals(39).is_err());
    }

    #[test]
    fn test_parse_commitment() {
        assert_eq!(parse_commitment(" Processed ").unwrap(), CommitmentLevel::Processed);
        assert!(matches!(parse_commitment("max"), Err(SdkError::Config(_))));
    }
}
