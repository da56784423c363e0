// Utility functions for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use yield_market_sdk::{format_decimal, Amount, SdkConfig, YieldMarketClient};

/// Resolved configuration and output mode shared by all commands
pub struct CliContext {
    pub config: SdkConfig,
    pub json: bool,
}

impl CliContext {
    /// Environment config with command-line overrides applied
    pub fn new(rpc_url: Option<&str>, program_id: Option<&str>, json: bool) -> Result<Self> {
        let mut config = SdkConfig::from_env().context("Invalid YIELD_MARKET_* environment")?;
        if let Some(url) = rpc_url {
            config = config.with_rpc_url(url.to_string());
        }
        if let Some(id) = program_id {
            config = config.with_program_id(parse_pubkey(id)?);
        }
        Ok(Self { config, json })
    }

    pub fn client(&self) -> YieldMarketClient {
        YieldMarketClient::new(&self.config)
    }

    /// Payment amount at the configured scale
    pub fn amount(&self, amount: Amount) -> String {
        format_decimal(amount, self.config.decimals)
    }
}

/// Parse a pubkey from string
pub fn parse_pubkey(s: &str) -> Result<Pubkey> {
    Pubkey::from_str(s).with_context(|| format!("Invalid public key: {}", s))
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print success message with checkmark
pub fn success(msg: &str) {
    println!("[OK] {}", msg);
}

/// Print info message
pub fn info(msg: &str) {
    println!("[INFO] {}", msg);
}

/// Print warning message
pub fn warn(msg: &str) {
    eprintln!("[WARN] {}", msg);
}

/// Print a labelled field
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<22} {}", format!("{}:", label), value);
}
