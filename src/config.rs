use anyhow::{Context, Result};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::str::FromStr;
use std::time::Duration;

use crate::utils::RetryPolicy;

/// SPL Token Swap program
pub const SPL_TOKEN_SWAP_PROGRAM_ID: &str = "SwapsVeCiPHMUAtzQWZw7RjsKjgCjhwU55QGu4U1Szw";
pub const SPL_TOKEN_SWAP_PROGRAM: Pubkey = solana_sdk::pubkey!("SwapsVeCiPHMUAtzQWZw7RjsKjgCjhwU55QGu4U1Szw");

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc: RpcConfig,
    pub discovery: DiscoveryConfig,
    pub retry: RetryPolicy,
}

/// RPC endpoint configuration
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub url: String,
    pub commitment_level: String,
    pub timeout_seconds: u64,
    pub mint_batch_size: usize,
}

impl RpcConfig {
    pub fn commitment(&self) -> Result<CommitmentConfig> {
        CommitmentConfig::from_str(&self.commitment_level)
            .map_err(|e| anyhow::anyhow!("Invalid COMMITMENT_LEVEL '{}': {:?}", self.commitment_level, e))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Discovery pass settings
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub swap_program_id: Pubkey,
    /// Descriptors with balance lookups in flight at once
    pub balance_concurrency: usize,
    pub balance_timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            swap_program_id: SPL_TOKEN_SWAP_PROGRAM,
            balance_concurrency: 16,
            balance_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file
        dotenvy::dotenv().ok();

        let rpc = RpcConfig {
            url: std::env::var("RPC_URL").context("RPC_URL not set")?,
            commitment_level: get_env_or_default("COMMITMENT_LEVEL", "confirmed"),
            timeout_seconds: get_u64_env("RPC_TIMEOUT_SECONDS", 30)?,
            mint_batch_size: get_u64_env("MINT_BATCH_SIZE", 100)? as usize,
        };

        let discovery = DiscoveryConfig {
            swap_program_id: parse_pubkey_or_default("SWAP_PROGRAM_ID", SPL_TOKEN_SWAP_PROGRAM_ID)?,
            balance_concurrency: get_u64_env("BALANCE_CONCURRENCY", 16)? as usize,
            balance_timeout: Duration::from_millis(get_u64_env("BALANCE_TIMEOUT_MS", 10_000)?),
        };

        let retry = RetryPolicy {
            max_retries: get_u32_env("MAX_RETRIES", 3)?,
            initial_interval: Duration::from_millis(get_u64_env("RETRY_INITIAL_MS", 100)?),
            max_interval: Duration::from_millis(get_u64_env("RETRY_MAX_MS", 2_000)?),
            ..Default::default()
        };

        Ok(Config {
            rpc,
            discovery,
            retry,
        })
    }
}

// ============================================================================
// Helper Functions for Environment Variable Parsing
// ============================================================================

/// Get environment variable or return default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get u32 environment variable with default
fn get_u32_env(key: &str, default: u32) -> Result<u32> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .context(format!("Failed to parse {} as u32", key))
}

/// Get u64 environment variable with default
fn get_u64_env(key: &str, default: u64) -> Result<u64> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .context(format!("Failed to parse {} as u64", key))
}

/// Parse pubkey from environment variable, falling back to `default`
fn parse_pubkey_or_default(env_var: &str, default: &str) -> Result<Pubkey> {
    let pubkey_str = get_env_or_default(env_var, default);
    Pubkey::from_str(&pubkey_str).context(format!("Failed to parse {} as Pubkey", env_var))
}
