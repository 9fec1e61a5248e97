use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Failures reported by a [`PoolDataSource`](crate::chain::PoolDataSource).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("account {0} not found")]
    NotFound(Pubkey),

    #[error("rpc request failed: {0}")]
    Rpc(String),

    #[error("request timed out")]
    Timeout,

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors surfaced to callers of a discovery pass.
///
/// Only infrastructure failures end up here. Per-pool data problems are
/// absorbed and show up as a shorter pool list instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("failed to fetch swap program accounts: {0}")]
    ProgramAccountsFailed(#[source] SourceError),

    #[error("batched mint metadata resolution failed: {0}")]
    MintResolutionFailed(#[source] SourceError),
}

/// Account payloads that could not be decoded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid data length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("account is not initialized")]
    Uninitialized,

    #[error("failed to unpack account: {0}")]
    Unpack(String),
}
