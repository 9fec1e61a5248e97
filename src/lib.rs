// Token Swap Pool Discovery Library
//
// Builds a de-duplicated, fully resolved view of the liquidity pools owned by
// a token-swap program:
// - Swap account parsing with sentinel-mint rejection
// - Batched mint metadata resolution
// - Concurrent per-pool token balance lookups
// - Memoized list of active pools with single-flight population

pub mod chain;
pub mod config;
pub mod dex;
pub mod discovery;
pub mod error;
pub mod types;
pub mod utils;

pub use chain::{PoolDataSource, RpcPoolDataSource};
pub use config::{Config, DiscoveryConfig};
pub use discovery::PoolDiscovery;
pub use error::{DecodeError, DiscoveryError, SourceError};
pub use types::{Address, MintMetadata, Pool, RawProgramAccount, SwapDescriptor, TokenAccountBalance};
