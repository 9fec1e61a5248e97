pub mod assembler;
pub mod balances;
pub mod collector;
pub mod pipeline;
pub mod resolver;

pub use assembler::{assemble_pool, IncompleteReason, PoolOutcome};
pub use balances::{resolve_balances, BalanceFailure, BalancePair};
pub use collector::collect_mint_addresses;
pub use pipeline::PoolDiscovery;
pub use resolver::{enrich_descriptors, resolve_mint_metadata, MintMap};
