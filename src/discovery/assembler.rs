use std::fmt;

use crate::discovery::balances::{BalanceFailure, BalancePair};
use crate::error::SourceError;
use crate::types::{Address, EnrichedSwapRecord, MintRole, Pool};

/// Why a descriptor did not produce a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncompleteReason {
    MissingMint { role: MintRole, address: Address },
    BalanceUnavailable { account: Address, error: SourceError },
}

impl fmt::Display for IncompleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncompleteReason::MissingMint { role, address } => {
                write!(f, "no metadata for {} {}", role, address)
            }
            IncompleteReason::BalanceUnavailable { account, error } => {
                write!(f, "balance of {} unavailable: {}", account, error)
            }
        }
    }
}

/// Result of assembling a single descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolOutcome {
    Complete(Pool),
    Incomplete {
        address: Address,
        reason: IncompleteReason,
    },
}

impl PoolOutcome {
    pub fn into_pool(self) -> Option<Pool> {
        match self {
            PoolOutcome::Complete(pool) => Some(pool),
            PoolOutcome::Incomplete { .. } => None,
        }
    }
}

/// Join a record with its balances. Produces a pool only when all three
/// mints and both balances are present.
pub fn assemble_pool(record: EnrichedSwapRecord, balances: Result<BalancePair, BalanceFailure>) -> PoolOutcome {
    let address = record.descriptor.address;

    let (token_a_info, token_b_info, pool_token_mint) = match record.resolved_mints() {
        Ok(mints) => mints,
        Err((role, mint)) => {
            return PoolOutcome::Incomplete {
                address,
                reason: IncompleteReason::MissingMint {
                    role,
                    address: mint,
                },
            };
        }
    };

    let balances = match balances {
        Ok(pair) => pair,
        Err(BalanceFailure { account, error }) => {
            return PoolOutcome::Incomplete {
                address,
                reason: IncompleteReason::BalanceUnavailable { account, error },
            };
        }
    };

    PoolOutcome::Complete(Pool {
        address,
        token_a_info,
        token_b_info,
        pool_token_mint,
        swap_data: record.descriptor,
        token_a_balance: balances.token_a,
        token_b_balance: balances.token_b,
    })
}
