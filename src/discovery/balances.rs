use std::time::Duration;
use tokio::time::timeout;

use crate::chain::PoolDataSource;
use crate::error::SourceError;
use crate::types::{Address, SwapDescriptor, TokenAccountBalance};

/// Balances of a pool's two token accounts, in A/B order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancePair {
    pub token_a: TokenAccountBalance,
    pub token_b: TokenAccountBalance,
}

/// A balance lookup that failed, and for which account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceFailure {
    pub account: Address,
    pub error: SourceError,
}

/// Fetch both token-account balances of `descriptor` concurrently.
///
/// Each request is bounded by `request_timeout`. Any failure makes the pair
/// unavailable; it never affects other descriptors.
pub async fn resolve_balances<S>(
    source: &S,
    descriptor: &SwapDescriptor,
    request_timeout: Duration,
) -> Result<BalancePair, BalanceFailure>
where
    S: PoolDataSource + ?Sized,
{
    let account_a = descriptor.token_account_a();
    let account_b = descriptor.token_account_b();

    let (token_a, token_b) = tokio::join!(
        fetch_balance(source, account_a, request_timeout),
        fetch_balance(source, account_b, request_timeout),
    );

    Ok(BalancePair {
        token_a: token_a?,
        token_b: token_b?,
    })
}

async fn fetch_balance<S>(
    source: &S,
    account: Address,
    request_timeout: Duration,
) -> Result<TokenAccountBalance, BalanceFailure>
where
    S: PoolDataSource + ?Sized,
{
    match timeout(request_timeout, source.fetch_token_account_balance(&account)).await {
        Ok(Ok(balance)) => Ok(balance),
        Ok(Err(error)) => Err(BalanceFailure { account, error }),
        Err(_) => Err(BalanceFailure {
            account,
            error: SourceError::Timeout,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockPoolDataSource;
    use crate::types::{SwapCurve, SwapFees, SwapState};
    use solana_sdk::pubkey::Pubkey;

    fn descriptor(token_account_a: Pubkey, token_account_b: Pubkey) -> SwapDescriptor {
        SwapDescriptor {
            address: Pubkey::new_unique(),
            state: SwapState {
                version: 1,
                is_initialized: true,
                bump_seed: 255,
                token_program_id: spl_token::id(),
                token_account_a,
                token_account_b,
                token_pool: Pubkey::new_unique(),
                mint_a: Pubkey::new_unique(),
                mint_b: Pubkey::new_unique(),
                fee_account: Pubkey::new_unique(),
                fees: SwapFees::default(),
                curve: SwapCurve::default(),
            },
        }
    }

    #[tokio::test]
    async fn test_balances_are_correlated_to_sides() {
        let vault_a = Pubkey::new_unique();
        let vault_b = Pubkey::new_unique();

        let mut source = MockPoolDataSource::new();
        source
            .expect_fetch_token_account_balance()
            .times(2)
            .returning(move |account: &Pubkey| {
                let amount = if *account == vault_a { 100 } else { 200 };
                Ok(TokenAccountBalance { amount, decimals: 6 })
            });

        let pair = resolve_balances(&source, &descriptor(vault_a, vault_b), Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(pair.token_a.amount, 100);
        assert_eq!(pair.token_b.amount, 200);
    }

    #[tokio::test]
    async fn test_missing_account_fails_pair() {
        let vault_a = Pubkey::new_unique();
        let vault_b = Pubkey::new_unique();

        let mut source = MockPoolDataSource::new();
        source
            .expect_fetch_token_account_balance()
            .returning(move |account: &Pubkey| {
                if *account == vault_b {
                    Err(SourceError::NotFound(vault_b))
                } else {
                    Ok(TokenAccountBalance { amount: 5, decimals: 0 })
                }
            });

        let failure = resolve_balances(&source, &descriptor(vault_a, vault_b), Duration::from_secs(1))
            .await
            .unwrap_err();

        assert_eq!(
            failure,
            BalanceFailure {
                account: vault_b,
                error: SourceError::NotFound(vault_b),
            }
        );
    }
}
