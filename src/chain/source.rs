// Ledger data source used by the discovery pipeline
//
// `PoolDataSource` is the seam between discovery and the node. The production
// implementation talks to a Solana RPC endpoint; tests plug in fakes.

use async_trait::async_trait;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{account::Account, commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::dex::mint::decode_mint;
use crate::error::SourceError;
use crate::types::{Address, MintMetadata, RawProgramAccount, TokenAccountBalance};
use crate::utils::RetryPolicy;

// Solana RPC getMultipleAccounts limit
pub const MAX_BATCH_SIZE: usize = 100;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoolDataSource: Send + Sync {
    /// All accounts owned by `program_id`.
    async fn fetch_program_accounts(
        &self,
        program_id: &Pubkey,
    ) -> Result<Vec<RawProgramAccount>, SourceError>;

    /// Mint metadata for `addresses`. Addresses without a decodable mint
    /// account are left out of the map.
    async fn fetch_multiple_accounts(
        &self,
        addresses: &[Address],
    ) -> Result<HashMap<Address, MintMetadata>, SourceError>;

    /// Balance of a single token account. Fails with `NotFound` when the
    /// account does not exist.
    async fn fetch_token_account_balance(
        &self,
        address: &Address,
    ) -> Result<TokenAccountBalance, SourceError>;
}

/// [`PoolDataSource`] backed by a Solana RPC node.
pub struct RpcPoolDataSource {
    rpc_client: Arc<RpcClient>,
    retry_policy: RetryPolicy,
    batch_size: usize,
}

impl RpcPoolDataSource {
    pub fn new(rpc_client: Arc<RpcClient>, retry_policy: RetryPolicy, batch_size: usize) -> Self {
        let batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        info!(
            "RpcPoolDataSource initialized - endpoint: {}, batch size: {}, max retries: {}",
            rpc_client.url(),
            batch_size,
            retry_policy.max_retries
        );

        Self {
            rpc_client,
            retry_policy,
            batch_size,
        }
    }

    pub fn from_url(url: &str, commitment: CommitmentConfig, timeout: Duration, retry_policy: RetryPolicy) -> Self {
        let rpc_client = Arc::new(RpcClient::new_with_timeout_and_commitment(
            url.to_string(),
            timeout,
            commitment,
        ));
        Self::new(rpc_client, retry_policy, MAX_BATCH_SIZE)
    }

    /// Chunk size for mint lookups, capped at the node's limit.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    fn mint_batches<'a>(&self, addresses: &'a [Address]) -> std::slice::Chunks<'a, Address> {
        addresses.chunks(self.batch_size)
    }
}

#[async_trait]
impl PoolDataSource for RpcPoolDataSource {
    async fn fetch_program_accounts(
        &self,
        program_id: &Pubkey,
    ) -> Result<Vec<RawProgramAccount>, SourceError> {
        let accounts = self
            .retry_policy
            .retry_async(|| async {
                self.rpc_client
                    .get_program_accounts(program_id)
                    .await
                    .map_err(map_client_error)
            })
            .await?;

        debug!("Fetched {} accounts owned by {}", accounts.len(), program_id);

        Ok(accounts
            .into_iter()
            .map(|(address, account)| RawProgramAccount {
                address,
                data: (!account.data.is_empty()).then_some(account.data),
            })
            .collect())
    }

    async fn fetch_multiple_accounts(
        &self,
        addresses: &[Address],
    ) -> Result<HashMap<Address, MintMetadata>, SourceError> {
        let mut mints = HashMap::with_capacity(addresses.len());

        for chunk in self.mint_batches(addresses) {
            let accounts = self
                .retry_policy
                .retry_async(|| async {
                    self.rpc_client
                        .get_multiple_accounts(chunk)
                        .await
                        .map_err(map_client_error)
                })
                .await?;

            decode_mint_batch(chunk, accounts, &mut mints)?;
        }

        debug!("Resolved {} of {} mint accounts", mints.len(), addresses.len());
        Ok(mints)
    }

    async fn fetch_token_account_balance(
        &self,
        address: &Address,
    ) -> Result<TokenAccountBalance, SourceError> {
        let ui_amount = self
            .retry_policy
            .retry_async(|| async {
                self.rpc_client
                    .get_token_account_balance(address)
                    .await
                    .map_err(|e| {
                        let error = map_client_error(e);
                        if is_missing_account(&error) {
                            SourceError::NotFound(*address)
                        } else {
                            error
                        }
                    })
            })
            .await?;

        parse_token_amount(address, &ui_amount.amount, ui_amount.decimals)
    }
}

/// Decode one `getMultipleAccounts` response into `mints`.
///
/// Missing accounts and accounts that are not mints are skipped. A response
/// whose length differs from the request is rejected.
fn decode_mint_batch(
    chunk: &[Address],
    accounts: Vec<Option<Account>>,
    mints: &mut HashMap<Address, MintMetadata>,
) -> Result<(), SourceError> {
    if accounts.len() != chunk.len() {
        return Err(SourceError::InvalidResponse(format!(
            "requested {} accounts, received {}",
            chunk.len(),
            accounts.len()
        )));
    }

    for (address, account) in chunk.iter().zip(accounts) {
        let Some(account) = account else {
            debug!("Mint account {} not found", address);
            continue;
        };
        match decode_mint(address, &account.data) {
            Ok(metadata) => {
                mints.insert(*address, metadata);
            }
            Err(e) => {
                warn!("Failed to decode mint {}: {}", address, e);
            }
        }
    }

    Ok(())
}

// Token amounts arrive as decimal strings
fn parse_token_amount(address: &Address, amount: &str, decimals: u8) -> Result<TokenAccountBalance, SourceError> {
    let amount = amount.parse::<u64>().map_err(|e| {
        SourceError::InvalidResponse(format!("balance amount '{}' for {}: {}", amount, address, e))
    })?;

    Ok(TokenAccountBalance { amount, decimals })
}

fn map_client_error(error: ClientError) -> SourceError {
    let message = error.to_string();
    if message.to_lowercase().contains("timed out") {
        SourceError::Timeout
    } else {
        SourceError::Rpc(message)
    }
}

fn is_missing_account(error: &SourceError) -> bool {
    matches!(error, SourceError::Rpc(message) if message.contains("could not find account"))
}
