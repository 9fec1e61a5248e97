// Pool discovery pipeline
//
// fetch program accounts -> parse -> collect mints -> one batched mint lookup
// -> per-pool balance fan-out -> assemble -> (active filter + memoize)

use futures::stream::{self, StreamExt};
use moka::future::Cache;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};

use crate::chain::PoolDataSource;
use crate::config::DiscoveryConfig;
use crate::dex::token_swap::{parse_swap_accounts, SwapAccountDecoder, TokenSwapDecoder};
use crate::discovery::assembler::{assemble_pool, PoolOutcome};
use crate::discovery::balances::resolve_balances;
use crate::discovery::collector::collect_mint_addresses;
use crate::discovery::resolver::{enrich_descriptors, resolve_mint_metadata};
use crate::error::DiscoveryError;
use crate::types::Pool;

/// Discovers swap pools and memoizes the active ones for the process lifetime.
pub struct PoolDiscovery<S: PoolDataSource + ?Sized> {
    source: Arc<S>,
    decoder: Box<dyn SwapAccountDecoder>,
    config: DiscoveryConfig,
    // Single slot; `try_get_with` makes concurrent cold callers share one pass.
    active_pools: Cache<(), Arc<Vec<Pool>>>,
}

impl<S: PoolDataSource + ?Sized> PoolDiscovery<S> {
    pub fn new(source: Arc<S>, config: DiscoveryConfig) -> Self {
        Self::with_decoder(source, config, Box::new(TokenSwapDecoder))
    }

    pub fn with_decoder(source: Arc<S>, config: DiscoveryConfig, decoder: Box<dyn SwapAccountDecoder>) -> Self {
        info!(
            "PoolDiscovery initialized - program: {}, balance concurrency: {}, balance timeout: {:?}",
            config.swap_program_id, config.balance_concurrency, config.balance_timeout
        );

        Self {
            source,
            decoder,
            config,
            active_pools: Cache::builder().max_capacity(1).build(),
        }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Run a full discovery pass.
    ///
    /// Returns every pool that could be completely assembled, in program
    /// account order. Zero-balance pools are included. Fails only when the
    /// program accounts or the batched mint metadata cannot be fetched.
    pub async fn discover_pools(&self) -> Result<Vec<Pool>, DiscoveryError> {
        let program_id = self.config.swap_program_id;

        async move {
            let accounts = self
                .source
                .fetch_program_accounts(&program_id)
                .await
                .map_err(|e| {
                    error!("Failed to fetch program accounts: {}", e);
                    DiscoveryError::ProgramAccountsFailed(e)
                })?;
            let fetched = accounts.len();

            let descriptors = parse_swap_accounts(accounts, self.decoder.as_ref());
            let mint_addresses = collect_mint_addresses(&descriptors);
            debug!(
                "{} descriptors reference {} unique mints",
                descriptors.len(),
                mint_addresses.len()
            );

            let mints = resolve_mint_metadata(self.source.as_ref(), &mint_addresses).await?;
            let records = enrich_descriptors(descriptors, &mints);
            let candidates = records.len();

            let request_timeout = self.config.balance_timeout;
            let outcomes: Vec<PoolOutcome> = stream::iter(records)
                .map(|record| async move {
                    let balances =
                        resolve_balances(self.source.as_ref(), &record.descriptor, request_timeout).await;
                    assemble_pool(record, balances)
                })
                .buffered(self.config.balance_concurrency.max(1))
                .collect()
                .await;

            let pools: Vec<Pool> = outcomes
                .into_iter()
                .filter_map(|outcome| {
                    if let PoolOutcome::Incomplete { address, reason } = &outcome {
                        debug!("Dropping pool {}: {}", address, reason);
                    }
                    outcome.into_pool()
                })
                .collect();

            info!(
                "Discovered {} pools ({} accounts, {} valid descriptors, {} incomplete)",
                pools.len(),
                fetched,
                candidates,
                candidates - pools.len()
            );

            Ok::<_, DiscoveryError>(pools)
        }
        .instrument(info_span!("discover_pools", program = %program_id))
        .await
    }

    /// Pools with liquidity on both sides, memoized after the first success.
    ///
    /// Concurrent callers on a cold cache wait for a single discovery pass.
    /// Failures are returned to every waiter and are not cached.
    pub async fn get_active_swap_pools(&self) -> Result<Arc<Vec<Pool>>, DiscoveryError> {
        self.active_pools
            .try_get_with((), async {
                let pools = self.discover_pools().await?;
                let total = pools.len();
                let active: Vec<Pool> = pools.into_iter().filter(|pool| pool.is_active()).collect();
                info!("Caching {} active pools ({} inactive filtered)", active.len(), total - active.len());
                Ok::<_, DiscoveryError>(Arc::new(active))
            })
            .await
            .map_err(|e| (*e).clone())
    }

    /// The memoized active pool list, without any I/O.
    pub async fn cached_pools(&self) -> Option<Arc<Vec<Pool>>> {
        self.active_pools.get(&()).await
    }

    /// Drop the memoized list so the next call runs a fresh pass.
    pub async fn invalidate(&self) {
        self.active_pools.invalidate(&()).await;
        debug!("Active pool cache invalidated");
    }
}
