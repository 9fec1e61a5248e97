use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use swap_pool_discovery::{Config, Pool, PoolDiscovery, RpcPoolDataSource};

/// JSON line printed for each active pool
#[derive(Debug, Serialize)]
struct PoolSummary {
    address: String,
    mint_a: String,
    mint_b: String,
    pool_token_mint: String,
    token_a_amount: u64,
    token_b_amount: u64,
    token_a_ui_amount: f64,
    token_b_ui_amount: f64,
    trade_fee_rate: f64,
}

impl From<&Pool> for PoolSummary {
    fn from(pool: &Pool) -> Self {
        Self {
            address: pool.address.to_string(),
            mint_a: pool.token_a_info.address.to_string(),
            mint_b: pool.token_b_info.address.to_string(),
            pool_token_mint: pool.pool_token_mint.address.to_string(),
            token_a_amount: pool.token_a_balance.amount,
            token_b_amount: pool.token_b_balance.amount,
            token_a_ui_amount: pool.token_a_balance.ui_amount(),
            token_b_ui_amount: pool.token_b_balance.ui_amount(),
            trade_fee_rate: pool.swap_data.state.fees.trade_fee_rate(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create EnvFilter")?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer()
            .with_target(false)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
        )
        .init();

    info!("🚀 Starting pool discovery...");

    let config = Config::load().context("Failed to load configuration")?;

    let source = RpcPoolDataSource::from_url(
        &config.rpc.url,
        config.rpc.commitment()?,
        config.rpc.timeout(),
        config.retry.clone(),
    );
    info!("✅ RPC source ready: {}", config.rpc.url);

    let source = Arc::new(source.with_batch_size(config.rpc.mint_batch_size));
    let discovery = PoolDiscovery::new(source, config.discovery);
    debug!("Discovery config: {:?}", discovery.config());

    let pools = discovery
        .get_active_swap_pools()
        .await
        .context("Pool discovery failed")?;

    info!("✅ {} active pools", pools.len());

    for pool in pools.iter() {
        let summary = PoolSummary::from(pool);
        debug!(
            pool = %summary.address,
            mint_a = %summary.mint_a,
            mint_b = %summary.mint_b,
            token_a = summary.token_a_ui_amount,
            token_b = summary.token_b_ui_amount,
            fee = summary.trade_fee_rate,
            "Active pool"
        );
        println!("{}", serde_json::to_string(&summary)?);
    }

    Ok(())
}
