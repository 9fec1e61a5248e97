use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

use crate::chain::PoolDataSource;
use crate::error::DiscoveryError;
use crate::types::{Address, EnrichedSwapRecord, MintMetadata, MintTriplet, SwapDescriptor};

pub type MintMap = HashMap<Address, Arc<MintMetadata>>;

/// Resolve all `addresses` with one batched call to the source.
///
/// A failing batch aborts the pass. Addresses the source cannot resolve are
/// simply missing from the returned map.
pub async fn resolve_mint_metadata<S>(source: &S, addresses: &[Address]) -> Result<MintMap, DiscoveryError>
where
    S: PoolDataSource + ?Sized,
{
    if addresses.is_empty() {
        return Ok(MintMap::new());
    }

    let resolved = source
        .fetch_multiple_accounts(addresses)
        .await
        .map_err(|e| {
            error!("Mint metadata batch of {} addresses failed: {}", addresses.len(), e);
            DiscoveryError::MintResolutionFailed(e)
        })?;

    debug!("Resolved {}/{} mint addresses", resolved.len(), addresses.len());

    Ok(resolved
        .into_iter()
        .map(|(address, metadata)| (address, Arc::new(metadata)))
        .collect())
}

/// Pair each descriptor with the metadata available for its three mints.
pub fn enrich_descriptors(descriptors: Vec<SwapDescriptor>, mints: &MintMap) -> Vec<EnrichedSwapRecord> {
    descriptors
        .into_iter()
        .map(|descriptor| {
            let triplet = MintTriplet {
                mint_a: mints.get(&descriptor.mint_a()).cloned(),
                mint_b: mints.get(&descriptor.mint_b()).cloned(),
                token_pool: mints.get(&descriptor.token_pool()).cloned(),
            };
            let record = EnrichedSwapRecord {
                descriptor,
                mints: triplet,
            };
            if let Some((role, mint)) = record.missing_mint() {
                debug!("Pool {} has no metadata for {} {}", record.descriptor.address, role, mint);
            }
            record
        })
        .collect()
}
