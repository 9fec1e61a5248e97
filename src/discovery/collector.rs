use std::collections::HashSet;

use crate::types::{Address, SwapDescriptor};

/// Unique mint addresses referenced by `descriptors`, in first-seen order.
///
/// Each descriptor contributes mint A, mint B and the pool token mint, so the
/// result never holds more than three addresses per descriptor.
pub fn collect_mint_addresses(descriptors: &[SwapDescriptor]) -> Vec<Address> {
    let mut seen = HashSet::with_capacity(descriptors.len() * 3);
    let mut addresses = Vec::with_capacity(descriptors.len() * 3);

    for address in descriptors.iter().flat_map(|d| d.mint_addresses()) {
        if seen.insert(address) {
            addresses.push(address);
        }
    }

    addresses
}
