//! Composition of discovery, nonce resolution and hashing into one run

use std::collections::HashMap;

use alloy::primitives::{Address, Bytes, U256};
use tracing::{info, warn};

use crate::discovery::{NodeFailure, SafeGraphExplorer};
use crate::encoding::{digest_for_safe, BatchPayload};
use crate::error::Result;
use crate::nonce::NonceCoordinator;
use crate::reader::ChainReader;
use crate::report::{DiscoveryReport, RootOwner, SafeRecord};

/// Inputs for one discovery-and-hash run
#[derive(Debug, Clone)]
pub struct DiscoveryRequest {
    /// Root administrative contract (e.g. a ProxyAdmin) whose `owner()`
    /// seeds the walk
    pub root: Address,
    /// Chain id used in every domain separator
    pub chain_id: u64,
    /// Batch aggregator the Safe transaction delegatecalls into
    pub target: Address,
    /// Aggregated calldata of the batched call
    pub calldata: Bytes,
    /// Externally supplied nonce overrides, sparse
    pub nonce_overrides: HashMap<Address, U256>,
}

/// Runs discovery from `request.root` and produces one `SafeRecord` per
/// discovered Safe, in traversal order, plus the root-owner entry.
///
/// Branch failures (transport, decode, unreadable nonce) are collected per
/// node; records already computed for siblings and ancestors are kept.
/// Overrides that never matched a discovered address are reported, not
/// fatal.
pub async fn collect_safe_records<R: ChainReader>(
    reader: &R,
    request: DiscoveryRequest,
) -> Result<DiscoveryReport> {
    let discovery = SafeGraphExplorer::new(reader).explore(request.root).await?;

    let root_owner_is_safe = discovery.root_owner_is_safe();
    let mut failures = discovery.failures;
    let mut coordinator = NonceCoordinator::new(request.nonce_overrides);
    let payload = BatchPayload::new(request.target, request.calldata);

    // The root owner gets a resolved nonce but no digests of its own; its
    // signers approve through the nested Safes below it.
    let mut root_nonce = None;
    if root_owner_is_safe {
        match coordinator.resolve(reader, discovery.root_owner).await {
            Ok(nonce) => root_nonce = Some(nonce),
            Err(err) => failures.push(NodeFailure {
                address: discovery.root_owner,
                error: err.to_string(),
            }),
        }
    }

    let mut records = Vec::with_capacity(discovery.safes.len());
    for safe in &discovery.safes {
        let nonce = match coordinator.resolve(reader, safe.address).await {
            Ok(nonce) => nonce,
            Err(err) => {
                failures.push(NodeFailure {
                    address: safe.address,
                    error: err.to_string(),
                });
                continue;
            }
        };

        let digest = digest_for_safe(safe.address, request.chain_id, &payload, nonce);
        records.push(SafeRecord {
            address: safe.address,
            nonce,
            domain_hash: digest.domain_hash,
            message_hash: digest.message_hash,
        });
    }

    let unmatched_overrides = coordinator.unmatched_overrides();
    for addr in &unmatched_overrides {
        warn!(address = %addr, "nonce override supplied for an address that was never discovered");
    }

    info!(
        root_owner = %discovery.root_owner,
        safes = records.len(),
        failures = failures.len(),
        "discovery run complete"
    );

    Ok(DiscoveryReport {
        chain_id: request.chain_id,
        root_owner: RootOwner {
            address: discovery.root_owner,
            is_safe: root_owner_is_safe,
            nonce: root_nonce,
        },
        records,
        failures,
        unmatched_overrides,
    })
}
