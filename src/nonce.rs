//! Per-Safe nonce resolution against the v1.3.0+ storage layout
//!
//! A nonce fixed at generation time must stay valid until every signer has
//! signed, so each Safe gets exactly one authoritative nonce per run: an
//! externally supplied override when present, the slot-5 storage value
//! otherwise. The resolved value is memoized so hash computation and any
//! later emitted record always agree.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::reader::ChainReader;

/// Safe v1.3.0+ storage slot holding the owner count
pub const OWNER_COUNT_SLOT: U256 = U256::from_limbs([3, 0, 0, 0]);

/// Safe v1.3.0+ storage slot holding the signature threshold
pub const THRESHOLD_SLOT: U256 = U256::from_limbs([4, 0, 0, 0]);

/// Safe v1.3.0+ storage slot holding the transaction nonce
pub const NONCE_SLOT: U256 = U256::from_limbs([5, 0, 0, 0]);

/// Nonce, threshold and owner count read straight from Safe storage
#[derive(Debug, Clone, Copy)]
pub struct SafeState {
    /// Current transaction nonce (slot 5)
    pub nonce: U256,
    /// Signature threshold (slot 4)
    pub threshold: U256,
    /// Number of owners (slot 3)
    pub owner_count: U256,
}

/// Reads nonce, threshold and owner count for a Safe
pub async fn read_safe_state<R: ChainReader>(reader: &R, safe: Address) -> Result<SafeState> {
    let nonce = reader.storage_at(safe, NONCE_SLOT).await?;
    let threshold = reader.storage_at(safe, THRESHOLD_SLOT).await?;
    let owner_count = reader.storage_at(safe, OWNER_COUNT_SLOT).await?;
    Ok(SafeState {
        nonce,
        threshold,
        owner_count,
    })
}

/// Resolves one authoritative nonce per Safe for a discovery run.
pub struct NonceCoordinator {
    overrides: HashMap<Address, U256>,
    resolved: HashMap<Address, U256>,
}

impl NonceCoordinator {
    /// Creates a coordinator with the given sparse override map
    pub fn new(overrides: HashMap<Address, U256>) -> Self {
        Self {
            overrides,
            resolved: HashMap::new(),
        }
    }

    /// Resolves the nonce for `safe`: override first, chain read otherwise.
    ///
    /// A chain-read failure with no override is an error for that Safe;
    /// the nonce is never silently defaulted to zero. Once resolved, the
    /// same value is returned for the rest of the run.
    pub async fn resolve<R: ChainReader>(&mut self, reader: &R, safe: Address) -> Result<U256> {
        if let Some(nonce) = self.resolved.get(&safe) {
            return Ok(*nonce);
        }

        let nonce = match self.overrides.get(&safe) {
            Some(nonce) => {
                debug!(%safe, %nonce, "using nonce override");
                *nonce
            }
            None => reader
                .storage_at(safe, NONCE_SLOT)
                .await
                .map_err(|err| Error::NonceUnavailable {
                    safe,
                    reason: err.to_string(),
                })?,
        };

        self.resolved.insert(safe, nonce);
        Ok(nonce)
    }

    /// Overrides supplied for addresses that were never resolved during the
    /// run. Surfaced as a warning by the caller, never a failure.
    pub fn unmatched_overrides(&self) -> Vec<Address> {
        let mut unused: Vec<Address> = self
            .overrides
            .keys()
            .filter(|addr| !self.resolved.contains_key(*addr))
            .copied()
            .collect();
        unused.sort();
        unused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Bytes;
    use std::sync::Mutex;

    /// Reader that serves a fixed nonce and counts storage reads
    struct FixedNonceReader {
        nonce: U256,
        reads: Mutex<usize>,
    }

    impl ChainReader for FixedNonceReader {
        async fn call(&self, to: Address, _data: Bytes) -> Result<Bytes> {
            Err(Error::Revert(to))
        }

        async fn storage_at(&self, _address: Address, slot: U256) -> Result<U256> {
            assert_eq!(slot, NONCE_SLOT);
            *self.reads.lock().unwrap() += 1;
            Ok(self.nonce)
        }
    }

    #[tokio::test]
    async fn test_override_takes_precedence() {
        let safe = Address::with_last_byte(1);
        let reader = FixedNonceReader {
            nonce: U256::from(7),
            reads: Mutex::new(0),
        };

        let mut coordinator =
            NonceCoordinator::new(HashMap::from([(safe, U256::from(42))]));
        let nonce = coordinator.resolve(&reader, safe).await.unwrap();

        assert_eq!(nonce, U256::from(42));
        assert_eq!(*reader.reads.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_resolved_nonce_is_memoized() {
        let safe = Address::with_last_byte(1);
        let reader = FixedNonceReader {
            nonce: U256::from(7),
            reads: Mutex::new(0),
        };

        let mut coordinator = NonceCoordinator::new(HashMap::new());
        let first = coordinator.resolve(&reader, safe).await.unwrap();
        let second = coordinator.resolve(&reader, safe).await.unwrap();

        assert_eq!(first, U256::from(7));
        assert_eq!(first, second);
        assert_eq!(*reader.reads.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unmatched_overrides() {
        let resolved = Address::with_last_byte(1);
        let unused = Address::with_last_byte(9);
        let reader = FixedNonceReader {
            nonce: U256::ZERO,
            reads: Mutex::new(0),
        };

        let mut coordinator = NonceCoordinator::new(HashMap::from([
            (resolved, U256::from(1)),
            (unused, U256::from(2)),
        ]));
        coordinator.resolve(&reader, resolved).await.unwrap();

        assert_eq!(coordinator.unmatched_overrides(), vec![unused]);
    }
}
