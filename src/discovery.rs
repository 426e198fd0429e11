//! Ownership-graph walk from a root administrative contract
//!
//! Starting from a root contract (typically a ProxyAdmin), the explorer
//! resolves the root's `owner()` and then walks the ownership graph through
//! `getOwners()` calls, collecting every nested Safe reachable through
//! Safe-only owner sets. The walk uses an explicit stack rather than
//! recursion so traversal order stays testable and call-stack depth stays
//! bounded on large graphs.

use std::collections::{HashMap, HashSet};

use alloy::primitives::{Address, Bytes};
use serde::Serialize;
use tracing::debug;

use crate::abi::{self, GET_OWNERS_SELECTOR, OWNER_SELECTOR};
use crate::error::Result;
use crate::reader::ChainReader;

/// Classification of one ownership-graph node, determined lazily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Responds to `getOwners()`; the owner list is kept in on-chain order.
    Safe(Vec<Address>),
    /// `getOwners()` reverted on this address (EOA or non-Safe contract).
    NotSafe,
}

/// One discovered Safe, in traversal order.
#[derive(Debug, Clone)]
pub struct DiscoveredSafe {
    /// Safe address
    pub address: Address,
    /// Direct owners in on-chain order
    pub owners: Vec<Address>,
}

/// A failure that ended one branch of the walk without aborting the run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFailure {
    /// The address being processed when the failure occurred
    pub address: Address,
    /// Human-readable error description
    pub error: String,
}

/// Result of one discovery run.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// The root contract's `owner()`. May or may not itself be a Safe.
    pub root_owner: Address,
    /// The root owner's direct owner list, when it classified as a Safe.
    pub root_owner_owners: Option<Vec<Address>>,
    /// Nested Safes in traversal order. The root owner is not included;
    /// sibling order follows each Safe's on-chain owner list.
    pub safes: Vec<DiscoveredSafe>,
    /// Branches that ended in a transport or decode failure.
    pub failures: Vec<NodeFailure>,
}

impl Discovery {
    /// Returns true if the root contract's owner is itself a Safe
    pub fn root_owner_is_safe(&self) -> bool {
        self.root_owner_owners.is_some()
    }
}

/// Walks the ownership graph and classifies each address at most once.
pub struct SafeGraphExplorer<'a, R> {
    reader: &'a R,
    visited: HashSet<Address>,
    classified: HashMap<Address, Classification>,
}

impl<'a, R> SafeGraphExplorer<'a, R>
where
    R: ChainReader,
{
    /// Creates an explorer over the given reader
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            visited: HashSet::new(),
            classified: HashMap::new(),
        }
    }

    /// Discovers the chain of nested Safes controlling `root`.
    ///
    /// The root's `owner()` is resolved first. If that owner does not
    /// classify as a Safe the result is the root owner alone. Otherwise its
    /// owner list seeds the worklist and every popped address is classified
    /// once: Safes are recorded, and a Safe whose direct owners are all
    /// Safes has them pushed for further exploration. A Safe with any
    /// non-Safe direct owner marks the depth limit of its branch; none of
    /// its owners are explored further, not even the Safes among them.
    ///
    /// Transport and decode failures below the root are recorded per node
    /// and end that branch only; results for siblings and ancestors are
    /// kept. A failure while resolving or classifying the root owner is a
    /// hard error, since there is no meaningful partial result without it.
    pub async fn explore(mut self, root: Address) -> Result<Discovery> {
        let root_owner = self.owner_of(root).await?;
        debug!(%root, %root_owner, "resolved root owner");

        let root_owners = match self.classify(root_owner).await? {
            Classification::Safe(owners) => owners,
            Classification::NotSafe => {
                return Ok(Discovery {
                    root_owner,
                    root_owner_owners: None,
                    safes: Vec::new(),
                    failures: Vec::new(),
                });
            }
        };

        let mut safes = Vec::new();
        let mut failures = Vec::new();

        // Owners are pushed in reverse so pop order follows the on-chain
        // owner list, giving a depth-first preorder over the graph.
        let mut stack: Vec<Address> = root_owners.iter().rev().copied().collect();
        self.visited.insert(root_owner);

        while let Some(addr) = stack.pop() {
            if !self.visited.insert(addr) {
                // cycle guard
                continue;
            }

            let owners = match self.classify(addr).await {
                Ok(Classification::Safe(owners)) => owners,
                Ok(Classification::NotSafe) => continue,
                Err(err) => {
                    failures.push(NodeFailure {
                        address: addr,
                        error: err.to_string(),
                    });
                    continue;
                }
            };

            debug!(safe = %addr, owners = owners.len(), "discovered nested safe");
            safes.push(DiscoveredSafe {
                address: addr,
                owners: owners.clone(),
            });

            // A Safe with any non-Safe direct owner ends the nested-only
            // chain here; none of its owners are explored.
            let mut all_owners_are_safes = true;
            for owner in &owners {
                match self.classify(*owner).await {
                    Ok(Classification::Safe(_)) => {}
                    Ok(Classification::NotSafe) => {
                        all_owners_are_safes = false;
                        break;
                    }
                    Err(err) => {
                        failures.push(NodeFailure {
                            address: *owner,
                            error: err.to_string(),
                        });
                        all_owners_are_safes = false;
                        break;
                    }
                }
            }

            if all_owners_are_safes {
                for owner in owners.iter().rev() {
                    stack.push(*owner);
                }
            }
        }

        Ok(Discovery {
            root_owner,
            root_owner_owners: Some(root_owners),
            safes,
            failures,
        })
    }

    /// Calls `owner()` on `addr` and decodes the result
    async fn owner_of(&self, addr: Address) -> Result<Address> {
        let raw = self
            .reader
            .call(addr, Bytes::from_static(&OWNER_SELECTOR))
            .await?;
        abi::decode_address(&raw)
    }

    /// Classifies `addr`, memoized for the run.
    ///
    /// Only a contract revert counts as not-a-Safe; transport and decode
    /// failures propagate to the caller.
    async fn classify(&mut self, addr: Address) -> Result<Classification> {
        if let Some(class) = self.classified.get(&addr) {
            return Ok(class.clone());
        }

        let class = match self
            .reader
            .call(addr, Bytes::from_static(&GET_OWNERS_SELECTOR))
            .await
        {
            Ok(raw) => Classification::Safe(abi::decode_address_array(&raw)?),
            Err(err) if err.is_revert() => Classification::NotSafe,
            Err(err) => return Err(err),
        };

        self.classified.insert(addr, class.clone());
        Ok(class)
    }
}
