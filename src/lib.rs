//! # safe-nest
//!
//! A Rust library for discovering the chain of nested Safes that control a
//! root administrative contract and computing the EIP-712 signing digests
//! for one fixed batched transaction at every discovered Safe.
//!
//! ## Features
//!
//! - Ownership-graph discovery from any contract exposing `owner()`, with
//!   cycle protection and a mixed-owner stop rule
//! - Per-Safe nonce resolution (storage slot 5) with external overrides that
//!   always win over the chain value
//! - Byte-exact EIP-712 domain/message hashes for the fixed delegatecall
//!   batch shape, matching what hardware signing devices re-derive
//! - Serializable signing records for artifact emission and human review
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use safe_nest::{collect_safe_records, DiscoveryRequest, RpcChainReader};
//! use alloy::primitives::{address, Bytes};
//!
//! let reader = RpcChainReader::new(provider);
//! let report = collect_safe_records(&reader, DiscoveryRequest {
//!     root: proxy_admin,
//!     chain_id: 1,
//!     target: aggregator,
//!     calldata: batch_calldata,
//!     nonce_overrides: Default::default(),
//! }).await?;
//!
//! for record in &report.records {
//!     println!("{}: {}", record.address, record.message_hash);
//! }
//! ```
//!
//! Transport failures are never treated as a classification signal: only a
//! contract-level revert marks an address as not-a-Safe, and a failure on
//! one branch leaves sibling results intact.

pub mod abi;
pub mod discovery;
pub mod encoding;
pub mod error;
pub mod nonce;
pub mod pipeline;
pub mod reader;
pub mod report;

// Re-export main types at crate root
pub use discovery::{Classification, DiscoveredSafe, Discovery, NodeFailure, SafeGraphExplorer};
pub use encoding::{
    batch_tx_hash, digest_for_safe, domain_separator, message_hash, BatchPayload, SafeTxDigest,
};
pub use error::{Error, Result};
pub use nonce::{
    read_safe_state, NonceCoordinator, SafeState, NONCE_SLOT, OWNER_COUNT_SLOT, THRESHOLD_SLOT,
};
pub use pipeline::{collect_safe_records, DiscoveryRequest};
pub use reader::{ChainReader, RpcChainReader};
pub use report::{DiscoveryReport, RootOwner, SafeRecord};

// Re-export alloy types that are commonly used
pub use alloy::primitives::{Address, Bytes, B256, U256};
