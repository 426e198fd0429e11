//! Output records consumed by artifact emission and review workflows
//!
//! JSON field names and the decimal nonce encoding match the signing
//! artifacts that facilitators and signers already exchange; hashes
//! serialize as 0x-prefixed hex.

use alloy::primitives::{Address, B256, U256};
use serde::{Serialize, Serializer};

use crate::discovery::NodeFailure;

/// The unit of output: one discovered Safe with its resolved nonce and
/// signing digests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeRecord {
    /// Safe address
    pub address: Address,
    /// Resolved nonce used as hash input (override or chain value)
    #[serde(serialize_with = "nonce_as_decimal")]
    pub nonce: U256,
    /// EIP-712 domain separator for this Safe
    pub domain_hash: B256,
    /// Final digest presented to signers
    pub message_hash: B256,
}

/// The root contract's owner. Carries a resolved nonce when it is itself a
/// Safe, but no digests of its own.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootOwner {
    /// Owner address returned by the root contract's `owner()`
    pub address: Address,
    /// Whether the owner classified as a Safe
    pub is_safe: bool,
    /// Resolved nonce, present only when the owner is a Safe
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "opt_nonce_as_decimal"
    )]
    pub nonce: Option<U256>,
}

/// Complete result of one discovery-and-hash run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryReport {
    /// Chain id the digests were computed for
    pub chain_id: u64,
    /// The (possibly non-Safe) root owner
    pub root_owner: RootOwner,
    /// One record per discovered Safe, in traversal order
    pub records: Vec<SafeRecord>,
    /// Branches that failed without aborting the run
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<NodeFailure>,
    /// Nonce overrides supplied for addresses never discovered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmatched_overrides: Vec<Address>,
}

fn nonce_as_decimal<S: Serializer>(nonce: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&nonce.to_string())
}

fn opt_nonce_as_decimal<S: Serializer>(
    nonce: &Option<U256>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match nonce {
        Some(nonce) => nonce_as_decimal(nonce, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256};

    #[test]
    fn test_safe_record_json_format() {
        let record = SafeRecord {
            address: address!("0x1234567890123456789012345678901234567890"),
            nonce: U256::from(42),
            domain_hash: b256!(
                "0xd9578c14d681a2ed4541d001ebd7db00c3958ac20f5416fe5eadcefe1330095b"
            ),
            message_hash: b256!(
                "0xbb15aaaff8d675136fbaa72d4eaebef74e53f4ddcb97c354cb3f14fc0548d9c0"
            ),
        };

        let json = serde_json::to_string_pretty(&record).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            parsed["address"],
            "0x1234567890123456789012345678901234567890"
        );
        assert_eq!(parsed["nonce"], "42");
        assert_eq!(
            parsed["domainHash"],
            "0xd9578c14d681a2ed4541d001ebd7db00c3958ac20f5416fe5eadcefe1330095b"
        );
        assert_eq!(
            parsed["messageHash"],
            "0xbb15aaaff8d675136fbaa72d4eaebef74e53f4ddcb97c354cb3f14fc0548d9c0"
        );
    }

    #[test]
    fn test_root_owner_json_without_nonce() {
        let root = RootOwner {
            address: address!("0x1111111111111111111111111111111111111111"),
            is_safe: false,
            nonce: None,
        };

        let json = serde_json::to_string_pretty(&root).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["isSafe"], false);
        // nonce should be absent (skip_serializing_if)
        assert!(parsed.get("nonce").is_none());
    }

    #[test]
    fn test_root_owner_json_with_nonce() {
        let root = RootOwner {
            address: address!("0x1111111111111111111111111111111111111111"),
            is_safe: true,
            nonce: Some(U256::from(17)),
        };

        let json = serde_json::to_string_pretty(&root).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["isSafe"], true);
        assert_eq!(parsed["nonce"], "17");
    }

    #[test]
    fn test_report_skips_empty_failure_lists() {
        let report = DiscoveryReport {
            chain_id: 1,
            root_owner: RootOwner {
                address: address!("0x1111111111111111111111111111111111111111"),
                is_safe: false,
                nonce: None,
            },
            records: vec![],
            failures: vec![],
            unmatched_overrides: vec![],
        };

        let json = serde_json::to_string_pretty(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["chainId"], 1);
        assert!(parsed.get("failures").is_none());
        assert!(parsed.get("unmatchedOverrides").is_none());
    }
}
