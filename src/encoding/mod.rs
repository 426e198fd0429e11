//! Byte-exact EIP-712 encoding for the fixed Safe transaction shape

mod eip712;

pub use eip712::{
    batch_tx_hash, digest_for_safe, domain_separator, message_hash, BatchPayload, SafeTxDigest,
    DOMAIN_SEPARATOR_TYPEHASH, SAFE_TX_TYPEHASH,
};
