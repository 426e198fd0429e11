//! EIP-712 hashing for the fixed batched Safe transaction
//!
//! Every discovered Safe signs the same shape: a delegatecall
//! (`operation = 1`) into a batch aggregator, with `value`, `safeTxGas`,
//! `baseGas` and `gasPrice` all zero and `gasToken`/`refundReceiver` set to
//! the zero address. The layout below is re-derived independently on
//! hardware signing devices; every field position and padding is normative,
//! and a single wrong byte produces a signature the device cannot verify.

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};

/// EIP-712 domain type hash for Safe
/// keccak256("EIP712Domain(uint256 chainId,address verifyingContract)")
pub const DOMAIN_SEPARATOR_TYPEHASH: [u8; 32] = [
    0x47, 0xe7, 0x95, 0x34, 0xa2, 0x45, 0x95, 0x2e, 0x8b, 0x16, 0x89, 0x3a, 0x33, 0x6b, 0x85, 0xa3,
    0xd9, 0xea, 0x9f, 0xa8, 0xc5, 0x73, 0xf3, 0xd8, 0x03, 0xaf, 0xb9, 0x2a, 0x79, 0x46, 0x92, 0x18,
];

/// EIP-712 type hash for the SafeTx struct
/// keccak256("SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)")
pub const SAFE_TX_TYPEHASH: [u8; 32] = [
    0xbb, 0x83, 0x10, 0xd4, 0x86, 0x36, 0x8d, 0xb6, 0xbd, 0x6f, 0x84, 0x94, 0x02, 0xfd, 0xd7, 0x3a,
    0xd5, 0x3d, 0x31, 0x6b, 0x5a, 0x4b, 0x26, 0x44, 0xad, 0x6e, 0xfe, 0x0f, 0x94, 0x12, 0x86, 0xd8,
];

/// The one batched call whose hash is computed at every discovered Safe
#[derive(Debug, Clone)]
pub struct BatchPayload {
    /// Batch aggregator address (the `to` of the Safe transaction)
    pub to: Address,
    /// Aggregated calldata
    pub data: Bytes,
}

impl BatchPayload {
    /// Creates a new payload
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
        }
    }
}

/// Domain and message hash for one Safe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeTxDigest {
    /// EIP-712 domain separator for the Safe
    pub domain_hash: B256,
    /// Final digest presented to signers
    pub message_hash: B256,
}

/// Computes the EIP-712 domain separator for a Safe
///
/// domain_separator = keccak256(DOMAIN_SEPARATOR_TYPEHASH || chainId || safe)
pub fn domain_separator(chain_id: u64, safe: Address) -> B256 {
    let mut encoded = Vec::with_capacity(96);

    encoded.extend_from_slice(&DOMAIN_SEPARATOR_TYPEHASH);

    // chainId (32 bytes, big-endian)
    encoded.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());

    // verifyingContract (32 bytes, left-padded address)
    let mut safe_bytes = [0u8; 32];
    safe_bytes[12..].copy_from_slice(safe.as_slice());
    encoded.extend_from_slice(&safe_bytes);

    keccak256(&encoded)
}

/// Computes the SafeTx struct hash for the fixed batch shape
///
/// safeTxHash = keccak256(abi.encode(
///     SAFE_TX_TYPEHASH,
///     to, 0, keccak256(data), 1,
///     0, 0, 0, address(0), address(0), nonce
/// ))
pub fn batch_tx_hash(payload: &BatchPayload, nonce: U256) -> B256 {
    let mut encoded = Vec::with_capacity(384);

    encoded.extend_from_slice(&SAFE_TX_TYPEHASH);

    // to (32 bytes, left-padded address)
    let mut to_bytes = [0u8; 32];
    to_bytes[12..].copy_from_slice(payload.to.as_slice());
    encoded.extend_from_slice(&to_bytes);

    // value (32 bytes) - always 0
    encoded.extend_from_slice(&[0u8; 32]);

    // keccak256(data) (32 bytes)
    encoded.extend_from_slice(keccak256(&payload.data).as_slice());

    // operation (32 bytes) - 1 for delegatecall
    let mut op_bytes = [0u8; 32];
    op_bytes[31] = 1;
    encoded.extend_from_slice(&op_bytes);

    // safeTxGas (32 bytes) - 0
    encoded.extend_from_slice(&[0u8; 32]);

    // baseGas (32 bytes) - 0
    encoded.extend_from_slice(&[0u8; 32]);

    // gasPrice (32 bytes) - 0
    encoded.extend_from_slice(&[0u8; 32]);

    // gasToken (32 bytes) - address(0)
    encoded.extend_from_slice(&[0u8; 32]);

    // refundReceiver (32 bytes) - address(0)
    encoded.extend_from_slice(&[0u8; 32]);

    // nonce (32 bytes, big-endian)
    encoded.extend_from_slice(&nonce.to_be_bytes::<32>());

    keccak256(&encoded)
}

/// Computes the final EIP-712 digest
///
/// hash = keccak256("\x19\x01" || domainSeparator || safeTxHash)
pub fn message_hash(domain_hash: B256, tx_hash: B256) -> B256 {
    let mut encoded = Vec::with_capacity(66);

    encoded.extend_from_slice(&[0x19, 0x01]);
    encoded.extend_from_slice(domain_hash.as_slice());
    encoded.extend_from_slice(tx_hash.as_slice());

    keccak256(&encoded)
}

/// Computes the complete digest pair for one Safe
pub fn digest_for_safe(
    safe: Address,
    chain_id: u64,
    payload: &BatchPayload,
    nonce: U256,
) -> SafeTxDigest {
    let domain_hash = domain_separator(chain_id, safe);
    let tx_hash = batch_tx_hash(payload, nonce);
    SafeTxDigest {
        domain_hash,
        message_hash: message_hash(domain_hash, tx_hash),
    }
}
