//! Error types for safe-nest

use alloy::primitives::Address;
use thiserror::Error;

/// Result type alias for safe-nest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during discovery, nonce resolution and hashing
#[derive(Debug, Error)]
pub enum Error {
    /// Network or RPC-level failure. Never reinterpreted as a classification
    /// result; only a contract revert may classify an address as not-a-Safe.
    #[error("transport error: {0}")]
    Transport(String),

    /// A read-only contract call reverted
    #[error("call to {0} reverted")]
    Revert(Address),

    /// Malformed or truncated ABI response
    #[error("failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    /// The on-chain nonce could not be read and no override was supplied
    #[error("failed to resolve nonce for {safe}: {reason}")]
    NonceUnavailable { safe: Address, reason: String },
}

impl Error {
    /// Returns true if this error is a contract-level revert
    pub fn is_revert(&self) -> bool {
        matches!(self, Error::Revert(_))
    }

    pub(crate) fn decode(what: &'static str, reason: impl Into<String>) -> Self {
        Error::Decode {
            what,
            reason: reason.into(),
        }
    }
}

impl From<alloy::transports::RpcError<alloy::transports::TransportErrorKind>> for Error {
    fn from(err: alloy::transports::RpcError<alloy::transports::TransportErrorKind>) -> Self {
        Error::Transport(err.to_string())
    }
}
