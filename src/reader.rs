//! Read-only chain access
//!
//! `ChainReader` is the capability consumed by discovery and nonce
//! resolution: one read-only contract call and one raw storage read. The
//! RPC-backed implementation distinguishes contract reverts from transport
//! failures, because only a revert is a valid "not a Safe" signal.

use std::future::Future;

use alloy::network::{AnyNetwork, Network, TransactionBuilder};
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::Provider;
use alloy::rpc::json_rpc::ErrorPayload;
use alloy::transports::{RpcError, TransportErrorKind};

use crate::error::{Error, Result};

/// Read-only chain capability.
///
/// Per-call timeout and retry behavior belongs to the implementation; callers
/// see either a result, a `Revert`, or a `Transport` error.
pub trait ChainReader: Send + Sync {
    /// Performs a read-only contract call (`eth_call`) against `to`.
    fn call(&self, to: Address, data: Bytes) -> impl Future<Output = Result<Bytes>> + Send;

    /// Reads one raw 32-byte storage word (`eth_getStorageAt`).
    fn storage_at(&self, address: Address, slot: U256)
        -> impl Future<Output = Result<U256>> + Send;
}

/// `ChainReader` backed by an alloy provider.
#[derive(Debug, Clone)]
pub struct RpcChainReader<P> {
    provider: P,
}

impl<P> RpcChainReader<P>
where
    P: Provider<AnyNetwork> + Clone + Send + Sync + 'static,
{
    /// Creates a new reader over the given provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns a reference to the underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetches the chain id from the endpoint
    pub async fn chain_id(&self) -> Result<u64> {
        self.provider.get_chain_id().await.map_err(Error::from)
    }
}

impl<P> ChainReader for RpcChainReader<P>
where
    P: Provider<AnyNetwork> + Clone + Send + Sync + 'static,
{
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let tx = <AnyNetwork as Network>::TransactionRequest::default()
            .with_to(to)
            .with_input(data);

        match self.provider.call(tx).await {
            Ok(bytes) => Ok(bytes),
            Err(err) => Err(classify_call_error(to, err)),
        }
    }

    async fn storage_at(&self, address: Address, slot: U256) -> Result<U256> {
        self.provider
            .get_storage_at(address, slot)
            .await
            .map_err(Error::from)
    }
}

/// Maps a failed `eth_call` to the error taxonomy.
///
/// Nodes deliver rate limits and server-side failures as JSON-RPC error
/// responses too, so an error response alone is not enough: only a payload
/// carrying execution-revert evidence becomes `Revert`. Everything else is
/// a `Transport` failure and never classifies an address.
fn classify_call_error(to: Address, err: RpcError<TransportErrorKind>) -> Error {
    match err.as_error_resp() {
        Some(resp) if is_execution_revert(resp) => Error::Revert(to),
        _ => Error::Transport(err.to_string()),
    }
}

/// Geth and friends signal an execution revert with code 3 and the
/// "execution reverted" message; revert return data, when present, is
/// carried in the payload's data field.
fn is_execution_revert(resp: &ErrorPayload) -> bool {
    resp.as_revert_data().is_some()
        || resp.code == 3
        || resp.message.contains("execution reverted")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_resp(code: i64, message: &str, data: Option<&str>) -> RpcError<TransportErrorKind> {
        RpcError::ErrorResp(ErrorPayload {
            code,
            message: message.to_string().into(),
            data: data.map(|d| {
                serde_json::value::RawValue::from_string(format!("\"{d}\"")).unwrap()
            }),
        })
    }

    #[test]
    fn test_revert_with_return_data_maps_to_revert() {
        let to = Address::with_last_byte(1);
        // Error(string) payload for revert("no owners")
        let err = error_resp(3, "execution reverted", Some("0x08c379a0"));

        assert!(matches!(classify_call_error(to, err), Error::Revert(addr) if addr == to));
    }

    #[test]
    fn test_revert_without_data_maps_to_revert() {
        let to = Address::with_last_byte(1);
        let err = error_resp(3, "execution reverted", None);

        assert!(classify_call_error(to, err).is_revert());
    }

    #[test]
    fn test_rate_limit_error_resp_maps_to_transport() {
        let to = Address::with_last_byte(1);
        let err = error_resp(-32005, "limit exceeded", None);

        let mapped = classify_call_error(to, err);
        assert!(!mapped.is_revert());
        assert!(matches!(mapped, Error::Transport(_)));
    }

    #[test]
    fn test_server_error_resp_maps_to_transport() {
        let to = Address::with_last_byte(1);
        let err = error_resp(-32000, "header not found", None);

        assert!(matches!(classify_call_error(to, err), Error::Transport(_)));
    }

    #[test]
    fn test_transport_level_failure_maps_to_transport() {
        let to = Address::with_last_byte(1);
        let err: RpcError<TransportErrorKind> = TransportErrorKind::backend_gone();

        assert!(matches!(classify_call_error(to, err), Error::Transport(_)));
    }
}
