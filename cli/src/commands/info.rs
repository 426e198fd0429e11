use std::str::FromStr;

use alloy::network::AnyNetwork;
use alloy::primitives::{Address, Bytes};
use alloy::providers::ProviderBuilder;
use color_eyre::eyre::{Result, WrapErr};
use safe_nest::abi::{decode_address_array, GET_OWNERS_SELECTOR};
use safe_nest::{read_safe_state, ChainReader, RpcChainReader};

use crate::cli::InfoArgs;
use crate::output::SafeStateOutput;

pub async fn run(args: InfoArgs, json: bool) -> Result<()> {
    let safe = Address::from_str(&args.safe).wrap_err("invalid safe address")?;

    let provider = ProviderBuilder::new()
        .network::<AnyNetwork>()
        .connect_http(args.rpc_url.parse().wrap_err("invalid RPC URL")?);
    let reader = RpcChainReader::new(provider);

    let state = read_safe_state(&reader, safe).await?;
    let raw = reader
        .call(safe, Bytes::from_static(&GET_OWNERS_SELECTOR))
        .await?;
    let owners = decode_address_array(&raw)?;

    SafeStateOutput {
        address: safe,
        nonce: state.nonce,
        threshold: state.threshold,
        owner_count: state.owner_count,
        owners,
    }
    .print(json);

    Ok(())
}
