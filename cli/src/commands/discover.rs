use std::collections::HashMap;
use std::str::FromStr;

use alloy::network::AnyNetwork;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::ProviderBuilder;
use color_eyre::eyre::{eyre, Result, WrapErr};
use safe_nest::{collect_safe_records, DiscoveryRequest, RpcChainReader};

use crate::cli::DiscoverArgs;
use crate::output;

pub async fn run(args: DiscoverArgs, json: bool) -> Result<()> {
    let root = Address::from_str(&args.root).wrap_err("invalid root address")?;
    let target = Address::from_str(&args.target).wrap_err("invalid target address")?;
    let calldata = Bytes::from_str(&args.data).wrap_err("invalid calldata hex")?;
    let nonce_overrides = parse_overrides(&args.nonce_overrides)?;

    let provider = ProviderBuilder::new()
        .network::<AnyNetwork>()
        .connect_http(args.rpc_url.parse().wrap_err("invalid RPC URL")?);
    let reader = RpcChainReader::new(provider);

    let chain_id = match args.chain_id {
        Some(id) => id,
        None => reader.chain_id().await?,
    };

    let report = collect_safe_records(
        &reader,
        DiscoveryRequest {
            root,
            chain_id,
            target,
            calldata,
            nonce_overrides,
        },
    )
    .await?;

    output::print_report(&report, json);
    Ok(())
}

fn parse_overrides(raw: &[String]) -> Result<HashMap<Address, U256>> {
    let mut overrides = HashMap::new();
    for entry in raw {
        let (addr, nonce) = entry
            .split_once('=')
            .ok_or_else(|| eyre!("expected 0xADDR=NONCE, got '{entry}'"))?;
        let addr = Address::from_str(addr.trim())
            .wrap_err_with(|| format!("invalid override address in '{entry}'"))?;
        let nonce = U256::from_str(nonce.trim())
            .wrap_err_with(|| format!("invalid override nonce in '{entry}'"))?;
        overrides.insert(addr, nonce);
    }
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_parse_overrides() {
        let overrides = parse_overrides(&[
            "0x1111111111111111111111111111111111111111=12".to_string(),
            "0x2222222222222222222222222222222222222222=0".to_string(),
        ])
        .unwrap();

        assert_eq!(
            overrides[&address!("0x1111111111111111111111111111111111111111")],
            U256::from(12)
        );
        assert_eq!(
            overrides[&address!("0x2222222222222222222222222222222222222222")],
            U256::ZERO
        );
    }

    #[test]
    fn test_parse_overrides_rejects_missing_separator() {
        assert!(parse_overrides(&["0x1111".to_string()]).is_err());
    }

    #[test]
    fn test_parse_overrides_rejects_bad_address() {
        assert!(parse_overrides(&["nope=1".to_string()]).is_err());
    }
}
