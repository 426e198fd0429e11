use alloy::primitives::{Address, U256};
use safe_nest::DiscoveryReport;
use serde::Serialize;

pub fn print_report(report: &DiscoveryReport, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(report).unwrap());
    } else {
        println!("Chain Id: {}", report.chain_id);
        println!("Root Owner: {}", report.root_owner.address);
        if report.root_owner.is_safe {
            if let Some(nonce) = report.root_owner.nonce {
                println!("  Safe, nonce {}", nonce);
            } else {
                println!("  Safe");
            }
        } else {
            println!("  Not a Safe");
        }
        println!("Safes ({}):", report.records.len());
        for (i, record) in report.records.iter().enumerate() {
            println!("  {}. {}", i + 1, record.address);
            println!("     Nonce: {}", record.nonce);
            println!("     Domain Hash: {}", record.domain_hash);
            println!("     Message Hash: {}", record.message_hash);
        }
        if !report.failures.is_empty() {
            println!("Failures ({}):", report.failures.len());
            for failure in &report.failures {
                println!("  {}: {}", failure.address, failure.error);
            }
        }
        if !report.unmatched_overrides.is_empty() {
            println!("Unmatched Nonce Overrides:");
            for addr in &report.unmatched_overrides {
                println!("  {}", addr);
            }
        }
    }
}

#[derive(Serialize)]
pub struct SafeStateOutput {
    pub address: Address,
    pub nonce: U256,
    pub threshold: U256,
    pub owner_count: U256,
    pub owners: Vec<Address>,
}

impl SafeStateOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Safe: {}", self.address);
            println!("Nonce: {}", self.nonce);
            println!("Threshold: {}", self.threshold);
            println!("Owner Count: {}", self.owner_count);
            println!("Owners:");
            for (i, owner) in self.owners.iter().enumerate() {
                println!("  {}: {}", i + 1, owner);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256};
    use safe_nest::{DiscoveryReport, NodeFailure, RootOwner, SafeRecord};

    #[test]
    fn test_safe_state_output_json_format() {
        let output = SafeStateOutput {
            address: address!("0x1234567890123456789012345678901234567890"),
            nonce: U256::from(42),
            threshold: U256::from(2),
            owner_count: U256::from(3),
            owners: vec![
                address!("0x1111111111111111111111111111111111111111"),
                address!("0x2222222222222222222222222222222222222222"),
                address!("0x3333333333333333333333333333333333333333"),
            ],
        };

        let json = serde_json::to_string_pretty(&output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            parsed["address"],
            "0x1234567890123456789012345678901234567890"
        );
        assert_eq!(parsed["nonce"], "0x2a"); // 42 in hex
        assert_eq!(parsed["owners"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_report_json_shape() {
        let report = DiscoveryReport {
            chain_id: 10,
            root_owner: RootOwner {
                address: address!("0x1234567890123456789012345678901234567890"),
                is_safe: true,
                nonce: Some(U256::from(3)),
            },
            records: vec![SafeRecord {
                address: address!("0x1111111111111111111111111111111111111111"),
                nonce: U256::from(7),
                domain_hash: b256!(
                    "0x1111111111111111111111111111111111111111111111111111111111111111"
                ),
                message_hash: b256!(
                    "0x2222222222222222222222222222222222222222222222222222222222222222"
                ),
            }],
            failures: vec![NodeFailure {
                address: address!("0x2222222222222222222222222222222222222222"),
                error: "transport error: connection refused".to_string(),
            }],
            unmatched_overrides: vec![],
        };

        let json = serde_json::to_string_pretty(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["chainId"], 10);
        assert_eq!(parsed["rootOwner"]["isSafe"], true);
        assert_eq!(parsed["records"][0]["nonce"], "7");
        assert_eq!(parsed["failures"].as_array().unwrap().len(), 1);
        // unmatched_overrides should be absent (skip_serializing_if)
        assert!(parsed.get("unmatchedOverrides").is_none());
    }
}
