//! Network and token configuration types.

use crate::Address;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// All configured networks, keyed by chain id.
pub type NetworksConfig = HashMap<u64, NetworkConfig>;

/// A token the application knows about on one network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenConfig {
	/// Token contract address.
	pub address: Address,
	/// Display symbol, e.g. "USDC".
	pub symbol: String,
	/// Declared decimals.
	pub decimals: u8,
}

/// Per-network configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
	/// HTTP RPC endpoint.
	pub rpc_url: String,
	/// Deployed GiftVault contract on this network.
	pub vault_address: Address,
	/// Tokens available for fungible gifts.
	#[serde(default)]
	pub tokens: Vec<TokenConfig>,
}

impl NetworkConfig {
	/// Finds a configured token by its symbol, case-insensitively.
	pub fn token_by_symbol(&self, symbol: &str) -> Option<&TokenConfig> {
		self.tokens
			.iter()
			.find(|t| t.symbol.eq_ignore_ascii_case(symbol))
	}
}

/// Deserializes the `[networks.<chain_id>]` table, whose TOML keys are
/// strings, into a map keyed by numeric chain id.
pub fn deserialize_networks<'de, D>(deserializer: D) -> Result<NetworksConfig, D::Error>
where
	D: Deserializer<'de>,
{
	let raw: HashMap<String, NetworkConfig> = HashMap::deserialize(deserializer)?;
	let mut networks = HashMap::with_capacity(raw.len());
	for (key, value) in raw {
		let chain_id: u64 = key.parse().map_err(|_| {
			serde::de::Error::custom(format!("Invalid chain id '{}' in networks", key))
		})?;
		networks.insert(chain_id, value);
	}
	Ok(networks)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::utils::tests::builders::NetworkConfigBuilder;

	#[test]
	fn test_token_lookup_by_symbol() {
		let network = NetworkConfigBuilder::new().build();
		assert!(network.token_by_symbol("usdc").is_some());
		assert!(network.token_by_symbol("USDC").is_some());
		assert!(network.token_by_symbol("DOGE").is_none());
	}

	#[test]
	fn test_deserialize_networks_parses_string_keys() {
		let toml_str = r#"
			[networks.8453]
			rpc_url = "https://mainnet.base.org"
			vault_address = "0x1111111111111111111111111111111111111111"

			[networks.10]
			rpc_url = "https://mainnet.optimism.io"
			vault_address = "0x2222222222222222222222222222222222222222"
		"#;

		#[derive(Deserialize)]
		struct Wrapper {
			#[serde(deserialize_with = "deserialize_networks")]
			networks: NetworksConfig,
		}

		let wrapper: Wrapper = toml::from_str(toml_str).unwrap();
		assert_eq!(wrapper.networks.len(), 2);
		assert!(wrapper.networks.contains_key(&8453));
		assert!(wrapper.networks.contains_key(&10));
	}

	#[test]
	fn test_deserialize_networks_rejects_bad_key() {
		let toml_str = r#"
			[networks.base]
			rpc_url = "https://mainnet.base.org"
			vault_address = "0x1111111111111111111111111111111111111111"
		"#;

		#[derive(Deserialize)]
		struct Wrapper {
			#[serde(deserialize_with = "deserialize_networks")]
			#[allow(dead_code)]
			networks: NetworksConfig,
		}

		let result: Result<Wrapper, _> = toml::from_str(toml_str);
		assert!(result.is_err());
	}
}
