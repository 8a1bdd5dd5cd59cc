//! Builders for Network Configuration Types
//!
//! Provides fluent APIs for constructing network configuration instances with
//! proper validation and sensible defaults.

use crate::networks::{NetworkConfig, NetworksConfig, TokenConfig};
use crate::{parse_address, Address};
use std::collections::HashMap;

/// Builder for creating `TokenConfig` instances with a fluent API.
///
/// Defaults to mainnet USDC so tests get a realistic fungible token
/// without spelling one out.
#[derive(Debug, Clone)]
pub struct TokenConfigBuilder {
	address: Option<Address>,
	symbol: Option<String>,
	decimals: Option<u8>,
}

impl Default for TokenConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TokenConfigBuilder {
	/// Creates a new `TokenConfigBuilder` with default values.
	pub fn new() -> Self {
		Self {
			address: Some(
				parse_address("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")
					.expect("Invalid USDC address"),
			),
			symbol: Some("USDC".to_string()),
			decimals: Some(6),
		}
	}

	/// Sets the token address.
	pub fn address(mut self, address: Address) -> Self {
		self.address = Some(address);
		self
	}

	/// Sets the token address from a hex string (with or without 0x prefix).
	pub fn address_hex(mut self, hex: &str) -> Result<Self, TokenConfigBuilderError> {
		let hex_str = hex.trim_start_matches("0x");
		let bytes = hex::decode(hex_str)
			.map_err(|_| TokenConfigBuilderError::InvalidAddress(hex.to_string()))?;
		self.address = Some(Address(bytes));
		Ok(self)
	}

	/// Sets the token symbol.
	pub fn symbol<S: Into<String>>(mut self, symbol: S) -> Self {
		self.symbol = Some(symbol.into());
		self
	}

	/// Sets the token decimals.
	pub fn decimals(mut self, decimals: u8) -> Self {
		self.decimals = Some(decimals);
		self
	}

	/// Validates the builder state and returns an error if required fields are missing.
	pub fn validate(&self) -> Result<(), TokenConfigBuilderError> {
		if self.address.is_none() {
			return Err(TokenConfigBuilderError::MissingField("address"));
		}
		if self.symbol.is_none() {
			return Err(TokenConfigBuilderError::MissingField("symbol"));
		}
		if self.decimals.is_none() {
			return Err(TokenConfigBuilderError::MissingField("decimals"));
		}
		Ok(())
	}

	/// Builds the `TokenConfig` with the configured values.
	///
	/// # Panics
	///
	/// Panics if required fields are not set.
	/// Use `try_build()` for error handling instead of panicking.
	pub fn build(self) -> TokenConfig {
		self.try_build()
			.expect("Missing required fields or invalid configuration")
	}

	/// Tries to build the `TokenConfig` with the configured values.
	pub fn try_build(self) -> Result<TokenConfig, TokenConfigBuilderError> {
		self.validate()?;

		Ok(TokenConfig {
			address: self.address.unwrap(),
			symbol: self.symbol.unwrap(),
			decimals: self.decimals.unwrap(),
		})
	}
}

/// Builder for creating `NetworkConfig` instances with a fluent API.
///
/// # Examples
///
/// ```
/// use giftlock_types::utils::tests::builders::NetworkConfigBuilder;
///
/// let network = NetworkConfigBuilder::new()
///     .rpc_url("https://mainnet.base.org")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
	rpc_url: String,
	vault_address: Option<Address>,
	tokens: Vec<TokenConfig>,
}

impl Default for NetworkConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl NetworkConfigBuilder {
	/// Creates a new `NetworkConfigBuilder` with default values.
	pub fn new() -> Self {
		Self {
			rpc_url: "https://mainnet.base.org".to_string(),
			vault_address: Some(
				parse_address("0x7d2768dE32b0b80b7a3454c06BdAc94A69DDc7A9")
					.expect("Invalid mock address"),
			),
			tokens: vec![TokenConfigBuilder::new().build()],
		}
	}

	/// Sets the RPC endpoint URL.
	pub fn rpc_url<S: Into<String>>(mut self, url: S) -> Self {
		self.rpc_url = url.into();
		self
	}

	/// Sets the gift vault contract address.
	pub fn vault_address(mut self, address: Address) -> Self {
		self.vault_address = Some(address);
		self
	}

	/// Sets the gift vault contract address from a hex string.
	pub fn vault_address_hex(mut self, hex: &str) -> Result<Self, NetworkConfigBuilderError> {
		let hex_str = hex.trim_start_matches("0x");
		let bytes = hex::decode(hex_str)
			.map_err(|_| NetworkConfigBuilderError::InvalidAddress(hex.to_string()))?;
		self.vault_address = Some(Address(bytes));
		Ok(self)
	}

	/// Adds a token configuration.
	pub fn add_token(mut self, token: TokenConfig) -> Self {
		self.tokens.push(token);
		self
	}

	/// Replaces the token list.
	pub fn tokens(mut self, tokens: Vec<TokenConfig>) -> Self {
		self.tokens = tokens;
		self
	}

	/// Validates the builder state and returns an error if required fields are missing.
	pub fn validate(&self) -> Result<(), NetworkConfigBuilderError> {
		if self.rpc_url.is_empty() {
			return Err(NetworkConfigBuilderError::MissingField("rpc_url"));
		}
		if self.vault_address.is_none() {
			return Err(NetworkConfigBuilderError::MissingField("vault_address"));
		}
		Ok(())
	}

	/// Builds the `NetworkConfig` with the configured values.
	///
	/// # Panics
	///
	/// Panics if required fields are not set.
	/// Use `try_build()` for error handling instead of panicking.
	pub fn build(self) -> NetworkConfig {
		self.try_build()
			.expect("Missing required fields or invalid configuration")
	}

	/// Tries to build the `NetworkConfig` with the configured values.
	pub fn try_build(self) -> Result<NetworkConfig, NetworkConfigBuilderError> {
		self.validate()?;

		Ok(NetworkConfig {
			rpc_url: self.rpc_url,
			vault_address: self.vault_address.unwrap(),
			tokens: self.tokens,
		})
	}
}

/// Builder for creating `NetworksConfig` mappings with a fluent API.
#[derive(Debug, Clone, Default)]
pub struct NetworksConfigBuilder {
	networks: HashMap<u64, NetworkConfig>,
}

impl NetworksConfigBuilder {
	/// Creates a new `NetworksConfigBuilder` with no networks.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a network configuration for the given chain ID.
	pub fn add_network(mut self, chain_id: u64, config: NetworkConfig) -> Self {
		self.networks.insert(chain_id, config);
		self
	}

	/// Builds the `NetworksConfig` with the configured values.
	pub fn build(self) -> NetworksConfig {
		self.networks
	}
}

/// Errors that can occur when building a TokenConfig.
#[derive(Debug, thiserror::Error)]
pub enum TokenConfigBuilderError {
	#[error("Missing required field: {0}")]
	MissingField(&'static str),
	#[error("Invalid address: {0}")]
	InvalidAddress(String),
}

/// Errors that can occur when building a NetworkConfig.
#[derive(Debug, thiserror::Error)]
pub enum NetworkConfigBuilderError {
	#[error("Missing required field: {0}")]
	MissingField(&'static str),
	#[error("Invalid address: {0}")]
	InvalidAddress(String),
}
