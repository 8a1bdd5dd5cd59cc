//! Configuration module for the giftlock gifting system.
//!
//! This module provides structures and utilities for managing gifting configuration.
//! It supports loading configuration from TOML files and provides validation to ensure
//! all required configuration values are properly set.

use giftlock_types::{networks::deserialize_networks, Address, NetworksConfig};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the gifting engine.
///
/// This structure contains all configuration sections required for the engine
/// to operate: instance identity, network endpoints, recipient resolution,
/// the signing session, and batch processing limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to this gifting instance.
	pub gifting: GiftingConfig,
	/// Network and token configurations.
	#[serde(deserialize_with = "deserialize_networks")]
	pub networks: NetworksConfig,
	/// Configuration for recipient resolution.
	pub resolver: ResolverConfig,
	/// Configuration for the signing session.
	pub session: SessionConfig,
	/// Configuration for batch processing.
	#[serde(default)]
	pub batch: BatchConfig,
}

/// Configuration specific to this gifting instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GiftingConfig {
	/// Unique identifier for this instance.
	pub id: String,
	/// Chain gifts are created on unless an entry says otherwise.
	pub default_chain_id: u64,
	/// Timeout in seconds for waiting on transaction confirmation.
	#[serde(default = "default_confirmation_timeout_seconds")]
	pub confirmation_timeout_seconds: u64,
	/// Minimum number of confirmations required for transactions.
	#[serde(default = "default_min_confirmations")]
	pub min_confirmations: u64,
}

/// Configuration for recipient resolution.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
	/// Chain that hosts the alias registry. All alias lookups go here,
	/// regardless of which chain the gift itself lands on.
	pub canonical_chain_id: u64,
	/// Address of the alias registry contract.
	pub registry_address: Address,
	/// Suffix that marks an input as an alias.
	#[serde(default = "default_alias_suffix")]
	pub alias_suffix: String,
	/// How long resolved aliases stay cached, in seconds.
	#[serde(default = "default_cache_ttl_seconds")]
	pub cache_ttl_seconds: u64,
	/// Static alias-to-address mappings consulted when the registry
	/// fails or has no answer.
	#[serde(default)]
	pub fallback: HashMap<String, Address>,
}

/// Configuration for the signing session.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of session implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for batch processing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
	/// How many entries may validate concurrently.
	#[serde(default = "default_validation_concurrency")]
	pub validation_concurrency: usize,
}

impl Default for BatchConfig {
	fn default() -> Self {
		Self {
			validation_concurrency: default_validation_concurrency(),
		}
	}
}

/// Returns the default confirmation timeout in seconds.
fn default_confirmation_timeout_seconds() -> u64 {
	120
}

/// Returns the default number of confirmations required.
fn default_min_confirmations() -> u64 {
	1
}

/// Returns the default alias suffix.
fn default_alias_suffix() -> String {
	".base.eth".to_string()
}

/// Returns the default alias cache TTL in seconds.
fn default_cache_ttl_seconds() -> u64 {
	300 // 5 minutes
}

/// Returns the default validation concurrency.
fn default_validation_concurrency() -> usize {
	5
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	// Limit input size to prevent ReDoS attacks
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = match cap.get(0) {
			Some(m) => m,
			None => continue,
		};
		let var_name = match cap.get(1) {
			Some(m) => m.as_str(),
			None => continue,
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{var_name}' not found"
					)));
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file with environment variable resolution.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let contents = tokio::fs::read_to_string(path).await?;
		contents.parse()
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// This method performs validation across all configuration sections:
	/// - Ensures the instance ID is not empty
	/// - Validates networks configuration and the default chain
	/// - Checks the resolver's canonical chain, registry, and suffix
	/// - Verifies the session primary implementation is configured
	/// - Bounds the confirmation and batch settings
	fn validate(&self) -> Result<(), ConfigError> {
		// Validate gifting config
		if self.gifting.id.is_empty() {
			return Err(ConfigError::Validation(
				"Gifting instance ID cannot be empty".into(),
			));
		}

		// Validate networks config
		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"Networks configuration cannot be empty".into(),
			));
		}
		for (chain_id, network) in &self.networks {
			if network.rpc_url.is_empty() {
				return Err(ConfigError::Validation(format!(
					"Network {chain_id} must have rpc_url"
				)));
			}
			if network.vault_address.0.len() != 20 {
				return Err(ConfigError::Validation(format!(
					"Network {chain_id} must have a 20-byte vault_address"
				)));
			}
		}
		if !self.networks.contains_key(&self.gifting.default_chain_id) {
			return Err(ConfigError::Validation(format!(
				"Default chain {} not found in networks config",
				self.gifting.default_chain_id
			)));
		}

		// Validate confirmation settings
		if self.gifting.min_confirmations == 0 {
			return Err(ConfigError::Validation(
				"min_confirmations must be at least 1".into(),
			));
		}
		if self.gifting.min_confirmations > 100 {
			return Err(ConfigError::Validation(
				"min_confirmations cannot exceed 100".into(),
			));
		}
		if self.gifting.confirmation_timeout_seconds == 0
			|| self.gifting.confirmation_timeout_seconds > 3600
		{
			return Err(ConfigError::Validation(
				"confirmation_timeout_seconds must be between 1 and 3600 seconds".into(),
			));
		}

		// Validate resolver config
		if !self.networks.contains_key(&self.resolver.canonical_chain_id) {
			return Err(ConfigError::Validation(format!(
				"Resolver canonical chain {} not found in networks config",
				self.resolver.canonical_chain_id
			)));
		}
		if self.resolver.registry_address.0.len() != 20 {
			return Err(ConfigError::Validation(
				"Resolver registry_address must be a 20-byte address".into(),
			));
		}
		if !self.resolver.alias_suffix.starts_with('.') || self.resolver.alias_suffix.len() < 2 {
			return Err(ConfigError::Validation(format!(
				"Alias suffix '{}' must start with '.' and name a domain",
				self.resolver.alias_suffix
			)));
		}
		if self.resolver.cache_ttl_seconds == 0 {
			return Err(ConfigError::Validation(
				"Resolver cache_ttl_seconds must be greater than 0".into(),
			));
		}
		if self.resolver.cache_ttl_seconds > 86400 {
			return Err(ConfigError::Validation(
				"Resolver cache_ttl_seconds cannot exceed 86400 (24 hours)".into(),
			));
		}
		for alias in self.resolver.fallback.keys() {
			if !alias.ends_with(&self.resolver.alias_suffix) {
				return Err(ConfigError::Validation(format!(
					"Fallback entry '{}' does not end with alias suffix '{}'",
					alias, self.resolver.alias_suffix
				)));
			}
		}

		// Validate session config
		if self.session.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one session implementation must be configured".into(),
			));
		}
		if self.session.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Session primary implementation cannot be empty".into(),
			));
		}
		if !self
			.session
			.implementations
			.contains_key(&self.session.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary session '{}' not found in implementations",
				self.session.primary
			)));
		}

		// Validate batch config
		if self.batch.validation_concurrency == 0 {
			return Err(ConfigError::Validation(
				"Batch validation_concurrency must be at least 1".into(),
			));
		}
		if self.batch.validation_concurrency > 32 {
			return Err(ConfigError::Validation(
				"Batch validation_concurrency cannot exceed 32".into(),
			));
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// This allows configuration to be parsed from TOML strings using the standard
/// string parsing interface. Environment variables are resolved and the
/// configuration is automatically validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
