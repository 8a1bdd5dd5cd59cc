//! Recipient resolution module for the giftlock gifting system.
//!
//! This module turns whatever the user typed into a canonical on-chain
//! address. Plain hex addresses pass through untouched; aliases go through
//! the registry on the canonical chain, a TTL cache, and a static fallback
//! table. Inputs that are neither are rejected before any network traffic.

use async_trait::async_trait;
use giftlock_types::{parse_address, Address, RecipientIdentifier};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Duration;

pub mod cache;

/// Re-export implementations
pub mod implementations {
	pub mod registry;
}

use cache::AliasCache;

/// Errors that can occur during recipient resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	/// The input is neither a hex address nor an alias under the suffix.
	#[error("Invalid recipient format: {0}")]
	InvalidFormat(String),
	/// The alias could not be resolved to an address.
	#[error("Lookup failed for alias '{alias}': {reason}")]
	LookupFailed { alias: String, reason: String },
}

/// Errors produced by alias lookup backends.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
	/// The registry could not be reached.
	#[error("Registry unreachable: {0}")]
	Unreachable(String),
	/// The registry answered with something undecodable.
	#[error("Invalid registry response: {0}")]
	InvalidResponse(String),
}

/// Where a resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
	/// The input was already an address.
	Direct,
	/// Resolved by the on-chain registry.
	Registry,
	/// Resolved by the static fallback table.
	Fallback,
	/// Served from the TTL cache.
	Cache,
}

/// A resolved recipient and how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
	pub address: Address,
	pub source: ResolutionSource,
}

/// Trait defining the interface for alias lookup backends.
///
/// A backend answers "which address does this alias name" against some
/// authority. `Ok(None)` means the authority is healthy but has no entry.
#[async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait AliasLookupInterface: Send + Sync {
	/// Looks up an alias, returning its address if registered.
	async fn lookup(&self, alias: &str) -> Result<Option<Address>, LookupError>;
}

/// Options controlling alias handling in the resolver.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
	/// Suffix that marks an input as an alias.
	pub alias_suffix: String,
	/// How long outcomes stay cached.
	pub cache_ttl: Duration,
	/// Static alias-to-address mappings consulted when the registry fails
	/// or has no answer.
	pub fallback: HashMap<String, Address>,
}

/// Service that resolves recipient inputs to canonical addresses.
///
/// Resolution order for aliases: cache, registry, fallback. The final
/// outcome, success or failure, is cached either way so repeated attempts
/// inside the TTL never retouch the registry.
pub struct ResolverService {
	lookup: Arc<dyn AliasLookupInterface>,
	cache: AliasCache,
	alias_suffix: String,
	fallback: HashMap<String, Address>,
}

impl ResolverService {
	/// Creates a new ResolverService over the given lookup backend.
	pub fn new(lookup: Arc<dyn AliasLookupInterface>, options: ResolverOptions) -> Self {
		Self {
			lookup,
			cache: AliasCache::new(options.cache_ttl),
			alias_suffix: options.alias_suffix,
			fallback: options.fallback,
		}
	}

	/// Resolves a raw recipient input to an address.
	///
	/// Classification is purely syntactic, so invalid inputs and plain
	/// addresses never cause network traffic.
	pub async fn resolve(&self, input: &str) -> Result<Resolution, ResolveError> {
		match RecipientIdentifier::classify(input, &self.alias_suffix) {
			RecipientIdentifier::Invalid(raw) => Err(ResolveError::InvalidFormat(raw)),
			RecipientIdentifier::Address(hex_addr) => {
				let address = parse_address(&hex_addr)
					.map_err(|_| ResolveError::InvalidFormat(hex_addr))?;
				Ok(Resolution {
					address,
					source: ResolutionSource::Direct,
				})
			},
			RecipientIdentifier::Alias(alias) => self.resolve_alias(alias).await,
		}
	}

	async fn resolve_alias(&self, alias: String) -> Result<Resolution, ResolveError> {
		if let Some(outcome) = self.cache.get(&alias).await {
			tracing::debug!(alias = %alias, "Alias served from cache");
			return outcome.map(|address| Resolution {
				address,
				source: ResolutionSource::Cache,
			});
		}

		let outcome = match self.lookup.lookup(&alias).await {
			Ok(Some(address)) => {
				tracing::debug!(alias = %alias, address = %address, "Alias resolved by registry");
				Ok(Resolution {
					address,
					source: ResolutionSource::Registry,
				})
			},
			Ok(None) => self.fallback_for(&alias, "no registry entry".to_string()),
			Err(e) => {
				tracing::warn!(alias = %alias, "Registry lookup failed: {}", e);
				self.fallback_for(&alias, e.to_string())
			},
		};

		self.cache
			.insert(
				alias,
				outcome
					.as_ref()
					.map(|resolution| resolution.address.clone())
					.map_err(|e| e.clone()),
			)
			.await;
		outcome
	}

	fn fallback_for(&self, alias: &str, reason: String) -> Result<Resolution, ResolveError> {
		match self.fallback.get(alias) {
			Some(address) => {
				tracing::debug!(alias = %alias, "Alias resolved by fallback table");
				Ok(Resolution {
					address: address.clone(),
					source: ResolutionSource::Fallback,
				})
			},
			None => Err(ResolveError::LookupFailed {
				alias: alias.to_string(),
				reason,
			}),
		}
	}
}
