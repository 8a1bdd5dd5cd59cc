//! TTL cache for alias resolution outcomes.
//!
//! Both successes and failures are cached so a broken alias does not hammer
//! the registry on every keystroke. Entries expire after a fixed TTL and are
//! evicted lazily on access.

use crate::ResolveError;
use giftlock_types::Address;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

struct CacheEntry {
	outcome: Result<Address, ResolveError>,
	expires_at: Instant,
}

/// Cache of alias resolution outcomes with a fixed TTL.
pub struct AliasCache {
	ttl: Duration,
	entries: RwLock<HashMap<String, CacheEntry>>,
}

impl AliasCache {
	/// Creates an empty cache whose entries live for `ttl`.
	pub fn new(ttl: Duration) -> Self {
		Self {
			ttl,
			entries: RwLock::new(HashMap::new()),
		}
	}

	/// Returns the cached outcome for an alias, evicting it if expired.
	///
	/// An entry is served strictly before its TTL elapses; at exactly the
	/// TTL it is already gone.
	pub async fn get(&self, alias: &str) -> Option<Result<Address, ResolveError>> {
		let mut entries = self.entries.write().await;
		match entries.get(alias) {
			Some(entry) if Instant::now() < entry.expires_at => Some(entry.outcome.clone()),
			Some(_) => {
				entries.remove(alias);
				None
			},
			None => None,
		}
	}

	/// Stores a resolution outcome, resetting the alias's TTL.
	pub async fn insert(&self, alias: String, outcome: Result<Address, ResolveError>) {
		let entry = CacheEntry {
			outcome,
			expires_at: Instant::now() + self.ttl,
		};
		self.entries.write().await.insert(alias, entry);
	}

	/// Drops all cached outcomes.
	pub async fn clear(&self) {
		self.entries.write().await.clear();
	}

	/// Number of entries currently stored, expired or not.
	pub async fn len(&self) -> usize {
		self.entries.read().await.len()
	}
}
