//! Builder for GiftIntent
//!
//! Provides a fluent API for constructing GiftIntent instances with
//! sensible defaults for testing.

use crate::asset::AssetSelection;
use crate::gift::GiftIntent;
use crate::recipient::RecipientIdentifier;

/// Unlock timestamp far enough in the future that validation never
/// trips over it (2096-01-01 or thereabouts).
const DEFAULT_UNLOCK_TIMESTAMP: u64 = 4_000_000_000;

/// Builder for creating `GiftIntent` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct GiftIntentBuilder {
	recipient: RecipientIdentifier,
	asset: AssetSelection,
	unlock_timestamp: u64,
	message: String,
}

impl Default for GiftIntentBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl GiftIntentBuilder {
	/// Creates a new `GiftIntentBuilder` with default values.
	pub fn new() -> Self {
		Self {
			recipient: RecipientIdentifier::Address(
				"0xa0b86a33e6776fb78b3e1e6b2d0d2e8f0c1d2a3b".to_string(),
			),
			asset: AssetSelection::Native {
				amount: "1".to_string(),
			},
			unlock_timestamp: DEFAULT_UNLOCK_TIMESTAMP,
			message: String::new(),
		}
	}

	/// Sets the recipient identifier.
	pub fn recipient(mut self, recipient: RecipientIdentifier) -> Self {
		self.recipient = recipient;
		self
	}

	/// Sets the recipient to an alias.
	pub fn alias<S: Into<String>>(mut self, alias: S) -> Self {
		self.recipient = RecipientIdentifier::Alias(alias.into());
		self
	}

	/// Sets the asset selection.
	pub fn asset(mut self, asset: AssetSelection) -> Self {
		self.asset = asset;
		self
	}

	/// Sets a native asset with the given decimal amount.
	pub fn native_amount<S: Into<String>>(mut self, amount: S) -> Self {
		self.asset = AssetSelection::Native {
			amount: amount.into(),
		};
		self
	}

	/// Sets the unlock timestamp.
	pub fn unlock_timestamp(mut self, unlock_timestamp: u64) -> Self {
		self.unlock_timestamp = unlock_timestamp;
		self
	}

	/// Sets the gift message.
	pub fn message<S: Into<String>>(mut self, message: S) -> Self {
		self.message = message.into();
		self
	}

	/// Builds the `GiftIntent` with the configured values.
	pub fn build(self) -> GiftIntent {
		GiftIntent {
			recipient: self.recipient,
			asset: self.asset,
			unlock_timestamp: self.unlock_timestamp,
			message: self.message,
		}
	}
}
