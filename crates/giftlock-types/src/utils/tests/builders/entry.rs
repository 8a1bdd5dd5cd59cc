//! Builder for BulkEntry
//!
//! Provides a fluent API for constructing BulkEntry instances with
//! sensible defaults for testing batch flows.

use super::intent::GiftIntentBuilder;
use crate::asset::AssetSelection;
use crate::batch::{BulkEntry, EntryStatus};
use crate::recipient::RecipientIdentifier;

/// Builder for creating `BulkEntry` instances with a fluent API.
///
/// Defaults to a pending native-asset entry on file row 2 (the first
/// data row after a header).
#[derive(Debug, Clone)]
pub struct BulkEntryBuilder {
	row: usize,
	intent: GiftIntentBuilder,
	status: EntryStatus,
}

impl Default for BulkEntryBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl BulkEntryBuilder {
	/// Creates a new `BulkEntryBuilder` with default values.
	pub fn new() -> Self {
		Self {
			row: 2,
			intent: GiftIntentBuilder::new(),
			status: EntryStatus::Pending,
		}
	}

	/// Sets the 1-indexed file row the entry came from.
	pub fn row(mut self, row: usize) -> Self {
		self.row = row;
		self
	}

	/// Sets the entry status.
	pub fn status(mut self, status: EntryStatus) -> Self {
		self.status = status;
		self
	}

	/// Sets the native asset amount.
	pub fn amount<S: Into<String>>(mut self, amount: S) -> Self {
		self.intent = self.intent.native_amount(amount);
		self
	}

	/// Sets the asset selection.
	pub fn asset(mut self, asset: AssetSelection) -> Self {
		self.intent = self.intent.asset(asset);
		self
	}

	/// Sets the recipient identifier.
	pub fn recipient(mut self, recipient: RecipientIdentifier) -> Self {
		self.intent = self.intent.recipient(recipient);
		self
	}

	/// Sets the unlock timestamp.
	pub fn unlock_timestamp(mut self, unlock_timestamp: u64) -> Self {
		self.intent = self.intent.unlock_timestamp(unlock_timestamp);
		self
	}

	/// Builds the `BulkEntry` with the configured values.
	pub fn build(self) -> BulkEntry {
		let mut entry = BulkEntry::new(self.row, self.intent.build());
		entry.status = self.status;
		entry
	}
}
