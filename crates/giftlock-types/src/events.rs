//! Engine events published on the event bus during batch processing.

use crate::{BatchSummary, EntryStatus, TransactionHash};
use serde::{Deserialize, Serialize};

/// Top-level event envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GiftlockEvent {
	/// Something happened to a single entry.
	Entry(EntryEvent),
	/// Something happened to the batch as a whole.
	Batch(BatchEvent),
}

/// Per-entry lifecycle events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntryEvent {
	/// Entry moved to a new status.
	StatusChanged {
		entry_id: String,
		row: usize,
		status: EntryStatus,
		error: Option<String>,
	},
	/// Entry confirmed on chain.
	Sent {
		entry_id: String,
		row: usize,
		tx_hash: TransactionHash,
	},
}

/// Batch-level lifecycle events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BatchEvent {
	/// Entries installed into the engine.
	Loaded { total: usize },
	/// Recomputed summary after an entry transition.
	SummaryUpdated(BatchSummary),
	/// Cancellation observed; no further entries will start.
	Cancelled,
	/// Send phase finished.
	Completed(BatchSummary),
}
