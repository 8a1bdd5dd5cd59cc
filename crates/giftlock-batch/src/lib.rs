//! Batch ingestion module for the giftlock gifting system.
//!
//! This module turns a user-supplied delimited table into typed bulk
//! entries, isolating per-row problems so one bad row never discards the
//! batch, and renders entries back out in the same format.

/// Batch file parsing and per-row validation.
pub mod parser;
/// Template export and entry re-export.
pub mod template;

pub use parser::{
	parse_unlock_date, AssetTemplate, BatchError, BatchParseOutcome, BatchParser,
	DEFAULT_UNLOCK_OFFSET_SECS, MAX_BATCH_ENTRIES,
};
pub use template::{entries_to_table, template_table};
