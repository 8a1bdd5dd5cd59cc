//! Builder patterns for gifting types
//!
//! This module provides fluent builder APIs for constructing various types
//! with sensible defaults and validation.

pub mod entry;
pub mod intent;
pub mod networks;
pub mod transaction;

// Re-export builders for convenience
pub use entry::BulkEntryBuilder;
pub use intent::GiftIntentBuilder;
pub use networks::{
	NetworkConfigBuilder, NetworkConfigBuilderError, NetworksConfigBuilder, TokenConfigBuilder,
	TokenConfigBuilderError,
};
pub use transaction::{TransactionBuilder, TransactionBuilderError};
