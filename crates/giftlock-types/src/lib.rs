//! Common types module for the giftlock gifting system.
//!
//! This module defines the core data types and structures used throughout
//! the gifting system. It provides a centralized location for shared types
//! to ensure consistency across all gifting components.

/// Asset selection types describing what a gift holds.
pub mod asset;
/// Batch entry and summary types for bulk distribution.
pub mod batch;
/// Chain-level types for addresses and transactions.
pub mod chain;
/// Event types for inter-service communication.
pub mod events;
/// Gift intent, record, and status types.
pub mod gift;
/// Network and token configuration types.
pub mod networks;
/// Recipient identifier classification.
pub mod recipient;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Secure string type for handling sensitive data.
pub mod secret;
/// Session-level types for receipts and logs.
pub mod session;
/// Utility functions for common type conversions.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use asset::{AssetIssue, AssetKind, AssetSelection, NATIVE_DECIMALS};
pub use batch::{BatchSummary, BulkEntry, EntryStatus};
pub use chain::{Address, Transaction};
pub use events::{BatchEvent, EntryEvent, GiftlockEvent};
pub use gift::{derive_status, GiftIntent, GiftRecord, GiftStatus};
pub use networks::{deserialize_networks, NetworkConfig, NetworksConfig, TokenConfig};
pub use recipient::RecipientIdentifier;
pub use registry::ImplementationRegistry;
pub use secret::SecretString;
pub use session::{Log, TransactionHash, TransactionReceipt, H256};
pub use utils::{
	as_alloy_address, current_timestamp, format_units, parse_address, parse_units, truncate_id,
	with_0x_prefix, without_0x_prefix, ConversionError,
};
pub use validation::{ConfigSchema, Field, FieldType, Schema, ValidationError};
