//! Utility functions for common type conversions and transformations.
//!
//! This module provides helper functions for converting between different
//! data formats and string formatting commonly used throughout the gifting system.

pub mod conversion;
pub mod formatting;
pub mod helpers;
pub mod tests;

pub use conversion::{
	as_alloy_address, format_units, parse_address, parse_units, ConversionError,
};
pub use formatting::{truncate_id, with_0x_prefix, without_0x_prefix};
pub use helpers::current_timestamp;
