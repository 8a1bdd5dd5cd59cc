//! String formatting utilities.
//!
//! Provides functions for formatting strings for display, including
//! hex string prefix management and truncation for readability.

/// Utility function to truncate an identifier for display purposes.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	if id.len() <= 8 {
		id.to_string()
	} else {
		format!("{}..", &id[..8])
	}
}

/// Adds "0x" prefix to a hex string if it doesn't already have one.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.to_lowercase().starts_with("0x") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Removes "0x" or "0X" prefix from a hex string if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("row-5"), "row-5");
		assert_eq!(truncate_id("0xabcdef1234567890"), "0xabcdef..");
	}

	#[test]
	fn test_with_0x_prefix() {
		assert_eq!(with_0x_prefix("abc123"), "0xabc123");
		assert_eq!(with_0x_prefix("0xabc123"), "0xabc123");
		assert_eq!(with_0x_prefix("0Xabc123"), "0Xabc123");
	}

	#[test]
	fn test_without_0x_prefix() {
		assert_eq!(without_0x_prefix("0xabc123"), "abc123");
		assert_eq!(without_0x_prefix("0Xabc123"), "abc123");
		assert_eq!(without_0x_prefix("abc123"), "abc123");
	}
}
