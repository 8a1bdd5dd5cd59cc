//! Recipient identifier classification.
//!
//! User input for a gift recipient is either a raw hex address or a
//! human-readable alias ending in the configured suffix. Classification is
//! total: anything that matches neither shape is `Invalid` and is rejected
//! before any lookup runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recipient as the user typed it, classified into one of three shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientIdentifier {
	/// Canonical `0x` + 40 hex chars address.
	Address(String),
	/// Normalized alias name carrying the configured suffix.
	Alias(String),
	/// Anything else; resolution fails without a lookup.
	Invalid(String),
}

impl RecipientIdentifier {
	/// Classifies raw user input.
	///
	/// Input is trimmed and lowercased before matching, so classification
	/// is deterministic for equivalent spellings.
	pub fn classify(input: &str, alias_suffix: &str) -> Self {
		let normalized = input.trim().to_lowercase();
		if is_hex_address(&normalized) {
			RecipientIdentifier::Address(normalized)
		} else if is_alias(&normalized, alias_suffix) {
			RecipientIdentifier::Alias(normalized)
		} else {
			RecipientIdentifier::Invalid(input.trim().to_string())
		}
	}

	/// The textual form, for display and table export.
	pub fn as_input(&self) -> &str {
		match self {
			RecipientIdentifier::Address(s)
			| RecipientIdentifier::Alias(s)
			| RecipientIdentifier::Invalid(s) => s,
		}
	}

	/// The alias string passed to the vault contract; empty for raw
	/// addresses so the contract stores nothing for them.
	pub fn alias_arg(&self) -> &str {
		match self {
			RecipientIdentifier::Alias(name) => name,
			_ => "",
		}
	}
}

impl fmt::Display for RecipientIdentifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_input())
	}
}

fn is_hex_address(s: &str) -> bool {
	s.len() == 42 && s.starts_with("0x") && s[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_alias(s: &str, suffix: &str) -> bool {
	if suffix.is_empty() || !s.ends_with(suffix) {
		return false;
	}
	let name = &s[..s.len() - suffix.len()];
	!name.is_empty()
		&& name.split('.').all(|label| {
			!label.is_empty()
				&& label
					.bytes()
					.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
		})
}
