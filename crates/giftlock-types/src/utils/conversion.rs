//! Conversions between user-facing decimal strings and on-chain base units.

use crate::Address;
use alloy_primitives::{Address as AlloyAddress, U256};
use thiserror::Error;

/// Errors produced by address and amount conversions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
	#[error("Invalid address: {0}")]
	InvalidAddress(String),
	#[error("Invalid amount: {0}")]
	InvalidAmount(String),
	#[error("Amount '{amount}' has more than {decimals} fractional digits")]
	ExcessPrecision { amount: String, decimals: u8 },
	#[error("Amount '{0}' does not fit in 256 bits")]
	Overflow(String),
}

/// Parses a hex address, with or without the `0x` prefix.
pub fn parse_address(input: &str) -> Result<Address, ConversionError> {
	let trimmed = input.trim();
	let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
	if stripped.len() != 40 {
		return Err(ConversionError::InvalidAddress(format!(
			"expected 40 hex characters, got {}",
			stripped.len()
		)));
	}
	let bytes =
		hex::decode(stripped).map_err(|e| ConversionError::InvalidAddress(e.to_string()))?;
	Ok(Address(bytes))
}

/// Converts a validated 20-byte [`Address`] into the Alloy representation.
pub fn as_alloy_address(address: &Address) -> AlloyAddress {
	AlloyAddress::from_slice(&address.0)
}

/// Converts a decimal amount string into integer base units.
///
/// Rounding is toward zero and lossless: trailing zeros past `decimals` are
/// fine, but any non-zero digit there is an error rather than a silent
/// truncation. Signs, exponents, and multiple dots are rejected.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, ConversionError> {
	let trimmed = amount.trim();
	if trimmed.is_empty() {
		return Err(ConversionError::InvalidAmount("empty amount".to_string()));
	}

	let (int_part, frac_part) = match trimmed.split_once('.') {
		Some((i, f)) => (i, f),
		None => (trimmed, ""),
	};
	if int_part.is_empty() && frac_part.is_empty() {
		return Err(ConversionError::InvalidAmount(format!(
			"'{}' is not a number",
			trimmed
		)));
	}
	let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
	if !all_digits(int_part) || !all_digits(frac_part) {
		return Err(ConversionError::InvalidAmount(format!(
			"'{}' is not an unsigned decimal",
			trimmed
		)));
	}

	let significant = frac_part.trim_end_matches('0');
	if significant.len() > decimals as usize {
		return Err(ConversionError::ExcessPrecision {
			amount: trimmed.to_string(),
			decimals,
		});
	}

	let keep = frac_part.len().min(decimals as usize);
	let mut digits = String::with_capacity(int_part.len() + decimals as usize);
	digits.push_str(int_part);
	digits.push_str(&frac_part[..keep]);
	for _ in keep..decimals as usize {
		digits.push('0');
	}
	if digits.is_empty() {
		return Ok(U256::ZERO);
	}

	U256::from_str_radix(&digits, 10).map_err(|_| ConversionError::Overflow(trimmed.to_string()))
}

/// Formats base units back into a decimal string without trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
	let raw = value.to_string();
	if decimals == 0 {
		return raw;
	}
	let decimals = decimals as usize;
	let padded = if raw.len() <= decimals {
		format!("{}{}", "0".repeat(decimals - raw.len() + 1), raw)
	} else {
		raw
	};
	let split = padded.len() - decimals;
	let frac = padded[split..].trim_end_matches('0');
	if frac.is_empty() {
		padded[..split].to_string()
	} else {
		format!("{}.{}", &padded[..split], frac)
	}
}
