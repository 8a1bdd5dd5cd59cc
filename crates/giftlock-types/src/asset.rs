//! Asset selection model for gift construction.
//!
//! A gift carries exactly one of four asset shapes. The variants form a
//! closed union so that call building and precondition checking can match
//! exhaustively; adding a shape is a compile-time event everywhere.

use crate::utils::conversion::{parse_units, ConversionError};
use crate::Address;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimals of the chain's native coin.
pub const NATIVE_DECIMALS: u8 = 18;

/// Discriminant of an asset shape, also used in the vault's on-chain encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
	Native,
	Fungible,
	NftSingle,
	NftMulti,
}

impl AssetKind {
	/// On-chain discriminant as stored by the vault.
	pub fn as_u8(&self) -> u8 {
		match self {
			AssetKind::Native => 0,
			AssetKind::Fungible => 1,
			AssetKind::NftSingle => 2,
			AssetKind::NftMulti => 3,
		}
	}

	/// Decodes the on-chain discriminant.
	pub fn from_u8(value: u8) -> Option<Self> {
		match value {
			0 => Some(AssetKind::Native),
			1 => Some(AssetKind::Fungible),
			2 => Some(AssetKind::NftSingle),
			3 => Some(AssetKind::NftMulti),
			_ => None,
		}
	}
}

impl fmt::Display for AssetKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			AssetKind::Native => "native",
			AssetKind::Fungible => "fungible",
			AssetKind::NftSingle => "nft_single",
			AssetKind::NftMulti => "nft_multi",
		};
		f.write_str(name)
	}
}

/// What a gift contains.
///
/// Amounts are kept as the user's decimal strings until call building, so
/// precision errors surface as validation issues instead of silent rounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetSelection {
	/// Chain coin; amount in whole-coin decimal notation.
	Native { amount: String },
	/// ERC-20 token with its declared decimals.
	Fungible {
		token: Address,
		decimals: u8,
		amount: String,
	},
	/// A single non-fungible unit.
	NftSingle { token: Address, token_id: U256 },
	/// Several units of one semi-fungible id; amount is a whole count.
	NftMulti {
		token: Address,
		token_id: U256,
		amount: String,
	},
}

/// A single problem found while validating an asset selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetIssue {
	/// Which field the problem concerns.
	pub field: &'static str,
	/// Human-readable description.
	pub message: String,
}

impl fmt::Display for AssetIssue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.field, self.message)
	}
}

impl AssetSelection {
	/// The shape discriminant.
	pub fn kind(&self) -> AssetKind {
		match self {
			AssetSelection::Native { .. } => AssetKind::Native,
			AssetSelection::Fungible { .. } => AssetKind::Fungible,
			AssetSelection::NftSingle { .. } => AssetKind::NftSingle,
			AssetSelection::NftMulti { .. } => AssetKind::NftMulti,
		}
	}

	/// The user-facing amount string; a single NFT counts as "1".
	pub fn amount_str(&self) -> &str {
		match self {
			AssetSelection::Native { amount }
			| AssetSelection::Fungible { amount, .. }
			| AssetSelection::NftMulti { amount, .. } => amount,
			AssetSelection::NftSingle { .. } => "1",
		}
	}

	/// The token contract, where the shape has one.
	pub fn token(&self) -> Option<&Address> {
		match self {
			AssetSelection::Native { .. } => None,
			AssetSelection::Fungible { token, .. }
			| AssetSelection::NftSingle { token, .. }
			| AssetSelection::NftMulti { token, .. } => Some(token),
		}
	}

	/// Converts the amount into integer base units.
	///
	/// Native amounts use 18 decimals, fungible amounts the token's declared
	/// decimals, NFT unit counts zero decimals. A single NFT is one unit.
	pub fn base_amount(&self) -> Result<U256, ConversionError> {
		match self {
			AssetSelection::Native { amount } => parse_units(amount, NATIVE_DECIMALS),
			AssetSelection::Fungible {
				decimals, amount, ..
			} => parse_units(amount, *decimals),
			AssetSelection::NftSingle { .. } => Ok(U256::from(1u8)),
			AssetSelection::NftMulti { amount, .. } => parse_units(amount, 0),
		}
	}

	/// Checks the selection and returns every problem found.
	///
	/// An empty result means the selection is buildable as-is.
	pub fn validate(&self) -> Vec<AssetIssue> {
		let mut issues = Vec::new();

		if let Some(token) = self.token() {
			if token.0.len() != 20 {
				issues.push(AssetIssue {
					field: "token",
					message: format!("token address must be 20 bytes, got {}", token.0.len()),
				});
			}
		}

		match self.base_amount() {
			Ok(units) if units.is_zero() => issues.push(AssetIssue {
				field: "amount",
				message: format!("amount must be positive, got '{}'", self.amount_str()),
			}),
			Ok(_) => {},
			Err(e) => issues.push(AssetIssue {
				field: "amount",
				message: e.to_string(),
			}),
		}

		issues
	}
}
