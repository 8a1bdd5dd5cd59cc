//! Gift intents and on-chain gift records.
//!
//! `GiftIntent` is what the engine builds calls from; `GiftRecord` is what
//! the read path decodes from the vault. Status derivation lives here and
//! nowhere else.

use crate::{Address, AssetKind, AssetSelection, RecipientIdentifier};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully specified wish to create one gift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftIntent {
	/// Recipient as the user supplied it.
	pub recipient: RecipientIdentifier,
	/// What the gift contains.
	pub asset: AssetSelection,
	/// Unix seconds after which the recipient may claim.
	pub unlock_timestamp: u64,
	/// Free-form message stored verbatim with the gift.
	pub message: String,
}

/// User-facing lifecycle state of a stored gift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftStatus {
	/// Unlock time not reached yet.
	Pending,
	/// Unlocked and waiting for the recipient.
	Claimable,
	/// Already claimed.
	Claimed,
}

impl fmt::Display for GiftStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			GiftStatus::Pending => "pending",
			GiftStatus::Claimable => "claimable",
			GiftStatus::Claimed => "claimed",
		};
		f.write_str(name)
	}
}

/// Derives the status of a gift.
///
/// The claimed flag dominates unconditionally; otherwise a gift is claimable
/// from its unlock timestamp onward. Every display path goes through this
/// function so the three states can never disagree between views.
pub fn derive_status(unlock_timestamp: u64, claimed: bool, now: u64) -> GiftStatus {
	if claimed {
		GiftStatus::Claimed
	} else if now >= unlock_timestamp {
		GiftStatus::Claimable
	} else {
		GiftStatus::Pending
	}
}

/// A gift as stored by the vault contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftRecord {
	/// Vault-assigned gift id.
	pub id: U256,
	/// Who created the gift.
	pub sender: Address,
	/// Resolved recipient address.
	pub recipient: Address,
	/// Which asset shape the gift holds.
	pub asset_kind: AssetKind,
	/// Token contract for non-native shapes.
	pub token: Option<Address>,
	/// Token id for NFT shapes.
	pub token_id: Option<U256>,
	/// Amount in base units (unit count for NFTs).
	pub amount: U256,
	/// Unix seconds after which the gift unlocks.
	pub unlock_timestamp: u64,
	/// Message stored with the gift.
	pub message: String,
	/// Whether the recipient has claimed.
	pub claimed: bool,
}

impl GiftRecord {
	/// Status of this gift at the given time.
	pub fn status(&self, now: u64) -> GiftStatus {
		derive_status(self.unlock_timestamp, self.claimed, now)
	}
}
