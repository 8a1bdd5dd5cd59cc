//! Bulk distribution entries and the derived batch summary.

use crate::{Address, AssetKind, GiftIntent, TransactionHash};
use alloy_primitives::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a single batch entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
	/// Parsed, not yet examined.
	Pending,
	/// Being validated (resolution + asset checks).
	Validating,
	/// Ready to send.
	Valid,
	/// Rejected during validation; skipped by the send phase.
	Invalid,
	/// Submission in progress.
	Sending,
	/// Confirmed on chain.
	Sent,
	/// Submission or confirmation failed.
	Failed,
}

impl EntryStatus {
	/// True when no further transition can occur.
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			EntryStatus::Invalid | EntryStatus::Sent | EntryStatus::Failed
		)
	}
}

impl fmt::Display for EntryStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			EntryStatus::Pending => "pending",
			EntryStatus::Validating => "validating",
			EntryStatus::Valid => "valid",
			EntryStatus::Invalid => "invalid",
			EntryStatus::Sending => "sending",
			EntryStatus::Sent => "sent",
			EntryStatus::Failed => "failed",
		};
		f.write_str(name)
	}
}

/// One row of a bulk batch, carrying its intent and progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkEntry {
	/// Stable id derived from the row position.
	pub id: String,
	/// 1-indexed file row (the header is row 1).
	pub row: usize,
	/// The gift this entry will create.
	pub intent: GiftIntent,
	/// Current lifecycle state.
	pub status: EntryStatus,
	/// Canonical recipient once resolution succeeded.
	pub resolved_recipient: Option<Address>,
	/// Hash of the creation transaction once submitted.
	pub tx_hash: Option<TransactionHash>,
	/// Failure cause for Invalid and Failed entries.
	pub error: Option<String>,
}

impl BulkEntry {
	/// Creates a fresh entry in `Pending` state for a parsed row.
	pub fn new(row: usize, intent: GiftIntent) -> Self {
		BulkEntry {
			id: format!("row-{}", row),
			row,
			intent,
			status: EntryStatus::Pending,
			resolved_recipient: None,
			tx_hash: None,
			error: None,
		}
	}
}

/// Aggregate view over a batch, derived from the entries on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
	pub total: usize,
	pub pending: usize,
	pub validating: usize,
	pub valid: usize,
	pub invalid: usize,
	pub sending: usize,
	pub sent: usize,
	pub failed: usize,
	/// Sum of entry amounts in the batch asset's units, excluding entries
	/// that will never send.
	pub total_amount: Decimal,
	/// Rough native-coin fee for the remaining and completed sends.
	pub estimated_fee: Decimal,
}

impl BatchSummary {
	/// Folds the current entry set into a summary.
	///
	/// This is the only constructor; the summary is never stored and so can
	/// never drift from the entries it describes.
	pub fn from_entries(entries: &[BulkEntry], gas_price_wei: U256) -> Self {
		let mut summary = BatchSummary {
			total: entries.len(),
			pending: 0,
			validating: 0,
			valid: 0,
			invalid: 0,
			sending: 0,
			sent: 0,
			failed: 0,
			total_amount: Decimal::ZERO,
			estimated_fee: Decimal::ZERO,
		};

		let mut fee_units: u64 = 0;
		for entry in entries {
			match entry.status {
				EntryStatus::Pending => summary.pending += 1,
				EntryStatus::Validating => summary.validating += 1,
				EntryStatus::Valid => summary.valid += 1,
				EntryStatus::Invalid => summary.invalid += 1,
				EntryStatus::Sending => summary.sending += 1,
				EntryStatus::Sent => summary.sent += 1,
				EntryStatus::Failed => summary.failed += 1,
			}

			if matches!(entry.status, EntryStatus::Invalid | EntryStatus::Failed) {
				continue;
			}
			if let Ok(amount) = Decimal::from_str(entry.intent.asset.amount_str()) {
				summary.total_amount += amount;
			}
			fee_units = fee_units.saturating_add(create_gas_units(entry.intent.asset.kind()));
		}

		let fee_wei = gas_price_wei.saturating_mul(U256::from(fee_units));
		summary.estimated_fee = wei_to_native(fee_wei);
		summary
	}
}

/// Gas heuristic per creation shape, used only for the summary estimate.
fn create_gas_units(kind: AssetKind) -> u64 {
	match kind {
		AssetKind::Native => 90_000,
		AssetKind::Fungible => 140_000,
		AssetKind::NftSingle => 160_000,
		AssetKind::NftMulti => 170_000,
	}
}

fn wei_to_native(wei: U256) -> Decimal {
	let capped = u128::try_from(wei).unwrap_or(u128::MAX);
	let capped = capped.min(i128::MAX as u128) as i128;
	Decimal::from_i128_with_scale(capped, 18).normalize()
}
