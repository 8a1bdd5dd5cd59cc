//! Batch engine that orchestrates the gift creation lifecycle.
//!
//! This module contains the main BatchEngine struct which drives loaded
//! entries through validation and sending, publishing progress events and a
//! recomputed summary after every entry transition.

pub mod event_bus;

use crate::state::{transition_entry, StateError};
use alloy_primitives::U256;
use event_bus::EventBus;
use giftlock_approvals::ApprovalManager;
use giftlock_batch::{BatchError, BatchParseOutcome};
use giftlock_resolver::ResolverService;
use giftlock_session::SessionService;
use giftlock_types::utils::current_timestamp;
use giftlock_types::{
	Address, BatchEvent, BatchSummary, BulkEntry, EntryEvent, EntryStatus, GiftIntent,
	GiftlockEvent, TransactionHash,
};
use giftlock_vault::{extract_created_gift_id, VaultClient};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{RwLock, Semaphore};

/// Errors that can occur during engine operations.
///
/// Only batch-level problems surface here; anything that concerns a single
/// entry is recorded on that entry and never aborts its siblings.
#[derive(Debug, Error)]
pub enum EngineError {
	/// Error that occurs when the batch file is structurally unusable.
	#[error("Invalid batch file: {0}")]
	InvalidFormat(String),
	/// Error that occurs when the batch exceeds the entry cap.
	#[error("Batch has {count} rows, exceeding the limit of {limit}")]
	BatchLimitExceeded { count: usize, limit: usize },
	/// Error that occurs when the chain session cannot serve the batch at all.
	#[error("Session error: {0}")]
	Session(String),
	/// Error that occurs when entry bookkeeping breaks.
	#[error("State error: {0}")]
	State(String),
}

impl From<StateError> for EngineError {
	fn from(e: StateError) -> Self {
		EngineError::State(e.to_string())
	}
}

/// What a load accepted, for display alongside the first summary.
#[derive(Debug, Clone)]
pub struct BatchLoadReport {
	/// Number of entries installed into the engine.
	pub accepted: usize,
	/// Row-level errors from parsing, already row-prefixed.
	pub errors: Vec<String>,
	/// Row-level warnings from parsing, already row-prefixed.
	pub warnings: Vec<String>,
}

/// Cancellation handle for a running send phase.
///
/// Cancelling never aborts the entry in flight; its submission is allowed
/// to finish so no broadcast transaction is left untracked. Only entries
/// that have not started are affected.
#[derive(Clone, Default)]
pub struct BatchHandle {
	cancelled: Arc<AtomicBool>,
}

impl BatchHandle {
	pub fn new() -> Self {
		Self::default()
	}

	/// Requests that no further entries begin sending.
	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::SeqCst);
	}

	/// True once cancellation has been requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::SeqCst)
	}
}

/// Main batch engine that orchestrates the gift creation lifecycle.
pub struct BatchEngine {
	/// Resolver for recipient identifiers.
	resolver: Arc<ResolverService>,
	/// Approval manager for transfer preconditions.
	approvals: Arc<ApprovalManager>,
	/// Session service for submission and confirmation.
	session: Arc<SessionService>,
	/// Vault client for call construction.
	vault: Arc<VaultClient>,
	/// Chain every gift in the batch is created on.
	chain_id: u64,
	/// Upper bound on concurrent entry validations.
	validation_concurrency: usize,
	/// The loaded batch.
	entries: Arc<RwLock<Vec<BulkEntry>>>,
	/// Event bus for progress reporting.
	event_bus: EventBus,
	/// Gas price snapshot used for summary fee estimates.
	gas_price: RwLock<U256>,
}

impl BatchEngine {
	/// Creates a new engine over the given services.
	pub fn new(
		resolver: Arc<ResolverService>,
		approvals: Arc<ApprovalManager>,
		session: Arc<SessionService>,
		vault: Arc<VaultClient>,
		chain_id: u64,
		validation_concurrency: usize,
		event_bus: EventBus,
	) -> Self {
		Self {
			resolver,
			approvals,
			session,
			vault,
			chain_id,
			validation_concurrency: validation_concurrency.max(1),
			entries: Arc::new(RwLock::new(Vec::new())),
			event_bus,
			gas_price: RwLock::new(U256::ZERO),
		}
	}

	/// Creates a new subscriber for engine events.
	pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<GiftlockEvent> {
		self.event_bus.subscribe()
	}

	/// Installs a parse outcome as the current batch.
	///
	/// Structural problems reject the whole load; row-level errors and
	/// warnings are passed through for display and do not block the
	/// surviving entries.
	pub async fn load(&self, outcome: BatchParseOutcome) -> Result<BatchLoadReport, EngineError> {
		if let Some(batch_error) = outcome.batch_error {
			return Err(match batch_error {
				BatchError::LimitExceeded { count, limit } => {
					EngineError::BatchLimitExceeded { count, limit }
				},
				other => EngineError::InvalidFormat(other.to_string()),
			});
		}

		self.refresh_gas_price().await;
		let total = outcome.entries.len();
		{
			let mut guard = self.entries.write().await;
			*guard = outcome.entries;
		}
		self.event_bus
			.publish(GiftlockEvent::Batch(BatchEvent::Loaded { total }))
			.ok();
		let summary = self.summary().await;
		self.event_bus
			.publish(GiftlockEvent::Batch(BatchEvent::SummaryUpdated(summary)))
			.ok();

		tracing::info!(
			entries = total,
			errors = outcome.errors.len(),
			warnings = outcome.warnings.len(),
			"Batch loaded"
		);
		Ok(BatchLoadReport {
			accepted: total,
			errors: outcome.errors,
			warnings: outcome.warnings,
		})
	}

	/// Validates every pending entry.
	///
	/// Entries are checked under a bounded concurrency window since
	/// validation only reads. Each entry records its first failing reason;
	/// later checks for that entry never run.
	pub async fn validate_all(&self) -> Result<BatchSummary, EngineError> {
		let total = self.entries.read().await.len();
		let gas_price = *self.gas_price.read().await;
		let semaphore = Arc::new(Semaphore::new(self.validation_concurrency));
		let mut handles = Vec::with_capacity(total);

		for index in 0..total {
			let semaphore = semaphore.clone();
			let entries = self.entries.clone();
			let resolver = self.resolver.clone();
			let event_bus = self.event_bus.clone();
			handles.push(tokio::spawn(async move {
				let Ok(_permit) = semaphore.acquire_owned().await else {
					return Ok(());
				};
				validate_entry(&entries, &resolver, &event_bus, gas_price, index).await
			}));
		}
		for handle in handles {
			handle
				.await
				.map_err(|e| EngineError::State(format!("validation task failed: {}", e)))??;
		}

		Ok(self.summary().await)
	}

	/// Sends every valid entry, strictly in input order.
	///
	/// Entries are processed one at a time: the next entry's precondition
	/// check does not begin until the previous entry reached `Sent` or
	/// `Failed`. A failure is recorded on its entry and the batch goes on.
	pub async fn send_all(&self, handle: &BatchHandle) -> Result<BatchSummary, EngineError> {
		self.refresh_gas_price().await;
		let gas_price = *self.gas_price.read().await;
		let sender = self
			.session
			.sender(self.chain_id)
			.map_err(|e| EngineError::Session(e.to_string()))?;
		let spender = self
			.vault
			.vault_address(self.chain_id)
			.map_err(|e| EngineError::Session(e.to_string()))?
			.clone();

		let total = self.entries.read().await.len();
		let mut cancelled = false;
		for index in 0..total {
			if handle.is_cancelled() {
				cancelled = true;
				self.event_bus
					.publish(GiftlockEvent::Batch(BatchEvent::Cancelled))
					.ok();
				tracing::info!("Batch send cancelled; remaining entries untouched");
				break;
			}

			let snapshot = {
				let guard = self.entries.read().await;
				guard.get(index).and_then(|entry| {
					(entry.status == EntryStatus::Valid).then(|| {
						(
							entry.intent.clone(),
							entry.resolved_recipient.clone(),
							entry.id.clone(),
							entry.row,
						)
					})
				})
			};
			let Some((intent, resolved, entry_id, row)) = snapshot else {
				continue;
			};

			set_entry_status(
				&self.entries,
				&self.event_bus,
				gas_price,
				index,
				EntryStatus::Sending,
				None,
				None,
			)
			.await?;

			match self.send_entry(&intent, resolved, &sender, &spender, index).await {
				Ok(tx_hash) => {
					set_entry_status(
						&self.entries,
						&self.event_bus,
						gas_price,
						index,
						EntryStatus::Sent,
						None,
						None,
					)
					.await?;
					self.event_bus
						.publish(GiftlockEvent::Entry(EntryEvent::Sent {
							entry_id,
							row,
							tx_hash,
						}))
						.ok();
				},
				Err(reason) => {
					tracing::warn!(entry_id = %entry_id, error = %reason, "Entry failed");
					set_entry_status(
						&self.entries,
						&self.event_bus,
						gas_price,
						index,
						EntryStatus::Failed,
						Some(reason),
						None,
					)
					.await?;
				},
			}
		}

		let summary = self.summary().await;
		if !cancelled {
			self.event_bus
				.publish(GiftlockEvent::Batch(BatchEvent::Completed(summary.clone())))
				.ok();
		}
		Ok(summary)
	}

	/// Drives one entry through precondition, build, submit, and confirm.
	///
	/// The returned error string is recorded on the entry; each step's typed
	/// error keeps its message so failure causes stay distinguishable.
	async fn send_entry(
		&self,
		intent: &GiftIntent,
		resolved: Option<Address>,
		sender: &Address,
		spender: &Address,
		index: usize,
	) -> Result<TransactionHash, String> {
		let recipient = resolved.ok_or_else(|| "entry has no resolved recipient".to_string())?;
		// Batches may sit between validation and send, so the unlock check
		// runs again here.
		if intent.unlock_timestamp <= current_timestamp() {
			return Err("unlock timestamp is no longer in the future".to_string());
		}

		self.approvals
			.ensure_transferable(&intent.asset, sender, spender, self.chain_id)
			.await
			.map_err(|e| e.to_string())?;

		let tx = self
			.vault
			.build_create_transaction(intent, &recipient, self.chain_id)
			.map_err(|e| e.to_string())?;

		let tx_hash = self
			.session
			.submit(tx)
			.await
			.map_err(|e| format!("Submission failed: {}", e))?;
		{
			let mut guard = self.entries.write().await;
			if let Some(entry) = guard.get_mut(index) {
				entry.tx_hash = Some(tx_hash.clone());
			}
		}
		tracing::debug!(tx_hash = %tx_hash, "Creation transaction submitted");

		let receipt = self
			.session
			.wait_for_receipt(self.chain_id, &tx_hash)
			.await
			.map_err(|e| e.to_string())?;
		if !receipt.success {
			return Err("creation transaction reverted".to_string());
		}

		match extract_created_gift_id(&receipt) {
			Some(gift_id) => {
				tracing::info!(gift_id = %gift_id, tx_hash = %tx_hash, "Gift created")
			},
			None => tracing::warn!(tx_hash = %tx_hash, "Receipt carries no GiftCreated event"),
		}
		Ok(tx_hash)
	}

	/// Snapshot of the current entries.
	pub async fn entries(&self) -> Vec<BulkEntry> {
		self.entries.read().await.clone()
	}

	/// Summary folded from the current entries.
	pub async fn summary(&self) -> BatchSummary {
		let gas_price = *self.gas_price.read().await;
		let guard = self.entries.read().await;
		BatchSummary::from_entries(&guard, gas_price)
	}

	async fn refresh_gas_price(&self) {
		match self.session.get_gas_price(self.chain_id).await {
			Ok(price) => *self.gas_price.write().await = price,
			Err(e) => tracing::warn!("Failed to refresh gas price: {}", e),
		}
	}
}

/// Validates one entry: resolution, asset checks, unlock-in-future.
async fn validate_entry(
	entries: &RwLock<Vec<BulkEntry>>,
	resolver: &ResolverService,
	event_bus: &EventBus,
	gas_price: U256,
	index: usize,
) -> Result<(), EngineError> {
	let intent = {
		let guard = entries.read().await;
		match guard.get(index) {
			Some(entry) if entry.status == EntryStatus::Pending => entry.intent.clone(),
			_ => return Ok(()),
		}
	};

	set_entry_status(
		entries,
		event_bus,
		gas_price,
		index,
		EntryStatus::Validating,
		None,
		None,
	)
	.await?;

	let verdict = match resolver.resolve(intent.recipient.as_input()).await {
		Err(e) => Err(e.to_string()),
		Ok(resolution) => {
			let issues = intent.asset.validate();
			if !issues.is_empty() {
				Err(issues
					.iter()
					.map(|issue| issue.to_string())
					.collect::<Vec<_>>()
					.join("; "))
			} else if intent.unlock_timestamp <= current_timestamp() {
				Err("unlock timestamp is not in the future".to_string())
			} else {
				Ok(resolution.address)
			}
		},
	};

	match verdict {
		Ok(address) => {
			set_entry_status(
				entries,
				event_bus,
				gas_price,
				index,
				EntryStatus::Valid,
				None,
				Some(address),
			)
			.await
		},
		Err(reason) => {
			set_entry_status(
				entries,
				event_bus,
				gas_price,
				index,
				EntryStatus::Invalid,
				Some(reason),
				None,
			)
			.await
		},
	}
}

/// Applies one transition and publishes the entry event plus the recomputed
/// summary. The summary is folded under the same lock as the transition so
/// observers never see the two disagree.
async fn set_entry_status(
	entries: &RwLock<Vec<BulkEntry>>,
	event_bus: &EventBus,
	gas_price: U256,
	index: usize,
	to: EntryStatus,
	error: Option<String>,
	resolved: Option<Address>,
) -> Result<(), EngineError> {
	let (entry_id, row, summary) = {
		let mut guard = entries.write().await;
		let entry = match guard.get_mut(index) {
			Some(entry) => entry,
			None => return Ok(()),
		};
		transition_entry(entry, to)?;
		entry.error = error.clone();
		if let Some(address) = resolved {
			entry.resolved_recipient = Some(address);
		}
		let entry_id = entry.id.clone();
		let row = entry.row;
		(entry_id, row, BatchSummary::from_entries(&guard, gas_price))
	};

	event_bus
		.publish(GiftlockEvent::Entry(EntryEvent::StatusChanged {
			entry_id,
			row,
			status: to,
			error,
		}))
		.ok();
	event_bus
		.publish(GiftlockEvent::Batch(BatchEvent::SummaryUpdated(summary)))
		.ok();
	Ok(())
}
