//! Transfer precondition module for the giftlock gifting system.
//!
//! Before the vault can pull a token or NFT out of the sender's wallet, the
//! sender must have granted it transfer rights. This module checks the
//! current grants and submits the missing approval when needed: an exact
//! ERC-20 allowance for fungibles, a collection-wide operator approval for
//! NFTs, and nothing at all for the native coin. Checks are idempotent; a
//! sufficient existing grant is left untouched.

use alloy_primitives::U256;
use alloy_sol_types::{sol, SolCall};
use giftlock_session::{SessionError, SessionService};
use giftlock_types::{
	as_alloy_address, parse_units, Address, AssetSelection, Transaction, TransactionHash,
};
use std::sync::Arc;
use thiserror::Error;

sol! {
	interface IERC20 {
		function approve(address spender, uint256 amount) external returns (bool);
	}

	interface IERC721 {
		function setApprovalForAll(address operator, bool approved) external;
	}
}

/// Errors that can occur while establishing transfer preconditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
	/// The current allowance or operator approval could not be read.
	#[error("Failed to read approval state for token {token}: {reason}")]
	ApprovalRead { token: String, reason: String },
	/// The approval transaction was rejected or reverted.
	#[error("Approval failed for token {token}: {reason}")]
	ApprovalFailed { token: String, reason: String },
	/// The approval transaction was submitted but not confirmed in time.
	#[error("Approval for token {token} not confirmed in time")]
	ApprovalTimeout { token: String },
	/// The asset's amount could not be converted to base units.
	#[error("Invalid amount for token {token}: {reason}")]
	InvalidAmount { token: String, reason: String },
}

/// Outcome of a precondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
	/// The existing grant already covers the transfer.
	AlreadySatisfied,
	/// A new approval was submitted and confirmed.
	ApprovalSubmitted { tx_hash: TransactionHash },
}

/// Establishes transfer preconditions for gift assets.
///
/// Holds a session service so approval reads and writes land on whichever
/// chain the gift is being created on.
pub struct ApprovalManager {
	session: Arc<SessionService>,
}

impl ApprovalManager {
	/// Creates a new ApprovalManager over the given session service.
	pub fn new(session: Arc<SessionService>) -> Self {
		Self { session }
	}

	/// Ensures the spender can pull `asset` out of `owner`'s wallet.
	///
	/// Safe to call repeatedly: if the existing grant suffices, nothing is
	/// submitted and `AlreadySatisfied` comes back.
	pub async fn ensure_transferable(
		&self,
		asset: &AssetSelection,
		owner: &Address,
		spender: &Address,
		chain_id: u64,
	) -> Result<Precondition, PreconditionError> {
		match asset {
			AssetSelection::Native { .. } => Ok(Precondition::AlreadySatisfied),
			AssetSelection::Fungible {
				token,
				decimals,
				amount,
			} => {
				let required = parse_units(amount, *decimals).map_err(|e| {
					PreconditionError::InvalidAmount {
						token: token.to_string(),
						reason: e.to_string(),
					}
				})?;
				self.ensure_allowance(token, owner, spender, required, chain_id)
					.await
			},
			AssetSelection::NftSingle { token, .. } | AssetSelection::NftMulti { token, .. } => {
				self.ensure_operator(token, owner, spender, chain_id).await
			},
		}
	}

	/// Ensures an ERC-20 allowance of at least `required` base units.
	async fn ensure_allowance(
		&self,
		token: &Address,
		owner: &Address,
		spender: &Address,
		required: U256,
		chain_id: u64,
	) -> Result<Precondition, PreconditionError> {
		let current = self
			.session
			.get_allowance(chain_id, token, owner, spender)
			.await
			.map_err(|e| PreconditionError::ApprovalRead {
				token: token.to_string(),
				reason: e.to_string(),
			})?;

		if current >= required {
			tracing::debug!(token = %token, "Existing allowance covers the transfer");
			return Ok(Precondition::AlreadySatisfied);
		}

		// Approve the exact amount needed, never an unlimited allowance.
		let call = IERC20::approveCall {
			spender: as_alloy_address(spender),
			amount: required,
		};
		tracing::info!(
			token = %token,
			current = %current,
			required = %required,
			"Submitting ERC-20 approval"
		);
		self.submit_approval(token, call.abi_encode(), chain_id)
			.await
	}

	/// Ensures the spender is an approved operator for the NFT collection.
	async fn ensure_operator(
		&self,
		token: &Address,
		owner: &Address,
		operator: &Address,
		chain_id: u64,
	) -> Result<Precondition, PreconditionError> {
		let approved = self
			.session
			.is_approved_for_all(chain_id, token, owner, operator)
			.await
			.map_err(|e| PreconditionError::ApprovalRead {
				token: token.to_string(),
				reason: e.to_string(),
			})?;

		if approved {
			tracing::debug!(token = %token, "Operator already approved for collection");
			return Ok(Precondition::AlreadySatisfied);
		}

		let call = IERC721::setApprovalForAllCall {
			operator: as_alloy_address(operator),
			approved: true,
		};
		tracing::info!(token = %token, "Submitting collection operator approval");
		self.submit_approval(token, call.abi_encode(), chain_id)
			.await
	}

	/// Submits an approval transaction and waits for it to confirm.
	async fn submit_approval(
		&self,
		token: &Address,
		data: Vec<u8>,
		chain_id: u64,
	) -> Result<Precondition, PreconditionError> {
		let tx = Transaction {
			to: Some(token.clone()),
			data,
			value: U256::ZERO,
			chain_id,
			nonce: None,
			gas_limit: None,
			gas_price: None,
			max_fee_per_gas: None,
			max_priority_fee_per_gas: None,
		};

		let tx_hash =
			self.session
				.submit(tx)
				.await
				.map_err(|e| PreconditionError::ApprovalFailed {
					token: token.to_string(),
					reason: e.to_string(),
				})?;

		let receipt = self
			.session
			.wait_for_receipt(chain_id, &tx_hash)
			.await
			.map_err(|e| match e {
				SessionError::ConfirmationTimeout(_) => PreconditionError::ApprovalTimeout {
					token: token.to_string(),
				},
				other => PreconditionError::ApprovalFailed {
					token: token.to_string(),
					reason: other.to_string(),
				},
			})?;

		if !receipt.success {
			return Err(PreconditionError::ApprovalFailed {
				token: token.to_string(),
				reason: "approval transaction reverted".to_string(),
			});
		}

		Ok(Precondition::ApprovalSubmitted { tx_hash })
	}
}
