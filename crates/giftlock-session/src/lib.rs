//! Chain session module for the giftlock gifting system.
//!
//! This module handles all blockchain interaction for the gifting engine:
//! contract reads, transaction signing and submission, and receipt
//! confirmation. It abstracts over concrete session implementations so the
//! rest of the system routes every chain touch through one service.

use alloy_primitives::U256;
use async_trait::async_trait;
use giftlock_types::{
	Address, ConfigSchema, ImplementationRegistry, NetworkConfig, Transaction, TransactionHash,
	TransactionReceipt,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::{sleep, timeout, Duration};

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// How often the confirmation loop re-checks for a receipt.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when no session is configured for a chain.
	#[error("No session available for chain {0}")]
	UnknownChain(u64),
	/// Error that occurs when a submitted transaction is not confirmed in time.
	///
	/// The transaction may still land later; callers must not assume it
	/// failed.
	#[error("Transaction not confirmed within {0} seconds")]
	ConfirmationTimeout(u64),
	/// Error that occurs when a session implementation is misconfigured.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Trait defining the interface for chain session implementations.
///
/// A session is bound to a single chain and owns the signing key for it.
/// It provides read access to contract state and write access through
/// signed transaction submission.
#[async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionInterface: Send + Sync {
	/// Returns the configuration schema for this session implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Returns the sender address this session signs with.
	fn address(&self) -> Address;

	/// Gets the balance for an address.
	///
	/// For the native coin, pass None for the token parameter.
	/// For ERC-20 tokens, pass the contract address as Some(address).
	async fn get_balance(
		&self,
		address: &Address,
		token: Option<&Address>,
	) -> Result<U256, SessionError>;

	/// Executes a contract call (eth_call) without sending a transaction.
	async fn call(&self, to: &Address, data: Vec<u8>) -> Result<Vec<u8>, SessionError>;

	/// Gets the ERC-20 token allowance for an owner-spender pair.
	async fn get_allowance(
		&self,
		token: &Address,
		owner: &Address,
		spender: &Address,
	) -> Result<U256, SessionError>;

	/// Checks whether an operator may move all of an owner's NFTs.
	async fn is_approved_for_all(
		&self,
		token: &Address,
		owner: &Address,
		operator: &Address,
	) -> Result<bool, SessionError>;

	/// Signs and submits a transaction, returning its hash.
	///
	/// Returns as soon as the transaction is accepted by the node; use
	/// [`SessionService::wait_for_receipt`] for confirmation.
	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, SessionError>;

	/// Retrieves the receipt for a transaction if it has been mined.
	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, SessionError>;

	/// Gets the current gas price for the network in wei.
	async fn get_gas_price(&self) -> Result<U256, SessionError>;

	/// Gets the current block number.
	async fn get_block_number(&self) -> Result<u64, SessionError>;
}

/// Type alias for session factory functions.
///
/// This is the function signature that all session implementations must
/// provide. Each factory binds one implementation to one configured network.
pub type SessionFactory = fn(
	&toml::Value,
	u64,
	&NetworkConfig,
) -> Result<Box<dyn SessionInterface>, SessionError>;

/// Registry trait for session implementations.
///
/// This trait extends the base ImplementationRegistry to specify that
/// session implementations must provide a SessionFactory.
pub trait SessionRegistry: ImplementationRegistry<Factory = SessionFactory> {}

/// Get all registered session implementations.
///
/// Returns a vector of (name, factory) tuples for all available session
/// implementations.
pub fn get_all_implementations() -> Vec<(&'static str, SessionFactory)> {
	use implementations::evm::alloy;

	vec![(alloy::Registry::NAME, alloy::Registry::factory())]
}

/// Service that manages chain sessions across the configured networks.
///
/// The SessionService routes each operation to the session for the right
/// chain and layers confirmation waiting on top of raw receipt lookups.
pub struct SessionService {
	/// Map of chain IDs to their corresponding session implementations.
	implementations: HashMap<u64, Arc<dyn SessionInterface>>,
	/// Number of confirmations required before a receipt counts as final.
	min_confirmations: u64,
	/// Upper bound in seconds on any single confirmation wait.
	confirmation_timeout_seconds: u64,
}

impl SessionService {
	/// Creates a new SessionService with the specified implementations and
	/// confirmation settings.
	pub fn new(
		implementations: HashMap<u64, Arc<dyn SessionInterface>>,
		min_confirmations: u64,
		confirmation_timeout_seconds: u64,
	) -> Self {
		Self {
			implementations,
			min_confirmations,
			confirmation_timeout_seconds,
		}
	}

	/// Gets the session for a specific chain ID.
	fn session(&self, chain_id: u64) -> Result<&Arc<dyn SessionInterface>, SessionError> {
		self.implementations
			.get(&chain_id)
			.ok_or(SessionError::UnknownChain(chain_id))
	}

	/// Returns the sender address used on the given chain.
	pub fn sender(&self, chain_id: u64) -> Result<Address, SessionError> {
		Ok(self.session(chain_id)?.address())
	}

	/// Gets the balance for an address on a specific chain.
	pub async fn get_balance(
		&self,
		chain_id: u64,
		address: &Address,
		token: Option<&Address>,
	) -> Result<U256, SessionError> {
		self.session(chain_id)?.get_balance(address, token).await
	}

	/// Executes a contract call on a specific chain.
	pub async fn call(
		&self,
		chain_id: u64,
		to: &Address,
		data: Vec<u8>,
	) -> Result<Vec<u8>, SessionError> {
		self.session(chain_id)?.call(to, data).await
	}

	/// Gets the ERC-20 allowance for an owner-spender pair on a specific chain.
	pub async fn get_allowance(
		&self,
		chain_id: u64,
		token: &Address,
		owner: &Address,
		spender: &Address,
	) -> Result<U256, SessionError> {
		self.session(chain_id)?
			.get_allowance(token, owner, spender)
			.await
	}

	/// Checks operator approval for a whole NFT collection on a specific chain.
	pub async fn is_approved_for_all(
		&self,
		chain_id: u64,
		token: &Address,
		owner: &Address,
		operator: &Address,
	) -> Result<bool, SessionError> {
		self.session(chain_id)?
			.is_approved_for_all(token, owner, operator)
			.await
	}

	/// Submits a transaction to the chain named by its chain ID.
	pub async fn submit(&self, tx: Transaction) -> Result<TransactionHash, SessionError> {
		self.session(tx.chain_id)?.submit(tx).await
	}

	/// Retrieves the receipt for a transaction if it has been mined.
	pub async fn get_receipt(
		&self,
		chain_id: u64,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, SessionError> {
		self.session(chain_id)?.get_receipt(hash).await
	}

	/// Gets the current gas price for a specific chain in wei.
	pub async fn get_gas_price(&self, chain_id: u64) -> Result<U256, SessionError> {
		self.session(chain_id)?.get_gas_price().await
	}

	/// Gets the current block number for a specific chain.
	pub async fn get_block_number(&self, chain_id: u64) -> Result<u64, SessionError> {
		self.session(chain_id)?.get_block_number().await
	}

	/// Waits until a transaction is mined with the configured confirmations.
	///
	/// Polls for the receipt and then for enough blocks on top of it. The
	/// whole wait is bounded by the configured timeout; on expiry the
	/// transaction is reported as [`SessionError::ConfirmationTimeout`]
	/// rather than failed, since it may still land.
	pub async fn wait_for_receipt(
		&self,
		chain_id: u64,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, SessionError> {
		let session = self.session(chain_id)?;
		let wait = Duration::from_secs(self.confirmation_timeout_seconds);

		timeout(wait, async {
			loop {
				if let Some(receipt) = session.get_receipt(hash).await? {
					if self.min_confirmations <= 1 {
						return Ok(receipt);
					}
					let current = session.get_block_number().await?;
					if current >= receipt.block_number + self.min_confirmations - 1 {
						return Ok(receipt);
					}
				}
				sleep(RECEIPT_POLL_INTERVAL).await;
			}
		})
		.await
		.unwrap_or(Err(SessionError::ConfirmationTimeout(
			self.confirmation_timeout_seconds,
		)))
	}
}
