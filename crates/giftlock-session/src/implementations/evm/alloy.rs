//! Alloy-backed session implementation for the gifting system.
//!
//! This module provides the concrete implementation of the SessionInterface
//! trait, wiring contract reads and transaction submission through the Alloy
//! library against a single EVM network.

use crate::{SessionError, SessionInterface};
use alloy_network::EthereumWallet;
use alloy_primitives::U256;
use alloy_provider::{
	fillers::{ChainIdFiller, GasFiller, NonceFiller, SimpleNonceManager},
	DynProvider, Provider, ProviderBuilder,
};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{sol, SolCall};
use alloy_transport::layers::RetryBackoffLayer;
use async_trait::async_trait;
use giftlock_types::{
	as_alloy_address, with_0x_prefix, Address, ConfigSchema, Field, FieldType, NetworkConfig,
	Schema, SecretString, Transaction as GiftTransaction, TransactionHash, TransactionReceipt,
};
use std::time::Duration;

sol! {
	interface IERC20 {
		function balanceOf(address account) external view returns (uint256);
		function allowance(address owner, address spender) external view returns (uint256);
	}

	interface IERC721 {
		function isApprovedForAll(address owner, address operator) external view returns (bool);
	}
}

/// Alloy-based EVM session implementation.
///
/// Each instance is bound to one network: it holds a provider for that
/// network's RPC endpoint and a wallet whose key signs everything the
/// engine submits there.
pub struct AlloySession {
	/// Alloy provider for the bound network.
	provider: DynProvider,
	/// Address the wallet signs with.
	sender: Address,
	/// Chain this session is bound to.
	chain_id: u64,
}

impl AlloySession {
	/// Creates a new AlloySession for one configured network.
	///
	/// Configures an Alloy provider with retry, nonce, gas, and chain-id
	/// fillers so callers only supply calldata and value.
	pub fn new(
		chain_id: u64,
		network: &NetworkConfig,
		private_key: &SecretString,
	) -> Result<Self, SessionError> {
		let url = network.rpc_url.parse().map_err(|e| {
			SessionError::InvalidConfig(format!("Invalid RPC URL for chain {}: {}", chain_id, e))
		})?;

		let signer: PrivateKeySigner = private_key.with_exposed(|key| {
			key.parse()
				.map_err(|_| SessionError::InvalidConfig("Invalid private key format".to_string()))
		})?;
		let sender = Address(signer.address().0.to_vec());

		// Create signer with chain ID
		let chain_signer = signer.with_chain_id(Some(chain_id));
		let wallet = EthereumWallet::from(chain_signer);

		// Configure retry layer for handling network errors and rate limits
		let retry_layer = RetryBackoffLayer::new(
			5,    // max_retry: retry up to 5 times
			1000, // backoff: initial backoff in milliseconds
			10,   // cups: compute units per second
		);

		// Create RPC client with retry capabilities
		let client = RpcClient::builder().layer(retry_layer).http(url);

		// Create provider with simple nonce management and retry capabilities
		let provider = ProviderBuilder::new()
			.filler(NonceFiller::new(SimpleNonceManager::default()))
			.filler(GasFiller)
			.filler(ChainIdFiller::default())
			.wallet(wallet)
			.connect_client(client);

		provider
			.client()
			.set_poll_interval(Duration::from_secs(2));

		Ok(Self {
			provider: provider.erased(),
			sender,
			chain_id,
		})
	}

	/// Executes a read-only contract call and returns the raw result.
	async fn read(&self, to: &Address, data: Vec<u8>) -> Result<Vec<u8>, SessionError> {
		let request = TransactionRequest::default()
			.to(as_alloy_address(to))
			.input(data.into());

		let result = self
			.provider
			.call(request)
			.await
			.map_err(|e| SessionError::Network(format!("Contract call failed: {}", e)))?;

		Ok(result.to_vec())
	}
}

/// Configuration schema for the Alloy session implementation.
///
/// This schema defines the required configuration fields for the Alloy
/// session, currently just the signing key.
pub struct AlloySessionSchema;

impl AlloySessionSchema {
	/// Static validation method for use before instance creation
	pub fn validate_config(config: &toml::Value) -> Result<(), giftlock_types::ValidationError> {
		let instance = Self;
		instance.validate(config)
	}
}

impl ConfigSchema for AlloySessionSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), giftlock_types::ValidationError> {
		let schema = Schema::new(
			// Required fields
			vec![
				Field::new("private_key", FieldType::String).with_validator(|value| {
					let key = value
						.as_str()
						.ok_or_else(|| "private_key must be a string".to_string())?;
					let stripped = key.strip_prefix("0x").unwrap_or(key);
					if stripped.len() == 64 && stripped.bytes().all(|b| b.is_ascii_hexdigit()) {
						Ok(())
					} else {
						Err("private_key must be a 32-byte hex string".to_string())
					}
				}),
			],
			// Optional fields
			vec![],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl SessionInterface for AlloySession {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AlloySessionSchema)
	}

	fn address(&self) -> Address {
		self.sender.clone()
	}

	async fn get_balance(
		&self,
		address: &Address,
		token: Option<&Address>,
	) -> Result<U256, SessionError> {
		match token {
			None => self
				.provider
				.get_balance(as_alloy_address(address))
				.await
				.map_err(|e| SessionError::Network(format!("Failed to get balance: {}", e))),
			Some(token) => {
				let call = IERC20::balanceOfCall {
					account: as_alloy_address(address),
				};
				let result = self.read(token, call.abi_encode()).await?;
				IERC20::balanceOfCall::abi_decode_returns(&result).map_err(|e| {
					SessionError::Network(format!("Invalid balanceOf response: {}", e))
				})
			},
		}
	}

	async fn call(&self, to: &Address, data: Vec<u8>) -> Result<Vec<u8>, SessionError> {
		self.read(to, data).await
	}

	async fn get_allowance(
		&self,
		token: &Address,
		owner: &Address,
		spender: &Address,
	) -> Result<U256, SessionError> {
		let call = IERC20::allowanceCall {
			owner: as_alloy_address(owner),
			spender: as_alloy_address(spender),
		};
		let result = self.read(token, call.abi_encode()).await?;
		IERC20::allowanceCall::abi_decode_returns(&result)
			.map_err(|e| SessionError::Network(format!("Invalid allowance response: {}", e)))
	}

	async fn is_approved_for_all(
		&self,
		token: &Address,
		owner: &Address,
		operator: &Address,
	) -> Result<bool, SessionError> {
		let call = IERC721::isApprovedForAllCall {
			owner: as_alloy_address(owner),
			operator: as_alloy_address(operator),
		};
		let result = self.read(token, call.abi_encode()).await?;
		IERC721::isApprovedForAllCall::abi_decode_returns(&result).map_err(|e| {
			SessionError::Network(format!("Invalid isApprovedForAll response: {}", e))
		})
	}

	async fn submit(&self, tx: GiftTransaction) -> Result<TransactionHash, SessionError> {
		let request: TransactionRequest = tx.into();

		tracing::debug!(
			chain_id = self.chain_id,
			to = ?request.to,
			value = ?request.value,
			data_len = request.input.input().map(|d| d.len()).unwrap_or(0),
			"Sending transaction"
		);

		// Send transaction - the provider's wallet will handle signing
		let pending_tx = self.provider.send_transaction(request).await.map_err(|e| {
			tracing::error!(
				chain_id = self.chain_id,
				"Transaction submission failed: {}",
				e
			);
			SessionError::Network(format!("Failed to send transaction: {}", e))
		})?;

		let tx_hash = *pending_tx.tx_hash();
		tracing::info!(
			tx_hash = %with_0x_prefix(&hex::encode(tx_hash.0)),
			chain_id = self.chain_id,
			"Transaction submitted"
		);

		Ok(TransactionHash(tx_hash.0.to_vec()))
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, SessionError> {
		let tx_hash = alloy_primitives::FixedBytes::<32>::from_slice(&hash.0);

		match self.provider.get_transaction_receipt(tx_hash).await {
			Ok(Some(receipt)) => {
				// Convert alloy logs to our Log type
				let logs = receipt
					.inner
					.logs()
					.iter()
					.map(|log| giftlock_types::Log {
						address: Address(log.address().0.to_vec()),
						topics: log
							.topics()
							.iter()
							.map(|topic| giftlock_types::H256(topic.0))
							.collect(),
						data: log.inner.data.data.to_vec(),
					})
					.collect();

				Ok(Some(TransactionReceipt {
					hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
					block_number: receipt.block_number.unwrap_or(0),
					success: receipt.status(),
					logs,
				}))
			},
			Ok(None) => Ok(None),
			Err(e) => Err(SessionError::Network(format!(
				"Failed to get receipt on chain {}: {}",
				self.chain_id, e
			))),
		}
	}

	async fn get_gas_price(&self) -> Result<U256, SessionError> {
		let gas_price = self
			.provider
			.get_gas_price()
			.await
			.map_err(|e| SessionError::Network(format!("Failed to get gas price: {}", e)))?;

		Ok(U256::from(gas_price))
	}

	async fn get_block_number(&self) -> Result<u64, SessionError> {
		self.provider
			.get_block_number()
			.await
			.map_err(|e| SessionError::Network(format!("Failed to get block number: {}", e)))
	}
}

/// Factory function to create an Alloy session from configuration.
///
/// Reads the implementation config for the signing key and binds a new
/// session to the given chain and network.
pub fn create_alloy_session(
	config: &toml::Value,
	chain_id: u64,
	network: &NetworkConfig,
) -> Result<Box<dyn SessionInterface>, SessionError> {
	// Validate configuration first
	AlloySessionSchema::validate_config(config)
		.map_err(|e| SessionError::InvalidConfig(format!("Invalid configuration: {}", e)))?;

	let private_key = config
		.get("private_key")
		.and_then(|v| v.as_str())
		.map(SecretString::from)
		.ok_or_else(|| SessionError::InvalidConfig("private_key is required".to_string()))?;

	let session = AlloySession::new(chain_id, network, &private_key)?;
	Ok(Box::new(session))
}

/// Registry for the Alloy session implementation.
pub struct Registry;

impl giftlock_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "evm_alloy";
	type Factory = crate::SessionFactory;

	fn factory() -> Self::Factory {
		create_alloy_session
	}
}

impl crate::SessionRegistry for Registry {}
