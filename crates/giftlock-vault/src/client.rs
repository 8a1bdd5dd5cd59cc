//! Read and claim access to deployed gift vaults.

use crate::abi::{GiftCreated, GiftView, IGiftVault};
use crate::calls::{build_create_call, BuildError};
use alloy_primitives::{Address as AlloyAddress, U256};
use alloy_sol_types::{SolCall, SolEvent};
use giftlock_session::SessionService;
use giftlock_types::utils::conversion::as_alloy_address;
use giftlock_types::{
	Address, AssetKind, GiftIntent, GiftRecord, NetworksConfig, Transaction, TransactionReceipt,
};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
	/// Error that occurs while talking to the chain.
	#[error("Session error: {0}")]
	Session(String),
	/// Error that occurs when a vault response cannot be decoded.
	#[error("Failed to decode vault response: {0}")]
	Decode(String),
	/// Error that occurs when no vault is configured for a chain.
	#[error("No vault configured for chain {0}")]
	UnknownChain(u64),
	/// Error that occurs when a claim transaction reverts on chain.
	#[error("Claim reverted for gift {0}")]
	ClaimReverted(U256),
	/// Error that occurs while building a create call.
	#[error(transparent)]
	Build(#[from] BuildError),
}

/// Client for the gift vault contracts across the configured networks.
///
/// All reads go through `eth_call` against the vault deployed on the
/// requested chain; the only write here is claiming, since gift creation is
/// orchestrated by the engine with its own precondition and confirmation
/// handling.
pub struct VaultClient {
	session: Arc<SessionService>,
	networks: NetworksConfig,
}

impl VaultClient {
	/// Creates a new VaultClient over the given session service and networks.
	pub fn new(session: Arc<SessionService>, networks: NetworksConfig) -> Self {
		Self { session, networks }
	}

	/// Returns the vault contract address deployed on a chain.
	pub fn vault_address(&self, chain_id: u64) -> Result<&Address, VaultError> {
		self.networks
			.get(&chain_id)
			.map(|network| &network.vault_address)
			.ok_or(VaultError::UnknownChain(chain_id))
	}

	/// Builds the signed-ready create transaction for one gift intent.
	pub fn build_create_transaction(
		&self,
		intent: &GiftIntent,
		recipient: &Address,
		chain_id: u64,
	) -> Result<Transaction, VaultError> {
		let vault = self.vault_address(chain_id)?.clone();
		let plan = build_create_call(intent, recipient)?;
		Ok(plan.into_transaction(&vault, chain_id))
	}

	/// Fetches a stored gift by id.
	///
	/// Returns `None` when the vault has no gift under that id; the contract
	/// signals this with a zeroed sender rather than a revert.
	pub async fn get_gift(
		&self,
		chain_id: u64,
		gift_id: U256,
	) -> Result<Option<GiftRecord>, VaultError> {
		let vault = self.vault_address(chain_id)?.clone();
		let data = IGiftVault::getGiftCall { giftId: gift_id }.abi_encode();
		let returned = self
			.session
			.call(chain_id, &vault, data)
			.await
			.map_err(|e| VaultError::Session(e.to_string()))?;
		let view = IGiftVault::getGiftCall::abi_decode_returns(&returned)
			.map_err(|e| VaultError::Decode(e.to_string()))?;

		if view.sender == AlloyAddress::ZERO {
			return Ok(None);
		}
		decode_record(view).map(Some)
	}

	/// Lists the ids of all gifts created by a sender.
	pub async fn sent_gifts(
		&self,
		chain_id: u64,
		sender: &Address,
	) -> Result<Vec<U256>, VaultError> {
		let data = IGiftVault::getSentGiftsCall {
			sender: as_alloy_address(sender),
		}
		.abi_encode();
		self.list_call::<IGiftVault::getSentGiftsCall>(chain_id, data)
			.await
	}

	/// Lists the ids of all gifts addressed to a recipient.
	pub async fn received_gifts(
		&self,
		chain_id: u64,
		recipient: &Address,
	) -> Result<Vec<U256>, VaultError> {
		let data = IGiftVault::getReceivedGiftsCall {
			recipient: as_alloy_address(recipient),
		}
		.abi_encode();
		self.list_call::<IGiftVault::getReceivedGiftsCall>(chain_id, data)
			.await
	}

	/// Lists the ids of all gifts sent to an alias name.
	pub async fn gifts_by_alias(
		&self,
		chain_id: u64,
		alias: &str,
	) -> Result<Vec<U256>, VaultError> {
		let data = IGiftVault::getGiftsByAliasCall {
			aliasName: alias.to_string(),
		}
		.abi_encode();
		self.list_call::<IGiftVault::getGiftsByAliasCall>(chain_id, data)
			.await
	}

	/// Claims an unlocked gift and waits for the claim to confirm.
	pub async fn claim_gift(
		&self,
		chain_id: u64,
		gift_id: U256,
	) -> Result<TransactionReceipt, VaultError> {
		let vault = self.vault_address(chain_id)?.clone();
		let tx = Transaction {
			to: Some(vault),
			data: IGiftVault::claimGiftCall { giftId: gift_id }.abi_encode(),
			value: U256::ZERO,
			chain_id,
			nonce: None,
			gas_limit: None,
			gas_price: None,
			max_fee_per_gas: None,
			max_priority_fee_per_gas: None,
		};

		let hash = self
			.session
			.submit(tx)
			.await
			.map_err(|e| VaultError::Session(e.to_string()))?;
		tracing::info!(gift_id = %gift_id, tx_hash = %hash, "Claim submitted");

		let receipt = self
			.session
			.wait_for_receipt(chain_id, &hash)
			.await
			.map_err(|e| VaultError::Session(e.to_string()))?;
		if !receipt.success {
			return Err(VaultError::ClaimReverted(gift_id));
		}
		Ok(receipt)
	}

	/// Runs a call whose return is a `uint256[]` of gift ids.
	async fn list_call<C>(&self, chain_id: u64, data: Vec<u8>) -> Result<Vec<U256>, VaultError>
	where
		C: SolCall<Return = Vec<U256>>,
	{
		let vault = self.vault_address(chain_id)?.clone();
		let returned = self
			.session
			.call(chain_id, &vault, data)
			.await
			.map_err(|e| VaultError::Session(e.to_string()))?;
		C::abi_decode_returns(&returned).map_err(|e| VaultError::Decode(e.to_string()))
	}
}

/// Extracts the vault-assigned gift id from a create transaction's receipt.
///
/// Scans the logs for the `GiftCreated` event and reads the id from its first
/// indexed topic. Returns `None` when the receipt carries no such event,
/// which for a successful create means the vault is not the contract the
/// transaction hit.
pub fn extract_created_gift_id(receipt: &TransactionReceipt) -> Option<U256> {
	receipt.logs.iter().find_map(|log| {
		let signature = log.topics.first()?;
		if signature.0 != GiftCreated::SIGNATURE_HASH.0 {
			return None;
		}
		let id_topic = log.topics.get(1)?;
		Some(U256::from_be_bytes(id_topic.0))
	})
}

fn decode_record(view: GiftView) -> Result<GiftRecord, VaultError> {
	let asset_kind = AssetKind::from_u8(view.assetKind).ok_or_else(|| {
		VaultError::Decode(format!("unknown asset kind {}", view.assetKind))
	})?;
	let unlock_timestamp = u64::try_from(view.unlockTimestamp)
		.map_err(|_| VaultError::Decode("unlock timestamp out of range".to_string()))?;

	let token = if view.token == AlloyAddress::ZERO {
		None
	} else {
		Some(Address(view.token.0.to_vec()))
	};
	let token_id = matches!(asset_kind, AssetKind::NftSingle | AssetKind::NftMulti)
		.then_some(view.tokenId);

	Ok(GiftRecord {
		id: view.id,
		sender: Address(view.sender.0.to_vec()),
		recipient: Address(view.recipient.0.to_vec()),
		asset_kind,
		token,
		token_id,
		amount: view.amount,
		unlock_timestamp,
		message: view.message,
		claimed: view.claimed,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_sol_types::SolValue;
	use giftlock_session::{MockSessionInterface, SessionInterface};
	use giftlock_types::utils::conversion::parse_address;
	use giftlock_types::utils::tests::builders::{NetworkConfigBuilder, NetworksConfigBuilder};
	use giftlock_types::{Log, TransactionHash, H256};
	use std::collections::HashMap;

	const CHAIN_ID: u64 = 8453;
	const SENDER: &str = "0x1111111111111111111111111111111111111111";
	const RECIPIENT: &str = "0x2222222222222222222222222222222222222222";
	const TOKEN: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";

	fn addr(hex: &str) -> Address {
		parse_address(hex).unwrap()
	}

	fn client_with(session: MockSessionInterface) -> VaultClient {
		let mut implementations: HashMap<u64, Arc<dyn SessionInterface>> = HashMap::new();
		implementations.insert(CHAIN_ID, Arc::new(session));
		let service = Arc::new(SessionService::new(implementations, 1, 120));
		let networks = NetworksConfigBuilder::new()
			.add_network(CHAIN_ID, NetworkConfigBuilder::new().build())
			.build();
		VaultClient::new(service, networks)
	}

	fn stored_view() -> GiftView {
		GiftView {
			id: U256::from(7),
			sender: as_alloy_address(&addr(SENDER)),
			recipient: as_alloy_address(&addr(RECIPIENT)),
			assetKind: 1,
			token: as_alloy_address(&addr(TOKEN)),
			tokenId: U256::ZERO,
			amount: U256::from(1_500_000u64),
			unlockTimestamp: U256::from(1_800_000_000u64),
			message: "happy birthday".to_string(),
			claimed: false,
		}
	}

	#[tokio::test]
	async fn test_get_gift_decodes_record() {
		let mut session = MockSessionInterface::new();
		let returned = stored_view().abi_encode();
		session
			.expect_call()
			.returning(move |_, _| {
				let bytes = returned.clone();
				Box::pin(async move { Ok(bytes) })
			});

		let client = client_with(session);
		let record = client
			.get_gift(CHAIN_ID, U256::from(7))
			.await
			.unwrap()
			.unwrap();

		assert_eq!(record.id, U256::from(7));
		assert_eq!(record.sender, addr(SENDER));
		assert_eq!(record.asset_kind, AssetKind::Fungible);
		assert_eq!(record.token, Some(addr(TOKEN)));
		assert_eq!(record.token_id, None);
		assert_eq!(record.amount, U256::from(1_500_000u64));
		assert_eq!(record.unlock_timestamp, 1_800_000_000);
		assert_eq!(record.message, "happy birthday");
		assert!(!record.claimed);
	}

	#[tokio::test]
	async fn test_get_gift_zero_sender_is_none() {
		let mut session = MockSessionInterface::new();
		let returned = GiftView {
			sender: AlloyAddress::ZERO,
			..stored_view()
		}
		.abi_encode();
		session
			.expect_call()
			.returning(move |_, _| {
				let bytes = returned.clone();
				Box::pin(async move { Ok(bytes) })
			});

		let client = client_with(session);
		let record = client.get_gift(CHAIN_ID, U256::from(99)).await.unwrap();
		assert!(record.is_none());
	}

	#[tokio::test]
	async fn test_nft_gift_keeps_token_id() {
		let mut session = MockSessionInterface::new();
		let returned = GiftView {
			assetKind: 2,
			tokenId: U256::from(42),
			amount: U256::from(1u8),
			..stored_view()
		}
		.abi_encode();
		session
			.expect_call()
			.returning(move |_, _| {
				let bytes = returned.clone();
				Box::pin(async move { Ok(bytes) })
			});

		let client = client_with(session);
		let record = client
			.get_gift(CHAIN_ID, U256::from(7))
			.await
			.unwrap()
			.unwrap();
		assert_eq!(record.asset_kind, AssetKind::NftSingle);
		assert_eq!(record.token_id, Some(U256::from(42)));
	}

	#[tokio::test]
	async fn test_sent_gifts_decodes_id_list() {
		let mut session = MockSessionInterface::new();
		let ids = vec![U256::from(1), U256::from(5), U256::from(9)];
		let returned = ids.abi_encode();
		session
			.expect_call()
			.withf(|_, data| data.starts_with(&IGiftVault::getSentGiftsCall::SELECTOR))
			.returning(move |_, _| {
				let bytes = returned.clone();
				Box::pin(async move { Ok(bytes) })
			});

		let client = client_with(session);
		let listed = client.sent_gifts(CHAIN_ID, &addr(SENDER)).await.unwrap();
		assert_eq!(listed, ids);
	}

	#[tokio::test]
	async fn test_claim_revert_is_reported() {
		let mut session = MockSessionInterface::new();
		session
			.expect_submit()
			.returning(|_| Box::pin(async { Ok(TransactionHash(vec![0xab; 32])) }));
		session.expect_get_receipt().returning(|hash| {
			let hash = hash.clone();
			Box::pin(async move {
				Ok(Some(TransactionReceipt {
					hash,
					block_number: 100,
					success: false,
					logs: vec![],
				}))
			})
		});

		let client = client_with(session);
		let result = client.claim_gift(CHAIN_ID, U256::from(7)).await;
		assert!(matches!(
			result,
			Err(VaultError::ClaimReverted(id)) if id == U256::from(7)
		));
	}

	#[tokio::test]
	async fn test_unknown_chain_is_rejected() {
		let client = client_with(MockSessionInterface::new());
		let result = client.get_gift(10, U256::from(1)).await;
		assert!(matches!(result, Err(VaultError::UnknownChain(10))));
	}

	#[test]
	fn test_extract_created_gift_id_scans_logs() {
		let created = Log {
			address: addr(TOKEN),
			topics: vec![
				H256(GiftCreated::SIGNATURE_HASH.0),
				H256(U256::from(42).to_be_bytes::<32>()),
				H256([0x11; 32]),
				H256([0x22; 32]),
			],
			data: vec![],
		};
		let unrelated = Log {
			address: addr(TOKEN),
			topics: vec![H256([0xee; 32])],
			data: vec![],
		};
		let receipt = TransactionReceipt {
			hash: TransactionHash(vec![0xab; 32]),
			block_number: 100,
			success: true,
			logs: vec![unrelated, created],
		};

		assert_eq!(extract_created_gift_id(&receipt), Some(U256::from(42)));
	}

	#[test]
	fn test_extract_created_gift_id_without_event() {
		let receipt = TransactionReceipt {
			hash: TransactionHash(vec![0xab; 32]),
			block_number: 100,
			success: true,
			logs: vec![],
		};
		assert_eq!(extract_created_gift_id(&receipt), None);
	}
}
