//! Construction of vault `create*` calls from gift intents.
//!
//! Each asset shape maps to exactly one vault entrypoint. The builder
//! validates the asset first and converts decimal amounts to base units at
//! the last moment, so a `CallPlan` always encodes a gift the vault will
//! accept for well-formed inputs.

use crate::abi::IGiftVault;
use alloy_primitives::U256;
use alloy_sol_types::SolCall;
use giftlock_types::utils::conversion::{as_alloy_address, parse_units, ConversionError};
use giftlock_types::{Address, AssetSelection, GiftIntent, Transaction, NATIVE_DECIMALS};
use thiserror::Error;

/// Errors produced while building a create call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
	#[error("Invalid asset: {0}")]
	InvalidAsset(String),
	#[error(transparent)]
	Conversion(#[from] ConversionError),
}

/// An encoded vault call together with the native value it must carry.
///
/// Only native gifts attach value; every other shape moves assets through a
/// prior approval and a vault-side `transferFrom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPlan {
	/// Vault function the calldata targets, for logs and errors.
	pub function: &'static str,
	/// ABI-encoded calldata.
	pub calldata: Vec<u8>,
	/// Native value to attach to the transaction.
	pub value: U256,
}

impl CallPlan {
	/// Wraps the plan into a transaction addressed at the vault.
	pub fn into_transaction(self, vault: &Address, chain_id: u64) -> Transaction {
		Transaction {
			to: Some(vault.clone()),
			data: self.calldata,
			value: self.value,
			chain_id,
			nonce: None,
			gas_limit: None,
			gas_price: None,
			max_fee_per_gas: None,
			max_priority_fee_per_gas: None,
		}
	}
}

/// Builds the vault call for one gift intent.
///
/// `recipient` is the resolved on-chain address; the alias string the user
/// typed (empty for raw addresses) travels alongside it so the vault can
/// index gifts by alias. Argument order is shared across all four
/// entrypoints: recipient, unlock timestamp, asset-specific fields, alias,
/// message.
pub fn build_create_call(
	intent: &GiftIntent,
	recipient: &Address,
) -> Result<CallPlan, BuildError> {
	let issues = intent.asset.validate();
	if !issues.is_empty() {
		let joined = issues
			.iter()
			.map(|issue| issue.to_string())
			.collect::<Vec<_>>()
			.join("; ");
		return Err(BuildError::InvalidAsset(joined));
	}

	let to = as_alloy_address(recipient);
	let unlock = U256::from(intent.unlock_timestamp);
	let alias_name = intent.recipient.alias_arg().to_string();
	let message = intent.message.clone();

	let plan = match &intent.asset {
		AssetSelection::Native { amount } => CallPlan {
			function: "createNativeGift",
			calldata: IGiftVault::createNativeGiftCall {
				recipient: to,
				unlockTimestamp: unlock,
				aliasName: alias_name,
				message,
			}
			.abi_encode(),
			value: parse_units(amount, NATIVE_DECIMALS)?,
		},
		AssetSelection::Fungible {
			token,
			decimals,
			amount,
		} => CallPlan {
			function: "createTokenGift",
			calldata: IGiftVault::createTokenGiftCall {
				recipient: to,
				unlockTimestamp: unlock,
				token: as_alloy_address(token),
				amount: parse_units(amount, *decimals)?,
				aliasName: alias_name,
				message,
			}
			.abi_encode(),
			value: U256::ZERO,
		},
		AssetSelection::NftSingle { token, token_id } => CallPlan {
			function: "createNftGift",
			calldata: IGiftVault::createNftGiftCall {
				recipient: to,
				unlockTimestamp: unlock,
				token: as_alloy_address(token),
				tokenId: *token_id,
				aliasName: alias_name,
				message,
			}
			.abi_encode(),
			value: U256::ZERO,
		},
		AssetSelection::NftMulti {
			token,
			token_id,
			amount,
		} => CallPlan {
			function: "createMultiNftGift",
			calldata: IGiftVault::createMultiNftGiftCall {
				recipient: to,
				unlockTimestamp: unlock,
				token: as_alloy_address(token),
				tokenId: *token_id,
				amount: parse_units(amount, 0)?,
				aliasName: alias_name,
				message,
			}
			.abi_encode(),
			value: U256::ZERO,
		},
	};

	Ok(plan)
}
