//! Chain-level types for the giftlock engine.
//!
//! This module defines addresses and transactions as they travel between the
//! gift construction layers and the chain session that signs and submits them.

use crate::with_0x_prefix;
use alloy_primitives::{Address as AlloyAddress, Bytes, U256};
use alloy_rpc_types::TransactionRequest;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Canonical on-chain address.
///
/// Stored as raw bytes; all constructors in this crate enforce the 20-byte
/// EVM length, and serde rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(pub Vec<u8>);

/// Custom serialization for Address - serializes as hex string
impl Serialize for Address {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&with_0x_prefix(&hex::encode(&self.0)))
	}
}

/// Custom deserialization for Address - accepts hex strings
impl<'de> Deserialize<'de> for Address {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		let hex_str = s.trim_start_matches("0x");
		let bytes = hex::decode(hex_str)
			.map_err(|e| serde::de::Error::custom(format!("Invalid hex address: {}", e)))?;

		if bytes.len() != 20 {
			return Err(serde::de::Error::custom(format!(
				"Invalid address length: expected 20 bytes, got {}",
				bytes.len()
			)));
		}

		Ok(Address(bytes))
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}

/// Transaction to be signed and submitted by the chain session.
///
/// Gas fields are optional; the session's provider fills anything left unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
	/// Recipient contract or account.
	pub to: Option<Address>,
	/// ABI-encoded calldata.
	pub data: Vec<u8>,
	/// Native value attached to the call.
	pub value: U256,
	/// Chain ID for replay protection.
	pub chain_id: u64,
	/// Transaction nonce (optional, can be filled by provider).
	pub nonce: Option<u64>,
	/// Gas limit for transaction execution.
	pub gas_limit: Option<u64>,
	/// Legacy gas price (for non-EIP-1559 transactions).
	pub gas_price: Option<u128>,
	/// Maximum fee per gas (EIP-1559).
	pub max_fee_per_gas: Option<u128>,
	/// Maximum priority fee per gas (EIP-1559).
	pub max_priority_fee_per_gas: Option<u128>,
}

/// Conversion from our Transaction type to Alloy's TransactionRequest.
impl From<Transaction> for TransactionRequest {
	fn from(tx: Transaction) -> Self {
		let to = tx.to.map(|to| {
			let mut addr_bytes = [0u8; 20];
			addr_bytes.copy_from_slice(&to.0[..20]);
			alloy_primitives::TxKind::Call(AlloyAddress::from(addr_bytes))
		});

		TransactionRequest {
			chain_id: Some(tx.chain_id),
			value: Some(tx.value),
			to,
			nonce: tx.nonce,
			gas: tx.gas_limit,
			gas_price: tx.gas_price,
			max_fee_per_gas: tx.max_fee_per_gas,
			max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
			input: alloy_rpc_types::TransactionInput {
				input: Some(Bytes::from(tx.data)),
				data: None,
			},
			..Default::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::utils::conversion::parse_address;
	use crate::utils::tests::builders::TransactionBuilder;

	fn test_address(hex_str: &str) -> Address {
		parse_address(hex_str).expect("Invalid test address")
	}

	#[test]
	fn test_address_display() {
		let address = test_address("0xa0b86a33e6776fb78b3e1e6b2d0d2e8f0c1d2a3b");
		assert_eq!(
			format!("{}", address),
			"0xa0b86a33e6776fb78b3e1e6b2d0d2e8f0c1d2a3b"
		);
	}

	#[test]
	fn test_address_serialization_round_trip() {
		let original = test_address("0x123456789abcdef0112233445566778899aabbcc");
		let json = serde_json::to_string(&original).unwrap();
		assert_eq!(json, "\"0x123456789abcdef0112233445566778899aabbcc\"");
		let deserialized: Address = serde_json::from_str(&json).unwrap();
		assert_eq!(original, deserialized);
	}

	#[test]
	fn test_address_deserialization_accepts_missing_prefix() {
		let json = "\"a0b86a33e6776fb78b3e1e6b2d0d2e8f0c1d2a3b\"";
		let address: Address = serde_json::from_str(json).unwrap();
		assert_eq!(
			address,
			test_address("0xa0b86a33e6776fb78b3e1e6b2d0d2e8f0c1d2a3b")
		);
	}

	#[test]
	fn test_address_deserialization_rejects_bad_length() {
		let too_short = "\"0xa0b86a33e6776fb78b3e1e6b2d0d2e8f0c1d2a\"";
		let result: Result<Address, _> = serde_json::from_str(too_short);
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("Invalid address length"));
	}

	#[test]
	fn test_address_deserialization_rejects_bad_hex() {
		let invalid = "\"0xzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz\"";
		let result: Result<Address, _> = serde_json::from_str(invalid);
		assert!(result.unwrap_err().to_string().contains("Invalid hex"));
	}

	#[test]
	fn test_transaction_to_alloy_request() {
		let tx = TransactionBuilder::new()
			.to(test_address("0xa0b86a33e6776fb78b3e1e6b2d0d2e8f0c1d2a3b"))
			.data(vec![0xff, 0xee])
			.value(U256::from(750))
			.chain_id(8453)
			.nonce(15)
			.gas_limit(30000)
			.build();

		let req: TransactionRequest = tx.into();

		assert!(req.to.is_some());
		assert_eq!(req.value, Some(U256::from(750)));
		assert_eq!(req.chain_id, Some(8453));
		assert_eq!(req.nonce, Some(15));
		assert_eq!(req.gas, Some(30000));
		assert_eq!(req.input.input.unwrap().to_vec(), vec![0xff, 0xee]);
	}

	#[test]
	fn test_transaction_to_alloy_request_without_recipient() {
		let tx = TransactionBuilder::new().chain_id(1).build();
		let req: TransactionRequest = tx.into();

		assert!(req.to.is_none());
		assert_eq!(req.value, Some(U256::ZERO));
		assert!(req.nonce.is_none());
		assert!(req.gas.is_none());
	}
}
