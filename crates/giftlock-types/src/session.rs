//! Session-level types shared between the engine and the chain session.
//!
//! Transaction hashes, logs, and receipts as returned by the session after
//! submission, independent of the underlying RPC library.

use crate::{with_0x_prefix, Address};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Transaction hash returned after submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionHash(pub Vec<u8>);

impl Serialize for TransactionHash {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&with_0x_prefix(&hex::encode(&self.0)))
	}
}

impl<'de> Deserialize<'de> for TransactionHash {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		let bytes = hex::decode(s.trim_start_matches("0x"))
			.map_err(|e| serde::de::Error::custom(format!("Invalid hex hash: {}", e)))?;
		Ok(TransactionHash(bytes))
	}
}

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}

/// 32-byte topic word as it appears in event logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct H256(pub [u8; 32]);

/// Event log emitted during transaction execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
	/// Contract that emitted the log.
	pub address: Address,
	/// Indexed topics; topic 0 is the event signature hash.
	pub topics: Vec<H256>,
	/// Non-indexed data payload.
	pub data: Vec<u8>,
}

/// Receipt for a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// Hash of the confirmed transaction.
	pub hash: TransactionHash,
	/// Block the transaction was included in.
	pub block_number: u64,
	/// Whether execution succeeded.
	pub success: bool,
	/// Logs emitted during execution.
	pub logs: Vec<Log>,
}
