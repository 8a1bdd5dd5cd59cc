//! Builder for Transaction
//!
//! Provides a fluent API for constructing Transaction instances with
//! proper validation and sensible defaults.

use crate::chain::{Address, Transaction};
use alloy_primitives::U256;

/// Builder for creating `Transaction` instances with a fluent API.
///
/// # Examples
///
/// ```
/// use giftlock_types::utils::tests::builders::TransactionBuilder;
/// use giftlock_types::Address;
/// use alloy_primitives::U256;
///
/// let tx = TransactionBuilder::new()
///     .to(Address(vec![0x12; 20]))
///     .value(U256::from(1000))
///     .chain_id(8453)
///     .gas_limit(21000)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
	to: Option<Address>,
	data: Vec<u8>,
	value: U256,
	chain_id: Option<u64>,
	nonce: Option<u64>,
	gas_limit: Option<u64>,
	gas_price: Option<u128>,
	max_fee_per_gas: Option<u128>,
	max_priority_fee_per_gas: Option<u128>,
}

impl Default for TransactionBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TransactionBuilder {
	/// Creates a new `TransactionBuilder` with default values.
	pub fn new() -> Self {
		Self {
			to: None,
			data: Vec::new(),
			value: U256::ZERO,
			chain_id: None,
			nonce: None,
			gas_limit: None,
			gas_price: None,
			max_fee_per_gas: None,
			max_priority_fee_per_gas: None,
		}
	}

	/// Sets the recipient address.
	pub fn to(mut self, to: Address) -> Self {
		self.to = Some(to);
		self
	}

	/// Sets the transaction data/calldata.
	pub fn data(mut self, data: Vec<u8>) -> Self {
		self.data = data;
		self
	}

	/// Sets the value to transfer in native currency.
	pub fn value(mut self, value: U256) -> Self {
		self.value = value;
		self
	}

	/// Sets the chain ID for replay protection.
	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = Some(chain_id);
		self
	}

	/// Sets the transaction nonce.
	pub fn nonce(mut self, nonce: u64) -> Self {
		self.nonce = Some(nonce);
		self
	}

	/// Sets the gas limit for transaction execution.
	pub fn gas_limit(mut self, gas_limit: u64) -> Self {
		self.gas_limit = Some(gas_limit);
		self
	}

	/// Sets the legacy gas price.
	pub fn gas_price(mut self, gas_price: u128) -> Self {
		self.gas_price = Some(gas_price);
		self
	}

	/// Sets the maximum fee per gas (EIP-1559).
	pub fn max_fee_per_gas(mut self, max_fee: u128) -> Self {
		self.max_fee_per_gas = Some(max_fee);
		self
	}

	/// Sets the maximum priority fee per gas (EIP-1559).
	pub fn max_priority_fee_per_gas(mut self, max_priority_fee: u128) -> Self {
		self.max_priority_fee_per_gas = Some(max_priority_fee);
		self
	}

	/// Validates the builder state and returns an error if required fields are missing.
	///
	/// Gas fields stay optional since the signing session fills them from
	/// the network when absent.
	pub fn validate(&self) -> Result<(), TransactionBuilderError> {
		if self.chain_id.is_none() {
			return Err(TransactionBuilderError::MissingField("chain_id"));
		}
		if let (Some(max_fee), Some(priority_fee)) =
			(self.max_fee_per_gas, self.max_priority_fee_per_gas)
		{
			if priority_fee > max_fee {
				return Err(TransactionBuilderError::InvalidGasPricing(
					"Priority fee cannot exceed max fee".to_string(),
				));
			}
		}
		Ok(())
	}

	/// Builds the `Transaction` with the configured values.
	///
	/// # Panics
	///
	/// Panics if required fields are not set or if gas pricing is invalid.
	/// Use `try_build()` for error handling instead of panicking.
	pub fn build(self) -> Transaction {
		self.try_build()
			.expect("Missing required fields or invalid configuration")
	}

	/// Tries to build the `Transaction` with the configured values.
	pub fn try_build(self) -> Result<Transaction, TransactionBuilderError> {
		self.validate()?;

		Ok(Transaction {
			to: self.to,
			data: self.data,
			value: self.value,
			chain_id: self.chain_id.unwrap(),
			nonce: self.nonce,
			gas_limit: self.gas_limit,
			gas_price: self.gas_price,
			max_fee_per_gas: self.max_fee_per_gas,
			max_priority_fee_per_gas: self.max_priority_fee_per_gas,
		})
	}
}

/// Errors that can occur when building a Transaction.
#[derive(Debug, thiserror::Error)]
pub enum TransactionBuilderError {
	#[error("Missing required field: {0}")]
	MissingField(&'static str),
	#[error("Invalid gas pricing: {0}")]
	InvalidGasPricing(String),
}
