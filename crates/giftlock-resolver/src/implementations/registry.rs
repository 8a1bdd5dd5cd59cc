//! On-chain alias registry lookup.
//!
//! Aliases live in an ENS-style registry on the canonical chain. A lookup
//! hashes the full alias with namehash and asks the registry's resolver for
//! the address record. The zero address means "no entry".

use crate::{AliasLookupInterface, LookupError};
use alloy_primitives::{keccak256, Address as AlloyAddress, FixedBytes};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use giftlock_session::SessionService;
use giftlock_types::Address;
use std::sync::Arc;

sol! {
	interface IAddrResolver {
		function addr(bytes32 node) external view returns (address);
	}
}

/// Computes the ENS namehash of a dotted name.
///
/// Labels are hashed right to left: `namehash("alice.base.eth")` folds
/// "eth", then "base", then "alice" into the accumulating node.
pub fn namehash(name: &str) -> [u8; 32] {
	let mut node = [0u8; 32];
	if name.is_empty() {
		return node;
	}
	for label in name.rsplit('.') {
		let label_hash = keccak256(label.as_bytes());
		let mut buf = [0u8; 64];
		buf[..32].copy_from_slice(&node);
		buf[32..].copy_from_slice(label_hash.as_slice());
		node = keccak256(buf).0;
	}
	node
}

/// Alias lookup backed by the registry contract on the canonical chain.
///
/// Every lookup goes to the same chain no matter where the gift itself
/// will be created.
pub struct RegistryLookup {
	session: Arc<SessionService>,
	canonical_chain_id: u64,
	registry_address: Address,
}

impl RegistryLookup {
	/// Creates a new RegistryLookup against the given registry contract.
	pub fn new(
		session: Arc<SessionService>,
		canonical_chain_id: u64,
		registry_address: Address,
	) -> Self {
		Self {
			session,
			canonical_chain_id,
			registry_address,
		}
	}
}

#[async_trait]
impl AliasLookupInterface for RegistryLookup {
	async fn lookup(&self, alias: &str) -> Result<Option<Address>, LookupError> {
		let call = IAddrResolver::addrCall {
			node: FixedBytes::<32>::from(namehash(alias)),
		};

		let result = self
			.session
			.call(
				self.canonical_chain_id,
				&self.registry_address,
				call.abi_encode(),
			)
			.await
			.map_err(|e| LookupError::Unreachable(e.to_string()))?;

		let resolved = IAddrResolver::addrCall::abi_decode_returns(&result)
			.map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

		if resolved == AlloyAddress::ZERO {
			Ok(None)
		} else {
			Ok(Some(Address(resolved.0.to_vec())))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use giftlock_session::{MockSessionInterface, SessionInterface};
	use giftlock_types::parse_address;
	use std::collections::HashMap;

	fn registry_address() -> Address {
		parse_address("0x0987654321098765432109876543210987654321").unwrap()
	}

	fn lookup_with(session: MockSessionInterface) -> RegistryLookup {
		let mut implementations: HashMap<u64, Arc<dyn SessionInterface>> = HashMap::new();
		implementations.insert(8453, Arc::new(session));
		let service = Arc::new(SessionService::new(implementations, 1, 120));
		RegistryLookup::new(service, 8453, registry_address())
	}

	#[test]
	fn test_namehash_known_vectors() {
		assert_eq!(namehash(""), [0u8; 32]);
		assert_eq!(
			hex::encode(namehash("eth")),
			"93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
		);
		assert_eq!(
			hex::encode(namehash("foo.eth")),
			"de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f"
		);
	}

	#[tokio::test]
	async fn test_lookup_decodes_registered_address() {
		let mut session = MockSessionInterface::new();
		session.expect_call().returning(|_, _| {
			Box::pin(async {
				// ABI-encoded address return: 12 zero bytes then the address.
				let mut ret = vec![0u8; 32];
				ret[12..].copy_from_slice(&[0x11; 20]);
				Ok(ret)
			})
		});

		let lookup = lookup_with(session);
		let resolved = lookup.lookup("alice.base.eth").await.unwrap();
		assert_eq!(resolved, Some(Address(vec![0x11; 20])));
	}

	#[tokio::test]
	async fn test_lookup_maps_zero_address_to_none() {
		let mut session = MockSessionInterface::new();
		session
			.expect_call()
			.returning(|_, _| Box::pin(async { Ok(vec![0u8; 32]) }));

		let lookup = lookup_with(session);
		assert_eq!(lookup.lookup("ghost.base.eth").await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_lookup_maps_session_error_to_unreachable() {
		let mut session = MockSessionInterface::new();
		session.expect_call().returning(|_, _| {
			Box::pin(async {
				Err(giftlock_session::SessionError::Network(
					"connection refused".to_string(),
				))
			})
		});

		let lookup = lookup_with(session);
		let result = lookup.lookup("alice.base.eth").await;
		assert!(matches!(result, Err(LookupError::Unreachable(_))));
	}

	#[tokio::test]
	async fn test_lookup_rejects_short_response() {
		let mut session = MockSessionInterface::new();
		session
			.expect_call()
			.returning(|_, _| Box::pin(async { Ok(vec![0u8; 3]) }));

		let lookup = lookup_with(session);
		let result = lookup.lookup("alice.base.eth").await;
		assert!(matches!(result, Err(LookupError::InvalidResponse(_))));
	}
}
