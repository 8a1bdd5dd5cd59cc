//! Gift vault module for the giftlock gifting system.
//!
//! This module owns everything that touches the GiftVault contract: the
//! Solidity bindings, construction of `create*` calls from gift intents, and
//! the read/claim client used by status displays and the CLI.

/// Solidity bindings for the vault contract.
pub mod abi;
/// Create-call construction from gift intents.
pub mod calls;
/// Read and claim client for deployed vaults.
pub mod client;

pub use calls::{build_create_call, BuildError, CallPlan};
pub use client::{extract_created_gift_id, VaultClient, VaultError};
