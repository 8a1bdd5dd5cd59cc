//! Core orchestration module for the giftlock gifting system.
//!
//! This module drives batches of gift intents through their lifecycle:
//! entries are validated under a bounded concurrency window, then sent
//! strictly in input order, with per-entry failures recorded instead of
//! aborting the batch. The per-entry state machine lives in [`state`];
//! the engine itself and its event bus live in [`engine`].

pub mod engine;
pub mod state;

// Re-export the engine surface for convenience
pub use engine::event_bus::EventBus;
pub use engine::{BatchEngine, BatchHandle, BatchLoadReport, EngineError};
pub use state::{is_valid_transition, transition_entry, StateError};
