//! Test builders for gifting types
//!
//! This module provides fluent builder APIs for constructing various types
//! with sensible defaults and validation for TESTING purposes.
pub mod builders;
