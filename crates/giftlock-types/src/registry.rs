//! Registry trait for named service implementations.

/// Associates an implementation with its configuration name and factory.
///
/// Service crates expose one registry per implementation; the binary builds
/// the name-to-factory table from `get_all_implementations` and picks by the
/// name found in configuration.
pub trait ImplementationRegistry {
	/// Name used in configuration to select this implementation.
	const NAME: &'static str;
	/// Factory function type used to construct it.
	type Factory;

	/// Returns the factory for this implementation.
	fn factory() -> Self::Factory;
}
