//! Secret string wrapper that keeps key material out of logs.

use std::fmt;

/// Wrapper around sensitive string values such as private keys.
///
/// The inner value never appears in `Debug` output; callers access it
/// explicitly through [`SecretString::with_exposed`].
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
	/// Runs `f` with the exposed secret and returns its result.
	pub fn with_exposed<T>(&self, f: impl FnOnce(&str) -> T) -> T {
		f(&self.0)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		SecretString(value.to_string())
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		SecretString(value)
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretString(***)")
	}
}
