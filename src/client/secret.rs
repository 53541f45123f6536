//! Client secret wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Redacted client secret keeping sensitive material out of logs.
///
/// The empty secret is a meaningful value: it marks a public client that authenticates
/// without a secret, which is distinct from "no secret was specified".
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);
impl ClientSecret {
	/// Wraps a secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// The explicit "no secret" value.
	pub fn empty() -> Self {
		Self(String::new())
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Length of the secret in bytes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true for the explicit "no secret" value.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for ClientSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for ClientSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		if self.is_empty() {
			f.debug_tuple("ClientSecret").field(&"").finish()
		} else {
			f.debug_tuple("ClientSecret").field(&"<redacted>").finish()
		}
	}
}
impl Display for ClientSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
