//! Strongly typed OAuth client names.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Longest name the store accepts (the DNS-subdomain object name limit).
pub const CLIENT_NAME_MAX_LEN: usize = 253;

/// Error returned when name validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The name was empty.
	#[error("Client name cannot be empty.")]
	Empty,
	/// The name contains whitespace characters.
	#[error("Client name contains whitespace.")]
	ContainsWhitespace,
	/// The name exceeded the allowed character count.
	#[error("Client name exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Unique identifier of an OAuth client within the store's namespace.
///
/// Names are immutable once chosen; the reconciler never rewrites them.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientName(String);
impl ClientName {
	/// Creates a new name after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Returns the name as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for ClientName {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ClientName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ClientName {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<ClientName> for String {
	fn from(value: ClientName) -> Self {
		value.0
	}
}
impl TryFrom<String> for ClientName {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for ClientName {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for ClientName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ClientName({})", self.0)
	}
}
impl Display for ClientName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.len() > CLIENT_NAME_MAX_LEN {
		return Err(IdentifierError::TooLong { max: CLIENT_NAME_MAX_LEN });
	}

	Ok(())
}
