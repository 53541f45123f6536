//! Grant approval policy applied by the authorization server for a client.

// self
use crate::_prelude::*;

/// How the authorization server handles grant requests for a client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantMethod {
	/// Grants are approved automatically.
	#[default]
	Auto,
	/// The end user is prompted to approve the grant.
	Prompt,
	/// Grants are always denied.
	Deny,
}
impl GrantMethod {
	/// Returns the wire identifier for the grant method.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantMethod::Auto => "auto",
			GrantMethod::Prompt => "prompt",
			GrantMethod::Deny => "deny",
		}
	}
}
impl Display for GrantMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for GrantMethod {
	type Err = UnknownGrantMethod;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"auto" => Ok(Self::Auto),
			"prompt" => Ok(Self::Prompt),
			"deny" => Ok(Self::Deny),
			other => Err(UnknownGrantMethod { value: other.to_owned() }),
		}
	}
}

/// Error returned when parsing an unrecognized grant method.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown grant method `{value}`.")]
pub struct UnknownGrantMethod {
	/// Rejected input.
	pub value: String,
}
