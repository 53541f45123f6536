//! Scope restriction descriptors attached to OAuth clients.
//!
//! The reconciler never interprets these values; they are copied verbatim from the desired
//! record and compared structurally.

// self
use crate::_prelude::*;

/// Limits the scopes a client may request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopeRestriction {
	/// Only the listed scope strings are allowed.
	Literals(Vec<String>),
	/// Role-scoped access limited to the listed roles and namespaces.
	ClusterRole(ClusterRoleScopeRestriction),
}

/// Role-based scope restriction payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleScopeRestriction {
	/// Roles that may be requested; `*` matches any role.
	pub role_names: Vec<String>,
	/// Namespaces the roles may be requested in; `*` matches any namespace.
	pub namespaces: Vec<String>,
	/// Whether escalating roles may be requested.
	pub allow_escalation: bool,
}
