//! Reconciler-level error types shared across clients, stores, and the converge loop.

// self
use crate::{_prelude::*, client::ClientName, store::StoreError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical reconciler error exposed by public APIs.
///
/// Every variant raised by [`Reconciler`](crate::reconcile::Reconciler) names the client it
/// was working on so callers reconciling several records can tell which one failed.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure outside of a reconcile call (e.g., opening a store).
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Creating the client failed for a reason other than "already exists".
	#[error("Failed to create OAuth client `{name}`.")]
	Create {
		/// Client being reconciled.
		name: ClientName,
		/// Store failure returned by the create call.
		#[source]
		source: StoreError,
	},
	/// Reading the current client failed inside the merge loop.
	#[error("Failed to read OAuth client `{name}`.")]
	Read {
		/// Client being reconciled.
		name: ClientName,
		/// Store failure returned by the get call.
		#[source]
		source: StoreError,
	},
	/// Writing the merged client failed for a reason other than a version conflict.
	#[error("Failed to update OAuth client `{name}`.")]
	Update {
		/// Client being reconciled.
		name: ClientName,
		/// Store failure returned by the update call.
		#[source]
		source: StoreError,
	},
	/// Concurrent writers kept winning until the retry budget ran out.
	#[error("OAuth client `{name}` still conflicted after {attempts} update attempts.")]
	ConflictRetriesExhausted {
		/// Client being reconciled.
		name: ClientName,
		/// Number of update attempts made.
		attempts: u32,
		/// The last conflict reported by the store.
		#[source]
		source: StoreError,
	},
	/// The caller-supplied deadline elapsed before reconciliation finished.
	#[error("Reconciling OAuth client `{name}` timed out after {timeout:?}.")]
	Timeout {
		/// Client being reconciled.
		name: ClientName,
		/// Deadline that elapsed.
		timeout: Duration,
	},
}
impl Error {
	/// Returns the client name the failure is attributed to, when there is one.
	pub fn client_name(&self) -> Option<&ClientName> {
		match self {
			Self::Create { name, .. }
			| Self::Read { name, .. }
			| Self::Update { name, .. }
			| Self::ConflictRetriesExhausted { name, .. }
			| Self::Timeout { name, .. } => Some(name),
			Self::Storage(_) | Self::Config(_) => None,
		}
	}
}

/// Configuration and validation failures raised before any store call is made.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Retry policy parameters are out of range.
	#[error("Retry policy is invalid: {reason}.")]
	InvalidRetryPolicy {
		/// Which constraint was violated.
		reason: &'static str,
	},
	/// A client name failed validation.
	#[error("Client name is invalid.")]
	InvalidName(#[from] crate::client::IdentifierError),
	/// A URL used to derive redirect URIs cannot be parsed or joined.
	#[error("URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl From<url::ParseError> for ConfigError {
	fn from(e: url::ParseError) -> Self {
		Self::InvalidUrl { source: e }
	}
}
