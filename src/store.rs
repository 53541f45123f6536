//! Storage contracts and built-in store implementations for OAuth client records.
//!
//! A [`ClientStore`] is a strongly consistent, versioned key-value API keyed by
//! [`ClientName`]. Implementations must report "already exists" on create and stale-version
//! conflicts on update as the distinguishable [`StoreError::AlreadyExists`] and
//! [`StoreError::Conflict`] variants; the reconciler's convergence protocol depends on it.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	client::{ClientName, OAuthClient, ResourceVersion, StoredClient},
};

/// Boxed future returned by [`ClientStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Versioned get/create/update contract implemented by client stores.
pub trait ClientStore
where
	Self: Send + Sync,
{
	/// Creates a new record, failing with [`StoreError::AlreadyExists`] if the name is taken.
	fn create(&self, client: OAuthClient) -> StoreFuture<'_, StoredClient>;

	/// Reads the current record and its version, failing with [`StoreError::NotFound`].
	fn get<'a>(&'a self, name: &'a ClientName) -> StoreFuture<'a, StoredClient>;

	/// Replaces a record if `stored.version` is still current, failing with
	/// [`StoreError::Conflict`] otherwise.
	fn update(&self, stored: StoredClient) -> StoreFuture<'_, StoredClient>;
}

/// Error type produced by [`ClientStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// A record with the same name already exists.
	#[error("OAuth client `{name}` already exists.")]
	AlreadyExists {
		/// Conflicting name.
		name: ClientName,
	},
	/// No record exists for the name.
	#[error("OAuth client `{name}` was not found.")]
	NotFound {
		/// Missing name.
		name: ClientName,
	},
	/// The supplied version token is stale.
	#[error("OAuth client `{name}` was modified concurrently: expected version {expected}, found {actual}.")]
	Conflict {
		/// Name of the contended record.
		name: ClientName,
		/// Version the writer read.
		expected: ResourceVersion,
		/// Version currently stored.
		actual: ResourceVersion,
	},
	/// Serialization failures (e.g., serde) surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
impl StoreError {
	/// Returns true for [`StoreError::AlreadyExists`].
	pub fn is_already_exists(&self) -> bool {
		matches!(self, Self::AlreadyExists { .. })
	}

	/// Returns true for [`StoreError::Conflict`].
	pub fn is_conflict(&self) -> bool {
		matches!(self, Self::Conflict { .. })
	}

	/// Returns true for [`StoreError::NotFound`].
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}
}

/// Applies the versioned write rules shared by the built-in stores.
pub(crate) fn apply_create(
	map: &mut HashMap<ClientName, StoredClient>,
	client: OAuthClient,
	now: OffsetDateTime,
) -> Result<StoredClient, StoreError> {
	if map.contains_key(&client.name) {
		return Err(StoreError::AlreadyExists { name: client.name });
	}

	let stored =
		StoredClient { client, version: ResourceVersion::INITIAL, created_at: now, updated_at: now };

	map.insert(stored.client.name.clone(), stored.clone());

	Ok(stored)
}

pub(crate) fn apply_update(
	map: &mut HashMap<ClientName, StoredClient>,
	stored: StoredClient,
	now: OffsetDateTime,
) -> Result<StoredClient, StoreError> {
	let Some(current) = map.get_mut(&stored.client.name) else {
		return Err(StoreError::NotFound { name: stored.client.name });
	};

	if current.version != stored.version {
		return Err(StoreError::Conflict {
			name: stored.client.name,
			expected: stored.version,
			actual: current.version,
		});
	}

	current.client = stored.client;
	current.version = current.version.next();
	current.updated_at = now;

	Ok(current.clone())
}
