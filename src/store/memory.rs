//! Thread-safe in-memory [`ClientStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	client::{ClientName, OAuthClient, StoredClient},
	store::{self, ClientStore, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<ClientName, StoredClient>>>;

/// Thread-safe storage backend that keeps records in-process for tests and demos.
///
/// Clones share the same map, so a clone handed to another task observes every write.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns a snapshot of the stored record without going through the async contract.
	pub fn snapshot(&self, name: &ClientName) -> Option<StoredClient> {
		self.0.read().get(name).cloned()
	}

	/// Number of stored records.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true when nothing has been stored yet.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn create_now(map: StoreMap, client: OAuthClient) -> Result<StoredClient, StoreError> {
		store::apply_create(&mut map.write(), client, OffsetDateTime::now_utc())
	}

	fn get_now(map: StoreMap, name: ClientName) -> Result<StoredClient, StoreError> {
		map.read().get(&name).cloned().ok_or(StoreError::NotFound { name })
	}

	fn update_now(map: StoreMap, stored: StoredClient) -> Result<StoredClient, StoreError> {
		store::apply_update(&mut map.write(), stored, OffsetDateTime::now_utc())
	}
}
impl ClientStore for MemoryStore {
	fn create(&self, client: OAuthClient) -> StoreFuture<'_, StoredClient> {
		let map = self.0.clone();

		Box::pin(async move { Self::create_now(map, client) })
	}

	fn get<'a>(&'a self, name: &'a ClientName) -> StoreFuture<'a, StoredClient> {
		let map = self.0.clone();
		let name = name.to_owned();

		Box::pin(async move { Self::get_now(map, name) })
	}

	fn update(&self, stored: StoredClient) -> StoreFuture<'_, StoredClient> {
		let map = self.0.clone();

		Box::pin(async move { Self::update_now(map, stored) })
	}
}
