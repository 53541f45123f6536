//! Simple file-backed [`ClientStore`] for single-node deployments and local tooling.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	client::{ClientName, OAuthClient, StoredClient},
	store::{self, ClientStore, StoreError, StoreFuture},
};

type Snapshot = HashMap<ClientName, StoredClient>;

/// Persists client records to a JSON file after each successful write.
///
/// Versioning follows the same rules as [`MemoryStore`](crate::store::MemoryStore); the file
/// is replaced atomically through a sibling `.tmp` file.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Snapshot>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(HashMap::new());
		}

		let de = &mut serde_json::Deserializer::from_slice(&bytes);
		let entries: Vec<StoredClient> =
			serde_path_to_error::deserialize(de).map_err(|e| StoreError::Serialization {
				message: format!(
					"Failed to parse {} at `{}`: {}",
					path.display(),
					e.path(),
					e.inner()
				),
			})?;

		Ok(entries.into_iter().map(|stored| (stored.client.name.clone(), stored)).collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &Snapshot) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let mut snapshot: Vec<_> = contents.values().collect();

		snapshot.sort_by(|a, b| a.client.name.cmp(&b.client.name));

		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	/// Runs a mutation and persists the result; the in-memory map is rolled back if the file
	/// cannot be written so memory and disk never disagree.
	fn mutate<F>(&self, op: F) -> Result<StoredClient, StoreError>
	where
		F: FnOnce(&mut Snapshot) -> Result<StoredClient, StoreError>,
	{
		let mut guard = self.inner.write();
		let previous = guard.clone();
		let stored = op(&mut *guard)?;

		if let Err(e) = self.persist_locked(&guard) {
			*guard = previous;

			return Err(e);
		}

		Ok(stored)
	}
}
impl ClientStore for FileStore {
	fn create(&self, client: OAuthClient) -> StoreFuture<'_, StoredClient> {
		Box::pin(async move {
			self.mutate(|map| store::apply_create(map, client, OffsetDateTime::now_utc()))
		})
	}

	fn get<'a>(&'a self, name: &'a ClientName) -> StoreFuture<'a, StoredClient> {
		Box::pin(async move {
			self.inner
				.read()
				.get(name)
				.cloned()
				.ok_or_else(|| StoreError::NotFound { name: name.to_owned() })
		})
	}

	fn update(&self, stored: StoredClient) -> StoreFuture<'_, StoredClient> {
		Box::pin(async move {
			self.mutate(|map| store::apply_update(map, stored, OffsetDateTime::now_utc()))
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	fn temp_path() -> PathBuf {
		let unique = format!(
			"oauth_client_reconciler_file_store_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn build_client() -> OAuthClient {
		let name = ClientName::new("file-client").expect("Failed to build client name fixture.");

		OAuthClient::builder(name)
			.secret("file-secret")
			.redirect_uri("https://example.com/cb")
			.build()
	}

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_path();
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let client = build_client();
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let created =
			rt.block_on(store.create(client.clone())).expect("Failed to create fixture client.");
		let mut changed = created.clone();

		changed.client.respond_with_challenges = true;

		let updated = rt.block_on(store.update(changed)).expect("Failed to update fixture client.");

		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let fetched =
			rt.block_on(reopened.get(&client.name)).expect("File store lost record after reopen.");

		assert_eq!(fetched, updated);
		assert_eq!(fetched.version, created.version.next());
		assert_eq!(fetched.client.secret.expose(), "file-secret");

		let err = rt
			.block_on(reopened.create(client))
			.expect_err("Reloaded store should still reject duplicate names.");

		assert!(err.is_already_exists());

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn corrupt_snapshot_reports_path() {
		let path = temp_path();

		fs::write(&path, br#"[{"client": {"name": "with space"}}]"#)
			.expect("Failed to write corrupt snapshot fixture.");

		let err = FileStore::open(&path).expect_err("Corrupt snapshot should fail to load.");

		assert!(matches!(
			&err,
			StoreError::Serialization { message } if message.contains("client.name")
		));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}
}
