//! Create-or-merge reconciliation of desired OAuth clients against a [`ClientStore`].
//!
//! [`Reconciler::ensure`] first tries to create the desired client. Only an "already exists"
//! failure switches to the merge path: read the current record, merge the desired fields
//! with [`merge_into`], skip the write when nothing changed, and otherwise update with the
//! version token that was just read. Version conflicts restart the read-merge-write cycle under
//! the [`RetryPolicy`] budget; every other failure is returned as-is, wrapped with the client
//! name.
//!
//! No locking happens here. Concurrent writers for the same name are serialized solely by
//! the store's version check, and each attempt is a single atomic store write, so dropping
//! the future (or hitting [`Reconciler::ensure_within`]'s deadline) never leaves a partial
//! merge behind.

pub mod merge;
pub mod retry;

mod metrics;

pub use merge::merge_into;
pub use metrics::ReconcileMetrics;
pub use retry::RetryPolicy;

// self
use crate::{
	_prelude::*,
	client::{OAuthClient, StoredClient},
	error::ConfigError,
	obs::{self, ReconcileEvent, ReconcileSpan, ReconcileStage, obs_event},
	store::ClientStore,
};

/// Result of a successful [`Reconciler::ensure`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
	/// The client did not exist and was created from the desired record.
	Created,
	/// The client existed and already matched the desired record under the merge policy.
	Unchanged,
	/// The client existed and the merged record was written.
	Updated {
		/// Update attempts made, including those lost to concurrent writers.
		attempts: u32,
	},
}
impl ReconcileOutcome {
	/// Returns true when the call wrote to the store.
	pub fn wrote(self) -> bool {
		!matches!(self, Self::Unchanged)
	}
}

/// Converges desired OAuth clients into a versioned store.
///
/// Backoff between conflicting attempts sleeps on the Tokio timer, so calls must run inside a
/// Tokio runtime with the time driver enabled.
#[derive(Clone)]
pub struct Reconciler {
	/// Store holding the clients.
	pub store: Arc<dyn ClientStore>,
	/// Shared counters for reconcile outcomes.
	pub metrics: Arc<ReconcileMetrics>,
	retry: RetryPolicy,
}
impl Reconciler {
	/// Creates a reconciler with the default [`RetryPolicy`].
	pub fn new(store: Arc<dyn ClientStore>) -> Self {
		Self { store, retry: RetryPolicy::default(), metrics: Default::default() }
	}

	/// Replaces the retry policy after validating it.
	pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Result<Self, ConfigError> {
		policy.validate()?;

		self.retry = policy;

		Ok(self)
	}

	/// Retry policy applied to version conflicts.
	pub fn retry_policy(&self) -> &RetryPolicy {
		&self.retry
	}

	/// Ensures the store holds `desired`, creating it or merging into the existing record.
	#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
	pub async fn ensure(&self, desired: &OAuthClient) -> Result<ReconcileOutcome> {
		let span = ReconcileSpan::new(&desired.name);

		self.metrics.record_attempt();
		obs::record_event(ReconcileEvent::Attempt);

		let result = span.instrument(self.converge(desired, &span)).await;

		match &result {
			Ok(ReconcileOutcome::Created) => {
				self.metrics.record_created();
				obs::record_event(ReconcileEvent::Created);
			},
			Ok(ReconcileOutcome::Unchanged) => {
				self.metrics.record_unchanged();
				obs::record_event(ReconcileEvent::Unchanged);
			},
			Ok(ReconcileOutcome::Updated { .. }) => {
				self.metrics.record_updated();
				obs::record_event(ReconcileEvent::Updated);
			},
			Err(e) => {
				obs_event!(warn, client = %desired.name, error = %e, "reconcile failed");

				self.metrics.record_failure();
				obs::record_event(ReconcileEvent::Failure);
			},
		}

		result
	}

	/// Like [`ensure`](Self::ensure) but gives up once `timeout` elapses, including time spent
	/// in retries and backoff.
	pub async fn ensure_within(
		&self,
		desired: &OAuthClient,
		timeout: Duration,
	) -> Result<ReconcileOutcome> {
		match tokio::time::timeout(timeout, self.ensure(desired)).await {
			Ok(result) => result,
			Err(_) => {
				self.metrics.record_failure();
				obs::record_event(ReconcileEvent::Failure);

				Err(Error::Timeout { name: desired.name.clone(), timeout })
			},
		}
	}

	/// Ensures each client in order, stopping at the first failure.
	pub async fn ensure_all(&self, desired: &[OAuthClient]) -> Result<Vec<ReconcileOutcome>> {
		let mut outcomes = Vec::with_capacity(desired.len());

		for client in desired {
			outcomes.push(self.ensure(client).await?);
		}

		Ok(outcomes)
	}

	#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
	async fn converge(
		&self,
		desired: &OAuthClient,
		span: &ReconcileSpan,
	) -> Result<ReconcileOutcome> {
		let name = &desired.name;

		span.enter_stage(ReconcileStage::Create);

		match self.store.create(desired.clone()).await {
			Ok(_) => {
				obs_event!(debug, client = %name, "created client");

				return Ok(ReconcileOutcome::Created);
			},
			Err(e) if e.is_already_exists() => {
				obs_event!(debug, client = %name, "client exists; merging");
			},
			Err(source) => return Err(Error::Create { name: name.clone(), source }),
		}

		let mut attempts = 0_u32;

		loop {
			attempts += 1;

			span.enter_stage(ReconcileStage::Read);

			let current = self
				.store
				.get(name)
				.await
				.map_err(|source| Error::Read { name: name.clone(), source })?;
			let merged = merge::merge_into(&current.client, desired);

			if current.matches(&merged) {
				obs_event!(debug, client = %name, version = %current.version, "client already converged");

				return Ok(ReconcileOutcome::Unchanged);
			}

			let candidate = StoredClient { client: merged, ..current };

			span.enter_stage(ReconcileStage::Update);

			match self.store.update(candidate).await {
				Ok(stored) => {
					obs_event!(debug, client = %name, version = %stored.version, attempts, "updated client");

					return Ok(ReconcileOutcome::Updated { attempts });
				},
				Err(source) if source.is_conflict() => {
					self.metrics.record_conflict();
					obs::record_event(ReconcileEvent::Conflict);

					if attempts >= self.retry.max_attempts {
						return Err(Error::ConflictRetriesExhausted {
							name: name.clone(),
							attempts,
							source,
						});
					}

					let delay = self.retry.jittered_backoff_for(attempts - 1);

					obs_event!(debug, client = %name, attempts, ?delay, "version conflict; retrying");

					span.enter_stage(ReconcileStage::Backoff);

					tokio::time::sleep(delay).await;
				},
				Err(source) => return Err(Error::Update { name: name.clone(), source }),
			}
		}
	}
}
impl Debug for Reconciler {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Reconciler")
			.field("retry", &self.retry)
			.field("metrics", &self.metrics)
			.finish_non_exhaustive()
	}
}
