// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for reconcile calls made through one [`Reconciler`](super::Reconciler).
#[derive(Debug, Default)]
pub struct ReconcileMetrics {
	attempts: AtomicU64,
	created: AtomicU64,
	updated: AtomicU64,
	unchanged: AtomicU64,
	conflicts: AtomicU64,
	failures: AtomicU64,
}
impl ReconcileMetrics {
	/// Returns the total number of `ensure` calls.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that created the client.
	pub fn created(&self) -> u64 {
		self.created.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that wrote a merged update.
	pub fn updated(&self) -> u64 {
		self.updated.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that found the client already converged.
	pub fn unchanged(&self) -> u64 {
		self.unchanged.load(Ordering::Relaxed)
	}

	/// Returns the number of version conflicts observed across all calls.
	pub fn conflicts(&self) -> u64 {
		self.conflicts.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that returned an error.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Number of store writes (creates plus updates) issued by successful calls.
	pub fn writes(&self) -> u64 {
		self.created() + self.updated()
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_created(&self) {
		self.created.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_updated(&self) {
		self.updated.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_unchanged(&self) {
		self.unchanged.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_conflict(&self) {
		self.conflicts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}
