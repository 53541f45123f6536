//! Optional observability helpers for reconcile calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth_client_reconciler.ensure` with the
//!   `client` and `stage` fields, plus debug/warn events for each step of the merge loop.
//! - Enable `metrics` to increment the `oauth_client_reconciler_total` counter for every
//!   reconcile event, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Emits a `tracing` event when the feature is enabled and compiles to nothing otherwise.
macro_rules! obs_event {
	($level:ident, $($arg:tt)+) => {
		#[cfg(feature = "tracing")]
		::tracing::$level!($($arg)+);
	};
}
pub(crate) use obs_event;

/// Events observed while reconciling a single client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReconcileEvent {
	/// Entry to [`Reconciler::ensure`](crate::reconcile::Reconciler::ensure).
	Attempt,
	/// The client did not exist and was created.
	Created,
	/// An existing client was merged and written.
	Updated,
	/// The existing client already matched; no write was issued.
	Unchanged,
	/// An update lost an optimistic-concurrency race and will be retried.
	Conflict,
	/// Failure propagated back to the caller.
	Failure,
}
impl ReconcileEvent {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ReconcileEvent::Attempt => "attempt",
			ReconcileEvent::Created => "created",
			ReconcileEvent::Updated => "updated",
			ReconcileEvent::Unchanged => "unchanged",
			ReconcileEvent::Conflict => "conflict",
			ReconcileEvent::Failure => "failure",
		}
	}
}
impl Display for ReconcileEvent {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
