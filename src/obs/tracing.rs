// self
use crate::{_prelude::*, client::ClientName};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedReconcile<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedReconcile<F> = F;

/// Step of a reconcile call currently talking to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReconcileStage {
	/// Creating the desired client.
	Create,
	/// Reading the stored client before merging.
	Read,
	/// Writing the merged client.
	Update,
	/// Waiting before the next attempt after a version conflict.
	Backoff,
}
impl ReconcileStage {
	/// Returns a stable label suitable for span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ReconcileStage::Create => "create",
			ReconcileStage::Read => "read",
			ReconcileStage::Update => "update",
			ReconcileStage::Backoff => "backoff",
		}
	}
}
impl Display for ReconcileStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Span attached to one reconcile call.
///
/// The `stage` field starts empty and follows the call through
/// [`enter_stage`](Self::enter_stage).
#[derive(Clone, Debug)]
pub struct ReconcileSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ReconcileSpan {
	/// Creates a new span tagged with the client name.
	pub fn new(client: &ClientName) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth_client_reconciler.ensure",
				client = client.as_str(),
				stage = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = client;

			Self {}
		}
	}

	/// Records the stage the call has reached.
	pub fn enter_stage(&self, stage: ReconcileStage) {
		#[cfg(feature = "tracing")]
		self.span.record("stage", stage.as_str());
		#[cfg(not(feature = "tracing"))]
		let _ = stage;
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedReconcile<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
