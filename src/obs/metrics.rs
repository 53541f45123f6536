// self
use crate::obs::ReconcileEvent;

/// Records a reconcile event via the global metrics recorder (when enabled).
pub fn record_event(event: ReconcileEvent) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth_client_reconciler_total", "outcome" => event.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = event;
	}
}
