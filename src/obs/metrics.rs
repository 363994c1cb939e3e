// self
use crate::obs::{OperationKind, OperationOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(
	kind: OperationKind,
	resource: &'static str,
	outcome: OperationOutcome,
) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"cidaas_provider_operation_total",
			"operation" => kind.as_str(),
			"resource" => resource,
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, resource, outcome);
	}
}
