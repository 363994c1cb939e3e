// self
use crate::{_prelude::*, diag::Diagnostics, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by provider operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the operation kind and resource type name.
	pub fn new(kind: OperationKind, resource: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"cidaas_provider.operation",
				operation = kind.as_str(),
				resource
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, resource);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
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

/// Emits one warning event per error diagnostic (when tracing is enabled).
pub fn log_error_diagnostics(kind: OperationKind, resource: &'static str, diagnostics: &Diagnostics) {
	#[cfg(feature = "tracing")]
	for diagnostic in diagnostics.errors() {
		tracing::warn!(
			operation = kind.as_str(),
			resource,
			summary = %diagnostic.summary,
			detail = %diagnostic.detail,
			"Operation reported an error diagnostic."
		);
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, resource, diagnostics);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn logging_empty_diagnostics_is_silent() {
		log_error_diagnostics(OperationKind::Configure, "provider", &Diagnostics::default());
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::new(OperationKind::Read, "cidaas_hook");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
