//! Optional observability helpers for provider operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `cidaas_provider.operation` with the
//!   `operation` and `resource` fields, plus a warning event per error diagnostic.
//! - Enable `metrics` to increment the `cidaas_provider_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `resource` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, diag::Diagnostics};

/// Runs `fut` inside an operation span, recording attempt and outcome metrics and logging
/// error diagnostics of the result.
pub async fn observe_operation<Fut, T>(kind: OperationKind, resource: &'static str, fut: Fut) -> T
where
	Fut: Future<Output = T>,
	T: AsRef<Diagnostics>,
{
	record_operation_outcome(kind, resource, OperationOutcome::Attempt);

	let output = OperationSpan::new(kind, resource).instrument(fut).await;
	let diagnostics = output.as_ref();

	log_error_diagnostics(kind, resource, diagnostics);
	record_operation_outcome(kind, resource, OperationOutcome::from_diagnostics(diagnostics));

	output
}

/// Provider operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Provider configuration.
	Configure,
	/// Resource creation.
	Create,
	/// Resource or data source read.
	Read,
	/// Resource update.
	Update,
	/// Resource deletion.
	Delete,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Configure => "configure",
			OperationKind::Create => "create",
			OperationKind::Read => "read",
			OperationKind::Update => "update",
			OperationKind::Delete => "delete",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Completion without error diagnostics.
	Success,
	/// Completion with at least one error diagnostic.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}

	/// Classifies a finished operation by its diagnostics.
	pub fn from_diagnostics(diagnostics: &Diagnostics) -> Self {
		if diagnostics.has_error() { Self::Failure } else { Self::Success }
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
