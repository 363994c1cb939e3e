//! Read-only data sources.

pub mod tenant_info;

pub use tenant_info::*;

// self
use crate::{
	_prelude::*,
	client::CidaasApi,
	diag::{Diagnostic, Diagnostics},
	schema::{Schema, SchemaError},
	value::Object,
};

/// Boxed future returned by [`DynDataSource::read`].
pub type DataSourceFuture<'a> = Pin<Box<dyn Future<Output = DataSourceResponse> + 'a + Send>>;

/// Read request: the data source configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadDataSourceRequest {
	/// Configuration object.
	pub config: Object,
}

/// Outcome of a data source read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSourceResponse {
	/// Resulting state; `None` when the read failed.
	pub state: Option<Object>,
	/// Diagnostics produced by the read.
	pub diagnostics: Diagnostics,
}
impl AsRef<Diagnostics> for DataSourceResponse {
	fn as_ref(&self) -> &Diagnostics {
		&self.diagnostics
	}
}

/// Type-erased data source as exposed by the provider registry.
pub trait DynDataSource
where
	Self: Send + Sync,
{
	/// Data source type name.
	fn type_name(&self) -> &'static str;

	/// Static schema of the data source.
	fn schema(&self) -> Result<Schema, SchemaError>;

	/// Validates a configuration object against the schema.
	fn validate(&self, config: &Object) -> Diagnostics {
		match self.schema() {
			Ok(schema) => schema.validate(config),
			Err(e) => Diagnostic::error("Invalid data source schema", e.to_string()).into(),
		}
	}

	/// Reads the data source.
	fn read(&self, request: ReadDataSourceRequest) -> DataSourceFuture<'_>;
}

/// Every data source type, bound to the given client handle.
pub fn registry(api: Option<Arc<dyn CidaasApi>>) -> Vec<Box<dyn DynDataSource>> {
	vec![Box::new(TenantInfoDataSource::new(api))]
}
