//! `cidaas_tenant_info` data source.

// self
use crate::{
	_prelude::*,
	client::CidaasApi,
	data_source::{DataSourceFuture, DataSourceResponse, DynDataSource, ReadDataSourceRequest},
	error::error_chain,
	obs::{self, OperationKind},
	resource::{NOT_CONFIGURED_DETAIL, NOT_CONFIGURED_SUMMARY},
	schema::{Attribute, Schema, SchemaError},
	value::{Model, Value},
};

const TYPE_NAME: &str = "cidaas_tenant_info";

crate::tf_model! {
	/// State of the `cidaas_tenant_info` data source.
	pub struct TenantInfoModel {
		/// Tenant key.
		pub tenant_key: Value<String>,
		/// Tenant display name.
		pub tenant_name: Value<String>,
		/// cidaas version string.
		pub version_info: Value<String>,
		/// Whether custom fields are flattened in user payloads.
		pub custom_field_flatten: Value<bool>,
	}
}

/// Basic information about the tenant the provider talks to.
#[derive(Clone)]
pub struct TenantInfoDataSource {
	api: Option<Arc<dyn CidaasApi>>,
}
impl TenantInfoDataSource {
	/// Creates the data source; `None` means the provider is not configured.
	pub fn new(api: Option<Arc<dyn CidaasApi>>) -> Self {
		Self { api }
	}

	/// Fetches the tenant information.
	pub async fn read(&self, _request: ReadDataSourceRequest) -> DataSourceResponse {
		obs::observe_operation(OperationKind::Read, TYPE_NAME, self.read_inner()).await
	}

	async fn read_inner(&self) -> DataSourceResponse {
		let mut response = DataSourceResponse::default();
		let Some(api) = &self.api else {
			response.diagnostics.add_error(NOT_CONFIGURED_SUMMARY, NOT_CONFIGURED_DETAIL);

			return response;
		};

		match api.get_tenant_info().await {
			Ok(info) => {
				let model = TenantInfoModel {
					tenant_key: Value::Known(info.tenant_key),
					tenant_name: Value::Known(info.tenant_name),
					version_info: Value::Known(info.version_info),
					custom_field_flatten: Value::Known(info.custom_field_flatten),
				};

				response.state = Some(model.into_object());
			},
			Err(e) => response.diagnostics.add_error(
				"Error reading tenant info",
				format!("Could not read tenant info: {}", error_chain(&e)),
			),
		}

		response
	}
}
impl Debug for TenantInfoDataSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TenantInfoDataSource").field("configured", &self.api.is_some()).finish()
	}
}
impl DynDataSource for TenantInfoDataSource {
	fn type_name(&self) -> &'static str {
		TYPE_NAME
	}

	fn schema(&self) -> Result<Schema, SchemaError> {
		Schema::builder("`cidaas_tenant_info` exposes basic information about the tenant.")
			.attribute(Attribute::string("tenant_key").computed().description("Tenant key"))
			.attribute(Attribute::string("tenant_name").computed().description("Tenant name"))
			.attribute(Attribute::string("version_info").computed().description("cidaas version"))
			.attribute(
				Attribute::bool("custom_field_flatten")
					.computed()
					.description("Whether custom fields are flattened"),
			)
			.build()
	}

	fn read(&self, request: ReadDataSourceRequest) -> DataSourceFuture<'_> {
		Box::pin(TenantInfoDataSource::read(self, request))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::client::{MemoryApi, TenantInfo};

	#[tokio::test]
	async fn reads_tenant_info_from_the_api() {
		let api: Arc<dyn CidaasApi> = Arc::new(MemoryApi::with_tenant(TenantInfo {
			tenant_key: "acme".into(),
			tenant_name: "Acme".into(),
			version_info: "3.100.0".into(),
			custom_field_flatten: true,
		}));
		let source = TenantInfoDataSource::new(Some(api));
		let response = TenantInfoDataSource::read(&source, ReadDataSourceRequest::default()).await;
		let state = response.state.expect("Tenant info should be recorded.");

		assert!(response.diagnostics.is_empty());
		assert_eq!(
			TenantInfoModel::from_object(&state).expect("State should decode.").tenant_name,
			Value::Known("Acme".into())
		);
		assert_eq!(
			source.schema().expect("Schema should build.").attr_types(),
			TenantInfoModel::attr_types()
		);
	}

	#[tokio::test]
	async fn unconfigured_reads_report_a_single_diagnostic() {
		let source = TenantInfoDataSource::new(None);
		let response = TenantInfoDataSource::read(&source, ReadDataSourceRequest::default()).await;

		assert!(response.state.is_none());
		assert_eq!(response.diagnostics.len(), 1);
	}

	#[tokio::test]
	async fn failed_reads_include_the_transport_cause() {
		let backend = Arc::new(MemoryApi::default());
		let api: Arc<dyn CidaasApi> = backend.clone();
		let source = TenantInfoDataSource::new(Some(api));

		backend.fail_unreachable("connection refused");

		let response = TenantInfoDataSource::read(&source, ReadDataSourceRequest::default()).await;
		let detail = response.diagnostics.errors().next().map(|d| d.detail.as_str());

		assert!(response.state.is_none());
		assert_eq!(
			detail,
			Some(
				"Could not read tenant info: Network error occurred while calling the cidaas API: \
				 connection refused"
			)
		);
	}
}
