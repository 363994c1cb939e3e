//! Provider entry point: configuration, the shared client handle and the type registry.
//!
//! [`CidaasProvider::configure`] validates the provider block, falls back to `CIDAAS_*`
//! environment variables, builds the HTTP client and stores it as the read-only handle every
//! resource and data source receives. Until then the handle is `None` and every operation
//! reports "Provider not configured".

pub mod config;

pub use config::*;

// self
use crate::{
	_prelude::*,
	client::CidaasApi,
	data_source::{self, DynDataSource},
	diag::{AttributePath, Diagnostics},
	error::error_chain,
	obs::{self, OperationKind},
	resource::{self, DynResource, VALUE_CONVERSION_SUMMARY},
	schema::{Attribute, Schema, SchemaError},
	value::{Model, Object, Value},
};

const OBSERVED_NAME: &str = "provider";

crate::tf_model! {
	/// Provider block as written in configuration.
	pub struct ProviderModel {
		/// Tenant base URL.
		pub base_url: Value<String>,
		/// OAuth client identifier.
		pub client_id: Value<String>,
		/// OAuth client secret.
		pub client_secret: Value<String>,
	}
}

/// The cidaas provider.
#[derive(Default)]
pub struct CidaasProvider {
	client: RwLock<Option<Arc<dyn CidaasApi>>>,
}
impl CidaasProvider {
	/// Provider type name.
	pub const TYPE_NAME: &'static str = "cidaas";

	/// Schema of the provider block.
	pub fn schema() -> Result<Schema, SchemaError> {
		Schema::builder("Interact with the cidaas identity platform.")
			.attribute(
				Attribute::string("base_url")
					.optional()
					.description(format!("Tenant base URL. Falls back to `{BASE_URL_ENV}`.")),
			)
			.attribute(
				Attribute::string("client_id")
					.optional()
					.description(format!("OAuth client identifier. Falls back to `{CLIENT_ID_ENV}`.")),
			)
			.attribute(
				Attribute::string("client_secret")
					.optional()
					.sensitive()
					.description(format!("OAuth client secret. Falls back to `{CLIENT_SECRET_ENV}`.")),
			)
			.build()
	}

	/// Configures the provider from the provider block and the process environment.
	pub async fn configure(&self, config: &Object) -> Diagnostics {
		self.configure_with_env(config, |name| std::env::var(name).ok()).await
	}

	/// Configures the provider, resolving unset values through `lookup`.
	pub async fn configure_with_env<F>(&self, config: &Object, lookup: F) -> Diagnostics
	where
		F: Fn(&str) -> Option<String>,
	{
		obs::observe_operation(OperationKind::Configure, OBSERVED_NAME, async {
			self.configure_inner(config, lookup)
		})
		.await
	}

	/// Installs an already built API client, replacing any previous handle.
	pub fn configure_with(&self, api: Arc<dyn CidaasApi>) {
		*self.client.write() = Some(api);
	}

	/// Current client handle, if configured.
	pub fn client(&self) -> Option<Arc<dyn CidaasApi>> {
		self.client.read().clone()
	}

	/// Current client handle, or [`Error::NotConfigured`].
	pub fn require_client(&self) -> Result<Arc<dyn CidaasApi>> {
		self.client().ok_or(Error::NotConfigured)
	}

	/// Returns `true` once a client handle is installed.
	pub fn is_configured(&self) -> bool {
		self.client.read().is_some()
	}

	/// Every resource type, bound to the current client handle.
	pub fn resources(&self) -> Vec<Box<dyn DynResource>> {
		resource::registry(self.client())
	}

	/// Resource of the given type name.
	pub fn resource(&self, type_name: &str) -> Option<Box<dyn DynResource>> {
		self.resources().into_iter().find(|resource| resource.type_name() == type_name)
	}

	/// Every data source type, bound to the current client handle.
	pub fn data_sources(&self) -> Vec<Box<dyn DynDataSource>> {
		data_source::registry(self.client())
	}

	/// Data source of the given type name.
	pub fn data_source(&self, type_name: &str) -> Option<Box<dyn DynDataSource>> {
		self.data_sources().into_iter().find(|source| source.type_name() == type_name)
	}

	fn configure_inner<F>(&self, config: &Object, lookup: F) -> Diagnostics
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut diagnostics = match Self::schema() {
			Ok(schema) => schema.validate(config),
			Err(e) => {
				let mut diagnostics = Diagnostics::default();

				diagnostics.add_error("Invalid provider schema", e.to_string());

				return diagnostics;
			},
		};

		if diagnostics.has_error() {
			return diagnostics;
		}

		let model = match ProviderModel::from_object(config) {
			Ok(model) => model,
			Err(e) => {
				diagnostics.add_attribute_error(
					e.path(),
					VALUE_CONVERSION_SUMMARY,
					format!("Could not decode the provider configuration: {e}"),
				);

				return diagnostics;
			},
		};

		for (name, value) in [
			("base_url", &model.base_url),
			("client_id", &model.client_id),
			("client_secret", &model.client_secret),
		] {
			if value.is_unknown() {
				diagnostics.add_attribute_error(
					&AttributePath::root(name),
					"Unknown cidaas provider setting",
					format!(
						"The provider cannot create the cidaas API client as there is an unknown configuration value for {name}. Either target apply the source of the value first or set the value statically."
					),
				);
			}
		}

		if diagnostics.has_error() {
			return diagnostics;
		}

		let mut builder = ProviderConfig::builder();

		if let Some(base_url) = model.base_url.into_known() {
			builder = builder.base_url(base_url);
		}
		if let Some(client_id) = model.client_id.into_known() {
			builder = builder.client_id(client_id);
		}
		if let Some(client_secret) = model.client_secret.into_known() {
			builder = builder.client_secret(client_secret);
		}

		let settings = match builder.with_env_lookup(lookup).build() {
			Ok(settings) => settings,
			Err(e) => {
				diagnostics.add_attribute_error(
					&AttributePath::root(e.attribute()),
					"Invalid cidaas provider configuration",
					error_chain(&e),
				);

				return diagnostics;
			},
		};

		match build_client(&settings) {
			Ok(api) => self.configure_with(api),
			Err(e) => diagnostics.add_error(
				"Unable to create cidaas API client",
				format!(
					"An unexpected error occurred when creating the cidaas API client: {}",
					error_chain(&e)
				),
			),
		}

		diagnostics
	}
}
impl Debug for CidaasProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CidaasProvider").field("configured", &self.is_configured()).finish()
	}
}

#[cfg(feature = "reqwest")]
fn build_client(settings: &ProviderConfig) -> Result<Arc<dyn CidaasApi>> {
	Ok(Arc::new(crate::client::CidaasClient::new(settings)?))
}

#[cfg(not(feature = "reqwest"))]
fn build_client(_settings: &ProviderConfig) -> Result<Arc<dyn CidaasApi>> {
	Err(crate::error::ConfigError::MissingTransport { feature: "reqwest" }.into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::value::AttrValue;

	fn no_env(_: &str) -> Option<String> {
		None
	}

	#[tokio::test]
	async fn unknown_settings_leave_the_provider_unconfigured() {
		let provider = CidaasProvider::default();
		let config = Object::from([
			("base_url".to_owned(), AttrValue::String(Value::Unknown)),
			("client_id".to_owned(), AttrValue::string("id")),
			("client_secret".to_owned(), AttrValue::string("secret")),
		]);
		let diagnostics = provider.configure_with_env(&config, no_env).await;

		assert_eq!(diagnostics.len(), 1);
		assert_eq!(
			diagnostics.errors().next().and_then(|d| d.path.as_ref()).map(ToString::to_string),
			Some("base_url".into())
		);
		assert!(!provider.is_configured());
		assert!(matches!(provider.require_client(), Err(Error::NotConfigured)));
	}

	#[tokio::test]
	async fn missing_settings_name_the_environment_fallback() {
		let provider = CidaasProvider::default();
		let config = Object::from([("base_url".to_owned(), AttrValue::string("https://acme.cidaas.de"))]);
		let diagnostics = provider.configure_with_env(&config, no_env).await;
		let detail = diagnostics.errors().next().map(|d| d.detail.clone()).unwrap_or_default();

		assert!(detail.contains(CLIENT_ID_ENV));
		assert!(!provider.is_configured());
	}

	#[cfg(feature = "reqwest")]
	#[tokio::test]
	async fn valid_settings_install_a_client() {
		let provider = CidaasProvider::default();
		let diagnostics = provider
			.configure_with_env(&Object::new(), |name| match name {
				BASE_URL_ENV => Some("https://acme.cidaas.de".into()),
				CLIENT_ID_ENV => Some("id".into()),
				CLIENT_SECRET_ENV => Some("secret".into()),
				_ => None,
			})
			.await;

		assert!(diagnostics.is_empty(), "{diagnostics}");
		assert!(provider.is_configured());
		assert_eq!(provider.resources().len(), 5);
		assert!(provider.resource("cidaas_hook").is_some());
		assert!(provider.data_source("cidaas_tenant_info").is_some());
	}

	#[cfg(not(feature = "reqwest"))]
	#[tokio::test]
	async fn builds_without_a_transport_name_the_missing_feature() {
		let provider = CidaasProvider::default();
		let config = Object::from([
			("base_url".to_owned(), AttrValue::string("https://acme.cidaas.de")),
			("client_id".to_owned(), AttrValue::string("id")),
			("client_secret".to_owned(), AttrValue::string("secret")),
		]);
		let diagnostics = provider.configure_with_env(&config, no_env).await;
		let diagnostic = diagnostics.errors().next().expect("Configure should report an error.");

		assert_eq!(diagnostics.len(), 1);
		assert_eq!(diagnostic.summary, "Unable to create cidaas API client");
		assert!(diagnostic.detail.contains("`reqwest` crate feature"), "{}", diagnostic.detail);
		assert!(!diagnostic.detail.contains("has not been configured"));
		assert!(!provider.is_configured());
	}
}
