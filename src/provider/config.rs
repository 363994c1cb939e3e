//! Provider connection settings and their validation.

// std
use std::net::IpAddr;
// crates.io
use url::Host;
// self
use crate::{_prelude::*, client::Secret};

/// Environment variable consulted when `base_url` is not configured.
pub const BASE_URL_ENV: &str = "CIDAAS_BASE_URL";
/// Environment variable consulted when `client_id` is not configured.
pub const CLIENT_ID_ENV: &str = "CIDAAS_CLIENT_ID";
/// Environment variable consulted when `client_secret` is not configured.
pub const CLIENT_SECRET_ENV: &str = "CIDAAS_CLIENT_SECRET";

/// Errors raised while assembling a [`ProviderConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderConfigError {
	/// A setting was neither configured nor present in the environment.
	#[error("Missing `{attribute}`; set it in the provider block or through `{env}`.")]
	Missing {
		/// Provider attribute name.
		attribute: &'static str,
		/// Environment variable fallback.
		env: &'static str,
	},
	/// The base URL does not parse.
	#[error("Base URL `{value}` is not a valid URL.")]
	InvalidBaseUrl {
		/// Rejected input.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The base URL uses a scheme other than HTTPS.
	#[error("Base URL must use HTTPS, got `{scheme}`; plain HTTP is only accepted for loopback hosts.")]
	InsecureBaseUrl {
		/// Rejected scheme.
		scheme: String,
	},
	/// The base URL carries a query string or fragment.
	#[error("Base URL must not carry a query or fragment: {url}.")]
	UnexpectedUrlParts {
		/// Rejected URL.
		url: String,
	},
}
impl ProviderConfigError {
	/// Provider attribute the error refers to.
	pub fn attribute(&self) -> &'static str {
		match self {
			Self::Missing { attribute, .. } => *attribute,
			_ => "base_url",
		}
	}
}

/// Validated connection settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
	/// Tenant base URL, e.g. `https://acme.cidaas.de`.
	pub base_url: Url,
	/// OAuth client identifier used for the client credentials grant.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: Secret,
}
impl ProviderConfig {
	/// Creates an empty builder.
	pub fn builder() -> ProviderConfigBuilder {
		ProviderConfigBuilder::default()
	}
}

/// Builder for [`ProviderConfig`]. Empty strings count as unset.
#[derive(Clone, Debug, Default)]
pub struct ProviderConfigBuilder {
	base_url: Option<String>,
	client_id: Option<String>,
	client_secret: Option<Secret>,
}
impl ProviderConfigBuilder {
	/// Sets the tenant base URL.
	pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = non_empty(base_url.into());

		self
	}

	/// Sets the OAuth client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = non_empty(client_id.into());

		self
	}

	/// Sets the OAuth client secret.
	pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
		self.client_secret = non_empty(client_secret.into()).map(Secret::new);

		self
	}

	/// Fills unset values through `lookup`, called with the environment variable name.
	pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		if self.base_url.is_none() {
			self.base_url = lookup(BASE_URL_ENV).and_then(non_empty);
		}
		if self.client_id.is_none() {
			self.client_id = lookup(CLIENT_ID_ENV).and_then(non_empty);
		}
		if self.client_secret.is_none() {
			self.client_secret = lookup(CLIENT_SECRET_ENV).and_then(non_empty).map(Secret::new);
		}

		self
	}

	/// Consumes the builder and validates the settings.
	pub fn build(self) -> Result<ProviderConfig, ProviderConfigError> {
		let base_url = self
			.base_url
			.ok_or(ProviderConfigError::Missing { attribute: "base_url", env: BASE_URL_ENV })?;
		let client_id = self
			.client_id
			.ok_or(ProviderConfigError::Missing { attribute: "client_id", env: CLIENT_ID_ENV })?;
		let client_secret = self.client_secret.ok_or(ProviderConfigError::Missing {
			attribute: "client_secret",
			env: CLIENT_SECRET_ENV,
		})?;
		let base_url = parse_base_url(&base_url)?;

		Ok(ProviderConfig { base_url, client_id, client_secret })
	}
}

fn parse_base_url(value: &str) -> Result<Url, ProviderConfigError> {
	let url = Url::parse(value.trim())
		.map_err(|source| ProviderConfigError::InvalidBaseUrl { value: value.to_owned(), source })?;

	match url.scheme() {
		"https" => (),
		"http" if is_loopback(&url) => (),
		scheme => return Err(ProviderConfigError::InsecureBaseUrl { scheme: scheme.to_owned() }),
	}

	if url.query().is_some() || url.fragment().is_some() {
		return Err(ProviderConfigError::UnexpectedUrlParts { url: url.to_string() });
	}

	Ok(url)
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
		Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
		None => false,
	}
}

fn non_empty(value: String) -> Option<String> {
	if value.trim().is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn environment_fills_only_unset_values() {
		let config = ProviderConfig::builder()
			.client_id("from-config")
			.with_env_lookup(|name| match name {
				BASE_URL_ENV => Some("https://acme.cidaas.de".into()),
				CLIENT_ID_ENV => Some("from-env".into()),
				CLIENT_SECRET_ENV => Some("s3cr3t".into()),
				_ => None,
			})
			.build()
			.expect("Config should build.");

		assert_eq!(config.base_url.as_str(), "https://acme.cidaas.de/");
		assert_eq!(config.client_id, "from-config");
		assert_eq!(config.client_secret.expose(), "s3cr3t");
	}

	#[test]
	fn empty_values_count_as_missing() {
		let err = ProviderConfig::builder()
			.base_url("https://acme.cidaas.de")
			.client_id("")
			.client_secret("s3cr3t")
			.build()
			.expect_err("Empty client id should be rejected.");

		assert_eq!(err, ProviderConfigError::Missing { attribute: "client_id", env: CLIENT_ID_ENV });
		assert_eq!(err.attribute(), "client_id");
	}

	#[test]
	fn plain_http_is_limited_to_loopback_hosts() {
		let build = |base_url: &str| {
			ProviderConfig::builder()
				.base_url(base_url)
				.client_id("id")
				.client_secret("secret")
				.build()
		};

		assert!(build("http://127.0.0.1:8080").is_ok());
		assert!(build("http://localhost").is_ok());
		assert!(build("http://[::1]:9000").is_ok());
		assert_eq!(
			build("http://acme.cidaas.de"),
			Err(ProviderConfigError::InsecureBaseUrl { scheme: "http".into() })
		);
		assert!(matches!(
			build("https://acme.cidaas.de/?tenant=x"),
			Err(ProviderConfigError::UnexpectedUrlParts { .. })
		));
		assert!(matches!(build("not a url"), Err(ProviderConfigError::InvalidBaseUrl { .. })));
	}
}
