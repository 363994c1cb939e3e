//! Provider-level error types shared across resources, the API client, and configuration.

// self
use crate::_prelude::*;

/// Provider-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical provider error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// An operation needed an API client before the provider was configured.
	#[error("Provider has not been configured.")]
	NotConfigured,
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The cidaas API rejected or failed the call.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Access token acquisition failed.
	#[error(transparent)]
	Auth(#[from] AuthError),
}

/// Configuration and validation failures raised before any remote call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider configuration failed validation.
	#[error(transparent)]
	Provider(#[from] crate::provider::ProviderConfigError),
	/// Endpoint URL could not be derived from the base URL.
	#[error("Endpoint URL cannot be derived from base URL `{base}`.")]
	InvalidEndpoint {
		/// Base URL the endpoint was derived from.
		base: String,
	},
	/// Token endpoint URL was rejected by the OAuth client.
	#[error("Token endpoint URL is invalid.")]
	InvalidTokenEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Request payload could not be serialized.
	#[error("Request payload could not be serialized.")]
	Serialize(#[source] serde_json::Error),
	/// The crate was built without an HTTP transport.
	#[error("No HTTP transport is compiled in; enable the `{feature}` crate feature.")]
	MissingTransport {
		/// Cargo feature that provides the transport.
		feature: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures reported by the cidaas REST API.
#[derive(Debug, ThisError)]
pub enum ApiError {
	/// The API answered with a non-success HTTP status.
	#[error("cidaas API returned HTTP {status}: {message}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Message extracted from the error envelope or body preview.
		message: String,
	},
	/// The API answered 2xx but flagged the envelope as unsuccessful.
	#[error("cidaas API rejected the request: {message}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Message extracted from the error envelope.
		message: String,
	},
	/// The response body was not the expected JSON shape.
	#[error("cidaas API returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
	/// A successful envelope did not carry the expected `data` payload.
	#[error("cidaas API response is missing its data payload.")]
	MissingData {
		/// HTTP status code.
		status: u16,
	},
	/// No record exists for the requested identifier.
	#[error("{kind} `{id}` was not found.")]
	NotFound {
		/// Resource label.
		kind: &'static str,
		/// Identifier that was requested.
		id: String,
	},
}
impl ApiError {
	/// Returns the HTTP status code attached to the failure, when one exists.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. }
			| Self::Rejected { status, .. }
			| Self::ResponseParse { status, .. }
			| Self::MissingData { status } => Some(*status),
			Self::NotFound { .. } => None,
		}
	}
}

/// Access token acquisition failures.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// The token endpoint rejected the client credentials.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// The token endpoint failed in an unexpected way.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an `expires_in` outside the supported range.
	#[error("The expires_in value must be positive and fit in a signed 64-bit integer.")]
	ExpiresInOutOfRange,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the cidaas API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the cidaas API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Renders `err` followed by every error in its [`source`](StdError::source) chain, joined
/// with `": "`.
///
/// Causes whose text already appears in the rendered message are skipped.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
	let mut rendered = err.to_string();
	let mut source = err.source();

	while let Some(cause) = source {
		let cause_text = cause.to_string();

		if !cause_text.is_empty() && !rendered.contains(&cause_text) {
			rendered.truncate(rendered.trim_end_matches('.').len());
			rendered.push_str(": ");
			rendered.push_str(&cause_text);
		}

		source = cause.source();
	}

	rendered
}
