//! Terraform provider core for the cidaas identity platform: typed attribute values, schema
//! validation and a single generic CRUD adapter that mirrors remote cidaas records into
//! orchestrator state.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod data_source;
pub mod diag;
pub mod error;
pub mod obs;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod validators;
pub mod value;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{CidaasApi, MemoryApi},
		provider::CidaasProvider,
		value::{AttrValue, Object},
	};

	/// Builds a provider that is already configured against a fresh [`MemoryApi`].
	pub fn build_memory_provider() -> (CidaasProvider, Arc<MemoryApi>) {
		let backend = Arc::new(MemoryApi::default());
		let api: Arc<dyn CidaasApi> = backend.clone();
		let provider = CidaasProvider::default();

		provider.configure_with(api);

		(provider, backend)
	}

	/// Builds an [`Object`] from `(attribute, value)` pairs.
	pub fn object<I, K>(pairs: I) -> Object
	where
		I: IntoIterator<Item = (K, AttrValue)>,
		K: Into<String>,
	{
		pairs.into_iter().map(|(key, value)| (key.into(), value)).collect()
	}

	/// Builds a reqwest client that accepts the self-signed certificates produced by `httpmock`
	/// during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_client() -> ReqwestClient {
		ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.")
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		marker::PhantomData,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
