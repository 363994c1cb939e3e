//! reqwest-backed [`CidaasApi`] implementation.
//!
//! Every call obtains a bearer token through the OAuth 2.0 client credentials grant
//! (`POST {base}/token-srv/token`, credentials in the request body), caches it in a
//! [`TokenCache`], and decodes the cidaas response envelope with [`envelope`].
//!
//! [`envelope`]: crate::client::envelope

// crates.io
use oauth2::{
	AsyncHttpClient, AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, HttpRequest, HttpResponse, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponseType, BasicRequestTokenError},
};
use reqwest::{
	Method,
	header::{ACCEPT, CONTENT_TYPE},
	redirect::Policy,
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	client::{
		AccessToken, ApiFuture, App, CidaasApi, ConsentInstance, Hook, HostedPageGroup,
		PasswordPolicy, Secret, TenantInfo, TokenCache, envelope,
	},
	error::{AuthError, ConfigError, TransportError},
	provider::ProviderConfig,
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

const TOKEN_PATH: &[&str] = &["token-srv", "token"];
const PASSWORD_POLICY_PATH: &[&str] = &["password-policy-srv", "policy"];
const HOOK_PATH: &[&str] = &["webhook-srv", "webhook"];
const APP_PATH: &[&str] = &["apps-srv", "clients"];
const CONSENT_INSTANCE_PATH: &[&str] = &["consent-management-srv", "v2", "consent", "instance"];
const HOSTED_PAGE_GROUP_PATH: &[&str] = &["hostedpages-srv", "hpgroup"];
const TENANT_INFO_PATH: &[&str] = &["tenant-srv", "tenantinfo", "basic"];

/// HTTP client for the cidaas REST API.
pub struct CidaasClient {
	http: ReqwestClient,
	base_url: Url,
	oauth: ConfiguredBasicClient,
	tokens: TokenCache,
}
impl CidaasClient {
	/// Builds a client with a default reqwest transport that never follows redirects.
	pub fn new(config: &ProviderConfig) -> Result<Self> {
		let http = ReqwestClient::builder().redirect(Policy::none()).build().map_err(ConfigError::from)?;

		Self::with_http_client(config, http)
	}

	/// Builds a client around a caller-supplied reqwest transport.
	///
	/// The transport should not follow redirects; token and API endpoints answer directly.
	pub fn with_http_client(config: &ProviderConfig, http: ReqwestClient) -> Result<Self> {
		let token_url = endpoint(&config.base_url, TOKEN_PATH, None)?;
		let token_url = TokenUrl::new(token_url.to_string())
			.map_err(|source| ConfigError::InvalidTokenEndpoint { source })?;
		let oauth = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.expose().to_owned()))
			.set_token_uri(token_url)
			.set_auth_type(AuthType::RequestBody);

		Ok(Self { http, base_url: config.base_url.clone(), oauth, tokens: TokenCache::default() })
	}

	async fn access_token(&self) -> Result<Secret> {
		self.tokens.get_or_fetch(|| self.fetch_token()).await
	}

	async fn fetch_token(&self) -> Result<AccessToken> {
		let slot = StatusSlot::default();
		let handle = TokenHttpHandle { client: self.http.clone(), slot: slot.clone() };
		let response = self
			.oauth
			.exchange_client_credentials()
			.request_async(&handle)
			.await
			.map_err(|e| map_token_error(e, slot.take()))?;
		let expires_in = response.expires_in().ok_or(AuthError::MissingExpiresIn)?.as_secs();
		let expires_in = i64::try_from(expires_in)
			.ok()
			.filter(|secs| *secs > 0)
			.ok_or(AuthError::ExpiresInOutOfRange)?;

		Ok(AccessToken::new(
			Secret::new(response.access_token().secret().to_owned()),
			OffsetDateTime::now_utc(),
			Duration::seconds(expires_in),
		))
	}

	async fn execute(
		&self,
		method: Method,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<(u16, Vec<u8>)> {
		let token = self.access_token().await?;
		let mut request =
			self.http.request(method, url).bearer_auth(token.expose()).header(ACCEPT, "application/json");

		if let Some(body) = body {
			request = request.header(CONTENT_TYPE, "application/json").body(body);
		}

		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status().as_u16();
		let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

		if status == 401 {
			self.tokens.invalidate();
		}

		Ok((status, body))
	}

	async fn call<T>(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let (status, body) = self.execute(method, url, body).await?;

		Ok(envelope::decode_response(status, &body)?)
	}

	async fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T>
	where
		B: Serialize,
		T: DeserializeOwned,
	{
		let body = serde_json::to_vec(body).map_err(ConfigError::Serialize)?;

		self.call(method, url, Some(body)).await
	}

	async fn delete(&self, url: Url) -> Result<()> {
		let (status, body) = self.execute(Method::DELETE, url, None).await?;

		Ok(envelope::decode_ack(status, &body)?)
	}

	fn url(&self, path: &[&str], id: Option<&str>) -> Result<Url> {
		endpoint(&self.base_url, path, id)
	}
}
impl Debug for CidaasClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CidaasClient").field("base_url", &self.base_url.as_str()).finish()
	}
}
impl CidaasApi for CidaasClient {
	fn create_password_policy(&self, policy: PasswordPolicy) -> ApiFuture<'_, PasswordPolicy> {
		Box::pin(async move {
			self.send_json(Method::POST, self.url(PASSWORD_POLICY_PATH, None)?, &policy).await
		})
	}

	fn get_password_policy<'a>(&'a self, id: &'a str) -> ApiFuture<'a, PasswordPolicy> {
		Box::pin(
			async move { self.call(Method::GET, self.url(PASSWORD_POLICY_PATH, Some(id))?, None).await },
		)
	}

	fn update_password_policy(&self, policy: PasswordPolicy) -> ApiFuture<'_, PasswordPolicy> {
		// The policy service upserts on POST when the body carries an id.
		Box::pin(async move {
			self.send_json(Method::POST, self.url(PASSWORD_POLICY_PATH, None)?, &policy).await
		})
	}

	fn delete_password_policy<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()> {
		Box::pin(async move { self.delete(self.url(PASSWORD_POLICY_PATH, Some(id))?).await })
	}

	fn create_hook(&self, hook: Hook) -> ApiFuture<'_, Hook> {
		Box::pin(async move { self.send_json(Method::POST, self.url(HOOK_PATH, None)?, &hook).await })
	}

	fn get_hook<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Hook> {
		Box::pin(async move {
			let mut url = self.url(HOOK_PATH, None)?;

			url.query_pairs_mut().append_pair("id", id);

			self.call(Method::GET, url, None).await
		})
	}

	fn update_hook(&self, hook: Hook) -> ApiFuture<'_, Hook> {
		Box::pin(async move { self.send_json(Method::POST, self.url(HOOK_PATH, None)?, &hook).await })
	}

	fn delete_hook<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()> {
		Box::pin(async move { self.delete(self.url(HOOK_PATH, Some(id))?).await })
	}

	fn create_app(&self, app: App) -> ApiFuture<'_, App> {
		Box::pin(async move { self.send_json(Method::POST, self.url(APP_PATH, None)?, &app).await })
	}

	fn get_app<'a>(&'a self, client_id: &'a str) -> ApiFuture<'a, App> {
		Box::pin(async move { self.call(Method::GET, self.url(APP_PATH, Some(client_id))?, None).await })
	}

	fn update_app(&self, app: App) -> ApiFuture<'_, App> {
		Box::pin(async move { self.send_json(Method::PUT, self.url(APP_PATH, None)?, &app).await })
	}

	fn delete_app<'a>(&'a self, client_id: &'a str) -> ApiFuture<'a, ()> {
		Box::pin(async move { self.delete(self.url(APP_PATH, Some(client_id))?).await })
	}

	fn create_consent_instance(
		&self,
		instance: ConsentInstance,
	) -> ApiFuture<'_, ConsentInstance> {
		Box::pin(async move {
			self.send_json(Method::POST, self.url(CONSENT_INSTANCE_PATH, None)?, &instance).await
		})
	}

	fn get_consent_instance<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ConsentInstance> {
		Box::pin(async move {
			self.call(Method::GET, self.url(CONSENT_INSTANCE_PATH, Some(id))?, None).await
		})
	}

	fn update_consent_instance(
		&self,
		instance: ConsentInstance,
	) -> ApiFuture<'_, ConsentInstance> {
		Box::pin(async move {
			let url = self.url(CONSENT_INSTANCE_PATH, Some(&instance.id))?;

			self.send_json(Method::PUT, url, &instance).await
		})
	}

	fn delete_consent_instance<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()> {
		Box::pin(async move { self.delete(self.url(CONSENT_INSTANCE_PATH, Some(id))?).await })
	}

	fn create_hosted_page_group(&self, group: HostedPageGroup) -> ApiFuture<'_, HostedPageGroup> {
		Box::pin(async move {
			self.send_json(Method::POST, self.url(HOSTED_PAGE_GROUP_PATH, None)?, &group).await
		})
	}

	fn get_hosted_page_group<'a>(&'a self, name: &'a str) -> ApiFuture<'a, HostedPageGroup> {
		Box::pin(async move {
			self.call(Method::GET, self.url(HOSTED_PAGE_GROUP_PATH, Some(name))?, None).await
		})
	}

	fn update_hosted_page_group(&self, group: HostedPageGroup) -> ApiFuture<'_, HostedPageGroup> {
		Box::pin(async move {
			self.send_json(Method::POST, self.url(HOSTED_PAGE_GROUP_PATH, None)?, &group).await
		})
	}

	fn delete_hosted_page_group<'a>(&'a self, name: &'a str) -> ApiFuture<'a, ()> {
		Box::pin(async move { self.delete(self.url(HOSTED_PAGE_GROUP_PATH, Some(name))?).await })
	}

	fn get_tenant_info(&self) -> ApiFuture<'_, TenantInfo> {
		Box::pin(async move { self.call(Method::GET, self.url(TENANT_INFO_PATH, None)?, None).await })
	}
}

/// Records the HTTP status of the token endpoint response for error mapping.
#[derive(Clone, Debug, Default)]
struct StatusSlot(Arc<Mutex<Option<u16>>>);
impl StatusSlot {
	fn store(&self, status: u16) {
		*self.0.lock() = Some(status);
	}

	fn take(&self) -> Option<u16> {
		self.0.lock().take()
	}
}

/// [`AsyncHttpClient`] adapter handed to `oauth2` for the token exchange.
#[derive(Clone)]
struct TokenHttpHandle {
	client: ReqwestClient,
	slot: StatusSlot,
}
impl<'c> AsyncHttpClient<'c> for TokenHttpHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.client.clone();
		let slot = self.slot.clone();

		Box::pin(async move {
			slot.take();

			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();

			slot.store(status.as_u16());

			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

fn endpoint(base: &Url, path: &[&str], id: Option<&str>) -> Result<Url> {
	let mut url = base.clone();

	{
		let mut segments = url
			.path_segments_mut()
			.map_err(|_| ConfigError::InvalidEndpoint { base: base.to_string() })?;

		segments.pop_if_empty().extend(path);

		if let Some(id) = id {
			segments.push(id);
		}
	}

	Ok(url)
}

fn map_token_error(err: BasicRequestTokenError<HttpClientError<ReqwestError>>, status: Option<u16>) -> Error {
	match err {
		RequestTokenError::ServerResponse(response) => {
			let reason = response
				.error_description()
				.cloned()
				.unwrap_or_else(|| response.error().as_ref().to_owned());

			match response.error() {
				BasicErrorResponseType::InvalidClient | BasicErrorResponseType::UnauthorizedClient =>
					AuthError::InvalidClient { reason }.into(),
				_ => AuthError::TokenEndpoint { message: reason, status }.into(),
			}
		},
		RequestTokenError::Request(HttpClientError::Reqwest(inner)) => TransportError::from(*inner).into(),
		RequestTokenError::Request(HttpClientError::Http(inner)) => ConfigError::from(inner).into(),
		RequestTokenError::Request(HttpClientError::Io(inner)) => TransportError::Io(inner).into(),
		RequestTokenError::Request(HttpClientError::Other(message)) =>
			AuthError::TokenEndpoint { message, status }.into(),
		RequestTokenError::Request(_) => AuthError::TokenEndpoint {
			message: "HTTP client error occurred while calling the token endpoint".into(),
			status,
		}
		.into(),
		RequestTokenError::Parse(source, _body) => AuthError::TokenResponseParse { source, status }.into(),
		RequestTokenError::Other(message) => AuthError::TokenEndpoint { message, status }.into(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn endpoints_extend_the_base_path() {
		let base = Url::parse("https://tenant.cidaas.de/").expect("Base URL should parse.");

		assert_eq!(
			endpoint(&base, TOKEN_PATH, None).expect("Token endpoint should build.").as_str(),
			"https://tenant.cidaas.de/token-srv/token"
		);
		assert_eq!(
			endpoint(&base, APP_PATH, Some("client/1"))
				.expect("App endpoint should build.")
				.as_str(),
			"https://tenant.cidaas.de/apps-srv/clients/client%2F1"
		);

		let prefixed = Url::parse("https://proxy.example.com/cidaas").expect("Prefixed URL should parse.");

		assert_eq!(
			endpoint(&prefixed, HOOK_PATH, None).expect("Hook endpoint should build.").as_str(),
			"https://proxy.example.com/cidaas/webhook-srv/webhook"
		);
	}

	#[test]
	fn endpoints_reject_cannot_be_a_base_urls() {
		let base = Url::parse("mailto:ops@example.com").expect("Mailto URL should parse.");

		assert!(matches!(
			endpoint(&base, TOKEN_PATH, None),
			Err(Error::Config(ConfigError::InvalidEndpoint { .. }))
		));
	}
}
