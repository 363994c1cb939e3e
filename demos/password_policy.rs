//! Configures the provider against a mocked cidaas tenant and applies a password policy through
//! the generic CRUD adapter, printing the recorded state.

// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use serde_json::json;
// self
use cidaas_provider::{
	diag::Diagnostics,
	provider::CidaasProvider,
	resource::CreateRequest,
	value::{AttrValue, Object},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token-srv/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let policy_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/password-policy-srv/policy");
			then.status(200).header("content-type", "application/json").body(
				json!({
					"success": true,
					"status": 200,
					"data": {
						"_id": "7c1f0b6e",
						"policyName": "demo",
						"minimumLength": 12,
						"noOfDigits": 2,
						"lowerAndUpperCase": true,
						"noOfSpecialChars": 1
					}
				})
				.to_string(),
			);
		})
		.await;
	let provider = CidaasProvider::default();
	let config = Object::from([
		("base_url".to_owned(), AttrValue::string(server.base_url())),
		("client_id".to_owned(), AttrValue::string("demo-client")),
		("client_secret".to_owned(), AttrValue::string("super-secret")),
	]);

	ensure_ok(provider.configure(&config).await)?;

	let policies = provider
		.resource("cidaas_password_policy")
		.ok_or_else(|| eyre!("Password policy resource is not registered."))?;
	let policy = Object::from([
		("policy_name".to_owned(), AttrValue::string("demo")),
		("lower_and_upper_case".to_owned(), AttrValue::bool(true)),
		("minimum_length".to_owned(), AttrValue::int64(12)),
		("no_of_digits".to_owned(), AttrValue::int64(2)),
		("no_of_special_chars".to_owned(), AttrValue::int64(1)),
	]);

	ensure_ok(policies.validate(&policy))?;

	let plan = policies.plan(&policy, None)?.planned_state;
	let response = policies.create(CreateRequest { plan }).await;

	ensure_ok(response.diagnostics)?;

	for (name, value) in response.state.unwrap_or_default() {
		println!("{name} = {value:?}");
	}

	token_mock.assert_async().await;
	policy_mock.assert_async().await;

	Ok(())
}

fn ensure_ok(diagnostics: Diagnostics) -> Result<()> {
	if diagnostics.has_error() { Err(eyre!("{diagnostics}")) } else { Ok(()) }
}
