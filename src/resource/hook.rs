//! `cidaas_hook` resource (webhooks).

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	client::{self, ApiFuture, CidaasApi},
	resource::{self, ResourceKind},
	schema::{Attribute, Schema, SchemaError},
	validators,
	value::{AttrCodec, Value},
};

/// Authentication schemes accepted by the webhook service.
pub const AUTH_TYPES: [&str; 3] = ["APIKEY", "TOTP", "CIDAAS_OAUTH2"];
/// Places an API key can be sent.
pub const APIKEY_PLACEMENTS: [&str; 2] = ["query", "header"];

crate::tf_model! {
	/// API key settings nested in a hook.
	pub struct HookApiKeyDetailsModel {
		/// Secret key value.
		pub apikey: Value<String>,
		/// Parameter or header name carrying the key.
		pub apikey_placeholder: Value<String>,
		/// `query` or `header`.
		pub apikey_placement: Value<String>,
	}
}

crate::tf_model! {
	/// State of a `cidaas_hook` resource.
	pub struct HookModel {
		/// Remote identifier.
		pub id: Value<String>,
		/// RFC 3339 timestamp of the last create or update.
		pub last_updated: Value<String>,
		/// Target URL.
		pub url: Value<String>,
		/// Authentication scheme.
		pub auth_type: Value<String>,
		/// Subscribed events.
		pub events: Value<Vec<String>>,
		/// API key settings.
		pub apikey_details: Value<HookApiKeyDetailsModel>,
	}
}

/// Hook resource kind.
#[derive(Clone, Copy, Debug)]
pub struct HookResource;
impl ResourceKind for HookResource {
	type Model = HookModel;
	type Remote = client::Hook;

	const LABEL: &'static str = "hook";
	const TYPE_NAME: &'static str = "cidaas_hook";

	fn schema() -> Result<Schema, SchemaError> {
		Schema::builder("`cidaas_hook` manages webhooks that cidaas calls when events occur.")
			.attribute(Attribute::string("id").computed().use_state_for_unknown())
			.attribute(
				Attribute::string("last_updated")
					.computed()
					.description("Timestamp of the last change applied by the provider"),
			)
			.attribute(
				Attribute::string("url")
					.required()
					.validator(validators::matches(r"^https?://\S+$", "must be an http(s) URL")?)
					.description("URL that receives the events"),
			)
			.attribute(
				Attribute::string("auth_type")
					.required()
					.validator(validators::one_of(AUTH_TYPES))
					.description("Authentication scheme used when calling the hook"),
			)
			.attribute(
				Attribute::string_list("events")
					.required()
					.validator(validators::non_empty())
					.description("Events that trigger the hook"),
			)
			.attribute(
				Attribute::new("apikey_details", HookApiKeyDetailsModel::attr_type())
					.required()
					.sensitive()
					.validator(validators::nested(
						"apikey_placement",
						validators::one_of(APIKEY_PLACEMENTS),
					))
					.description("API key settings, used when `auth_type` is `APIKEY`"),
			)
			.build()
	}

	fn identifier(model: &Self::Model) -> Option<String> {
		resource::known_identifier(&model.id)
	}

	fn to_remote(plan: &Self::Model, prior: Option<&Self::Model>) -> Self::Remote {
		let details = plan.apikey_details.known().cloned().unwrap_or_default();

		client::Hook {
			id: prior.and_then(Self::identifier).unwrap_or_default(),
			auth_type: plan.auth_type.known_or_default(),
			url: plan.url.known_or_default(),
			events: plan.events.known_or_default(),
			apikey_details: client::HookApiKeyDetails {
				apikey: details.apikey.known_or_default(),
				apikey_placeholder: details.apikey_placeholder.known_or_default(),
				apikey_placement: details.apikey_placement.known_or_default(),
			},
		}
	}

	fn from_remote(remote: Self::Remote, prior: &Self::Model) -> Self::Model {
		let prior_details = prior.apikey_details.known();
		// The webhook service may omit the key itself from responses.
		let apikey = if remote.apikey_details.apikey.is_empty() {
			prior_details.map(|details| details.apikey.clone()).unwrap_or(Value::Known(String::new()))
		} else {
			Value::Known(remote.apikey_details.apikey)
		};

		HookModel {
			id: Value::Known(remote.id),
			last_updated: prior.last_updated.clone(),
			url: Value::Known(remote.url),
			auth_type: Value::Known(remote.auth_type),
			events: Value::Known(remote.events),
			apikey_details: Value::Known(HookApiKeyDetailsModel {
				apikey,
				apikey_placeholder: Value::Known(remote.apikey_details.apikey_placeholder),
				apikey_placement: Value::Known(remote.apikey_details.apikey_placement),
			}),
		}
	}

	fn carry_identity(prior: &Self::Model, next: &mut Self::Model) {
		next.id = prior.id.clone();
	}

	fn on_applied(model: &mut Self::Model) {
		model.last_updated = OffsetDateTime::now_utc().format(&Rfc3339).ok().into();
	}

	fn create(api: &dyn CidaasApi, remote: Self::Remote) -> ApiFuture<'_, Self::Remote> {
		api.create_hook(remote)
	}

	fn read<'a>(api: &'a dyn CidaasApi, id: &'a str) -> ApiFuture<'a, Self::Remote> {
		api.get_hook(id)
	}

	fn update(api: &dyn CidaasApi, remote: Self::Remote) -> ApiFuture<'_, Self::Remote> {
		api.update_hook(remote)
	}

	fn delete<'a>(api: &'a dyn CidaasApi, id: &'a str) -> ApiFuture<'a, ()> {
		api.delete_hook(id)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::value::{AttrValue, Model, Object};

	fn config(url: &str, placement: &str) -> Object {
		Object::from([
			("url".to_owned(), AttrValue::string(url)),
			("auth_type".to_owned(), AttrValue::string("APIKEY")),
			("events".to_owned(), AttrValue::strings(["ACCOUNT_CREATED"])),
			(
				"apikey_details".to_owned(),
				AttrValue::Object(Value::Known(Object::from([
					("apikey".to_owned(), AttrValue::string("secret")),
					("apikey_placeholder".to_owned(), AttrValue::string("api-key")),
					("apikey_placement".to_owned(), AttrValue::string(placement)),
				]))),
			),
		])
	}

	#[test]
	fn schema_matches_the_model() {
		let schema = HookResource::schema().expect("Schema should build.");

		assert_eq!(schema.attr_types(), HookModel::attr_types());
		assert!(schema.validate(&config("https://example.com/hook", "header")).is_empty());
	}

	#[test]
	fn schema_rejects_bad_urls_and_placements() {
		let schema = HookResource::schema().expect("Schema should build.");
		let diagnostics = schema.validate(&config("ftp://example.com", "body"));
		let paths = diagnostics
			.errors()
			.filter_map(|d| d.path.as_ref().map(ToString::to_string))
			.collect::<Vec<_>>();

		assert_eq!(paths, vec!["apikey_details.apikey_placement".to_owned(), "url".to_owned()]);
	}

	#[test]
	fn applied_hooks_carry_a_timestamp() {
		let mut model = HookModel::default();

		HookResource::on_applied(&mut model);

		let stamp = model.last_updated.known().expect("Timestamp should be set.");

		assert!(OffsetDateTime::parse(stamp, &Rfc3339).is_ok());
	}

	#[test]
	fn missing_remote_apikey_falls_back_to_prior() {
		let prior = HookModel::from_object(&config("https://example.com/hook", "header"))
			.expect("Config should decode.");
		let remote = client::Hook { id: "h-1".into(), ..Default::default() };
		let model = HookResource::from_remote(remote, &prior);

		assert_eq!(
			model.apikey_details.known().map(|details| details.apikey.clone()),
			Some(Value::Known("secret".into()))
		);
	}
}
