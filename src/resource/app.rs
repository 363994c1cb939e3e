//! `cidaas_app` resource: OAuth clients registered in the tenant.
//!
//! The app is addressed by `client_id`. Credentials (`client_secret`, `app_key`) are generated
//! remotely on create and are not echoed by every response, so the previous state fills gaps.

// self
use crate::{
	client::{self, ApiFuture, CidaasApi},
	resource::{self, ResourceKind},
	schema::{Attribute, Schema, SchemaError},
	validators,
	value::{AttrCodec, Value},
};

/// Client types accepted by the apps service.
pub const CLIENT_TYPES: [&str; 10] = [
	"SINGLE_PAGE",
	"REGULAR_WEB",
	"NON_INTERACTIVE",
	"IOS",
	"ANDROID",
	"WINDOWS_MOBILE",
	"DESKTOP",
	"MOBILE",
	"DEVICE",
	"THIRD_PARTY",
];

const COLOR_PATTERN: &str = "^#[0-9a-fA-F]{6}$";

crate::tf_model! {
	/// Social login provider linked to an app.
	pub struct SocialProviderModel {
		/// Provider configuration identifier.
		pub social_id: Value<String>,
		/// Provider name (e.g. `google`).
		pub provider_name: Value<String>,
		/// Provider type.
		pub provider_type: Value<String>,
	}
}

crate::tf_model! {
	/// Key material generated for an app.
	pub struct AppKeyModel {
		/// Key identifier.
		pub id: Value<String>,
		/// Owning client identifier.
		pub client_id: Value<String>,
		/// Public key.
		pub public_key: Value<String>,
		/// Private key.
		pub private_key: Value<String>,
	}
}

crate::tf_model! {
	/// State of a `cidaas_app` resource.
	#[allow(missing_docs)]
	pub struct AppModel {
		pub id: Value<String>,
		pub client_id: Value<String>,
		pub client_secret: Value<String>,
		pub client_name: Value<String>,
		pub client_display_name: Value<String>,
		pub client_type: Value<String>,
		pub is_remember_me_selected: Value<bool>,
		pub allow_disposable_email: Value<bool>,
		pub fds_enabled: Value<bool>,
		pub enable_passwordless_auth: Value<bool>,
		pub enable_deduplication: Value<bool>,
		pub mobile_number_verification_required: Value<bool>,
		pub hosted_page_group: Value<String>,
		pub primary_color: Value<String>,
		pub accent_color: Value<String>,
		pub auto_login_after_register: Value<bool>,
		pub company_name: Value<String>,
		pub company_address: Value<String>,
		pub company_website: Value<String>,
		pub token_lifetime_in_seconds: Value<i64>,
		pub id_token_lifetime_in_seconds: Value<i64>,
		pub refresh_token_lifetime_in_seconds: Value<i64>,
		pub email_verification_required: Value<bool>,
		pub enable_bot_detection: Value<bool>,
		pub is_login_success_page_enabled: Value<bool>,
		pub allow_guest_login: Value<bool>,
		pub jwe_enabled: Value<bool>,
		pub always_ask_mfa: Value<bool>,
		pub password_policy: Value<String>,
		pub app_key: Value<AppKeyModel>,
		pub allow_login_with: Value<Vec<String>>,
		pub redirect_uris: Value<Vec<String>>,
		pub allowed_logout_urls: Value<Vec<String>>,
		pub social_providers: Value<Vec<SocialProviderModel>>,
		pub additional_access_token_payload: Value<Vec<String>>,
		pub allowed_scopes: Value<Vec<String>>,
		pub allowed_fields: Value<Vec<String>>,
		pub required_fields: Value<Vec<String>>,
		pub consent_refs: Value<Vec<String>>,
		pub response_types: Value<Vec<String>>,
		pub grant_types: Value<Vec<String>>,
		pub allowed_web_origins: Value<Vec<String>>,
		pub allowed_origins: Value<Vec<String>>,
		pub allowed_mfa: Value<Vec<String>>,
	}
}

/// App resource kind.
#[derive(Clone, Copy, Debug)]
pub struct AppResource;
impl ResourceKind for AppResource {
	type Model = AppModel;
	type Remote = client::App;

	const LABEL: &'static str = "app";
	const TYPE_NAME: &'static str = "cidaas_app";

	fn schema() -> Result<Schema, SchemaError> {
		let mut builder = Schema::builder("`cidaas_app` manages OAuth clients (apps) in the tenant.")
			.attribute(Attribute::string("id").computed().use_state_for_unknown())
			.attribute(
				Attribute::string("client_id")
					.computed()
					.use_state_for_unknown()
					.description("OAuth client identifier assigned by cidaas"),
			)
			.attribute(
				Attribute::string("client_secret")
					.computed()
					.sensitive()
					.use_state_for_unknown()
					.description("OAuth client secret assigned by cidaas"),
			)
			.attribute(
				Attribute::new("app_key", AppKeyModel::attr_type())
					.computed()
					.sensitive()
					.use_state_for_unknown()
					.description("Signing key pair generated for the app"),
			)
			.attribute(
				Attribute::string("client_name")
					.required()
					.validator(validators::non_empty())
					.description("Name of the app"),
			)
			.attribute(
				Attribute::string("client_type")
					.required()
					.validator(validators::one_of(CLIENT_TYPES))
					.description("Type of the app"),
			)
			.attribute(
				Attribute::new("social_providers", <Vec<SocialProviderModel>>::attr_type())
					.optional()
					.computed()
					.description("Social login providers offered by the app"),
			);

		let color = validators::matches(COLOR_PATTERN, "must be a hex color like #1f2937")?;

		for name in ["primary_color", "accent_color"] {
			builder = builder.attribute(optional(Attribute::string(name)).validator(color.clone()));
		}
		for name in [
			"token_lifetime_in_seconds",
			"id_token_lifetime_in_seconds",
			"refresh_token_lifetime_in_seconds",
		] {
			builder = builder.attribute(optional(Attribute::int64(name)).validator(validators::at_least(0)));
		}
		for name in [
			"client_display_name",
			"hosted_page_group",
			"company_name",
			"company_address",
			"company_website",
			"password_policy",
		] {
			builder = builder.attribute(optional(Attribute::string(name)));
		}
		for name in [
			"is_remember_me_selected",
			"allow_disposable_email",
			"fds_enabled",
			"enable_passwordless_auth",
			"enable_deduplication",
			"mobile_number_verification_required",
			"auto_login_after_register",
			"email_verification_required",
			"enable_bot_detection",
			"is_login_success_page_enabled",
			"allow_guest_login",
			"jwe_enabled",
			"always_ask_mfa",
		] {
			builder = builder.attribute(optional(Attribute::bool(name)));
		}
		for name in [
			"allow_login_with",
			"redirect_uris",
			"allowed_logout_urls",
			"additional_access_token_payload",
			"allowed_scopes",
			"allowed_fields",
			"required_fields",
			"consent_refs",
			"response_types",
			"grant_types",
			"allowed_web_origins",
			"allowed_origins",
			"allowed_mfa",
		] {
			builder = builder.attribute(optional(Attribute::string_list(name)));
		}

		builder.build()
	}

	fn identifier(model: &Self::Model) -> Option<String> {
		resource::known_identifier(&model.client_id)
	}

	fn to_remote(plan: &Self::Model, prior: Option<&Self::Model>) -> Self::Remote {
		let social_providers = plan
			.social_providers
			.known_or_default()
			.into_iter()
			.map(|provider| client::SocialProvider {
				social_id: provider.social_id.known_or_default(),
				provider_name: provider.provider_name.known_or_default(),
				provider_type: provider.provider_type.known_or_default(),
			})
			.collect();

		client::App {
			id: prior.map(|prior| prior.id.known_or_default()).unwrap_or_default(),
			client_id: prior.and_then(Self::identifier).unwrap_or_default(),
			client_secret: String::new(),
			client_name: plan.client_name.known_or_default(),
			client_display_name: plan.client_display_name.known_or_default(),
			client_type: plan.client_type.known_or_default(),
			is_remember_me_selected: plan.is_remember_me_selected.known_or_default(),
			allow_disposable_email: plan.allow_disposable_email.known_or_default(),
			fds_enabled: plan.fds_enabled.known_or_default(),
			enable_passwordless_auth: plan.enable_passwordless_auth.known_or_default(),
			enable_deduplication: plan.enable_deduplication.known_or_default(),
			mobile_number_verification_required: plan
				.mobile_number_verification_required
				.known_or_default(),
			hosted_page_group: plan.hosted_page_group.known_or_default(),
			primary_color: plan.primary_color.known_or_default(),
			accent_color: plan.accent_color.known_or_default(),
			auto_login_after_register: plan.auto_login_after_register.known_or_default(),
			company_name: plan.company_name.known_or_default(),
			company_address: plan.company_address.known_or_default(),
			company_website: plan.company_website.known_or_default(),
			token_lifetime_in_seconds: plan.token_lifetime_in_seconds.known_or_default(),
			id_token_lifetime_in_seconds: plan.id_token_lifetime_in_seconds.known_or_default(),
			refresh_token_lifetime_in_seconds: plan
				.refresh_token_lifetime_in_seconds
				.known_or_default(),
			email_verification_required: plan.email_verification_required.known_or_default(),
			enable_bot_detection: plan.enable_bot_detection.known_or_default(),
			is_login_success_page_enabled: plan.is_login_success_page_enabled.known_or_default(),
			allow_guest_login: plan.allow_guest_login.known_or_default(),
			jwe_enabled: plan.jwe_enabled.known_or_default(),
			always_ask_mfa: plan.always_ask_mfa.known_or_default(),
			password_policy_ref: plan.password_policy.known_or_default(),
			app_key: None,
			allow_login_with: plan.allow_login_with.known_or_default(),
			redirect_uris: plan.redirect_uris.known_or_default(),
			allowed_logout_urls: plan.allowed_logout_urls.known_or_default(),
			social_providers,
			additional_access_token_payload: plan.additional_access_token_payload.known_or_default(),
			allowed_scopes: plan.allowed_scopes.known_or_default(),
			allowed_fields: plan.allowed_fields.known_or_default(),
			required_fields: plan.required_fields.known_or_default(),
			consent_refs: plan.consent_refs.known_or_default(),
			response_types: plan.response_types.known_or_default(),
			grant_types: plan.grant_types.known_or_default(),
			allowed_web_origins: plan.allowed_web_origins.known_or_default(),
			allowed_origins: plan.allowed_origins.known_or_default(),
			allowed_mfa: plan.allowed_mfa.known_or_default(),
		}
	}

	fn from_remote(remote: Self::Remote, prior: &Self::Model) -> Self::Model {
		let client_secret = if remote.client_secret.is_empty() {
			known_or_empty(&prior.client_secret)
		} else {
			Value::Known(remote.client_secret)
		};
		let app_key = match remote.app_key {
			Some(key) => Value::Known(AppKeyModel {
				id: Value::Known(key.id),
				client_id: Value::Known(key.client_id),
				public_key: Value::Known(key.public_key),
				private_key: Value::Known(key.private_key),
			}),
			None if prior.app_key.is_unknown() => Value::Null,
			None => prior.app_key.clone(),
		};
		let social_providers = remote
			.social_providers
			.into_iter()
			.map(|provider| SocialProviderModel {
				social_id: Value::Known(provider.social_id),
				provider_name: Value::Known(provider.provider_name),
				provider_type: Value::Known(provider.provider_type),
			})
			.collect();

		AppModel {
			id: Value::Known(remote.id),
			client_id: Value::Known(remote.client_id),
			client_secret,
			client_name: Value::Known(remote.client_name),
			client_display_name: Value::Known(remote.client_display_name),
			client_type: Value::Known(remote.client_type),
			is_remember_me_selected: Value::Known(remote.is_remember_me_selected),
			allow_disposable_email: Value::Known(remote.allow_disposable_email),
			fds_enabled: Value::Known(remote.fds_enabled),
			enable_passwordless_auth: Value::Known(remote.enable_passwordless_auth),
			enable_deduplication: Value::Known(remote.enable_deduplication),
			mobile_number_verification_required: Value::Known(
				remote.mobile_number_verification_required,
			),
			hosted_page_group: Value::Known(remote.hosted_page_group),
			primary_color: Value::Known(remote.primary_color),
			accent_color: Value::Known(remote.accent_color),
			auto_login_after_register: Value::Known(remote.auto_login_after_register),
			company_name: Value::Known(remote.company_name),
			company_address: Value::Known(remote.company_address),
			company_website: Value::Known(remote.company_website),
			token_lifetime_in_seconds: Value::Known(remote.token_lifetime_in_seconds),
			id_token_lifetime_in_seconds: Value::Known(remote.id_token_lifetime_in_seconds),
			refresh_token_lifetime_in_seconds: Value::Known(remote.refresh_token_lifetime_in_seconds),
			email_verification_required: Value::Known(remote.email_verification_required),
			enable_bot_detection: Value::Known(remote.enable_bot_detection),
			is_login_success_page_enabled: Value::Known(remote.is_login_success_page_enabled),
			allow_guest_login: Value::Known(remote.allow_guest_login),
			jwe_enabled: Value::Known(remote.jwe_enabled),
			always_ask_mfa: Value::Known(remote.always_ask_mfa),
			password_policy: Value::Known(remote.password_policy_ref),
			app_key,
			allow_login_with: Value::Known(remote.allow_login_with),
			redirect_uris: Value::Known(remote.redirect_uris),
			allowed_logout_urls: Value::Known(remote.allowed_logout_urls),
			social_providers: Value::Known(social_providers),
			additional_access_token_payload: Value::Known(remote.additional_access_token_payload),
			allowed_scopes: Value::Known(remote.allowed_scopes),
			allowed_fields: Value::Known(remote.allowed_fields),
			required_fields: Value::Known(remote.required_fields),
			consent_refs: Value::Known(remote.consent_refs),
			response_types: Value::Known(remote.response_types),
			grant_types: Value::Known(remote.grant_types),
			allowed_web_origins: Value::Known(remote.allowed_web_origins),
			allowed_origins: Value::Known(remote.allowed_origins),
			allowed_mfa: Value::Known(remote.allowed_mfa),
		}
	}

	fn carry_identity(prior: &Self::Model, next: &mut Self::Model) {
		next.id = prior.id.clone();
		next.client_id = prior.client_id.clone();
	}

	fn create(api: &dyn CidaasApi, remote: Self::Remote) -> ApiFuture<'_, Self::Remote> {
		api.create_app(remote)
	}

	fn read<'a>(api: &'a dyn CidaasApi, id: &'a str) -> ApiFuture<'a, Self::Remote> {
		api.get_app(id)
	}

	fn update(api: &dyn CidaasApi, remote: Self::Remote) -> ApiFuture<'_, Self::Remote> {
		api.update_app(remote)
	}

	fn delete<'a>(api: &'a dyn CidaasApi, id: &'a str) -> ApiFuture<'a, ()> {
		api.delete_app(id)
	}
}

fn optional(attribute: Attribute) -> Attribute {
	attribute.optional().computed()
}

fn known_or_empty(value: &Value<String>) -> Value<String> {
	match value {
		Value::Known(value) => Value::Known(value.clone()),
		_ => Value::Known(String::new()),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::value::{AttrValue, Model, Object};

	fn config() -> Object {
		Object::from([
			("client_name".to_owned(), AttrValue::string("portal")),
			("client_type".to_owned(), AttrValue::string("SINGLE_PAGE")),
			("primary_color".to_owned(), AttrValue::string("#1f2937")),
			("redirect_uris".to_owned(), AttrValue::strings(["https://portal.example.com/cb"])),
		])
	}

	#[test]
	fn schema_matches_the_model() {
		let schema = AppResource::schema().expect("Schema should build.");

		assert_eq!(schema.attr_types(), AppModel::attr_types());
		assert!(schema.validate(&config()).is_empty());
	}

	#[test]
	fn colors_and_client_types_are_checked() {
		let schema = AppResource::schema().expect("Schema should build.");
		let mut config = config();

		config.insert("accent_color".into(), AttrValue::string("teal"));
		config.insert("client_type".into(), AttrValue::string("KIOSK"));
		config.insert("token_lifetime_in_seconds".into(), AttrValue::int64(-1));

		let paths = schema
			.validate(&config)
			.errors()
			.filter_map(|d| d.path.as_ref().map(ToString::to_string))
			.collect::<Vec<_>>();

		assert_eq!(paths, vec!["accent_color", "client_type", "token_lifetime_in_seconds"]);
	}

	#[test]
	fn password_policy_maps_to_the_remote_reference() {
		let plan = AppModel {
			client_name: Value::Known("portal".into()),
			password_policy: Value::Known("policy-1".into()),
			..Default::default()
		};
		let remote = AppResource::to_remote(&plan, None);

		assert_eq!(remote.password_policy_ref, "policy-1");
		assert_eq!(AppResource::from_remote(remote, &plan).password_policy, plan.password_policy);
	}

	#[test]
	fn credentials_missing_from_responses_come_from_prior_state() {
		let prior = AppModel {
			client_id: Value::Known("client-1".into()),
			client_secret: Value::Known("s3cr3t".into()),
			app_key: Value::Known(AppKeyModel {
				id: Value::Known("key-1".into()),
				client_id: Value::Known("client-1".into()),
				public_key: Value::Known("pub".into()),
				private_key: Value::Known("priv".into()),
			}),
			..Default::default()
		};
		let remote = client::App { client_id: "client-1".into(), ..Default::default() };
		let model = AppResource::from_remote(remote, &prior);

		assert_eq!(model.client_secret, prior.client_secret);
		assert_eq!(model.app_key, prior.app_key);
		assert_eq!(AppResource::identifier(&model).as_deref(), Some("client-1"));
	}
}
