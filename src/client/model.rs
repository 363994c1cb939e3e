//! Remote record shapes exchanged with the cidaas REST API.
//!
//! Every record tolerates missing fields (`#[serde(default)]`) because the API omits defaults.
//! Identifiers accept both `id` and the MongoDB-style `_id` spelling.

// self
use crate::_prelude::*;

/// Password policy record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordPolicy {
	/// Remote identifier; empty before creation.
	#[serde(alias = "_id", skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// Display name.
	pub policy_name: String,
	/// Minimum password length.
	pub minimum_length: i64,
	/// Required digit count.
	pub no_of_digits: i64,
	/// Whether mixed case is required.
	pub lower_and_upper_case: bool,
	/// Required special character count.
	pub no_of_special_chars: i64,
}

/// Webhook record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hook {
	/// Remote identifier; empty before creation.
	#[serde(alias = "_id", skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// Authentication scheme (`APIKEY`, `TOTP`, `CIDAAS_OAUTH2`).
	pub auth_type: String,
	/// Target URL.
	pub url: String,
	/// Subscribed event names.
	pub events: Vec<String>,
	/// API key settings used when `auth_type` is `APIKEY`.
	#[serde(rename = "apikeyDetails")]
	pub apikey_details: HookApiKeyDetails,
}

/// API key settings of a [`Hook`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookApiKeyDetails {
	/// Secret key value.
	pub apikey: String,
	/// Parameter or header name carrying the key.
	pub apikey_placeholder: String,
	/// `query` or `header`.
	pub apikey_placement: String,
}

/// Consent instance record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentInstance {
	/// Remote identifier; empty before creation.
	#[serde(alias = "_id", skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// Consent name.
	pub consent_name: String,
}

/// Hosted page group record; the group is identified by its name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostedPageGroup {
	/// Group name.
	#[serde(rename = "_id", alias = "id")]
	pub name: String,
	/// Pages in the group.
	pub hosted_pages: Vec<HostedPage>,
}
impl HostedPageGroup {
	/// Returns the pages as a page-id to URL map.
	pub fn page_map(&self) -> BTreeMap<String, String> {
		self.hosted_pages.iter().map(|page| (page.hosted_page_id.clone(), page.url.clone())).collect()
	}
}

/// Single page of a [`HostedPageGroup`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostedPage {
	/// Page identifier (e.g. `login_success`).
	pub hosted_page_id: String,
	/// Page URL.
	pub url: String,
}

/// Social login provider linked to an [`App`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialProvider {
	/// Provider configuration identifier.
	pub social_id: String,
	/// Provider name (e.g. `google`).
	pub provider_name: String,
	/// Provider type.
	pub provider_type: String,
}

/// Key material generated for an [`App`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppKey {
	/// Key identifier.
	pub id: String,
	/// Owning client identifier.
	pub client_id: String,
	/// Public key (PEM).
	pub public_key: String,
	/// Private key (PEM).
	pub private_key: String,
}

/// Application (OAuth client) record.
///
/// Field names mirror the `cidaas_app` attributes.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct App {
	#[serde(alias = "_id", skip_serializing_if = "String::is_empty")]
	pub id: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub client_id: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub client_secret: String,
	pub client_name: String,
	pub client_display_name: String,
	pub client_type: String,
	pub is_remember_me_selected: bool,
	pub allow_disposable_email: bool,
	pub fds_enabled: bool,
	pub enable_passwordless_auth: bool,
	pub enable_deduplication: bool,
	pub mobile_number_verification_required: bool,
	pub hosted_page_group: String,
	pub primary_color: String,
	pub accent_color: String,
	pub auto_login_after_register: bool,
	pub company_name: String,
	pub company_address: String,
	pub company_website: String,
	pub token_lifetime_in_seconds: i64,
	pub id_token_lifetime_in_seconds: i64,
	pub refresh_token_lifetime_in_seconds: i64,
	pub email_verification_required: bool,
	pub enable_bot_detection: bool,
	pub is_login_success_page_enabled: bool,
	pub allow_guest_login: bool,
	pub jwe_enabled: bool,
	pub always_ask_mfa: bool,
	pub password_policy_ref: String,
	#[serde(skip_serializing)]
	pub app_key: Option<AppKey>,
	pub allow_login_with: Vec<String>,
	pub redirect_uris: Vec<String>,
	pub allowed_logout_urls: Vec<String>,
	pub social_providers: Vec<SocialProvider>,
	pub additional_access_token_payload: Vec<String>,
	#[serde(rename = "allowed_scopes")]
	pub allowed_scopes: Vec<String>,
	pub allowed_fields: Vec<String>,
	pub required_fields: Vec<String>,
	pub consent_refs: Vec<String>,
	pub response_types: Vec<String>,
	pub grant_types: Vec<String>,
	pub allowed_web_origins: Vec<String>,
	pub allowed_origins: Vec<String>,
	pub allowed_mfa: Vec<String>,
}

/// Basic tenant information.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantInfo {
	/// Tenant key.
	pub tenant_key: String,
	/// Tenant display name.
	pub tenant_name: String,
	/// cidaas version string.
	pub version_info: String,
	/// Whether custom fields are flattened in user payloads.
	pub custom_field_flatten: bool,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn records_accept_mongo_style_ids_and_missing_fields() {
		let policy: PasswordPolicy =
			serde_json::from_str(r#"{"_id":"p-1","policyName":"default","minimumLength":8}"#)
				.expect("Password policy payload should deserialize.");

		assert_eq!(policy.id, "p-1");
		assert_eq!(policy.minimum_length, 8);
		assert_eq!(policy.no_of_digits, 0);
		assert!(!policy.lower_and_upper_case);
	}

	#[test]
	fn new_records_omit_empty_identifiers() {
		let body = serde_json::to_value(ConsentInstance {
			id: String::new(),
			consent_name: "marketing".into(),
		})
		.expect("Consent instance should serialize.");

		assert_eq!(body, serde_json::json!({ "consent_name": "marketing" }));
	}

	#[test]
	fn hosted_page_group_uses_name_as_identifier() {
		let group: HostedPageGroup = serde_json::from_value(serde_json::json!({
			"_id": "default",
			"hostedPages": [{ "hostedPageId": "login_success", "url": "https://example.com/ok" }],
		}))
		.expect("Hosted page group payload should deserialize.");

		assert_eq!(group.name, "default");
		assert_eq!(
			group.page_map(),
			BTreeMap::from([("login_success".to_owned(), "https://example.com/ok".to_owned())])
		);
	}

	#[test]
	fn hook_uses_wire_field_names() {
		let hook = Hook {
			id: "h-1".into(),
			auth_type: "APIKEY".into(),
			url: "https://example.com/hook".into(),
			events: vec!["ACCOUNT_CREATED".into()],
			apikey_details: HookApiKeyDetails {
				apikey: "key".into(),
				apikey_placeholder: "api-key".into(),
				apikey_placement: "header".into(),
			},
		};
		let body = serde_json::to_value(&hook).expect("Hook should serialize.");

		assert_eq!(body["auth_type"], "APIKEY");
		assert_eq!(body["apikeyDetails"]["apikey_placement"], "header");
	}
}
