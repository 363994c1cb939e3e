//! `cidaas_password_policy` resource.

// self
use crate::{
	client::{self, ApiFuture, CidaasApi},
	resource::{self, ResourceKind},
	schema::{Attribute, Schema, SchemaError},
	validators,
	value::Value,
};

crate::tf_model! {
	/// State of a `cidaas_password_policy` resource.
	pub struct PasswordPolicyModel {
		/// Unique identifier of the policy.
		pub id: Value<String>,
		/// Display name of the policy.
		pub policy_name: Value<String>,
		/// Whether passwords need lower and upper case letters.
		pub lower_and_upper_case: Value<bool>,
		/// Minimum password length.
		pub minimum_length: Value<i64>,
		/// Number of digits a password needs.
		pub no_of_digits: Value<i64>,
		/// Number of special characters a password needs.
		pub no_of_special_chars: Value<i64>,
	}
}

/// Password policy resource kind.
#[derive(Clone, Copy, Debug)]
pub struct PasswordPolicyResource;
impl ResourceKind for PasswordPolicyResource {
	type Model = PasswordPolicyModel;
	type Remote = client::PasswordPolicy;

	const LABEL: &'static str = "password policy";
	const TYPE_NAME: &'static str = "cidaas_password_policy";

	fn schema() -> Result<Schema, SchemaError> {
		Schema::builder("`cidaas_password_policy` controls the password policies in the tenant.")
			.attribute(
				Attribute::string("id")
					.computed()
					.use_state_for_unknown()
					.description("Unique identifier of the policy"),
			)
			.attribute(
				Attribute::string("policy_name")
					.required()
					.validator(validators::non_empty())
					.description("Display name of the policy"),
			)
			.attribute(
				Attribute::bool("lower_and_upper_case")
					.required()
					.description("Indicates if passwords are required to have lower and upper case letters"),
			)
			.attribute(
				Attribute::int64("minimum_length")
					.required()
					.validator(validators::at_least(1))
					.description("Minimum length of the passwords"),
			)
			.attribute(
				Attribute::int64("no_of_digits")
					.required()
					.validator(validators::at_least(0))
					.description("Number of digits that need to be included in the password"),
			)
			.attribute(
				Attribute::int64("no_of_special_chars")
					.required()
					.validator(validators::at_least(0))
					.description("Number of special chars that need to be included in the password"),
			)
			.build()
	}

	fn identifier(model: &Self::Model) -> Option<String> {
		resource::known_identifier(&model.id)
	}

	fn to_remote(plan: &Self::Model, prior: Option<&Self::Model>) -> Self::Remote {
		client::PasswordPolicy {
			id: prior.and_then(Self::identifier).unwrap_or_default(),
			policy_name: plan.policy_name.known_or_default(),
			minimum_length: plan.minimum_length.known_or_default(),
			no_of_digits: plan.no_of_digits.known_or_default(),
			lower_and_upper_case: plan.lower_and_upper_case.known_or_default(),
			no_of_special_chars: plan.no_of_special_chars.known_or_default(),
		}
	}

	fn from_remote(remote: Self::Remote, _prior: &Self::Model) -> Self::Model {
		PasswordPolicyModel {
			id: Value::Known(remote.id),
			policy_name: Value::Known(remote.policy_name),
			lower_and_upper_case: Value::Known(remote.lower_and_upper_case),
			minimum_length: Value::Known(remote.minimum_length),
			no_of_digits: Value::Known(remote.no_of_digits),
			no_of_special_chars: Value::Known(remote.no_of_special_chars),
		}
	}

	fn carry_identity(prior: &Self::Model, next: &mut Self::Model) {
		next.id = prior.id.clone();
	}

	fn create(api: &dyn CidaasApi, remote: Self::Remote) -> ApiFuture<'_, Self::Remote> {
		api.create_password_policy(remote)
	}

	fn read<'a>(api: &'a dyn CidaasApi, id: &'a str) -> ApiFuture<'a, Self::Remote> {
		api.get_password_policy(id)
	}

	fn update(api: &dyn CidaasApi, remote: Self::Remote) -> ApiFuture<'_, Self::Remote> {
		api.update_password_policy(remote)
	}

	fn delete<'a>(api: &'a dyn CidaasApi, id: &'a str) -> ApiFuture<'a, ()> {
		api.delete_password_policy(id)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::value::{AttrValue, Model, Object};

	#[test]
	fn schema_matches_the_model() {
		let schema = PasswordPolicyResource::schema().expect("Schema should build.");

		assert_eq!(schema.attr_types(), PasswordPolicyModel::attr_types());
	}

	#[test]
	fn minimum_length_must_be_positive() {
		let schema = PasswordPolicyResource::schema().expect("Schema should build.");
		let config = Object::from([
			("policy_name".to_owned(), AttrValue::string("default")),
			("lower_and_upper_case".to_owned(), AttrValue::bool(true)),
			("minimum_length".to_owned(), AttrValue::int64(0)),
			("no_of_digits".to_owned(), AttrValue::int64(1)),
			("no_of_special_chars".to_owned(), AttrValue::int64(1)),
		]);
		let diagnostics = schema.validate(&config);

		assert_eq!(diagnostics.len(), 1);
		assert_eq!(
			diagnostics.errors().next().map(|d| d.detail.as_str()),
			Some("Attribute minimum_length value must be at least 1, got: 0.")
		);
	}

	#[test]
	fn updates_target_the_prior_identifier() {
		let prior = PasswordPolicyModel { id: Value::Known("p-9".into()), ..Default::default() };
		let plan = PasswordPolicyModel {
			id: Value::Known("p-9".into()),
			policy_name: Value::Known("strict".into()),
			minimum_length: Value::Known(12),
			..Default::default()
		};
		let remote = PasswordPolicyResource::to_remote(&plan, Some(&prior));

		assert_eq!(remote.id, "p-9");
		assert_eq!(remote.minimum_length, 12);
		assert_eq!(PasswordPolicyResource::to_remote(&plan, None).id, "");
	}
}
