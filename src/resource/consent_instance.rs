//! `cidaas_consent_instance` resource.

// self
use crate::{
	client::{self, ApiFuture, CidaasApi},
	resource::{self, ResourceKind},
	schema::{Attribute, Schema, SchemaError},
	validators,
	value::Value,
};

crate::tf_model! {
	/// State of a `cidaas_consent_instance` resource.
	pub struct ConsentInstanceModel {
		/// Remote identifier.
		pub id: Value<String>,
		/// Consent name; changing it replaces the instance.
		pub consent_name: Value<String>,
	}
}

/// Consent instance resource kind.
#[derive(Clone, Copy, Debug)]
pub struct ConsentInstanceResource;
impl ResourceKind for ConsentInstanceResource {
	type Model = ConsentInstanceModel;
	type Remote = client::ConsentInstance;

	const LABEL: &'static str = "consent instance";
	const TYPE_NAME: &'static str = "cidaas_consent_instance";

	fn schema() -> Result<Schema, SchemaError> {
		Schema::builder("`cidaas_consent_instance` manages consent instances referenced by apps.")
			.attribute(
				Attribute::string("id")
					.computed()
					.use_state_for_unknown()
					.description("Unique identifier of the consent instance"),
			)
			.attribute(
				Attribute::string("consent_name")
					.required()
					.requires_replace()
					.validator(validators::non_empty())
					.description("Name of the consent"),
			)
			.build()
	}

	fn identifier(model: &Self::Model) -> Option<String> {
		resource::known_identifier(&model.id)
	}

	fn to_remote(plan: &Self::Model, prior: Option<&Self::Model>) -> Self::Remote {
		client::ConsentInstance {
			id: prior.and_then(Self::identifier).unwrap_or_default(),
			consent_name: plan.consent_name.known_or_default(),
		}
	}

	fn from_remote(remote: Self::Remote, _prior: &Self::Model) -> Self::Model {
		ConsentInstanceModel {
			id: Value::Known(remote.id),
			consent_name: Value::Known(remote.consent_name),
		}
	}

	fn carry_identity(prior: &Self::Model, next: &mut Self::Model) {
		next.id = prior.id.clone();
	}

	fn create(api: &dyn CidaasApi, remote: Self::Remote) -> ApiFuture<'_, Self::Remote> {
		api.create_consent_instance(remote)
	}

	fn read<'a>(api: &'a dyn CidaasApi, id: &'a str) -> ApiFuture<'a, Self::Remote> {
		api.get_consent_instance(id)
	}

	fn update(api: &dyn CidaasApi, remote: Self::Remote) -> ApiFuture<'_, Self::Remote> {
		api.update_consent_instance(remote)
	}

	fn delete<'a>(api: &'a dyn CidaasApi, id: &'a str) -> ApiFuture<'a, ()> {
		api.delete_consent_instance(id)
	}
}
