//! `cidaas_hosted_page_group` resource. Groups are identified by their name.

// self
use crate::{
	_prelude::*,
	client::{self, ApiFuture, CidaasApi},
	resource::{self, ResourceKind},
	schema::{Attribute, Schema, SchemaError},
	validators,
	value::Value,
};

crate::tf_model! {
	/// State of a `cidaas_hosted_page_group` resource.
	pub struct HostedPageGroupModel {
		/// Group name; doubles as the identifier.
		pub name: Value<String>,
		/// Page identifier to URL.
		pub pages: Value<BTreeMap<String, String>>,
	}
}

/// Hosted page group resource kind.
#[derive(Clone, Copy, Debug)]
pub struct HostedPageGroupResource;
impl ResourceKind for HostedPageGroupResource {
	type Model = HostedPageGroupModel;
	type Remote = client::HostedPageGroup;

	const LABEL: &'static str = "hosted page group";
	const TYPE_NAME: &'static str = "cidaas_hosted_page_group";

	fn schema() -> Result<Schema, SchemaError> {
		Schema::builder("`cidaas_hosted_page_group` manages groups of hosted pages shown by cidaas.")
			.attribute(
				Attribute::string("name")
					.required()
					.requires_replace()
					.validator(validators::non_empty())
					.description("Name of the hosted page group"),
			)
			.attribute(
				Attribute::string_map("pages")
					.required()
					.validator(validators::non_empty())
					.description("Hosted page URLs keyed by page identifier (e.g. `login_success`)"),
			)
			.build()
	}

	fn identifier(model: &Self::Model) -> Option<String> {
		resource::known_identifier(&model.name)
	}

	fn to_remote(plan: &Self::Model, prior: Option<&Self::Model>) -> Self::Remote {
		let name = prior
			.and_then(Self::identifier)
			.unwrap_or_else(|| plan.name.known_or_default());
		let hosted_pages = plan
			.pages
			.known_or_default()
			.into_iter()
			.map(|(hosted_page_id, url)| client::HostedPage { hosted_page_id, url })
			.collect();

		client::HostedPageGroup { name, hosted_pages }
	}

	fn from_remote(remote: Self::Remote, _prior: &Self::Model) -> Self::Model {
		HostedPageGroupModel {
			pages: Value::Known(remote.page_map()),
			name: Value::Known(remote.name),
		}
	}

	fn carry_identity(prior: &Self::Model, next: &mut Self::Model) {
		next.name = prior.name.clone();
	}

	fn create(api: &dyn CidaasApi, remote: Self::Remote) -> ApiFuture<'_, Self::Remote> {
		api.create_hosted_page_group(remote)
	}

	fn read<'a>(api: &'a dyn CidaasApi, id: &'a str) -> ApiFuture<'a, Self::Remote> {
		api.get_hosted_page_group(id)
	}

	fn update(api: &dyn CidaasApi, remote: Self::Remote) -> ApiFuture<'_, Self::Remote> {
		api.update_hosted_page_group(remote)
	}

	fn delete<'a>(api: &'a dyn CidaasApi, id: &'a str) -> ApiFuture<'a, ()> {
		api.delete_hosted_page_group(id)
	}
}
