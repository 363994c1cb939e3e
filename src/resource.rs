//! Managed resources and the single generic CRUD adapter that drives them.
//!
//! A [`ResourceKind`] contributes only what differs between resources: its schema, the mapping
//! between the framework model and the remote record, and which [`CidaasApi`] methods to call.
//! [`ResourceHandler`] owns everything else:
//!
//! - the "provider not configured" precondition (no API call is made without a client handle),
//! - decoding plan and state objects into the model,
//! - error-to-diagnostic mapping,
//! - identifier preservation across updates,
//! - refusing to record state that still contains unknown values,
//! - tracing spans and outcome metrics.
//!
//! A failed Read, Update, or Delete leaves the prior state untouched; a failed Create records
//! no state at all.

pub mod app;
pub mod consent_instance;
pub mod hook;
pub mod hosted_page_group;
pub mod password_policy;

pub use app::AppResource;
pub use consent_instance::ConsentInstanceResource;
pub use hook::HookResource;
pub use hosted_page_group::HostedPageGroupResource;
pub use password_policy::PasswordPolicyResource;

// self
use crate::{
	_prelude::*,
	client::{ApiFuture, CidaasApi},
	diag::{AttributePath, Diagnostic, Diagnostics},
	error::error_chain,
	obs::{self, OperationKind},
	schema::{PlannedChange, Schema, SchemaError},
	value::{Model, Object, Value},
};

/// Summary of the diagnostic emitted when an operation runs before `configure`.
pub const NOT_CONFIGURED_SUMMARY: &str = "Provider not configured";
/// Detail of the diagnostic emitted when an operation runs before `configure`.
pub const NOT_CONFIGURED_DETAIL: &str = "The provider hasn't been configured before apply, likely because it depends on an unknown value from another resource.";
/// Summary of the diagnostic emitted when plan or state cannot be decoded.
pub const VALUE_CONVERSION_SUMMARY: &str = "Value Conversion Error";
/// Summary of the diagnostic emitted when state lacks the remote identifier.
pub const MISSING_IDENTIFIER_SUMMARY: &str = "Missing Resource Identifier";
/// Summary of the diagnostic emitted when a result still contains unknown values.
pub const UNKNOWN_RESULT_SUMMARY: &str = "Provider produced invalid state";

/// Boxed future returned by [`DynResource`] operations.
pub type ResourceFuture<'a> = Pin<Box<dyn Future<Output = ResourceResponse> + 'a + Send>>;

/// Per-resource behavior plugged into [`ResourceHandler`].
pub trait ResourceKind
where
	Self: 'static + Send + Sync,
{
	/// Resource type name as used in configuration (e.g. `cidaas_hook`).
	const TYPE_NAME: &'static str;
	/// Human-readable label used in diagnostics (e.g. `hook`).
	const LABEL: &'static str;

	/// Framework-facing model.
	type Model: Model;
	/// Remote record exchanged with [`CidaasApi`].
	type Remote: 'static + Send;

	/// Static schema of the resource.
	fn schema() -> Result<Schema, SchemaError>;

	/// Remote identifier carried by `model`, if it is known.
	fn identifier(model: &Self::Model) -> Option<String>;

	/// Builds the remote request from the plan; `prior` is the state being updated.
	fn to_remote(plan: &Self::Model, prior: Option<&Self::Model>) -> Self::Remote;

	/// Builds the model from a remote record; `prior` supplies values the API does not echo.
	fn from_remote(remote: Self::Remote, prior: &Self::Model) -> Self::Model;

	/// Copies the identifier from the prior state so updates never change it.
	fn carry_identity(prior: &Self::Model, next: &mut Self::Model);

	/// Final adjustment after a successful create or update.
	fn on_applied(_model: &mut Self::Model) {}

	/// Creates the remote record.
	fn create(api: &dyn CidaasApi, remote: Self::Remote) -> ApiFuture<'_, Self::Remote>;

	/// Fetches the remote record.
	fn read<'a>(api: &'a dyn CidaasApi, id: &'a str) -> ApiFuture<'a, Self::Remote>;

	/// Updates the remote record.
	fn update(api: &dyn CidaasApi, remote: Self::Remote) -> ApiFuture<'_, Self::Remote>;

	/// Deletes the remote record.
	fn delete<'a>(api: &'a dyn CidaasApi, id: &'a str) -> ApiFuture<'a, ()>;
}

/// Create request: the planned state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreateRequest {
	/// Planned state.
	pub plan: Object,
}

/// Read request: the current state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadRequest {
	/// Current state.
	pub state: Object,
}

/// Update request: the planned state plus the prior state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateRequest {
	/// Planned state.
	pub plan: Object,
	/// Prior state.
	pub state: Object,
}

/// Delete request: the current state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteRequest {
	/// Current state.
	pub state: Object,
}

/// Outcome of a resource operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceResponse {
	/// State to record; `None` means no resource is tracked.
	pub state: Option<Object>,
	/// Diagnostics produced by the operation.
	pub diagnostics: Diagnostics,
}
impl ResourceResponse {
	fn keeping(state: Object) -> Self {
		Self { state: Some(state), diagnostics: Diagnostics::default() }
	}

	fn record<K>(&mut self, model: K::Model)
	where
		K: ResourceKind,
	{
		let object = model.into_object();
		let unknown = object.iter().find(|(_, value)| !value.is_fully_known());

		if let Some((name, _)) = unknown {
			let path = AttributePath::root(name.as_str());

			self.diagnostics.add_attribute_error(
				&path,
				UNKNOWN_RESULT_SUMMARY,
				format!("The {} result still contains an unknown value at {path}.", K::LABEL),
			);

			return;
		}

		self.state = Some(object);
	}
}
impl AsRef<Diagnostics> for ResourceResponse {
	fn as_ref(&self) -> &Diagnostics {
		&self.diagnostics
	}
}

/// Generic CRUD adapter shared by every [`ResourceKind`].
pub struct ResourceHandler<K> {
	api: Option<Arc<dyn CidaasApi>>,
	_kind: PhantomData<fn() -> K>,
}
impl<K> ResourceHandler<K>
where
	K: ResourceKind,
{
	/// Creates a handler; `None` means the provider is not configured.
	pub fn new(api: Option<Arc<dyn CidaasApi>>) -> Self {
		Self { api, _kind: PhantomData }
	}

	/// Returns `true` when the handler holds a client handle.
	pub fn is_configured(&self) -> bool {
		self.api.is_some()
	}

	/// Creates the remote record described by the plan.
	pub async fn create(&self, request: CreateRequest) -> ResourceResponse {
		observe::<K, _>(OperationKind::Create, self.create_inner(request)).await
	}

	/// Refreshes the state from the remote record.
	pub async fn read(&self, request: ReadRequest) -> ResourceResponse {
		observe::<K, _>(OperationKind::Read, self.read_inner(request)).await
	}

	/// Applies the plan to the remote record.
	pub async fn update(&self, request: UpdateRequest) -> ResourceResponse {
		observe::<K, _>(OperationKind::Update, self.update_inner(request)).await
	}

	/// Deletes the remote record and clears the state.
	pub async fn delete(&self, request: DeleteRequest) -> ResourceResponse {
		observe::<K, _>(OperationKind::Delete, self.delete_inner(request)).await
	}

	async fn create_inner(&self, request: CreateRequest) -> ResourceResponse {
		let mut response = ResourceResponse::default();
		let Some(api) = self.client(&mut response.diagnostics) else {
			return response;
		};
		let Some(plan) = decode::<K>(&request.plan, "plan", &mut response.diagnostics) else {
			return response;
		};

		match K::create(api.as_ref(), K::to_remote(&plan, None)).await {
			Ok(remote) => {
				let mut model = K::from_remote(remote, &plan);

				K::on_applied(&mut model);
				response.record::<K>(model);
			},
			Err(e) => response.diagnostics.add_error(
				format!("Error creating {}", K::LABEL),
				format!("Could not create {}, unexpected error: {}", K::LABEL, error_chain(&e)),
			),
		}

		response
	}

	async fn read_inner(&self, request: ReadRequest) -> ResourceResponse {
		let mut response = ResourceResponse::keeping(request.state);
		let Some(api) = self.client(&mut response.diagnostics) else {
			return response;
		};
		let Some((state, id)) = self.decode_state(&mut response) else {
			return response;
		};

		match K::read(api.as_ref(), &id).await {
			Ok(remote) => response.record::<K>(K::from_remote(remote, &state)),
			Err(e) => response.diagnostics.add_error(
				format!("Error reading {}", K::LABEL),
				format!("Could not read {} ID {id}: {}", K::LABEL, error_chain(&e)),
			),
		}

		response
	}

	async fn update_inner(&self, request: UpdateRequest) -> ResourceResponse {
		let mut response = ResourceResponse::keeping(request.state);
		let Some(api) = self.client(&mut response.diagnostics) else {
			return response;
		};
		let Some(plan) = decode::<K>(&request.plan, "plan", &mut response.diagnostics) else {
			return response;
		};
		let Some((state, id)) = self.decode_state(&mut response) else {
			return response;
		};

		match K::update(api.as_ref(), K::to_remote(&plan, Some(&state))).await {
			Ok(remote) => {
				let mut model = K::from_remote(remote, &plan);

				K::carry_identity(&state, &mut model);
				K::on_applied(&mut model);
				response.record::<K>(model);
			},
			Err(e) => response.diagnostics.add_error(
				format!("Error updating {}", K::LABEL),
				format!("Could not update {} ID {id}, unexpected error: {}", K::LABEL, error_chain(&e)),
			),
		}

		response
	}

	async fn delete_inner(&self, request: DeleteRequest) -> ResourceResponse {
		let mut response = ResourceResponse::keeping(request.state);
		let Some(api) = self.client(&mut response.diagnostics) else {
			return response;
		};
		let Some((_, id)) = self.decode_state(&mut response) else {
			return response;
		};

		match K::delete(api.as_ref(), &id).await {
			Ok(()) => response.state = None,
			Err(e) => response.diagnostics.add_error(
				format!("Error deleting {}", K::LABEL),
				format!("Could not delete {} ID {id}, unexpected error: {}", K::LABEL, error_chain(&e)),
			),
		}

		response
	}

	fn client(&self, diagnostics: &mut Diagnostics) -> Option<Arc<dyn CidaasApi>> {
		if self.api.is_none() {
			diagnostics.add_error(NOT_CONFIGURED_SUMMARY, NOT_CONFIGURED_DETAIL);
		}

		self.api.clone()
	}

	fn decode_state(&self, response: &mut ResourceResponse) -> Option<(K::Model, String)> {
		let state = response.state.as_ref()?;
		let model = decode::<K>(state, "state", &mut response.diagnostics)?;
		let Some(id) = K::identifier(&model) else {
			response.diagnostics.add_error(
				MISSING_IDENTIFIER_SUMMARY,
				format!("The {} state does not carry a remote identifier.", K::LABEL),
			);

			return None;
		};

		Some((model, id))
	}
}
impl<K> Debug for ResourceHandler<K>
where
	K: ResourceKind,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResourceHandler")
			.field("type_name", &K::TYPE_NAME)
			.field("configured", &self.api.is_some())
			.finish()
	}
}

/// Type-erased resource as exposed by the provider registry.
pub trait DynResource
where
	Self: Send + Sync,
{
	/// Resource type name.
	fn type_name(&self) -> &'static str;

	/// Static schema of the resource.
	fn schema(&self) -> Result<Schema, SchemaError>;

	/// Validates a configuration object against the schema.
	fn validate(&self, config: &Object) -> Diagnostics {
		match self.schema() {
			Ok(schema) => schema.validate(config),
			Err(e) => Diagnostic::error("Invalid resource schema", e.to_string()).into(),
		}
	}

	/// Computes the planned state.
	fn plan(&self, config: &Object, prior_state: Option<&Object>) -> Result<PlannedChange, SchemaError> {
		Ok(self.schema()?.plan(config, prior_state))
	}

	/// See [`ResourceHandler::create`].
	fn create(&self, request: CreateRequest) -> ResourceFuture<'_>;

	/// See [`ResourceHandler::read`].
	fn read(&self, request: ReadRequest) -> ResourceFuture<'_>;

	/// See [`ResourceHandler::update`].
	fn update(&self, request: UpdateRequest) -> ResourceFuture<'_>;

	/// See [`ResourceHandler::delete`].
	fn delete(&self, request: DeleteRequest) -> ResourceFuture<'_>;
}
impl<K> DynResource for ResourceHandler<K>
where
	K: ResourceKind,
{
	fn type_name(&self) -> &'static str {
		K::TYPE_NAME
	}

	fn schema(&self) -> Result<Schema, SchemaError> {
		K::schema()
	}

	fn create(&self, request: CreateRequest) -> ResourceFuture<'_> {
		Box::pin(ResourceHandler::create(self, request))
	}

	fn read(&self, request: ReadRequest) -> ResourceFuture<'_> {
		Box::pin(ResourceHandler::read(self, request))
	}

	fn update(&self, request: UpdateRequest) -> ResourceFuture<'_> {
		Box::pin(ResourceHandler::update(self, request))
	}

	fn delete(&self, request: DeleteRequest) -> ResourceFuture<'_> {
		Box::pin(ResourceHandler::delete(self, request))
	}
}

/// Every resource type, bound to the given client handle.
pub fn registry(api: Option<Arc<dyn CidaasApi>>) -> Vec<Box<dyn DynResource>> {
	vec![
		Box::new(ResourceHandler::<AppResource>::new(api.clone())),
		Box::new(ResourceHandler::<ConsentInstanceResource>::new(api.clone())),
		Box::new(ResourceHandler::<HookResource>::new(api.clone())),
		Box::new(ResourceHandler::<HostedPageGroupResource>::new(api.clone())),
		Box::new(ResourceHandler::<PasswordPolicyResource>::new(api)),
	]
}

/// Known, non-empty identifier held in `value`.
pub(crate) fn known_identifier(value: &Value<String>) -> Option<String> {
	value.known().filter(|id| !id.is_empty()).cloned()
}

fn decode<K>(object: &Object, what: &str, diagnostics: &mut Diagnostics) -> Option<K::Model>
where
	K: ResourceKind,
{
	match K::Model::from_object(object) {
		Ok(model) => Some(model),
		Err(e) => {
			diagnostics.push(
				Diagnostic::error(
					VALUE_CONVERSION_SUMMARY,
					format!("Could not decode the {} {what}: {e}", K::LABEL),
				)
				.with_path(e.path().clone()),
			);

			None
		},
	}
}

async fn observe<K, Fut>(kind: OperationKind, fut: Fut) -> ResourceResponse
where
	K: ResourceKind,
	Fut: Future<Output = ResourceResponse>,
{
	obs::observe_operation(kind, K::TYPE_NAME, fut).await
}
