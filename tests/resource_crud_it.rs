// self
use cidaas_provider::{
	_preludet::*,
	client::{CidaasApi, MemoryApi, TenantInfo},
	data_source::ReadDataSourceRequest,
	diag::AttributePath,
	provider::CidaasProvider,
	resource::{
		CreateRequest, DeleteRequest, DynResource, NOT_CONFIGURED_SUMMARY, ReadRequest, UpdateRequest,
	},
	value::{AttrValue, Object, Value},
};

fn password_policy_config(name: &str, minimum_length: i64) -> Object {
	object([
		("policy_name", AttrValue::string(name)),
		("lower_and_upper_case", AttrValue::bool(true)),
		("minimum_length", AttrValue::int64(minimum_length)),
		("no_of_digits", AttrValue::int64(1)),
		("no_of_special_chars", AttrValue::int64(1)),
	])
}

fn resource(provider: &CidaasProvider, type_name: &str) -> Box<dyn DynResource> {
	provider.resource(type_name).expect("Resource type should be registered.")
}

async fn create(resource: &dyn DynResource, config: Object) -> Object {
	assert!(resource.validate(&config).is_empty(), "Config should validate.");

	let change = resource.plan(&config, None).expect("Plan should compute.");
	let response = resource.create(CreateRequest { plan: change.planned_state }).await;

	assert!(response.diagnostics.is_empty(), "{}", response.diagnostics);

	response.state.expect("Create should record state.")
}

async fn update(resource: &dyn DynResource, config: Object, state: &Object) -> Object {
	let change = resource.plan(&config, Some(state)).expect("Plan should compute.");

	assert!(change.has_changes, "Config should differ from state.");

	let response =
		resource.update(UpdateRequest { plan: change.planned_state, state: state.clone() }).await;

	assert!(response.diagnostics.is_empty(), "{}", response.diagnostics);

	response.state.expect("Update should record state.")
}

#[tokio::test]
async fn password_policy_create_then_read_round_trips() {
	let (provider, api) = build_memory_provider();
	let policies = resource(&provider, "cidaas_password_policy");
	let state = create(policies.as_ref(), password_policy_config("default", 8)).await;

	assert_eq!(state["id"], AttrValue::string("policy-1"));
	assert_eq!(state["minimum_length"], AttrValue::int64(8));
	assert!(api.password_policy("policy-1").is_some());

	let read = policies.read(ReadRequest { state: state.clone() }).await;

	assert!(read.diagnostics.is_empty(), "{}", read.diagnostics);
	assert_eq!(read.state, Some(state));
}

#[tokio::test]
async fn password_policy_update_keeps_the_identifier() {
	let (provider, api) = build_memory_provider();
	let policies = resource(&provider, "cidaas_password_policy");
	let state = create(policies.as_ref(), password_policy_config("default", 8)).await;
	let updated = update(policies.as_ref(), password_policy_config("strict", 14), &state).await;

	assert_eq!(updated["id"], state["id"]);
	assert_eq!(updated["policy_name"], AttrValue::string("strict"));
	assert_eq!(
		api.password_policy("policy-1").map(|policy| policy.minimum_length),
		Some(14)
	);
}

#[tokio::test]
async fn failed_update_keeps_the_prior_state() {
	let (provider, api) = build_memory_provider();
	let policies = resource(&provider, "cidaas_password_policy");
	let state = create(policies.as_ref(), password_policy_config("default", 8)).await;
	let change = policies
		.plan(&password_policy_config("strict", 14), Some(&state))
		.expect("Plan should compute.");

	api.fail_with(502, "upstream unavailable");

	let response =
		policies.update(UpdateRequest { plan: change.planned_state, state: state.clone() }).await;

	assert_eq!(response.state, Some(state));
	assert_eq!(response.diagnostics.len(), 1);
	assert_eq!(
		response.diagnostics.errors().next().map(|d| d.summary.as_str()),
		Some("Error updating password policy")
	);
}

#[tokio::test]
async fn failed_delete_leaves_state_untouched() {
	let (provider, api) = build_memory_provider();
	let policies = resource(&provider, "cidaas_password_policy");
	let state = create(policies.as_ref(), password_policy_config("default", 8)).await;

	api.fail_with(500, "boom");

	let response = policies.delete(DeleteRequest { state: state.clone() }).await;
	let detail = response.diagnostics.errors().next().map(|d| d.detail.clone()).unwrap_or_default();

	assert_eq!(response.state, Some(state.clone()));
	assert!(detail.contains("policy-1"), "{detail}");
	assert!(detail.contains("HTTP 500"), "{detail}");

	api.clear_failure();

	let response = policies.delete(DeleteRequest { state }).await;

	assert!(response.diagnostics.is_empty(), "{}", response.diagnostics);
	assert_eq!(response.state, None);
	assert!(api.password_policy("policy-1").is_none());
}

#[tokio::test]
async fn unconfigured_resources_report_once_and_never_call_the_api() {
	let provider = CidaasProvider::default();
	let policies = resource(&provider, "cidaas_password_policy");
	let api = Arc::new(MemoryApi::default());
	let handle: Arc<dyn CidaasApi> = api.clone();

	// Resources capture the handle when they are obtained.
	provider.configure_with(handle);

	let plan = policies
		.plan(&password_policy_config("default", 8), None)
		.expect("Plan should compute.")
		.planned_state;
	let created = policies.create(CreateRequest { plan: plan.clone() }).await;
	let prior = object([("id", AttrValue::string("policy-9"))]);
	let updated = policies.update(UpdateRequest { plan, state: prior.clone() }).await;

	for response in [&created, &updated] {
		assert_eq!(response.diagnostics.len(), 1);
		assert_eq!(
			response.diagnostics.errors().next().map(|d| d.summary.as_str()),
			Some(NOT_CONFIGURED_SUMMARY)
		);
	}

	assert_eq!(created.state, None);
	assert_eq!(updated.state, Some(prior));
	assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn hook_lifecycle_stamps_and_keeps_the_api_key() {
	let (provider, api) = build_memory_provider();
	let hooks = resource(&provider, "cidaas_hook");
	let config = |url: &str| {
		object([
			("url", AttrValue::string(url)),
			("auth_type", AttrValue::string("APIKEY")),
			("events", AttrValue::strings(["ACCOUNT_CREATED", "ACCOUNT_DELETED"])),
			(
				"apikey_details",
				AttrValue::Object(Value::Known(object([
					("apikey", AttrValue::string("k3y")),
					("apikey_placeholder", AttrValue::string("api-key")),
					("apikey_placement", AttrValue::string("header")),
				]))),
			),
		])
	};
	let state = create(hooks.as_ref(), config("https://example.com/hook")).await;

	assert!(matches!(&state["last_updated"], AttrValue::String(Value::Known(stamp)) if !stamp.is_empty()));

	let updated = update(hooks.as_ref(), config("https://example.com/hook/v2"), &state).await;

	assert_eq!(updated["id"], state["id"]);
	assert_eq!(
		api.hook("hook-1").map(|hook| (hook.url, hook.apikey_details.apikey)),
		Some(("https://example.com/hook/v2".to_owned(), "k3y".to_owned()))
	);
}

#[tokio::test]
async fn app_update_keeps_generated_credentials() {
	let (provider, api) = build_memory_provider();
	let apps = resource(&provider, "cidaas_app");
	let config = |name: &str| {
		object([
			("client_name", AttrValue::string(name)),
			("client_type", AttrValue::string("SINGLE_PAGE")),
			("password_policy", AttrValue::string("policy-1")),
			("redirect_uris", AttrValue::strings(["https://portal.example.com/cb"])),
		])
	};
	let state = create(apps.as_ref(), config("portal")).await;
	let AttrValue::String(Value::Known(client_id)) = state["client_id"].clone() else {
		panic!("Client id should be known after create.");
	};
	let updated = update(apps.as_ref(), config("portal-v2"), &state).await;

	assert_eq!(updated["client_id"], state["client_id"]);
	assert_eq!(updated["client_secret"], state["client_secret"]);
	assert_eq!(updated["app_key"], state["app_key"]);
	assert_eq!(updated["client_name"], AttrValue::string("portal-v2"));
	assert_eq!(
		api.app(&client_id).map(|app| (app.client_name, app.password_policy_ref)),
		Some(("portal-v2".to_owned(), "policy-1".to_owned()))
	);
}

#[tokio::test]
async fn consent_rename_requires_replacement() {
	let (provider, _api) = build_memory_provider();
	let consents = resource(&provider, "cidaas_consent_instance");
	let state = create(consents.as_ref(), object([("consent_name", AttrValue::string("news"))])).await;
	let change = consents
		.plan(&object([("consent_name", AttrValue::string("marketing"))]), Some(&state))
		.expect("Plan should compute.");

	assert!(change.requires_replacement());
	assert_eq!(change.requires_replace, vec![AttributePath::root("consent_name")]);

	let unchanged = consents
		.plan(&object([("consent_name", AttrValue::string("news"))]), Some(&state))
		.expect("Plan should compute.");

	assert!(!unchanged.has_changes);
	assert_eq!(unchanged.planned_state, state);
}

#[tokio::test]
async fn hosted_page_group_reads_fail_after_remote_removal() {
	let (provider, api) = build_memory_provider();
	let groups = resource(&provider, "cidaas_hosted_page_group");
	let pages = AttrValue::Map(Value::Known(BTreeMap::from([(
		"login_success".to_owned(),
		AttrValue::string("https://example.com/ok"),
	)])));
	let state =
		create(groups.as_ref(), object([("name", AttrValue::string("default")), ("pages", pages)]))
			.await;

	assert!(api.hosted_page_group("default").is_some());

	api.delete_hosted_page_group("default").await.expect("Remote delete should succeed.");

	let read = groups.read(ReadRequest { state: state.clone() }).await;

	assert_eq!(read.state, Some(state));
	assert_eq!(
		read.diagnostics.errors().next().map(|d| d.summary.as_str()),
		Some("Error reading hosted page group")
	);
}

#[tokio::test]
async fn tenant_info_is_exposed_as_a_data_source() {
	let api: Arc<dyn CidaasApi> = Arc::new(MemoryApi::with_tenant(TenantInfo {
		tenant_key: "acme".into(),
		tenant_name: "Acme Corp".into(),
		version_info: "3.100.0".into(),
		custom_field_flatten: false,
	}));
	let provider = CidaasProvider::default();

	provider.configure_with(api);

	let source = provider.data_source("cidaas_tenant_info").expect("Data source should be registered.");
	let response = source.read(ReadDataSourceRequest::default()).await;
	let state = response.state.expect("Tenant info should be recorded.");

	assert!(response.diagnostics.is_empty(), "{}", response.diagnostics);
	assert_eq!(state["tenant_name"], AttrValue::string("Acme Corp"));
	assert_eq!(state["custom_field_flatten"], AttrValue::bool(false));
}
