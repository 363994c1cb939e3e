//! In-process [`CidaasApi`] implementation backed by ordered maps.

// std
use std::{
	future, io,
	sync::atomic::{AtomicU64, AtomicUsize, Ordering},
};
// self
use crate::{
	_prelude::*,
	client::{
		ApiFuture, App, AppKey, CidaasApi, ConsentInstance, Hook, HostedPageGroup, PasswordPolicy,
		TenantInfo,
	},
	error::{ApiError, TransportError},
};

#[derive(Debug, Default)]
struct Records {
	password_policies: BTreeMap<String, PasswordPolicy>,
	hooks: BTreeMap<String, Hook>,
	apps: BTreeMap<String, App>,
	consent_instances: BTreeMap<String, ConsentInstance>,
	hosted_page_groups: BTreeMap<String, HostedPageGroup>,
	tenant: TenantInfo,
}

#[derive(Clone, Debug)]
enum InjectedFailure {
	Status { status: u16, message: String },
	Unreachable { cause: String },
}
impl InjectedFailure {
	fn to_error(&self) -> Error {
		match self {
			Self::Status { status, message } =>
				ApiError::Status { status: *status, message: message.clone() }.into(),
			Self::Unreachable { cause } =>
				TransportError::network(io::Error::new(io::ErrorKind::ConnectionRefused, cause.clone()))
					.into(),
		}
	}
}

/// Thread-safe in-memory cidaas tenant.
///
/// Identifiers are assigned from a counter (`policy-1`, `hook-2`, ...). Every trait call is
/// counted, including calls rejected by an injected failure.
#[derive(Debug, Default)]
pub struct MemoryApi {
	records: RwLock<Records>,
	failure: Mutex<Option<InjectedFailure>>,
	calls: AtomicUsize,
	next_id: AtomicU64,
}
impl MemoryApi {
	/// Creates an empty tenant that reports `tenant` from [`CidaasApi::get_tenant_info`].
	pub fn with_tenant(tenant: TenantInfo) -> Self {
		let api = Self::default();

		api.records.write().tenant = tenant;

		api
	}

	/// Number of [`CidaasApi`] calls observed so far.
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// Makes every following call fail with an HTTP `status` error until cleared.
	pub fn fail_with(&self, status: u16, message: impl Into<String>) {
		*self.failure.lock() = Some(InjectedFailure::Status { status, message: message.into() });
	}

	/// Makes every following call fail with a network error caused by `cause` until cleared.
	pub fn fail_unreachable(&self, cause: impl Into<String>) {
		*self.failure.lock() = Some(InjectedFailure::Unreachable { cause: cause.into() });
	}

	/// Removes an injected failure.
	pub fn clear_failure(&self) {
		self.failure.lock().take();
	}

	/// Stored password policy, if any.
	pub fn password_policy(&self, id: &str) -> Option<PasswordPolicy> {
		self.records.read().password_policies.get(id).cloned()
	}

	/// Stored webhook, if any.
	pub fn hook(&self, id: &str) -> Option<Hook> {
		self.records.read().hooks.get(id).cloned()
	}

	/// Stored app, if any.
	pub fn app(&self, client_id: &str) -> Option<App> {
		self.records.read().apps.get(client_id).cloned()
	}

	/// Stored consent instance, if any.
	pub fn consent_instance(&self, id: &str) -> Option<ConsentInstance> {
		self.records.read().consent_instances.get(id).cloned()
	}

	/// Stored hosted page group, if any.
	pub fn hosted_page_group(&self, name: &str) -> Option<HostedPageGroup> {
		self.records.read().hosted_page_groups.get(name).cloned()
	}

	fn begin(&self) -> Result<()> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		match self.failure.lock().as_ref() {
			Some(failure) => Err(failure.to_error()),
			None => Ok(()),
		}
	}

	fn next_id(&self, prefix: &str) -> String {
		format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
	}

	fn run<T, F>(&self, op: F) -> ApiFuture<'_, T>
	where
		T: 'static + Send,
		F: FnOnce(&mut Records) -> Result<T>,
	{
		let result = self.begin().and_then(|()| op(&mut *self.records.write()));

		Box::pin(future::ready(result))
	}
}
impl CidaasApi for MemoryApi {
	fn create_password_policy(&self, mut policy: PasswordPolicy) -> ApiFuture<'_, PasswordPolicy> {
		policy.id = self.next_id("policy");

		self.run(move |records| Ok(insert(&mut records.password_policies, policy.id.clone(), policy)))
	}

	fn get_password_policy<'a>(&'a self, id: &'a str) -> ApiFuture<'a, PasswordPolicy> {
		self.run(move |records| fetch(&records.password_policies, "password policy", id))
	}

	fn update_password_policy(&self, policy: PasswordPolicy) -> ApiFuture<'_, PasswordPolicy> {
		self.run(move |records| {
			replace(&mut records.password_policies, "password policy", policy.id.clone(), policy)
		})
	}

	fn delete_password_policy<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()> {
		self.run(move |records| remove(&mut records.password_policies, "password policy", id))
	}

	fn create_hook(&self, mut hook: Hook) -> ApiFuture<'_, Hook> {
		hook.id = self.next_id("hook");

		self.run(move |records| Ok(insert(&mut records.hooks, hook.id.clone(), hook)))
	}

	fn get_hook<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Hook> {
		self.run(move |records| fetch(&records.hooks, "hook", id))
	}

	fn update_hook(&self, hook: Hook) -> ApiFuture<'_, Hook> {
		self.run(move |records| replace(&mut records.hooks, "hook", hook.id.clone(), hook))
	}

	fn delete_hook<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()> {
		self.run(move |records| remove(&mut records.hooks, "hook", id))
	}

	fn create_app(&self, mut app: App) -> ApiFuture<'_, App> {
		app.id = self.next_id("app");
		app.client_id = self.next_id("client");
		app.client_secret = self.next_id("secret");
		app.app_key = Some(AppKey {
			id: self.next_id("key"),
			client_id: app.client_id.clone(),
			public_key: format!("public-key-of-{}", app.client_id),
			private_key: format!("private-key-of-{}", app.client_id),
		});

		self.run(move |records| Ok(insert(&mut records.apps, app.client_id.clone(), app)))
	}

	fn get_app<'a>(&'a self, client_id: &'a str) -> ApiFuture<'a, App> {
		self.run(move |records| fetch(&records.apps, "app", client_id))
	}

	fn update_app(&self, mut app: App) -> ApiFuture<'_, App> {
		self.run(move |records| {
			let current = fetch(&records.apps, "app", &app.client_id)?;

			app.id = current.id;
			app.client_secret = current.client_secret;
			app.app_key = current.app_key;

			Ok(insert(&mut records.apps, app.client_id.clone(), app))
		})
	}

	fn delete_app<'a>(&'a self, client_id: &'a str) -> ApiFuture<'a, ()> {
		self.run(move |records| remove(&mut records.apps, "app", client_id))
	}

	fn create_consent_instance(
		&self,
		mut instance: ConsentInstance,
	) -> ApiFuture<'_, ConsentInstance> {
		instance.id = self.next_id("consent");

		self.run(move |records| {
			Ok(insert(&mut records.consent_instances, instance.id.clone(), instance))
		})
	}

	fn get_consent_instance<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ConsentInstance> {
		self.run(move |records| fetch(&records.consent_instances, "consent instance", id))
	}

	fn update_consent_instance(
		&self,
		instance: ConsentInstance,
	) -> ApiFuture<'_, ConsentInstance> {
		self.run(move |records| {
			replace(&mut records.consent_instances, "consent instance", instance.id.clone(), instance)
		})
	}

	fn delete_consent_instance<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()> {
		self.run(move |records| remove(&mut records.consent_instances, "consent instance", id))
	}

	fn create_hosted_page_group(&self, group: HostedPageGroup) -> ApiFuture<'_, HostedPageGroup> {
		self.run(move |records| Ok(insert(&mut records.hosted_page_groups, group.name.clone(), group)))
	}

	fn get_hosted_page_group<'a>(&'a self, name: &'a str) -> ApiFuture<'a, HostedPageGroup> {
		self.run(move |records| fetch(&records.hosted_page_groups, "hosted page group", name))
	}

	fn update_hosted_page_group(&self, group: HostedPageGroup) -> ApiFuture<'_, HostedPageGroup> {
		self.run(move |records| {
			replace(&mut records.hosted_page_groups, "hosted page group", group.name.clone(), group)
		})
	}

	fn delete_hosted_page_group<'a>(&'a self, name: &'a str) -> ApiFuture<'a, ()> {
		self.run(move |records| remove(&mut records.hosted_page_groups, "hosted page group", name))
	}

	fn get_tenant_info(&self) -> ApiFuture<'_, TenantInfo> {
		self.run(|records| Ok(records.tenant.clone()))
	}
}

fn insert<T>(map: &mut BTreeMap<String, T>, key: String, record: T) -> T
where
	T: Clone,
{
	map.insert(key, record.clone());

	record
}

fn fetch<T>(map: &BTreeMap<String, T>, kind: &'static str, key: &str) -> Result<T>
where
	T: Clone,
{
	map.get(key).cloned().ok_or_else(|| ApiError::NotFound { kind, id: key.to_owned() }.into())
}

fn replace<T>(map: &mut BTreeMap<String, T>, kind: &'static str, key: String, record: T) -> Result<T>
where
	T: Clone,
{
	match map.get_mut(&key) {
		Some(slot) => {
			*slot = record.clone();

			Ok(record)
		},
		None => Err(ApiError::NotFound { kind, id: key }.into()),
	}
}

fn remove<T>(map: &mut BTreeMap<String, T>, kind: &'static str, key: &str) -> Result<()> {
	map.remove(key).map(|_| ()).ok_or_else(|| ApiError::NotFound { kind, id: key.to_owned() }.into())
}
