//! cidaas API client seam.
//!
//! [`CidaasApi`] is the only dependency resources have on the network. The crate ships a
//! reqwest-backed [`CidaasClient`] (feature `reqwest`) and the in-process [`MemoryApi`] used by
//! tests and dry runs.

pub mod envelope;
#[cfg(feature = "reqwest")] pub mod http;
pub mod memory;
pub mod model;
pub mod secret;
pub mod token;

#[cfg(feature = "reqwest")] pub use http::*;
pub use memory::*;
pub use model::*;
pub use secret::*;
pub use token::*;

// self
use crate::_prelude::*;

/// Boxed future returned by [`CidaasApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Remote operations the provider performs, one method per resource per operation.
///
/// Create and update return the record as stored remotely; implementations must populate the
/// remote identifier on create.
pub trait CidaasApi
where
	Self: 'static + Send + Sync,
{
	/// Creates a password policy.
	fn create_password_policy(&self, policy: PasswordPolicy) -> ApiFuture<'_, PasswordPolicy>;
	/// Fetches a password policy by identifier.
	fn get_password_policy<'a>(&'a self, id: &'a str) -> ApiFuture<'a, PasswordPolicy>;
	/// Updates a password policy; `policy.id` selects the record.
	fn update_password_policy(&self, policy: PasswordPolicy) -> ApiFuture<'_, PasswordPolicy>;
	/// Deletes a password policy.
	fn delete_password_policy<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()>;

	/// Creates a webhook.
	fn create_hook(&self, hook: Hook) -> ApiFuture<'_, Hook>;
	/// Fetches a webhook by identifier.
	fn get_hook<'a>(&'a self, id: &'a str) -> ApiFuture<'a, Hook>;
	/// Updates a webhook; `hook.id` selects the record.
	fn update_hook(&self, hook: Hook) -> ApiFuture<'_, Hook>;
	/// Deletes a webhook.
	fn delete_hook<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()>;

	/// Creates an app; the remote side assigns `client_id` and `client_secret`.
	fn create_app(&self, app: App) -> ApiFuture<'_, App>;
	/// Fetches an app by client identifier.
	fn get_app<'a>(&'a self, client_id: &'a str) -> ApiFuture<'a, App>;
	/// Updates an app; `app.client_id` selects the record.
	fn update_app(&self, app: App) -> ApiFuture<'_, App>;
	/// Deletes an app by client identifier.
	fn delete_app<'a>(&'a self, client_id: &'a str) -> ApiFuture<'a, ()>;

	/// Creates a consent instance.
	fn create_consent_instance(&self, instance: ConsentInstance)
	-> ApiFuture<'_, ConsentInstance>;
	/// Fetches a consent instance by identifier.
	fn get_consent_instance<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ConsentInstance>;
	/// Updates a consent instance; `instance.id` selects the record.
	fn update_consent_instance(&self, instance: ConsentInstance)
	-> ApiFuture<'_, ConsentInstance>;
	/// Deletes a consent instance.
	fn delete_consent_instance<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()>;

	/// Creates a hosted page group.
	fn create_hosted_page_group(&self, group: HostedPageGroup) -> ApiFuture<'_, HostedPageGroup>;
	/// Fetches a hosted page group by name.
	fn get_hosted_page_group<'a>(&'a self, name: &'a str) -> ApiFuture<'a, HostedPageGroup>;
	/// Updates a hosted page group; `group.name` selects the record.
	fn update_hosted_page_group(&self, group: HostedPageGroup) -> ApiFuture<'_, HostedPageGroup>;
	/// Deletes a hosted page group by name.
	fn delete_hosted_page_group<'a>(&'a self, name: &'a str) -> ApiFuture<'a, ()>;

	/// Fetches basic tenant information.
	fn get_tenant_info(&self) -> ApiFuture<'_, TenantInfo>;
}
