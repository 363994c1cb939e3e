//! Attribute validators attached to schema attributes and run during config validation.
//!
//! Validators are stateless predicates over one [`AttrValue`]. They never fail on unknown or
//! null values; those are checked again once the orchestrator knows the concrete value.

pub mod bounds;
pub mod nested;
pub mod text;

pub use bounds::*;
pub use nested::*;
pub use text::*;

// self
use crate::{
	_prelude::*,
	diag::{AttributePath, Diagnostics},
	value::AttrValue,
};

/// Summary used for values that violate a constraint.
pub const INVALID_VALUE_SUMMARY: &str = "Invalid Attribute Value";
/// Summary used for values of the wrong kind.
pub const INVALID_TYPE_SUMMARY: &str = "Invalid Attribute Type";

/// Predicate over a single attribute value.
pub trait AttributeValidator
where
	Self: Send + Sync,
{
	/// Plain-text description of the constraint.
	fn description(&self) -> String;

	/// Adds a diagnostic to `diagnostics` when `value` violates the constraint.
	fn validate(&self, path: &AttributePath, value: &AttrValue, diagnostics: &mut Diagnostics);
}
impl Debug for dyn AttributeValidator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AttributeValidator").field(&self.description()).finish()
	}
}

pub(crate) fn add_type_error(
	diagnostics: &mut Diagnostics,
	path: &AttributePath,
	expected: &str,
	found: &AttrValue,
) {
	diagnostics.add_attribute_error(
		path,
		INVALID_TYPE_SUMMARY,
		format!("Attribute {path} expected a {expected} value, got: {}.", found.kind()),
	);
}

pub(crate) fn add_value_error(
	diagnostics: &mut Diagnostics,
	path: &AttributePath,
	constraint: &str,
	found: impl Display,
) {
	diagnostics.add_attribute_error(
		path,
		INVALID_VALUE_SUMMARY,
		format!("Attribute {path} {constraint}, got: {found}."),
	);
}
