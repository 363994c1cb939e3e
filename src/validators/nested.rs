//! Validators that reach into object attributes.

// self
use crate::{
	_prelude::*,
	diag::{AttributePath, Diagnostics},
	validators::{self, AttributeValidator},
	value::{AttrValue, Value},
};

/// Runs `inner` against one field of an object attribute.
///
/// Null or unknown objects and missing fields are skipped; non-object values are rejected.
#[derive(Clone, Debug)]
pub struct NestedField {
	field: &'static str,
	inner: Arc<dyn AttributeValidator>,
}
impl AttributeValidator for NestedField {
	fn description(&self) -> String {
		format!("{}: {}", self.field, self.inner.description())
	}

	fn validate(&self, path: &AttributePath, value: &AttrValue, diagnostics: &mut Diagnostics) {
		match value {
			AttrValue::Object(Value::Known(object)) =>
				if let Some(field) = object.get(self.field) {
					self.inner.validate(&path.clone().attribute(self.field), field, diagnostics);
				},
			AttrValue::Object(_) => {},
			other => validators::add_type_error(diagnostics, path, "object", other),
		}
	}
}

/// Builds a [`NestedField`] validator.
pub fn nested(field: &'static str, inner: impl 'static + AttributeValidator) -> NestedField {
	NestedField { field, inner: Arc::new(inner) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::value::Object;

	#[test]
	fn nested_validators_report_the_inner_path() {
		let validator = nested("placement", validators::one_of(["query", "header"]));
		let value = AttrValue::Object(Value::Known(Object::from([(
			"placement".to_owned(),
			AttrValue::string("body"),
		)])));
		let mut diagnostics = Diagnostics::default();

		validator.validate(&AttributePath::root("details"), &value, &mut diagnostics);

		assert_eq!(
			diagnostics.errors().next().and_then(|d| d.path.as_ref()).map(ToString::to_string),
			Some("details.placement".into())
		);

		let mut diagnostics = Diagnostics::default();

		validator.validate(
			&AttributePath::root("details"),
			&AttrValue::Object(Value::Unknown),
			&mut diagnostics,
		);

		assert!(diagnostics.is_empty());
	}
}
