//! String and collection validators.

// crates.io
use regex::Regex;
// self
use crate::{
	diag::{AttributePath, Diagnostics},
	validators::{self, AttributeValidator},
	value::{AttrValue, Value},
};

/// Value must be a non-empty string, list, or map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NonEmpty;
impl AttributeValidator for NonEmpty {
	fn description(&self) -> String {
		"value must not be empty".into()
	}

	fn validate(&self, path: &AttributePath, value: &AttrValue, diagnostics: &mut Diagnostics) {
		let empty = match value {
			AttrValue::String(Value::Known(v)) => v.is_empty(),
			AttrValue::List(Value::Known(v)) => v.is_empty(),
			AttrValue::Map(Value::Known(v)) => v.is_empty(),
			AttrValue::String(_) | AttrValue::List(_) | AttrValue::Map(_) => false,
			other => {
				validators::add_type_error(diagnostics, path, "string, list, or map", other);

				return;
			},
		};

		if empty {
			diagnostics.add_attribute_error(
				path,
				validators::INVALID_VALUE_SUMMARY,
				format!("Attribute {path} {}.", self.description()),
			);
		}
	}
}

/// String value must match a regular expression.
#[derive(Clone, Debug)]
pub struct Matches {
	pattern: Regex,
	message: String,
}
impl AttributeValidator for Matches {
	fn description(&self) -> String {
		self.message.clone()
	}

	fn validate(&self, path: &AttributePath, value: &AttrValue, diagnostics: &mut Diagnostics) {
		match value {
			AttrValue::String(Value::Known(v)) if !self.pattern.is_match(v) =>
				validators::add_value_error(diagnostics, path, &self.message, format!("{v:?}")),
			AttrValue::String(_) => {},
			other => validators::add_type_error(diagnostics, path, "string", other),
		}
	}
}

/// String value must be one of a fixed set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OneOf {
	allowed: Vec<String>,
}
impl AttributeValidator for OneOf {
	fn description(&self) -> String {
		format!("value must be one of: {}", self.allowed.join(", "))
	}

	fn validate(&self, path: &AttributePath, value: &AttrValue, diagnostics: &mut Diagnostics) {
		match value {
			AttrValue::String(Value::Known(v)) if !self.allowed.iter().any(|a| a == v) =>
				validators::add_value_error(diagnostics, path, &self.description(), format!("{v:?}")),
			AttrValue::String(_) => {},
			other => validators::add_type_error(diagnostics, path, "string", other),
		}
	}
}

/// Builds a [`NonEmpty`] validator.
pub fn non_empty() -> NonEmpty {
	NonEmpty
}

/// Builds a [`Matches`] validator; `message` describes the expected shape (e.g. "must be a
/// hex color").
pub fn matches(pattern: &str, message: impl Into<String>) -> Result<Matches, regex::Error> {
	Ok(Matches { pattern: Regex::new(pattern)?, message: message.into() })
}

/// Builds a [`OneOf`] validator.
pub fn one_of<I, S>(allowed: I) -> OneOf
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	OneOf { allowed: allowed.into_iter().map(Into::into).collect() }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn run(validator: &dyn AttributeValidator, value: AttrValue) -> Diagnostics {
		let mut diagnostics = Diagnostics::default();

		validator.validate(&AttributePath::root("field"), &value, &mut diagnostics);

		diagnostics
	}

	#[test]
	fn non_empty_covers_strings_lists_and_maps() {
		assert!(run(&non_empty(), AttrValue::string("")).has_error());
		assert!(run(&non_empty(), AttrValue::strings(Vec::<String>::new())).has_error());
		assert!(run(&non_empty(), AttrValue::Map(Value::Known(Default::default()))).has_error());
		assert!(!run(&non_empty(), AttrValue::string("x")).has_error());
		assert!(run(&non_empty(), AttrValue::List(Value::Unknown)).is_empty());
		assert!(run(&non_empty(), AttrValue::int64(1)).has_error());
	}

	#[test]
	fn matches_reports_the_configured_message() {
		let validator = matches("^#[0-9a-fA-F]{6}$", "must be a hex color")
			.expect("Color pattern should compile.");
		let diagnostics = run(&validator, AttrValue::string("red"));

		assert_eq!(
			diagnostics.errors().next().map(|d| d.detail.as_str()),
			Some("Attribute field must be a hex color, got: \"red\".")
		);
		assert!(run(&validator, AttrValue::string("#a0B1c2")).is_empty());
		assert!(run(&validator, AttrValue::String(Value::Unknown)).is_empty());
		assert!(matches("(", "broken").is_err());
	}

	#[test]
	fn one_of_rejects_values_outside_the_set() {
		let validator = one_of(["query", "header"]);

		assert!(run(&validator, AttrValue::string("header")).is_empty());
		assert!(run(&validator, AttrValue::string("body")).has_error());
		assert!(run(&validator, AttrValue::bool(false)).has_error());
	}
}
