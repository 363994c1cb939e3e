//! Integer bound validators.

// self
use crate::{
	diag::{AttributePath, Diagnostics},
	validators::{self, AttributeValidator},
	value::{AttrValue, Value},
};

/// Value must be an int64 of at least `min` (inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtLeast {
	/// Inclusive lower bound.
	pub min: i64,
}
impl AttributeValidator for AtLeast {
	fn description(&self) -> String {
		format!("value must be at least {}", self.min)
	}

	fn validate(&self, path: &AttributePath, value: &AttrValue, diagnostics: &mut Diagnostics) {
		check_int64(path, value, diagnostics, |v| v >= self.min, &self.description());
	}
}

/// Value must be an int64 of at most `max` (inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtMost {
	/// Inclusive upper bound.
	pub max: i64,
}
impl AttributeValidator for AtMost {
	fn description(&self) -> String {
		format!("value must be at most {}", self.max)
	}

	fn validate(&self, path: &AttributePath, value: &AttrValue, diagnostics: &mut Diagnostics) {
		check_int64(path, value, diagnostics, |v| v <= self.max, &self.description());
	}
}

/// Value must be an int64 within `min..=max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Between {
	/// Inclusive lower bound.
	pub min: i64,
	/// Inclusive upper bound.
	pub max: i64,
}
impl AttributeValidator for Between {
	fn description(&self) -> String {
		format!("value must be between {} and {}", self.min, self.max)
	}

	fn validate(&self, path: &AttributePath, value: &AttrValue, diagnostics: &mut Diagnostics) {
		check_int64(
			path,
			value,
			diagnostics,
			|v| (self.min..=self.max).contains(&v),
			&self.description(),
		);
	}
}

/// Builds an [`AtLeast`] validator.
pub fn at_least(min: i64) -> AtLeast {
	AtLeast { min }
}

/// Builds an [`AtMost`] validator.
pub fn at_most(max: i64) -> AtMost {
	AtMost { max }
}

/// Builds a [`Between`] validator.
pub fn between(min: i64, max: i64) -> Between {
	Between { min, max }
}

fn check_int64(
	path: &AttributePath,
	value: &AttrValue,
	diagnostics: &mut Diagnostics,
	accept: impl Fn(i64) -> bool,
	constraint: &str,
) {
	match value {
		AttrValue::Int64(Value::Known(v)) if !accept(*v) =>
			validators::add_value_error(diagnostics, path, constraint, v),
		AttrValue::Int64(_) => {},
		other => validators::add_type_error(diagnostics, path, "int64", other),
	}
}
