//! Plan computation: merges configuration with prior state and applies plan modifiers.

// self
use crate::{
	diag::AttributePath,
	schema::{Attribute, Schema},
	value::{AttrValue, Object},
};

/// Plan-time adjustment attached to an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlanModifier {
	/// Keep the prior state value instead of planning an unknown for computed attributes.
	UseStateForUnknown,
	/// A changed value forces the resource to be destroyed and recreated.
	RequiresReplace,
}

/// Result of [`Schema::plan`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlannedChange {
	/// Proposed new state.
	pub planned_state: Object,
	/// Attributes whose change forces replacement.
	pub requires_replace: Vec<AttributePath>,
	/// `false` when the plan equals the prior state.
	pub has_changes: bool,
}
impl PlannedChange {
	/// Returns `true` when at least one attribute forces replacement.
	pub fn requires_replacement(&self) -> bool {
		!self.requires_replace.is_empty()
	}
}

impl Schema {
	/// Computes the planned state for `config` given the prior state, if any.
	///
	/// Configured values win. Computed attributes left null in the configuration are planned as
	/// unknown, or as their prior value when they carry [`PlanModifier::UseStateForUnknown`].
	/// When nothing configurable differs from the prior state the prior state is planned as-is.
	pub fn plan(&self, config: &Object, prior_state: Option<&Object>) -> PlannedChange {
		let Some(prior_state) = prior_state else {
			let planned_state = self
				.attributes
				.values()
				.map(|attribute| (attribute.name.to_owned(), planned_value(attribute, config, None)))
				.collect();

			return PlannedChange { planned_state, requires_replace: Vec::new(), has_changes: true };
		};
		let has_changes = self.attributes.values().any(|attribute| {
			let configured = configured_value(attribute, config);

			if attribute.computed && configured.is_null() {
				return false;
			}

			prior_state.get(attribute.name) != Some(&configured)
		});

		if !has_changes {
			return PlannedChange {
				planned_state: prior_state.clone(),
				requires_replace: Vec::new(),
				has_changes,
			};
		}

		let mut requires_replace = Vec::new();
		let planned_state = self
			.attributes
			.values()
			.map(|attribute| {
				let prior = prior_state.get(attribute.name);
				let planned = planned_value(attribute, config, prior);

				if attribute.has_plan_modifier(PlanModifier::RequiresReplace)
					&& !planned.is_unknown()
					&& prior.is_some_and(|prior| prior != &planned)
				{
					requires_replace.push(AttributePath::root(attribute.name));
				}

				(attribute.name.to_owned(), planned)
			})
			.collect();

		PlannedChange { planned_state, requires_replace, has_changes }
	}
}

fn configured_value(attribute: &Attribute, config: &Object) -> AttrValue {
	config.get(attribute.name).cloned().unwrap_or_else(|| attribute.ty.null())
}

fn planned_value(attribute: &Attribute, config: &Object, prior: Option<&AttrValue>) -> AttrValue {
	let configured = configured_value(attribute, config);

	if !(attribute.computed && configured.is_null()) {
		return configured;
	}

	match prior {
		Some(prior)
			if attribute.has_plan_modifier(PlanModifier::UseStateForUnknown) && !prior.is_null() =>
			prior.clone(),
		_ => attribute.ty.unknown(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::value::Value;

	fn schema() -> Schema {
		Schema::builder("plan")
			.attribute(Attribute::string("id").computed().use_state_for_unknown())
			.attribute(Attribute::string("name").required().requires_replace())
			.attribute(Attribute::string("display").optional())
			.attribute(Attribute::string("updated").computed())
			.build()
			.expect("Plan schema should build.")
	}

	fn prior() -> Object {
		Object::from([
			("id".to_owned(), AttrValue::string("abc")),
			("name".to_owned(), AttrValue::string("main")),
			("display".to_owned(), AttrValue::string("Main")),
			("updated".to_owned(), AttrValue::string("2024-01-01T00:00:00Z")),
		])
	}

	#[test]
	fn create_plans_computed_attributes_as_unknown() {
		let config = Object::from([("name".to_owned(), AttrValue::string("main"))]);
		let change = schema().plan(&config, None);

		assert!(change.has_changes);
		assert_eq!(change.planned_state["id"], AttrValue::String(Value::Unknown));
		assert_eq!(change.planned_state["updated"], AttrValue::String(Value::Unknown));
		assert_eq!(change.planned_state["display"], AttrValue::String(Value::Null));
		assert!(change.requires_replace.is_empty());
	}

	#[test]
	fn unchanged_config_plans_prior_state() {
		let config = Object::from([
			("name".to_owned(), AttrValue::string("main")),
			("display".to_owned(), AttrValue::string("Main")),
		]);
		let change = schema().plan(&config, Some(&prior()));

		assert!(!change.has_changes);
		assert_eq!(change.planned_state, prior());
	}

	#[test]
	fn update_keeps_identity_and_recomputes_other_computed_values() {
		let config = Object::from([
			("name".to_owned(), AttrValue::string("main")),
			("display".to_owned(), AttrValue::string("Renamed")),
		]);
		let change = schema().plan(&config, Some(&prior()));

		assert!(change.has_changes);
		assert!(!change.requires_replacement());
		assert_eq!(change.planned_state["id"], AttrValue::string("abc"));
		assert_eq!(change.planned_state["updated"], AttrValue::String(Value::Unknown));
	}

	#[test]
	fn changing_a_replacement_attribute_is_reported() {
		let config = Object::from([
			("name".to_owned(), AttrValue::string("other")),
			("display".to_owned(), AttrValue::string("Main")),
		]);
		let change = schema().plan(&config, Some(&prior()));

		assert_eq!(change.requires_replace, vec![AttributePath::root("name")]);
	}
}
