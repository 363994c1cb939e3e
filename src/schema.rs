//! Static schema declarations for resources, data sources, and the provider itself.
//!
//! A schema lists every attribute with its type, its required/optional/computed flags, a
//! description, validators, and plan modifiers. [`Schema::validate`] checks a configuration
//! object against the declaration; [`Schema::plan`] (see [`plan`]) turns configuration and
//! prior state into the planned state.

pub mod plan;

pub use plan::*;

// self
use crate::{
	_prelude::*,
	diag::{AttributePath, Diagnostics},
	validators::AttributeValidator,
	value::{AttrType, AttrValue, Object},
};

/// Errors raised while assembling a schema.
#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum SchemaError {
	/// Two attributes share a name.
	#[error("Attribute `{name}` is declared more than once.")]
	DuplicateAttribute {
		/// Attribute name.
		name: &'static str,
	},
	/// Attribute is neither required, optional, nor computed.
	#[error("Attribute `{name}` must be required, optional, or computed.")]
	MissingMode {
		/// Attribute name.
		name: &'static str,
	},
	/// Required attributes cannot also be optional or computed.
	#[error("Attribute `{name}` cannot be required and also optional or computed.")]
	ConflictingMode {
		/// Attribute name.
		name: &'static str,
	},
	/// A pattern validator could not compile its regular expression.
	#[error("Validator pattern is invalid.")]
	InvalidPattern(#[from] regex::Error),
}

/// Single attribute declaration.
#[derive(Clone, Debug)]
pub struct Attribute {
	/// Attribute name (snake_case).
	pub name: &'static str,
	/// Declared type.
	pub ty: AttrType,
	/// Configuration must set the attribute.
	pub required: bool,
	/// Configuration may set the attribute.
	pub optional: bool,
	/// Provider may set the attribute.
	pub computed: bool,
	/// Value must be hidden from plan output.
	pub sensitive: bool,
	/// Human-readable description.
	pub description: String,
	/// Validators run during config validation.
	pub validators: Vec<Arc<dyn AttributeValidator>>,
	/// Plan modifiers applied while planning.
	pub plan_modifiers: Vec<PlanModifier>,
}
impl Attribute {
	/// Attribute of any declared type with no flags set.
	pub fn new(name: &'static str, ty: AttrType) -> Self {
		Self {
			name,
			ty,
			required: false,
			optional: false,
			computed: false,
			sensitive: false,
			description: String::new(),
			validators: Vec::new(),
			plan_modifiers: Vec::new(),
		}
	}

	/// String attribute.
	pub fn string(name: &'static str) -> Self {
		Self::new(name, AttrType::String)
	}

	/// Boolean attribute.
	pub fn bool(name: &'static str) -> Self {
		Self::new(name, AttrType::Bool)
	}

	/// Int64 attribute.
	pub fn int64(name: &'static str) -> Self {
		Self::new(name, AttrType::Int64)
	}

	/// List-of-strings attribute.
	pub fn string_list(name: &'static str) -> Self {
		Self::new(name, AttrType::list_of(AttrType::String))
	}

	/// Map-of-strings attribute.
	pub fn string_map(name: &'static str) -> Self {
		Self::new(name, AttrType::map_of(AttrType::String))
	}

	/// Marks the attribute as required.
	pub fn required(mut self) -> Self {
		self.required = true;

		self
	}

	/// Marks the attribute as optional.
	pub fn optional(mut self) -> Self {
		self.optional = true;

		self
	}

	/// Marks the attribute as computed.
	pub fn computed(mut self) -> Self {
		self.computed = true;

		self
	}

	/// Marks the attribute as sensitive.
	pub fn sensitive(mut self) -> Self {
		self.sensitive = true;

		self
	}

	/// Sets the description.
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();

		self
	}

	/// Attaches a validator.
	pub fn validator(mut self, validator: impl 'static + AttributeValidator) -> Self {
		self.validators.push(Arc::new(validator));

		self
	}

	/// Attaches a plan modifier.
	pub fn plan_modifier(mut self, modifier: PlanModifier) -> Self {
		self.plan_modifiers.push(modifier);

		self
	}

	/// Shorthand for [`PlanModifier::UseStateForUnknown`].
	pub fn use_state_for_unknown(self) -> Self {
		self.plan_modifier(PlanModifier::UseStateForUnknown)
	}

	/// Shorthand for [`PlanModifier::RequiresReplace`].
	pub fn requires_replace(self) -> Self {
		self.plan_modifier(PlanModifier::RequiresReplace)
	}

	/// Returns `true` if the attribute carries `modifier`.
	pub fn has_plan_modifier(&self, modifier: PlanModifier) -> bool {
		self.plan_modifiers.contains(&modifier)
	}

	/// Attribute can only be set by the provider.
	pub fn is_read_only(&self) -> bool {
		self.computed && !self.optional && !self.required
	}

	fn check_mode(&self) -> Result<(), SchemaError> {
		if !(self.required || self.optional || self.computed) {
			return Err(SchemaError::MissingMode { name: self.name });
		}
		if self.required && (self.optional || self.computed) {
			return Err(SchemaError::ConflictingMode { name: self.name });
		}

		Ok(())
	}
}

/// Validated schema.
#[derive(Clone, Debug)]
pub struct Schema {
	/// Schema version, bumped when state needs an upgrade.
	pub version: i64,
	/// Markdown description.
	pub description: String,
	/// Attributes keyed by name.
	pub attributes: BTreeMap<&'static str, Attribute>,
}
impl Schema {
	/// Creates a builder.
	pub fn builder(description: impl Into<String>) -> SchemaBuilder {
		SchemaBuilder::new(description)
	}

	/// Looks up an attribute by name.
	pub fn attribute(&self, name: &str) -> Option<&Attribute> {
		self.attributes.get(name)
	}

	/// Declared attribute types, keyed by name.
	pub fn attr_types(&self) -> BTreeMap<&'static str, AttrType> {
		self.attributes.iter().map(|(name, attribute)| (*name, attribute.ty.clone())).collect()
	}

	/// Validates a configuration object.
	pub fn validate(&self, config: &Object) -> Diagnostics {
		let mut diagnostics = Diagnostics::default();

		for name in config.keys().filter(|name| !self.attributes.contains_key(name.as_str())) {
			diagnostics.add_attribute_error(
				&AttributePath::root(name.as_str()),
				"Unsupported argument",
				format!("An argument named {name:?} is not expected here."),
			);
		}

		for attribute in self.attributes.values() {
			let path = AttributePath::root(attribute.name);
			let null = attribute.ty.null();
			let value = config.get(attribute.name).unwrap_or(&null);

			validate_attribute(attribute, &path, value, &mut diagnostics);
		}

		diagnostics
	}
}

fn validate_attribute(
	attribute: &Attribute,
	path: &AttributePath,
	value: &AttrValue,
	diagnostics: &mut Diagnostics,
) {
	if !attribute.ty.conforms(value) {
		diagnostics.add_attribute_error(
			path,
			"Incorrect attribute value type",
			format!(
				"Attribute {path} expects a {} value, got: {}.",
				attribute.ty.name(),
				value.kind()
			),
		);

		return;
	}
	if attribute.required && value.is_null() {
		diagnostics.add_attribute_error(
			path,
			"Missing required argument",
			format!("The argument {:?} is required, but no definition was found.", attribute.name),
		);

		return;
	}
	if attribute.is_read_only() && !value.is_null() {
		diagnostics.add_attribute_error(
			path,
			"Invalid Configuration for Read-Only Attribute",
			format!("Cannot set value for attribute {path}; it is computed by the provider."),
		);

		return;
	}

	for validator in &attribute.validators {
		validator.validate(path, value, diagnostics);
	}
}

/// Builder for [`Schema`] values.
#[derive(Debug)]
pub struct SchemaBuilder {
	version: i64,
	description: String,
	attributes: Vec<Attribute>,
}
impl SchemaBuilder {
	/// Creates a builder seeded with the schema description.
	pub fn new(description: impl Into<String>) -> Self {
		Self { version: 0, description: description.into(), attributes: Vec::new() }
	}

	/// Overrides the schema version.
	pub fn version(mut self, version: i64) -> Self {
		self.version = version;

		self
	}

	/// Adds an attribute.
	pub fn attribute(mut self, attribute: Attribute) -> Self {
		self.attributes.push(attribute);

		self
	}

	/// Consumes the builder and validates the declaration.
	pub fn build(self) -> Result<Schema, SchemaError> {
		let mut attributes = BTreeMap::new();

		for attribute in self.attributes {
			attribute.check_mode()?;

			let name = attribute.name;

			if attributes.insert(name, attribute).is_some() {
				return Err(SchemaError::DuplicateAttribute { name });
			}
		}

		Ok(Schema { version: self.version, description: self.description, attributes })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{validators, value::Value};

	fn schema() -> Schema {
		Schema::builder("test")
			.attribute(Attribute::string("id").computed())
			.attribute(Attribute::string("name").required())
			.attribute(Attribute::int64("size").optional().validator(validators::at_least(1)))
			.build()
			.expect("Test schema should build.")
	}

	#[test]
	fn builder_rejects_invalid_modes_and_duplicates() {
		let err = Schema::builder("bad")
			.attribute(Attribute::string("name"))
			.build()
			.expect_err("Attributes need a mode.");

		assert_eq!(err, SchemaError::MissingMode { name: "name" });

		let err = Schema::builder("bad")
			.attribute(Attribute::string("name").required().computed())
			.build()
			.expect_err("Required and computed conflict.");

		assert_eq!(err, SchemaError::ConflictingMode { name: "name" });

		let err = Schema::builder("bad")
			.attribute(Attribute::string("name").required())
			.attribute(Attribute::string("name").optional())
			.build()
			.expect_err("Duplicate names are rejected.");

		assert_eq!(err, SchemaError::DuplicateAttribute { name: "name" });
	}

	#[test]
	fn validate_accepts_well_formed_config() {
		let config = Object::from([
			("name".to_owned(), AttrValue::string("policy")),
			("size".to_owned(), AttrValue::int64(3)),
		]);

		assert!(schema().validate(&config).is_empty());
	}

	#[test]
	fn validate_reports_every_problem_with_paths() {
		let config = Object::from([
			("id".to_owned(), AttrValue::string("forced")),
			("size".to_owned(), AttrValue::int64(0)),
			("extra".to_owned(), AttrValue::bool(true)),
		]);
		let diagnostics = schema().validate(&config);
		let summaries = diagnostics
			.errors()
			.map(|d| (d.summary.as_str(), d.path.as_ref().map(ToString::to_string)))
			.collect::<Vec<_>>();

		assert_eq!(diagnostics.len(), 4);
		assert!(summaries.contains(&("Unsupported argument", Some("extra".into()))));
		assert!(summaries.contains(&("Missing required argument", Some("name".into()))));
		assert!(
			summaries
				.contains(&("Invalid Configuration for Read-Only Attribute", Some("id".into())))
		);
		assert!(summaries.contains(&("Invalid Attribute Value", Some("size".into()))));
	}

	#[test]
	fn validate_defers_unknown_required_values() {
		let config = Object::from([("name".to_owned(), AttrValue::String(Value::Unknown))]);

		assert!(schema().validate(&config).is_empty());
	}

	#[test]
	fn validate_rejects_type_mismatches() {
		let config = Object::from([("name".to_owned(), AttrValue::int64(1))]);
		let diagnostics = schema().validate(&config);

		assert_eq!(
			diagnostics.errors().next().map(|d| d.summary.as_str()),
			Some("Incorrect attribute value type")
		);
	}
}
