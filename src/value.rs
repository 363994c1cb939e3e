//! Attribute values as the orchestrator sees them.
//!
//! Every attribute carries one of three states: not yet determined ([`Value::Unknown`]),
//! explicitly absent ([`Value::Null`]), or a concrete value ([`Value::Known`]). The dynamic
//! [`AttrValue`] pairs that tag with a primitive kind so validators and the schema layer can
//! pattern-match on the kind first and on the tag second.

pub mod codec;

pub use codec::*;

// self
use crate::_prelude::*;

/// Attribute-name keyed object, used for plans, state, and nested objects.
pub type Object = BTreeMap<String, AttrValue>;

/// Tagged attribute value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value<T> {
	/// Value will only be determined during apply.
	Unknown,
	/// Value is explicitly absent.
	Null,
	/// Concrete value.
	Known(T),
}
impl<T> Value<T> {
	/// Returns `true` for [`Value::Unknown`].
	pub fn is_unknown(&self) -> bool {
		matches!(self, Self::Unknown)
	}

	/// Returns `true` for [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Returns the concrete value, if any.
	pub fn known(&self) -> Option<&T> {
		match self {
			Self::Known(value) => Some(value),
			_ => None,
		}
	}

	/// Consumes the tag and returns the concrete value, if any.
	pub fn into_known(self) -> Option<T> {
		match self {
			Self::Known(value) => Some(value),
			_ => None,
		}
	}

	/// Maps the concrete value while preserving unknown/null tags.
	pub fn map<U, F>(self, f: F) -> Value<U>
	where
		F: FnOnce(T) -> U,
	{
		match self {
			Self::Unknown => Value::Unknown,
			Self::Null => Value::Null,
			Self::Known(value) => Value::Known(f(value)),
		}
	}
}
impl<T> Value<T>
where
	T: Clone + Default,
{
	/// Returns a copy of the concrete value, or `T::default()` for unknown/null.
	pub fn known_or_default(&self) -> T {
		self.known().cloned().unwrap_or_default()
	}
}
impl<T> Default for Value<T> {
	fn default() -> Self {
		Self::Null
	}
}
impl<T> From<Option<T>> for Value<T> {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Self::Known)
	}
}

/// Dynamic attribute value tagged with its primitive kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
	/// Boolean attribute.
	Bool(Value<bool>),
	/// 64-bit integer attribute.
	Int64(Value<i64>),
	/// String attribute.
	String(Value<String>),
	/// Ordered list attribute.
	List(Value<Vec<AttrValue>>),
	/// String-keyed map attribute.
	Map(Value<BTreeMap<String, AttrValue>>),
	/// Nested object attribute.
	Object(Value<Object>),
}
impl AttrValue {
	/// Known boolean.
	pub fn bool(value: bool) -> Self {
		Self::Bool(Value::Known(value))
	}

	/// Known integer.
	pub fn int64(value: i64) -> Self {
		Self::Int64(Value::Known(value))
	}

	/// Known string.
	pub fn string(value: impl Into<String>) -> Self {
		Self::String(Value::Known(value.into()))
	}

	/// Known list of strings.
	pub fn strings<I, S>(values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::List(Value::Known(values.into_iter().map(Self::string).collect()))
	}

	/// Label of the primitive kind, used in diagnostics.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Bool(_) => "bool",
			Self::Int64(_) => "int64",
			Self::String(_) => "string",
			Self::List(_) => "list",
			Self::Map(_) => "map",
			Self::Object(_) => "object",
		}
	}

	/// Returns `true` when the value is unknown, regardless of kind.
	pub fn is_unknown(&self) -> bool {
		match self {
			Self::Bool(v) => v.is_unknown(),
			Self::Int64(v) => v.is_unknown(),
			Self::String(v) => v.is_unknown(),
			Self::List(v) => v.is_unknown(),
			Self::Map(v) | Self::Object(v) => v.is_unknown(),
		}
	}

	/// Returns `true` when the value is null, regardless of kind.
	pub fn is_null(&self) -> bool {
		match self {
			Self::Bool(v) => v.is_null(),
			Self::Int64(v) => v.is_null(),
			Self::String(v) => v.is_null(),
			Self::List(v) => v.is_null(),
			Self::Map(v) | Self::Object(v) => v.is_null(),
		}
	}

	/// Returns `true` when neither the value nor any nested element is unknown.
	pub fn is_fully_known(&self) -> bool {
		match self {
			Self::List(Value::Known(items)) => items.iter().all(Self::is_fully_known),
			Self::Map(Value::Known(entries)) | Self::Object(Value::Known(entries)) =>
				entries.values().all(Self::is_fully_known),
			other => !other.is_unknown(),
		}
	}
}

/// Declared attribute type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrType {
	/// Boolean.
	Bool,
	/// 64-bit integer.
	Int64,
	/// String.
	String,
	/// List with a single element type.
	List(Box<AttrType>),
	/// String-keyed map with a single element type.
	Map(Box<AttrType>),
	/// Object with fixed attribute types.
	Object(BTreeMap<&'static str, AttrType>),
}
impl AttrType {
	/// List of the given element type.
	pub fn list_of(element: AttrType) -> Self {
		Self::List(Box::new(element))
	}

	/// Map of the given element type.
	pub fn map_of(element: AttrType) -> Self {
		Self::Map(Box::new(element))
	}

	/// Human-readable type name.
	pub fn name(&self) -> String {
		match self {
			Self::Bool => "bool".into(),
			Self::Int64 => "int64".into(),
			Self::String => "string".into(),
			Self::List(element) => format!("list({})", element.name()),
			Self::Map(element) => format!("map({})", element.name()),
			Self::Object(_) => "object".into(),
		}
	}

	/// Null value of this type.
	pub fn null(&self) -> AttrValue {
		self.tagged(false)
	}

	/// Unknown value of this type.
	pub fn unknown(&self) -> AttrValue {
		self.tagged(true)
	}

	fn tagged(&self, unknown: bool) -> AttrValue {
		fn tag<T>(unknown: bool) -> Value<T> {
			if unknown { Value::Unknown } else { Value::Null }
		}

		match self {
			Self::Bool => AttrValue::Bool(tag(unknown)),
			Self::Int64 => AttrValue::Int64(tag(unknown)),
			Self::String => AttrValue::String(tag(unknown)),
			Self::List(_) => AttrValue::List(tag(unknown)),
			Self::Map(_) => AttrValue::Map(tag(unknown)),
			Self::Object(_) => AttrValue::Object(tag(unknown)),
		}
	}

	/// Checks whether `value` is shaped like this type, recursing into known collections.
	pub fn conforms(&self, value: &AttrValue) -> bool {
		match (self, value) {
			(Self::Bool, AttrValue::Bool(_))
			| (Self::Int64, AttrValue::Int64(_))
			| (Self::String, AttrValue::String(_)) => true,
			(Self::List(element), AttrValue::List(items)) =>
				items.known().is_none_or(|items| items.iter().all(|item| element.conforms(item))),
			(Self::Map(element), AttrValue::Map(entries)) => entries
				.known()
				.is_none_or(|entries| entries.values().all(|item| element.conforms(item))),
			(Self::Object(fields), AttrValue::Object(entries)) =>
				entries.known().is_none_or(|entries| {
					entries.iter().all(|(name, item)| {
						fields.get(name.as_str()).is_some_and(|field| field.conforms(item))
					})
				}),
			_ => false,
		}
	}
}
