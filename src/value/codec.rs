//! Conversions between typed resource models and dynamic [`Object`] values.
//!
//! Resource models are plain structs whose fields are all [`Value<T>`]. The [`tf_model!`]
//! macro derives both directions of the conversion from the field list, using the field name
//! as the attribute name.
//!
//! [`tf_model!`]: crate::tf_model

// self
use crate::{
	_prelude::*,
	diag::{AttributePath, PathStep},
	value::{AttrType, AttrValue, Object, Value},
};

/// Error raised when a dynamic value does not match the model it is decoded into.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum DecodeError {
	/// The attribute carried a different primitive kind.
	#[error("Attribute `{path}` expected a {expected} value but found {found}.")]
	TypeMismatch {
		/// Attribute location.
		path: AttributePath,
		/// Declared type name.
		expected: String,
		/// Kind that was found.
		found: &'static str,
	},
	/// A collection element was unknown or null where a concrete element is required.
	#[error("Attribute `{path}` contains an unknown or null element.")]
	IncompleteElement {
		/// Attribute location.
		path: AttributePath,
	},
}
impl DecodeError {
	/// Location of the offending attribute.
	pub fn path(&self) -> &AttributePath {
		match self {
			Self::TypeMismatch { path, .. } | Self::IncompleteElement { path } => path,
		}
	}

	fn within(self, parent: PathStep) -> Self {
		match self {
			Self::TypeMismatch { path, expected, found } =>
				Self::TypeMismatch { path: path.within(parent), expected, found },
			Self::IncompleteElement { path } =>
				Self::IncompleteElement { path: path.within(parent) },
		}
	}

	fn mismatch<T>(found: &AttrValue) -> Self
	where
		T: AttrCodec,
	{
		Self::TypeMismatch {
			path: AttributePath::default(),
			expected: T::attr_type().name(),
			found: found.kind(),
		}
	}
}

/// Concrete attribute payload types (`bool`, `i64`, `String`, lists, maps, nested models).
pub trait AttrCodec
where
	Self: Sized,
{
	/// Declared attribute type.
	fn attr_type() -> AttrType;

	/// Wraps a tagged value into its dynamic form.
	fn into_attr(value: Value<Self>) -> AttrValue;

	/// Unwraps a dynamic value, failing on a kind mismatch.
	fn from_attr(value: AttrValue) -> Result<Value<Self>, DecodeError>;
}
impl AttrCodec for bool {
	fn attr_type() -> AttrType {
		AttrType::Bool
	}

	fn into_attr(value: Value<Self>) -> AttrValue {
		AttrValue::Bool(value)
	}

	fn from_attr(value: AttrValue) -> Result<Value<Self>, DecodeError> {
		match value {
			AttrValue::Bool(inner) => Ok(inner),
			other => Err(DecodeError::mismatch::<Self>(&other)),
		}
	}
}
impl AttrCodec for i64 {
	fn attr_type() -> AttrType {
		AttrType::Int64
	}

	fn into_attr(value: Value<Self>) -> AttrValue {
		AttrValue::Int64(value)
	}

	fn from_attr(value: AttrValue) -> Result<Value<Self>, DecodeError> {
		match value {
			AttrValue::Int64(inner) => Ok(inner),
			other => Err(DecodeError::mismatch::<Self>(&other)),
		}
	}
}
impl AttrCodec for String {
	fn attr_type() -> AttrType {
		AttrType::String
	}

	fn into_attr(value: Value<Self>) -> AttrValue {
		AttrValue::String(value)
	}

	fn from_attr(value: AttrValue) -> Result<Value<Self>, DecodeError> {
		match value {
			AttrValue::String(inner) => Ok(inner),
			other => Err(DecodeError::mismatch::<Self>(&other)),
		}
	}
}
impl<T> AttrCodec for Vec<T>
where
	T: AttrCodec,
{
	fn attr_type() -> AttrType {
		AttrType::list_of(T::attr_type())
	}

	fn into_attr(value: Value<Self>) -> AttrValue {
		AttrValue::List(
			value.map(|items| items.into_iter().map(|item| T::into_attr(Value::Known(item))).collect()),
		)
	}

	fn from_attr(value: AttrValue) -> Result<Value<Self>, DecodeError> {
		let items = match value {
			AttrValue::List(Value::Known(items)) => items,
			AttrValue::List(Value::Unknown) => return Ok(Value::Unknown),
			AttrValue::List(Value::Null) => return Ok(Value::Null),
			other => return Err(DecodeError::mismatch::<Self>(&other)),
		};

		items
			.into_iter()
			.enumerate()
			.map(|(idx, item)| {
				T::from_attr(item).and_then(known_element).map_err(|e| e.within(PathStep::Index(idx)))
			})
			.collect::<Result<Vec<_>, _>>()
			.map(Value::Known)
	}
}
impl<T> AttrCodec for BTreeMap<String, T>
where
	T: AttrCodec,
{
	fn attr_type() -> AttrType {
		AttrType::map_of(T::attr_type())
	}

	fn into_attr(value: Value<Self>) -> AttrValue {
		AttrValue::Map(value.map(|entries| {
			entries.into_iter().map(|(key, item)| (key, T::into_attr(Value::Known(item)))).collect()
		}))
	}

	fn from_attr(value: AttrValue) -> Result<Value<Self>, DecodeError> {
		let entries = match value {
			AttrValue::Map(Value::Known(entries)) => entries,
			AttrValue::Map(Value::Unknown) => return Ok(Value::Unknown),
			AttrValue::Map(Value::Null) => return Ok(Value::Null),
			other => return Err(DecodeError::mismatch::<Self>(&other)),
		};

		entries
			.into_iter()
			.map(|(key, item)| {
				T::from_attr(item)
					.and_then(known_element)
					.map(|item| (key.clone(), item))
					.map_err(|e| e.within(PathStep::Key(key)))
			})
			.collect::<Result<BTreeMap<_, _>, _>>()
			.map(Value::Known)
	}
}

fn known_element<T>(value: Value<T>) -> Result<T, DecodeError> {
	value.into_known().ok_or(DecodeError::IncompleteElement { path: AttributePath::default() })
}

/// Resource model that round-trips through an [`Object`].
pub trait Model
where
	Self: 'static + Clone + Send + Sync,
{
	/// Decodes a plan or state object.
	fn from_object(object: &Object) -> Result<Self, DecodeError>;

	/// Encodes the model into an object keyed by attribute name.
	fn into_object(self) -> Object;

	/// Attribute names and types, in attribute-name order.
	fn attr_types() -> BTreeMap<&'static str, AttrType>;
}

/// Model field: a [`Value<T>`] over an [`AttrCodec`] payload.
pub trait Field
where
	Self: Sized,
{
	/// Declared attribute type.
	fn attr_type() -> AttrType;

	/// Encodes the field into its dynamic form.
	fn encode(self) -> AttrValue;

	/// Decodes attribute `name` of `object`, treating a missing key as null.
	fn decode(object: &Object, name: &str) -> Result<Self, DecodeError>;
}
impl<T> Field for Value<T>
where
	T: AttrCodec,
{
	fn attr_type() -> AttrType {
		T::attr_type()
	}

	fn encode(self) -> AttrValue {
		T::into_attr(self)
	}

	fn decode(object: &Object, name: &str) -> Result<Self, DecodeError> {
		match object.get(name) {
			Some(value) => T::from_attr(value.clone())
				.map_err(|e| e.within(PathStep::Attribute(name.to_owned()))),
			None => Ok(Value::Null),
		}
	}
}

/// Decodes a nested model from an object attribute value.
pub fn decode_nested<M>(value: AttrValue) -> Result<Value<M>, DecodeError>
where
	M: Model,
{
	match value {
		AttrValue::Object(Value::Known(object)) => M::from_object(&object).map(Value::Known),
		AttrValue::Object(Value::Unknown) => Ok(Value::Unknown),
		AttrValue::Object(Value::Null) => Ok(Value::Null),
		other => Err(DecodeError::TypeMismatch {
			path: AttributePath::default(),
			expected: AttrType::Object(M::attr_types()).name(),
			found: other.kind(),
		}),
	}
}

/// Declares a resource model whose fields are all [`Value<T>`] and derives [`Model`] and
/// [`AttrCodec`] for it. Field names double as attribute names.
///
/// [`Value<T>`]: crate::value::Value
/// [`Model`]: crate::value::Model
/// [`AttrCodec`]: crate::value::AttrCodec
#[macro_export]
macro_rules! tf_model {
	(
		$(#[$meta:meta])*
		pub struct $name:ident {
			$(
				$(#[$field_meta:meta])*
				pub $field:ident: $ty:ty,
			)*
		}
	) => {
		$(#[$meta])*
		#[derive(Clone, Debug, Default, PartialEq)]
		pub struct $name {
			$(
				$(#[$field_meta])*
				pub $field: $ty,
			)*
		}
		impl $crate::value::Model for $name {
			fn from_object(
				object: &$crate::value::Object,
			) -> ::std::result::Result<Self, $crate::value::DecodeError> {
				::std::result::Result::Ok(Self {
					$($field: <$ty as $crate::value::Field>::decode(object, stringify!($field))?,)*
				})
			}

			fn into_object(self) -> $crate::value::Object {
				let mut object = $crate::value::Object::new();

				$(
					object.insert(
						stringify!($field).to_owned(),
						<$ty as $crate::value::Field>::encode(self.$field),
					);
				)*

				object
			}

			fn attr_types() -> ::std::collections::BTreeMap<&'static str, $crate::value::AttrType> {
				::std::collections::BTreeMap::from([
					$((stringify!($field), <$ty as $crate::value::Field>::attr_type()),)*
				])
			}
		}
		impl $crate::value::AttrCodec for $name {
			fn attr_type() -> $crate::value::AttrType {
				$crate::value::AttrType::Object(<Self as $crate::value::Model>::attr_types())
			}

			fn into_attr(value: $crate::value::Value<Self>) -> $crate::value::AttrValue {
				$crate::value::AttrValue::Object(value.map(<Self as $crate::value::Model>::into_object))
			}

			fn from_attr(
				value: $crate::value::AttrValue,
			) -> ::std::result::Result<$crate::value::Value<Self>, $crate::value::DecodeError> {
				$crate::value::decode_nested::<Self>(value)
			}
		}
	};
}
