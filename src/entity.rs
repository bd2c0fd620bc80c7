//! Entity materialization.
//!
//! Materialization projects a resolved attribute map onto a blank instance
//! of the target type, bypassing whatever construction logic the type
//! normally enforces — the point of a fixture factory is precisely to set up
//! arbitrary states a real constructor would reject.
//!
//! Rust has no runtime reflection, so the "allocate blank, assign fields by
//! name" capability is a trait. [`entity_fields!`] generates the per-type
//! assignment table from a field list.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{FactoryError, FactoryResult};
use crate::recipe::AttributeMap;

/// Capability to allocate a blank instance and assign named fields.
pub trait Entity: Default {
	/// Allocates an instance without running normal construction logic.
	fn blank() -> Self {
		Self::default()
	}

	/// Assigns `value` to the named field.
	///
	/// Fails with [`FactoryError::UnknownField`] when no field with that
	/// name exists, or [`FactoryError::IncompatibleValue`] when the value
	/// does not convert into the field's type.
	fn assign(&mut self, field: &str, value: Value) -> FactoryResult<()>;
}

/// Materializes an entity from a resolved attribute map.
///
/// Attributes are assigned in map order; keys in `ignored` are skipped and
/// leave the corresponding field at its blank value. There is no atomicity
/// across field assignment: a failure mid-way abandons the partially
/// populated instance.
pub fn materialize<E: Entity>(
	attributes: AttributeMap,
	ignored: &HashSet<String>,
) -> FactoryResult<E> {
	let mut entity = E::blank();
	for (key, value) in attributes {
		if ignored.contains(&key) {
			continue;
		}
		entity.assign(&key, value)?;
	}
	Ok(entity)
}

/// Adapts the [`Entity`] capability into a construction function suitable
/// for [`Registry::define`](crate::factory::registry::Registry::define).
pub fn materializer<E: Entity + 'static>(
	ignored: HashSet<String>,
) -> impl Fn(AttributeMap) -> FactoryResult<E> + Send + Sync + 'static {
	move |attributes| materialize(attributes, &ignored)
}

/// Converts an attribute value into a field's concrete type.
///
/// Support function for [`entity_fields!`]; not normally called directly.
pub fn from_value<T: DeserializeOwned>(field: &str, value: Value) -> FactoryResult<T> {
	serde_json::from_value(value).map_err(|source| FactoryError::IncompatibleValue {
		field: field.to_string(),
		source,
	})
}

/// Raw attribute maps materialize as themselves, so data-driven definitions
/// can produce maps without a concrete entity type.
impl Entity for AttributeMap {
	fn assign(&mut self, field: &str, value: Value) -> FactoryResult<()> {
		self.insert(field.to_string(), value);
		Ok(())
	}
}

/// Generates an [`Entity`] implementation from a field list.
///
/// Every listed field becomes assignable by name; any other name fails with
/// [`FactoryError::UnknownField`]. Field types must implement
/// `serde::Deserialize`.
///
/// ```
/// #[derive(Debug, Default)]
/// struct User {
/// 	name: String,
/// 	age: u64,
/// }
///
/// entity_factory::entity_fields!(User { name, age });
/// ```
#[macro_export]
macro_rules! entity_fields {
	($ty:ty { $($field:ident),+ $(,)? }) => {
		impl $crate::entity::Entity for $ty {
			fn assign(
				&mut self,
				field: &str,
				value: $crate::__private::Value,
			) -> $crate::error::FactoryResult<()> {
				match field {
					$(
						stringify!($field) => {
							self.$field = $crate::entity::from_value(field, value)?;
							Ok(())
						}
					)+
					unknown => Err($crate::error::FactoryError::UnknownField(
						unknown.to_string(),
					)),
				}
			}
		}
	};
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attrs;
	use rstest::rstest;

	#[derive(Debug, Default, PartialEq)]
	struct Sample {
		name: String,
		age: u64,
		active: bool,
	}

	crate::entity_fields!(Sample { name, age, active });

	#[rstest]
	fn materializes_all_named_fields() {
		let sample: Sample = materialize(
			attrs!({ "name": "testing", "age": 30, "active": true }),
			&HashSet::new(),
		)
		.unwrap();
		assert_eq!(
			sample,
			Sample {
				name: "testing".to_string(),
				age: 30,
				active: true,
			}
		);
	}

	#[rstest]
	fn unassigned_fields_keep_blank_values() {
		let sample: Sample = materialize(attrs!({ "name": "only" }), &HashSet::new()).unwrap();
		assert_eq!(sample.age, 0);
		assert!(!sample.active);
	}

	#[rstest]
	fn unknown_field_is_rejected() {
		let result: FactoryResult<Sample> =
			materialize(attrs!({ "misspelled": "x" }), &HashSet::new());
		match result {
			Err(FactoryError::UnknownField(field)) => assert_eq!(field, "misspelled"),
			other => panic!("expected UnknownField, got {other:?}"),
		}
	}

	#[rstest]
	fn ignored_keys_are_skipped() {
		let ignored = HashSet::from(["age".to_string()]);
		let sample: Sample =
			materialize(attrs!({ "name": "testing", "age": 99 }), &ignored).unwrap();
		assert_eq!(sample.name, "testing");
		assert_eq!(sample.age, 0);
	}

	#[rstest]
	fn incompatible_value_names_the_field() {
		let result: FactoryResult<Sample> =
			materialize(attrs!({ "age": "not a number" }), &HashSet::new());
		match result {
			Err(FactoryError::IncompatibleValue { field, .. }) => assert_eq!(field, "age"),
			other => panic!("expected IncompatibleValue, got {other:?}"),
		}
	}

	#[rstest]
	fn attribute_maps_materialize_as_themselves() {
		let map: AttributeMap =
			materialize(attrs!({ "anything": 1 }), &HashSet::new()).unwrap();
		assert_eq!(map, attrs!({ "anything": 1 }));
	}
}
