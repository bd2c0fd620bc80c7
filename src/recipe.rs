//! Recipes and the attribute merge pipeline.
//!
//! A recipe is an overlay of attribute values, either a fixed map or a
//! function of the random generator and the attributes accumulated so far.
//! Layers merge left to right with last-write-wins on key collisions:
//! defaults, then each recipe in selection order, then the call-site
//! overrides. No layer can observe a later layer.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{FactoryError, FactoryResult};
use crate::guard::FillableGuard;
use crate::random::RandomGenerator;

/// Mapping from field name to attribute value.
pub type AttributeMap = serde_json::Map<String, Value>;

/// Signature of a computed recipe.
pub type DynamicFn =
	dyn Fn(&mut RandomGenerator, &AttributeMap) -> FactoryResult<AttributeMap> + Send + Sync;

/// An attribute overlay applied during the merge pipeline.
pub enum Recipe {
	/// Fixed attribute map; ignores the generator and prior layers.
	Static(AttributeMap),
	/// Computed overlay; receives the generator and the attributes
	/// accumulated from all prior layers.
	Dynamic(Box<DynamicFn>),
}

impl Recipe {
	/// Creates a static recipe from a fixed attribute map.
	pub fn fixed(attributes: AttributeMap) -> Self {
		Recipe::Static(attributes)
	}

	/// Creates a computed recipe.
	pub fn dynamic<F>(resolver: F) -> Self
	where
		F: Fn(&mut RandomGenerator, &AttributeMap) -> FactoryResult<AttributeMap>
			+ Send
			+ Sync
			+ 'static,
	{
		Recipe::Dynamic(Box::new(resolver))
	}

	/// Creates a static recipe from a JSON value.
	///
	/// Data-driven definitions can only describe static overlays, so any
	/// value other than an object is rejected at construction time.
	pub fn from_value(value: Value) -> FactoryResult<Self> {
		match value {
			Value::Object(attributes) => Ok(Recipe::Static(attributes)),
			other => Err(FactoryError::InvalidRecipe(other.to_string())),
		}
	}

	/// Resolves this recipe into the overlay to merge in.
	pub fn resolve(
		&self,
		generator: &mut RandomGenerator,
		so_far: &AttributeMap,
	) -> FactoryResult<AttributeMap> {
		match self {
			Recipe::Static(attributes) => Ok(attributes.clone()),
			Recipe::Dynamic(resolver) => resolver(generator, so_far),
		}
	}
}

impl fmt::Debug for Recipe {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Recipe::Static(attributes) => f.debug_tuple("Static").field(attributes).finish(),
			Recipe::Dynamic(_) => f.debug_tuple("Dynamic").field(&"..").finish(),
		}
	}
}

/// Merges `overlay` into `acc`, overlay winning on conflicts.
pub(crate) fn merge(acc: &mut AttributeMap, overlay: AttributeMap) {
	for (key, value) in overlay {
		acc.insert(key, value);
	}
}

/// Runs the merge pipeline for one entity.
///
/// Recipe overlays and the explicit overrides are validated against the
/// fillable guard before merging, so a violation fails fast without touching
/// the accumulator.
pub(crate) fn resolve_layers(
	generator: &mut RandomGenerator,
	defaults: AttributeMap,
	layers: &[Arc<Recipe>],
	overrides: &AttributeMap,
	guard: &FillableGuard,
) -> FactoryResult<AttributeMap> {
	let mut acc = defaults;
	for layer in layers {
		let overlay = layer.resolve(generator, &acc)?;
		guard.check(&overlay)?;
		merge(&mut acc, overlay);
	}
	guard.check(overrides)?;
	merge(&mut acc, overrides.clone());
	Ok(acc)
}

/// Builds an [`AttributeMap`] from JSON object syntax.
///
/// ```
/// use entity_factory::attrs;
///
/// let map = attrs!({ "name": "testing", "age": 30 });
/// assert_eq!(map["name"], "testing");
/// ```
#[macro_export]
macro_rules! attrs {
	($($json:tt)*) => {
		match $crate::__private::json!($($json)*) {
			$crate::__private::Value::Object(map) => map,
			_ => panic!("attrs! expects a JSON object"),
		}
	};
}
