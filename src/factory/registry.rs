//! Definition registry for dynamic factory lookup.
//!
//! A [`Registry`] maps opaque type keys to definitions: a construction
//! capability plus a set of named recipes. Definitions are registered at
//! test-suite setup, read during test execution and reset between runs via
//! [`Registry::clear`]. The registry is an explicit value, not a process
//! global, so suites can isolate each other with separate instances.
//!
//! The map itself is guarded by a lock so a registry can be shared by
//! reference from test helpers, but no cross-operation transactional
//! guarantees are made; parallel mutation must be coordinated by the host
//! test runner.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{FactoryError, FactoryResult};
use crate::factory::Produced;
use crate::guard::FillableGuard;
use crate::random::{Locale, RandomSource};
use crate::recipe::{AttributeMap, Recipe, resolve_layers};

/// Reserved recipe name under which [`Registry::define`] registers the
/// default recipe.
pub const DEFAULT_RECIPE: &str = "default";

type Constructor<E> = Arc<dyn Fn(AttributeMap) -> FactoryResult<E> + Send + Sync>;

/// Type-erased definition entry.
trait AnyDefinition: Send + Sync {
	fn as_any(&self) -> &dyn Any;
	fn insert_recipe(&mut self, name: String, recipe: Arc<Recipe>);
}

struct Definition<E> {
	constructor: Constructor<E>,
	recipes: HashMap<String, Arc<Recipe>>,
}

impl<E: 'static> AnyDefinition for Definition<E> {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn insert_recipe(&mut self, name: String, recipe: Arc<Recipe>) {
		self.recipes.insert(name, recipe);
	}
}

/// Mapping from type key to construction capability and named recipes.
#[derive(Default)]
pub struct Registry {
	definitions: RwLock<HashMap<String, Box<dyn AnyDefinition>>>,
	locale: RwLock<Locale>,
}

impl Registry {
	/// Creates an empty registry with the default locale.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the locale handed to builders created from this registry.
	pub fn set_locale(&self, locale: Locale) {
		*self.locale.write() = locale;
	}

	/// Returns the registry locale.
	pub fn locale(&self) -> Locale {
		*self.locale.read()
	}

	/// Registers a type, overwriting any prior definition with the same key.
	///
	/// `default_recipe` is registered under the reserved name
	/// [`DEFAULT_RECIPE`] and pre-selected by every builder from
	/// [`Registry::of`].
	pub fn define<E, C>(&self, type_key: impl Into<String>, constructor: C, default_recipe: Recipe)
	where
		E: 'static,
		C: Fn(AttributeMap) -> FactoryResult<E> + Send + Sync + 'static,
	{
		let type_key = type_key.into();
		let mut recipes = HashMap::new();
		recipes.insert(DEFAULT_RECIPE.to_string(), Arc::new(default_recipe));
		tracing::debug!(type_key = %type_key, "defined entity type");
		self.definitions.write().insert(
			type_key,
			Box::new(Definition::<E> {
				constructor: Arc::new(constructor),
				recipes,
			}),
		);
	}

	/// Inserts or overwrites a named recipe for an already-defined type.
	pub fn add_recipe(
		&self,
		type_key: &str,
		name: impl Into<String>,
		recipe: Recipe,
	) -> FactoryResult<()> {
		let mut definitions = self.definitions.write();
		let definition = definitions
			.get_mut(type_key)
			.ok_or_else(|| FactoryError::NotDefined(type_key.to_string()))?;
		let name = name.into();
		tracing::trace!(type_key = %type_key, recipe = %name, "added recipe");
		definition.insert_recipe(name, recipe.into());
		Ok(())
	}

	/// Returns a fresh builder bound to the type's construction capability
	/// and recipe set, with `"default"` pre-selected.
	pub fn of<E: 'static>(&self, type_key: &str) -> FactoryResult<RegistryBuilder<E>> {
		let definitions = self.definitions.read();
		let definition = definitions
			.get(type_key)
			.ok_or_else(|| FactoryError::NotDefined(type_key.to_string()))?;
		let definition = definition
			.as_any()
			.downcast_ref::<Definition<E>>()
			.ok_or_else(|| FactoryError::TypeMismatch(type_key.to_string()))?;
		let mut builder = RegistryBuilder {
			type_key: type_key.to_string(),
			constructor: Arc::clone(&definition.constructor),
			recipes: definition.recipes.clone(),
			selected: Vec::new(),
			times: 1,
			source: RandomSource::new(self.locale()),
		};
		builder.select(DEFAULT_RECIPE)?;
		Ok(builder)
	}

	/// Returns whether a type key is defined.
	pub fn contains(&self, type_key: &str) -> bool {
		self.definitions.read().contains_key(type_key)
	}

	/// Returns all defined type keys.
	pub fn type_keys(&self) -> Vec<String> {
		self.definitions.read().keys().cloned().collect()
	}

	/// Number of defined types.
	pub fn len(&self) -> usize {
		self.definitions.read().len()
	}

	/// Returns true when nothing is defined.
	pub fn is_empty(&self) -> bool {
		self.definitions.read().is_empty()
	}

	/// Removes every definition; for reset between test runs.
	pub fn clear(&self) {
		self.definitions.write().clear();
	}
}

/// Builder bound to one registry definition.
///
/// Recipes are selected by name; selection order determines merge order.
pub struct RegistryBuilder<E> {
	type_key: String,
	constructor: Constructor<E>,
	recipes: HashMap<String, Arc<Recipe>>,
	selected: Vec<Arc<Recipe>>,
	times: usize,
	source: RandomSource,
}

impl<E: 'static> RegistryBuilder<E> {
	/// Selects a named recipe as the next merge layer.
	pub fn recipe(mut self, name: &str) -> FactoryResult<Self> {
		self.select(name)?;
		Ok(self)
	}

	/// Selects several named recipes in order.
	pub fn recipes(mut self, names: &[&str]) -> FactoryResult<Self> {
		for name in names {
			self.select(name)?;
		}
		Ok(self)
	}

	/// Sets the repeat count; zero fails with
	/// [`FactoryError::OutOfRange`].
	pub fn times(mut self, times: usize) -> FactoryResult<Self> {
		if times < 1 {
			return Err(FactoryError::OutOfRange(times));
		}
		self.times = times;
		Ok(self)
	}

	/// Replaces the random source.
	pub fn with_source(mut self, source: RandomSource) -> Self {
		self.source = source;
		self
	}

	/// Runs the merge pipeline without constructing instances.
	pub fn attributes(&self, overrides: AttributeMap) -> FactoryResult<Produced<AttributeMap>> {
		let mut maps = self.build_maps(&overrides)?;
		Ok(if self.times == 1 {
			Produced::One(maps.remove(0))
		} else {
			Produced::Many(maps)
		})
	}

	/// Builds instances through the definition's construction capability.
	pub fn make(&self, overrides: AttributeMap) -> FactoryResult<Produced<E>> {
		let mut entities = self
			.build_maps(&overrides)?
			.into_iter()
			.map(|map| (self.constructor)(map))
			.collect::<FactoryResult<Vec<E>>>()?;
		Ok(if self.times == 1 {
			Produced::One(entities.remove(0))
		} else {
			Produced::Many(entities)
		})
	}

	fn select(&mut self, name: &str) -> FactoryResult<()> {
		let recipe = self.recipes.get(name).ok_or_else(|| {
			FactoryError::NotDefined(format!("recipe {name} for {}", self.type_key))
		})?;
		self.selected.push(Arc::clone(recipe));
		Ok(())
	}

	fn build_maps(&self, overrides: &AttributeMap) -> FactoryResult<Vec<AttributeMap>> {
		let guard = FillableGuard::wildcard();
		let mut maps = Vec::with_capacity(self.times);
		for _ in 0..self.times {
			let mut generator = self.source.generator();
			maps.push(resolve_layers(
				&mut generator,
				AttributeMap::new(),
				&self.selected,
				overrides,
				&guard,
			)?);
		}
		Ok(maps)
	}
}
