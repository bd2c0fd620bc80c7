//! Factory configuration surface and terminal operations.
//!
//! A factory type implements [`EntityFactory`] to declare its defaults,
//! locale, ignored keys, fillable allow-list and persistence hook, then
//! [`EntityFactory::start`] wraps it in a [`Builder`] for fluent
//! configuration (`times`, `recipe`) and the terminal operations
//! (`attributes`, `make`, `store`).

use std::collections::HashSet;
use std::sync::Arc;

use crate::entity::{Entity, materialize};
use crate::error::{FactoryError, FactoryResult};
use crate::guard::{Fillable, FillableGuard};
use crate::random::{Locale, RandomGenerator, RandomSource};
use crate::recipe::{AttributeMap, Recipe, resolve_layers};

pub mod registry;
pub mod scan;

/// Declaration of how to build one entity type.
///
/// Only [`default_attributes`](EntityFactory::default_attributes) is
/// required; the remaining methods have documented defaults.
pub trait EntityFactory: Sized {
	/// Entity type this factory produces.
	type Entity: Entity;

	/// Aggregate returned by batch terminal calls.
	///
	/// The injectable collection hook: batches are collected into this type,
	/// `Vec<Self::Entity>` being the plain default choice.
	type Collection: FromIterator<Self::Entity>;

	/// Default attributes, resolved with a fresh generator per entity.
	fn default_attributes(&self, generator: &mut RandomGenerator) -> FactoryResult<AttributeMap>;

	/// Locale for generated data.
	fn locale(&self) -> Locale {
		Locale::default()
	}

	/// Keys skipped during materialization.
	fn ignored_keys(&self) -> HashSet<String> {
		HashSet::new()
	}

	/// Fillable allow-list; the wildcard disables validation.
	fn fillable(&self) -> Fillable {
		Fillable::Any
	}

	/// Persists one built entity.
	///
	/// The default policy is explicit failure: `store` on a factory that has
	/// not supplied a hook returns
	/// [`FactoryError::PersistenceNotImplemented`].
	fn persist(&self, _entity: &Self::Entity) -> FactoryResult<()> {
		Err(FactoryError::PersistenceNotImplemented)
	}

	/// Wraps this factory in a builder.
	fn start(self) -> Builder<Self> {
		Builder::new(self)
	}
}

/// Result shape of a terminal call.
///
/// `times(1)` produces a single element, never a one-element sequence;
/// larger repeat counts produce the factory's collection type.
#[derive(Debug, PartialEq)]
pub enum Produced<T, C = Vec<T>> {
	/// Single result of a `times(1)` call.
	One(T),
	/// Batch result of a `times(n > 1)` call.
	Many(C),
}

impl<T, C> Produced<T, C> {
	/// Returns the single element, if this is a `times(1)` result.
	pub fn into_one(self) -> Option<T> {
		match self {
			Produced::One(value) => Some(value),
			Produced::Many(_) => None,
		}
	}

	/// Returns the batch, if this is a `times(n > 1)` result.
	pub fn into_many(self) -> Option<C> {
		match self {
			Produced::One(_) => None,
			Produced::Many(batch) => Some(batch),
		}
	}

	/// Returns true for a single result.
	pub fn is_one(&self) -> bool {
		matches!(self, Produced::One(_))
	}
}

impl<T> Produced<T, Vec<T>> {
	/// Flattens into a vector regardless of shape.
	pub fn into_vec(self) -> Vec<T> {
		match self {
			Produced::One(value) => vec![value],
			Produced::Many(batch) => batch,
		}
	}

	/// Number of produced elements.
	pub fn len(&self) -> usize {
		match self {
			Produced::One(_) => 1,
			Produced::Many(batch) => batch.len(),
		}
	}

	/// Returns true when nothing was produced.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Fluent configuration over an [`EntityFactory`], reusable across terminal
/// calls.
#[derive(Debug)]
pub struct Builder<F: EntityFactory> {
	factory: F,
	times: usize,
	layers: Vec<Arc<Recipe>>,
	guard: FillableGuard,
	ignored: HashSet<String>,
	source: RandomSource,
}

impl<F: EntityFactory> Builder<F> {
	/// Wraps a factory with default configuration (`times(1)`, no recipes).
	pub fn new(factory: F) -> Self {
		let source = RandomSource::new(factory.locale());
		let guard = FillableGuard::new(factory.fillable());
		let ignored = factory.ignored_keys();
		Self {
			factory,
			times: 1,
			layers: Vec::new(),
			guard,
			ignored,
			source,
		}
	}

	/// Replaces the random source, e.g. with a seeded one for reproducible
	/// fixtures.
	pub fn with_source(mut self, source: RandomSource) -> Self {
		self.source = source;
		self
	}

	/// Sets the repeat count for subsequent terminal calls.
	///
	/// Fails with [`FactoryError::OutOfRange`] for a zero count, before any
	/// attribute resolution or generator call.
	pub fn times(mut self, times: usize) -> FactoryResult<Self> {
		if times < 1 {
			return Err(FactoryError::OutOfRange(times));
		}
		self.times = times;
		Ok(self)
	}

	/// Appends a recipe layer; layers merge in the order they were added.
	pub fn recipe(mut self, recipe: Recipe) -> Self {
		self.layers.push(Arc::new(recipe));
		self
	}

	/// Runs the merge pipeline without materializing.
	pub fn attributes(&self, overrides: AttributeMap) -> FactoryResult<Produced<AttributeMap>> {
		let mut maps = self.build_maps(&overrides)?;
		Ok(if self.times == 1 {
			Produced::One(maps.remove(0))
		} else {
			Produced::Many(maps)
		})
	}

	/// Builds entities without persisting them.
	pub fn make(
		&self,
		overrides: AttributeMap,
	) -> FactoryResult<Produced<F::Entity, F::Collection>> {
		let entities = self.make_entities(&overrides)?;
		Ok(self.shape(entities))
	}

	/// Builds entities and invokes the persistence hook on each.
	///
	/// A persistence failure aborts the call; already-built entities are
	/// discarded, not returned.
	pub fn store(
		&self,
		overrides: AttributeMap,
	) -> FactoryResult<Produced<F::Entity, F::Collection>> {
		let entities = self.make_entities(&overrides)?;
		for entity in &entities {
			self.factory.persist(entity)?;
		}
		tracing::debug!(count = entities.len(), "persisted entities");
		Ok(self.shape(entities))
	}

	fn build_maps(&self, overrides: &AttributeMap) -> FactoryResult<Vec<AttributeMap>> {
		let mut maps = Vec::with_capacity(self.times);
		for _ in 0..self.times {
			let mut generator = self.source.generator();
			let defaults = self.factory.default_attributes(&mut generator)?;
			maps.push(resolve_layers(
				&mut generator,
				defaults,
				&self.layers,
				overrides,
				&self.guard,
			)?);
		}
		Ok(maps)
	}

	fn make_entities(&self, overrides: &AttributeMap) -> FactoryResult<Vec<F::Entity>> {
		self.build_maps(overrides)?
			.into_iter()
			.map(|map| materialize(map, &self.ignored))
			.collect()
	}

	fn shape(&self, mut entities: Vec<F::Entity>) -> Produced<F::Entity, F::Collection> {
		if self.times == 1 {
			Produced::One(entities.remove(0))
		} else {
			Produced::Many(entities.into_iter().collect())
		}
	}
}
