//! Shared test entities and factories.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use entity_factory::prelude::*;
use entity_factory::{attrs, entity_fields};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct User {
	pub name: String,
	pub email: String,
	pub age: u64,
	pub active: bool,
	pub note: String,
}

entity_fields!(User { name, email, age, active, note });

pub fn default_user_attributes() -> AttributeMap {
	attrs!({
		"name": "testing name",
		"email": "testing@example.com",
		"age": 30,
		"active": false,
		"note": ""
	})
}

/// Factory with fixed, deterministic defaults.
pub struct UserFactory;

impl UserFactory {
	pub fn admin() -> Recipe {
		Recipe::fixed(attrs!({ "name": "admin", "active": true }))
	}

	pub fn random_name() -> Recipe {
		Recipe::dynamic(|generator, _| Ok(attrs!({ "name": generator.name() })))
	}
}

impl EntityFactory for UserFactory {
	type Entity = User;
	type Collection = Vec<User>;

	fn default_attributes(
		&self,
		_generator: &mut RandomGenerator,
	) -> FactoryResult<AttributeMap> {
		Ok(default_user_attributes())
	}
}

/// Factory that only accepts `name` and `email` through recipes/overrides.
pub struct GuardedUserFactory;

impl EntityFactory for GuardedUserFactory {
	type Entity = User;
	type Collection = Vec<User>;

	fn default_attributes(
		&self,
		_generator: &mut RandomGenerator,
	) -> FactoryResult<AttributeMap> {
		Ok(default_user_attributes())
	}

	fn fillable(&self) -> Fillable {
		Fillable::only(["name", "email"])
	}
}

/// Factory that ignores the `note` attribute during materialization.
pub struct IgnoringUserFactory;

impl EntityFactory for IgnoringUserFactory {
	type Entity = User;
	type Collection = Vec<User>;

	fn default_attributes(
		&self,
		_generator: &mut RandomGenerator,
	) -> FactoryResult<AttributeMap> {
		Ok(default_user_attributes())
	}

	fn ignored_keys(&self) -> HashSet<String> {
		HashSet::from(["note".to_string()])
	}
}

/// Factory whose persistence hook records the stored names.
pub struct PersistingUserFactory {
	pub stored: Rc<RefCell<Vec<String>>>,
}

impl EntityFactory for PersistingUserFactory {
	type Entity = User;
	type Collection = Vec<User>;

	fn default_attributes(
		&self,
		_generator: &mut RandomGenerator,
	) -> FactoryResult<AttributeMap> {
		Ok(default_user_attributes())
	}

	fn persist(&self, entity: &User) -> FactoryResult<()> {
		self.stored.borrow_mut().push(entity.name.clone());
		Ok(())
	}
}

/// Factory producing raw maps with a batch-unique digit.
pub struct DigitFactory;

impl EntityFactory for DigitFactory {
	type Entity = AttributeMap;
	type Collection = Vec<AttributeMap>;

	fn default_attributes(&self, generator: &mut RandomGenerator) -> FactoryResult<AttributeMap> {
		Ok(attrs!({ "num": generator.unique().digit()? }))
	}
}

/// Counts how often default attributes are resolved.
pub struct CountingFactory {
	pub resolutions: Rc<RefCell<usize>>,
}

impl EntityFactory for CountingFactory {
	type Entity = User;
	type Collection = Vec<User>;

	fn default_attributes(
		&self,
		_generator: &mut RandomGenerator,
	) -> FactoryResult<AttributeMap> {
		*self.resolutions.borrow_mut() += 1;
		Ok(default_user_attributes())
	}
}

/// Collection wrapper exercising the collection-construction hook.
#[derive(Debug, PartialEq)]
pub struct UserSet {
	pub items: Vec<User>,
}

impl FromIterator<User> for UserSet {
	fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
		Self {
			items: iter.into_iter().collect(),
		}
	}
}

/// Factory wrapping batches into a [`UserSet`].
pub struct CollectedUserFactory;

impl EntityFactory for CollectedUserFactory {
	type Entity = User;
	type Collection = UserSet;

	fn default_attributes(
		&self,
		_generator: &mut RandomGenerator,
	) -> FactoryResult<AttributeMap> {
		Ok(default_user_attributes())
	}
}
