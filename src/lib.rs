//! Test-fixture entity factories.
//!
//! Given a target entity type, this crate produces populated instances (or
//! raw attribute maps) for automated tests, with default attributes,
//! named/composable recipes, randomized field generation, bulk creation and
//! optional persistence.
//!
//! # Building entities from a factory type
//!
//! ```
//! use entity_factory::prelude::*;
//! use entity_factory::{attrs, entity_fields};
//!
//! #[derive(Debug, Default)]
//! struct User {
//! 	name: String,
//! 	email: String,
//! }
//!
//! entity_fields!(User { name, email });
//!
//! struct UserFactory;
//!
//! impl EntityFactory for UserFactory {
//! 	type Entity = User;
//! 	type Collection = Vec<User>;
//!
//! 	fn default_attributes(
//! 		&self,
//! 		generator: &mut RandomGenerator,
//! 	) -> FactoryResult<AttributeMap> {
//! 		Ok(attrs!({ "name": generator.name(), "email": generator.email() }))
//! 	}
//! }
//!
//! # fn run() -> FactoryResult<()> {
//! let user = UserFactory
//! 	.start()
//! 	.make(attrs!({ "name": "explicit" }))?
//! 	.into_one()
//! 	.unwrap();
//! assert_eq!(user.name, "explicit");
//!
//! let users = UserFactory
//! 	.start()
//! 	.times(3)?
//! 	.make(attrs!({}))?
//! 	.into_many()
//! 	.unwrap();
//! assert_eq!(users.len(), 3);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! # Building through a registry
//!
//! ```
//! use entity_factory::prelude::*;
//! use entity_factory::attrs;
//!
//! # fn run() -> FactoryResult<()> {
//! let registry = Registry::new();
//! registry.define(
//! 	"blog.Post",
//! 	|attributes: AttributeMap| Ok(attributes),
//! 	Recipe::fixed(attrs!({ "title": "untitled" })),
//! );
//! registry.add_recipe(
//! 	"blog.Post",
//! 	"published",
//! 	Recipe::fixed(attrs!({ "published": true })),
//! )?;
//!
//! let post = registry
//! 	.of::<AttributeMap>("blog.Post")?
//! 	.recipe("published")?
//! 	.make(attrs!({}))?
//! 	.into_one()
//! 	.unwrap();
//! assert_eq!(post["title"], "untitled");
//! assert_eq!(post["published"], true);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! # Pipeline
//!
//! Every built entity goes through the same merge pipeline: default
//! attributes, then each recipe layer in selection order (each validated
//! against the fillable allow-list, each able to read the attributes
//! accumulated so far), then the call-site overrides. The merged map is then
//! projected onto a blank instance field by field, bypassing the entity's
//! normal construction logic.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod entity;
pub mod error;
pub mod factory;
pub mod guard;
pub mod prelude;
pub mod random;
pub mod recipe;

pub use entity::{Entity, materialize, materializer};
pub use error::{FactoryError, FactoryResult};
pub use factory::registry::{DEFAULT_RECIPE, Registry, RegistryBuilder};
pub use factory::scan::load_definitions;
pub use factory::{Builder, EntityFactory, Produced};
pub use guard::{Fillable, FillableGuard};
pub use random::{Locale, RandomGenerator, RandomSource, Unique};
pub use recipe::{AttributeMap, Recipe};

// Re-exports used by the exported macros.
#[doc(hidden)]
pub mod __private {
	pub use serde_json::{Value, json};
}
