//! Convenience re-exports for common usage.
//!
//! ```
//! use entity_factory::prelude::*;
//! ```

pub use crate::entity::{Entity, materialize, materializer};
pub use crate::error::{FactoryError, FactoryResult};
pub use crate::factory::registry::{DEFAULT_RECIPE, Registry, RegistryBuilder};
pub use crate::factory::scan::load_definitions;
pub use crate::factory::{Builder, EntityFactory, Produced};
pub use crate::guard::{Fillable, FillableGuard};
pub use crate::random::{Locale, RandomGenerator, RandomSource, Unique};
pub use crate::recipe::{AttributeMap, Recipe};
