//! Directory-based auto-registration of definitions.
//!
//! A convenience over the registry's `define`/`add_recipe` surface: a
//! directory tree of JSON definition files is scanned recursively and each
//! file is applied in deterministic (path-sorted) order.
//!
//! File shape:
//!
//! ```json
//! {
//!   "type": "blog.Post",
//!   "recipes": {
//!     "default": { "title": "untitled" },
//!     "published": { "published": true }
//!   }
//! }
//! ```
//!
//! A file carrying a `"default"` recipe defines the type as producing raw
//! attribute maps; a file without one only adds recipes to an existing
//! definition and fails with [`NotDefined`] when the type is unknown. Recipe
//! values that are not objects fail with [`InvalidRecipe`] at registration
//! time.
//!
//! [`NotDefined`]: crate::error::FactoryError::NotDefined
//! [`InvalidRecipe`]: crate::error::FactoryError::InvalidRecipe

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::FactoryResult;
use crate::factory::registry::{DEFAULT_RECIPE, Registry};
use crate::recipe::{AttributeMap, Recipe};

#[derive(Debug, Deserialize)]
struct DefinitionFile {
	#[serde(rename = "type")]
	type_key: String,
	recipes: serde_json::Map<String, Value>,
}

/// Scans `dir` recursively for `.json` definition files and registers them.
///
/// Returns the number of files applied.
pub fn load_definitions(registry: &Registry, dir: impl AsRef<Path>) -> FactoryResult<usize> {
	let mut files = Vec::new();
	collect_json_files(dir.as_ref(), &mut files)?;
	files.sort();

	let mut loaded = 0;
	for path in files {
		let content = std::fs::read_to_string(&path)?;
		let file: DefinitionFile = serde_json::from_str(&content)?;
		tracing::debug!(path = %path.display(), type_key = %file.type_key, "loading definition file");
		apply(registry, file)?;
		loaded += 1;
	}
	Ok(loaded)
}

fn collect_json_files(dir: &Path, files: &mut Vec<PathBuf>) -> FactoryResult<()> {
	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_dir() {
			collect_json_files(&path, files)?;
		} else if path.extension().is_some_and(|ext| ext == "json") {
			files.push(path);
		}
	}
	Ok(())
}

fn apply(registry: &Registry, file: DefinitionFile) -> FactoryResult<()> {
	let mut default = None;
	let mut named = Vec::with_capacity(file.recipes.len());
	for (name, value) in file.recipes {
		let recipe = Recipe::from_value(value)?;
		if name == DEFAULT_RECIPE {
			default = Some(recipe);
		} else {
			named.push((name, recipe));
		}
	}

	// The definition must exist before named recipes are attached.
	if let Some(default) = default {
		registry.define(
			file.type_key.clone(),
			|attributes: AttributeMap| Ok(attributes),
			default,
		);
	}
	for (name, recipe) in named {
		registry.add_recipe(&file.type_key, name, recipe)?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attrs;
	use crate::error::FactoryError;
	use rstest::rstest;
	use std::fs;
	use tempfile::TempDir;

	fn write(dir: &Path, name: &str, content: &str) {
		fs::write(dir.join(name), content).unwrap();
	}

	#[rstest]
	fn loads_definitions_recursively() {
		let dir = TempDir::new().unwrap();
		write(
			dir.path(),
			"post.json",
			r#"{ "type": "blog.Post", "recipes": { "default": { "title": "untitled" } } }"#,
		);
		let nested = dir.path().join("nested/deeper");
		fs::create_dir_all(&nested).unwrap();
		write(
			&nested,
			"comment.json",
			r#"{ "type": "blog.Comment", "recipes": { "default": { "body": "" } } }"#,
		);

		let registry = Registry::new();
		let loaded = load_definitions(&registry, dir.path()).unwrap();
		assert_eq!(loaded, 2);
		assert!(registry.contains("blog.Post"));
		assert!(registry.contains("blog.Comment"));

		let post = registry
			.of::<AttributeMap>("blog.Post")
			.unwrap()
			.make(AttributeMap::new())
			.unwrap()
			.into_one()
			.unwrap();
		assert_eq!(post, attrs!({ "title": "untitled" }));
	}

	#[rstest]
	fn recipe_only_files_extend_existing_definitions() {
		let dir = TempDir::new().unwrap();
		write(
			dir.path(),
			"a_post.json",
			r#"{ "type": "blog.Post", "recipes": { "default": { "title": "untitled" } } }"#,
		);
		write(
			dir.path(),
			"b_extras.json",
			r#"{ "type": "blog.Post", "recipes": { "pinned": { "pinned": true } } }"#,
		);

		let registry = Registry::new();
		load_definitions(&registry, dir.path()).unwrap();

		let post = registry
			.of::<AttributeMap>("blog.Post")
			.unwrap()
			.recipe("pinned")
			.unwrap()
			.make(AttributeMap::new())
			.unwrap()
			.into_one()
			.unwrap();
		assert_eq!(post, attrs!({ "title": "untitled", "pinned": true }));
	}

	#[rstest]
	fn recipe_for_unknown_type_is_not_defined() {
		let dir = TempDir::new().unwrap();
		write(
			dir.path(),
			"orphan.json",
			r#"{ "type": "blog.Missing", "recipes": { "pinned": { "pinned": true } } }"#,
		);

		let registry = Registry::new();
		let result = load_definitions(&registry, dir.path());
		assert!(matches!(result, Err(FactoryError::NotDefined(_))));
	}

	#[rstest]
	fn non_object_recipe_is_invalid() {
		let dir = TempDir::new().unwrap();
		write(
			dir.path(),
			"bad.json",
			r#"{ "type": "blog.Post", "recipes": { "default": [1, 2, 3] } }"#,
		);

		let registry = Registry::new();
		let result = load_definitions(&registry, dir.path());
		assert!(matches!(result, Err(FactoryError::InvalidRecipe(_))));
	}

	#[rstest]
	fn definition_files_may_carry_named_recipes() {
		let dir = TempDir::new().unwrap();
		write(
			dir.path(),
			"post.json",
			r#"{
				"type": "blog.Post",
				"recipes": {
					"default": { "title": "untitled", "published": false },
					"published": { "published": true }
				}
			}"#,
		);

		let registry = Registry::new();
		load_definitions(&registry, dir.path()).unwrap();

		let post = registry
			.of::<AttributeMap>("blog.Post")
			.unwrap()
			.recipe("published")
			.unwrap()
			.make(AttributeMap::new())
			.unwrap()
			.into_one()
			.unwrap();
		assert_eq!(post["published"], true);
	}
}
