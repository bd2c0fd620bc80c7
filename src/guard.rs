//! Fillable allow-list validation.
//!
//! A factory may declare the set of attribute keys it accepts. Every recipe
//! overlay and the call-site overrides are checked against that set before
//! merging; a key outside the set aborts the build with
//! [`FactoryError::InvalidAttribute`]. The default is the wildcard, which
//! skips validation entirely.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::error::{FactoryError, FactoryResult};
use crate::recipe::AttributeMap;

/// Declared fillable attribute keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Fillable {
	/// Wildcard sentinel: every key is fillable, validation is skipped.
	#[default]
	Any,
	/// Only the listed keys are fillable.
	Only(HashSet<String>),
}

impl Fillable {
	/// Builds an allow-list from an iterator of keys.
	pub fn only<I, K>(keys: I) -> Self
	where
		I: IntoIterator<Item = K>,
		K: Into<String>,
	{
		Fillable::Only(keys.into_iter().map(Into::into).collect())
	}
}

/// Allow-list checker with per-key memoization.
///
/// The allow-list is treated as immutable once the guard has answered its
/// first query; swapping it out after that point is undefined behavior.
#[derive(Debug)]
pub struct FillableGuard {
	allow: Fillable,
	cache: RefCell<HashMap<String, bool>>,
}

impl FillableGuard {
	/// Creates a guard over the given allow-list.
	pub fn new(allow: Fillable) -> Self {
		Self {
			allow,
			cache: RefCell::new(HashMap::new()),
		}
	}

	/// Creates a guard that allows everything.
	pub fn wildcard() -> Self {
		Self::new(Fillable::Any)
	}

	/// Returns whether the key may be set through the factory.
	pub fn is_fillable(&self, key: &str) -> bool {
		let allowed = match &self.allow {
			Fillable::Any => return true,
			Fillable::Only(keys) => keys,
		};
		if let Some(&cached) = self.cache.borrow().get(key) {
			return cached;
		}
		let fillable = allowed.contains(key);
		self.cache.borrow_mut().insert(key.to_string(), fillable);
		fillable
	}

	/// Validates every key of an overlay, failing fast on the first
	/// non-fillable key.
	pub fn check(&self, overlay: &AttributeMap) -> FactoryResult<()> {
		if matches!(self.allow, Fillable::Any) {
			return Ok(());
		}
		for key in overlay.keys() {
			if !self.is_fillable(key) {
				return Err(FactoryError::InvalidAttribute(key.clone()));
			}
		}
		Ok(())
	}
}

impl Default for FillableGuard {
	fn default() -> Self {
		Self::wildcard()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attrs;
	use rstest::rstest;

	#[rstest]
	fn wildcard_allows_everything() {
		let guard = FillableGuard::wildcard();
		assert!(guard.is_fillable("anything"));
		assert!(guard.check(&attrs!({ "a": 1, "b": 2 })).is_ok());
	}

	#[rstest]
	fn allow_list_rejects_unknown_keys() {
		let guard = FillableGuard::new(Fillable::only(["name", "email"]));
		assert!(guard.is_fillable("name"));
		assert!(!guard.is_fillable("extra"));
	}

	#[rstest]
	fn check_names_the_offending_key() {
		let guard = FillableGuard::new(Fillable::only(["name"]));
		match guard.check(&attrs!({ "name": "ok", "extra": 1 })) {
			Err(FactoryError::InvalidAttribute(key)) => assert_eq!(key, "extra"),
			other => panic!("expected InvalidAttribute, got {other:?}"),
		}
	}

	#[rstest]
	fn results_are_memoized() {
		let guard = FillableGuard::new(Fillable::only(["name"]));
		assert!(guard.is_fillable("name"));
		assert!(!guard.is_fillable("extra"));
		assert_eq!(guard.cache.borrow().get("name"), Some(&true));
		assert_eq!(guard.cache.borrow().get("extra"), Some(&false));
	}
}
