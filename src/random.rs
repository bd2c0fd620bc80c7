//! Random-data generation for factories.
//!
//! A [`RandomSource`] is created once per builder and hands out one
//! [`RandomGenerator`] per entity built. Generators drawn from the same
//! source share a uniqueness pool, so `unique` requests are scoped to the
//! whole batch; independent sources are independent scopes.
//!
//! Scalar generation is backed by the `fake` crate with locale-aware data.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use std::rc::Rc;

use fake::Fake;
use fake::faker::internet::raw::SafeEmail;
use fake::faker::lorem::raw::Word;
use fake::faker::name::raw::Name;
use fake::locales::{EN, FR_FR, JA_JP};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::{FactoryError, FactoryResult};

/// Retry budget for unique generators over unbounded value spaces.
const MAX_UNIQUE_RETRIES: usize = 10_000;

/// Locale used for generated scalar data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
	/// English (default).
	#[default]
	En,
	/// French.
	Fr,
	/// Japanese.
	Ja,
}

impl Locale {
	/// Returns the locale identifier.
	pub fn as_str(&self) -> &'static str {
		match self {
			Locale::En => "en",
			Locale::Fr => "fr_FR",
			Locale::Ja => "ja_JP",
		}
	}
}

/// Tracks values already handed out by `unique` generators.
#[derive(Debug, Default)]
struct UniquePool {
	scopes: HashMap<&'static str, HashSet<String>>,
}

impl UniquePool {
	fn scope(&mut self, name: &'static str) -> &mut HashSet<String> {
		self.scopes.entry(name).or_default()
	}
}

/// Per-builder source of random generators.
///
/// Entropy-seeded by default; [`RandomSource::seeded`] produces reproducible
/// sequences for deterministic fixtures.
#[derive(Debug)]
pub struct RandomSource {
	locale: Locale,
	master: RefCell<StdRng>,
	unique: Rc<RefCell<UniquePool>>,
}

impl RandomSource {
	/// Creates an entropy-seeded source for the given locale.
	pub fn new(locale: Locale) -> Self {
		Self {
			locale,
			master: RefCell::new(StdRng::from_entropy()),
			unique: Rc::new(RefCell::new(UniquePool::default())),
		}
	}

	/// Creates a deterministic source from an explicit seed.
	pub fn seeded(locale: Locale, seed: u64) -> Self {
		Self {
			locale,
			master: RefCell::new(StdRng::seed_from_u64(seed)),
			unique: Rc::new(RefCell::new(UniquePool::default())),
		}
	}

	/// Returns the source locale.
	pub fn locale(&self) -> Locale {
		self.locale
	}

	/// Acquires a fresh generator.
	///
	/// Each generator has its own rng stream but shares this source's
	/// uniqueness pool.
	pub fn generator(&self) -> RandomGenerator {
		let seed = self.master.borrow_mut().next_u64();
		RandomGenerator {
			locale: self.locale,
			rng: StdRng::seed_from_u64(seed),
			unique: Rc::clone(&self.unique),
		}
	}
}

/// Generator of pseudo-random scalars for one entity build.
#[derive(Debug)]
pub struct RandomGenerator {
	locale: Locale,
	rng: StdRng,
	unique: Rc<RefCell<UniquePool>>,
}

impl RandomGenerator {
	/// Returns the generator locale.
	pub fn locale(&self) -> Locale {
		self.locale
	}

	/// Generates a person name.
	pub fn name(&mut self) -> String {
		match self.locale {
			Locale::En => Name(EN).fake_with_rng(&mut self.rng),
			Locale::Fr => Name(FR_FR).fake_with_rng(&mut self.rng),
			Locale::Ja => Name(JA_JP).fake_with_rng(&mut self.rng),
		}
	}

	/// Generates an email address.
	pub fn email(&mut self) -> String {
		match self.locale {
			Locale::En => SafeEmail(EN).fake_with_rng(&mut self.rng),
			Locale::Fr => SafeEmail(FR_FR).fake_with_rng(&mut self.rng),
			Locale::Ja => SafeEmail(JA_JP).fake_with_rng(&mut self.rng),
		}
	}

	/// Generates a single word.
	pub fn word(&mut self) -> String {
		match self.locale {
			Locale::En => Word(EN).fake_with_rng(&mut self.rng),
			Locale::Fr => Word(FR_FR).fake_with_rng(&mut self.rng),
			Locale::Ja => Word(JA_JP).fake_with_rng(&mut self.rng),
		}
	}

	/// Generates a digit in `0..=9`.
	pub fn digit(&mut self) -> u8 {
		self.rng.gen_range(0..10)
	}

	/// Generates an integer within the given range.
	pub fn number_in(&mut self, range: RangeInclusive<i64>) -> i64 {
		self.rng.gen_range(range)
	}

	/// Returns the `unique` modifier for this generator.
	///
	/// Values handed out through the modifier are never repeated within the
	/// owning [`RandomSource`]'s lifetime; an exhausted space yields
	/// [`FactoryError::Overflow`].
	pub fn unique(&mut self) -> Unique<'_> {
		Unique { generator: self }
	}
}

/// `unique` modifier over a [`RandomGenerator`].
#[derive(Debug)]
pub struct Unique<'g> {
	generator: &'g mut RandomGenerator,
}

impl Unique<'_> {
	/// Generates a digit not handed out before in this scope.
	pub fn digit(&mut self) -> FactoryResult<u8> {
		let pool = Rc::clone(&self.generator.unique);
		let mut pool = pool.borrow_mut();
		let used = pool.scope("digit");
		if used.len() >= 10 {
			return Err(FactoryError::Overflow("digit".to_string()));
		}
		loop {
			let candidate = self.generator.rng.gen_range(0..10u8);
			if used.insert(candidate.to_string()) {
				return Ok(candidate);
			}
		}
	}

	/// Generates a name not handed out before in this scope.
	pub fn name(&mut self) -> FactoryResult<String> {
		let pool = Rc::clone(&self.generator.unique);
		let mut pool = pool.borrow_mut();
		let used = pool.scope("name");
		for _ in 0..MAX_UNIQUE_RETRIES {
			let candidate = self.generator.name();
			if used.insert(candidate.clone()) {
				return Ok(candidate);
			}
		}
		Err(FactoryError::Overflow("name".to_string()))
	}

	/// Generates a word not handed out before in this scope.
	pub fn word(&mut self) -> FactoryResult<String> {
		let pool = Rc::clone(&self.generator.unique);
		let mut pool = pool.borrow_mut();
		let used = pool.scope("word");
		for _ in 0..MAX_UNIQUE_RETRIES {
			let candidate = self.generator.word();
			if used.insert(candidate.clone()) {
				return Ok(candidate);
			}
		}
		Err(FactoryError::Overflow("word".to_string()))
	}
}
