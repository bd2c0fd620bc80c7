//! Error types for factory operations.
//!
//! Errors fall into three groups:
//!
//! - **Configuration errors** ([`OutOfRange`](FactoryError::OutOfRange),
//!   [`InvalidRecipe`](FactoryError::InvalidRecipe),
//!   [`NotDefined`](FactoryError::NotDefined),
//!   [`TypeMismatch`](FactoryError::TypeMismatch),
//!   [`PersistenceNotImplemented`](FactoryError::PersistenceNotImplemented)) —
//!   raised synchronously at the call that caused them, never deferred into a
//!   later terminal call.
//! - **Validation errors** ([`InvalidAttribute`](FactoryError::InvalidAttribute),
//!   [`UnknownField`](FactoryError::UnknownField),
//!   [`IncompatibleValue`](FactoryError::IncompatibleValue)) — raised during a
//!   specific build attempt. In a batch, a mid-batch validation failure aborts
//!   the whole batch and no partial results are returned.
//! - **Generator exhaustion** ([`Overflow`](FactoryError::Overflow)) — a
//!   `unique` random request ran out of obtainable values; propagates from
//!   whichever build iteration triggered it.

use thiserror::Error;

/// Errors that can occur while configuring or running a factory.
#[derive(Debug, Error)]
pub enum FactoryError {
	/// Repeat count passed to `times` was zero.
	#[error("repeat count must be at least 1, given {0}")]
	OutOfRange(usize),

	/// A data-driven recipe was not an attribute object.
	#[error("recipe must be an attribute object: {0}")]
	InvalidRecipe(String),

	/// Type key or recipe name is not registered.
	#[error("{0} is not defined")]
	NotDefined(String),

	/// A definition was looked up with a different entity type than it was
	/// registered with.
	#[error("definition for {0} targets a different entity type")]
	TypeMismatch(String),

	/// `store` was called on a factory that did not supply a persistence hook.
	#[error("persistence hook is not implemented for this factory")]
	PersistenceNotImplemented,

	/// An attribute key is outside the declared fillable allow-list.
	#[error("attribute {0} is not fillable")]
	InvalidAttribute(String),

	/// No field with the given name exists on the target entity.
	#[error("no field named {0} on the target entity")]
	UnknownField(String),

	/// An attribute value could not be converted into the field's type.
	#[error("value for field {field} is incompatible: {source}")]
	IncompatibleValue {
		/// Field the assignment targeted.
		field: String,
		/// Underlying conversion error.
		#[source]
		source: serde_json::Error,
	},

	/// A `unique` generator exhausted its space of obtainable values.
	#[error("unique value space exhausted for {0}")]
	Overflow(String),

	/// I/O failure while scanning definition files.
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	/// Malformed JSON in a definition file.
	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Result type alias for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;
