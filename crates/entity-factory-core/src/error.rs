//! Error types for the fixture factory.
//!
//! Every failure is returned to the caller immediately. Nothing here is
//! retried or recovered internally.

use thiserror::Error;

/// Errors that can occur while defining or constructing entities.
#[derive(Debug, Error)]
pub enum FactoryError {
	/// The entity name is already registered.
	#[error("Entity '{0}' already defined in fixture factory")]
	DuplicateDefinition(String),

	/// The qualified type name does not resolve to a known type.
	#[error("Not a known type: {0}")]
	UnknownType(String),

	/// The type exists but carries no persistence metadata.
	#[error("Unknown entity type: {0}")]
	NotAnEntity(String),

	/// One or more field names are not declared on the entity type.
	#[error("Field(s) not in {entity_type}: {}", quote_fields(.fields))]
	UnknownField {
		/// Qualified type the fields were checked against.
		entity_type: String,
		/// Every offending field name, in the order supplied.
		fields: Vec<String>,
	},

	/// No definition is registered under the requested name.
	#[error("Entity definition unavailable: {0}")]
	UnknownEntity(String),

	/// A singleton already exists for the name.
	#[error("Already a singleton: {0}")]
	DuplicateSingleton(String),

	/// A list of fewer than one instance was requested.
	#[error("Can only get >= 1 instances, requested {0}")]
	InvalidCount(usize),

	/// A resolved value does not fit the field it is assigned to.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		/// Field being assigned.
		field: String,
		/// Expected value kind.
		expected: String,
		/// Actual value kind.
		actual: String,
	},

	/// Nested references went deeper than the configured limit.
	#[error("Reference depth limit of {limit} exceeded while building '{name}'")]
	RecursionLimit {
		/// Entity whose construction hit the limit.
		name: String,
		/// Configured maximum depth.
		limit: usize,
	},

	/// A sequence counter ran past `u64::MAX`.
	#[error("Sequence counter exhausted")]
	SequenceExhausted,

	/// The metadata or persistence backend rejected an operation.
	#[error("Metadata error: {0}")]
	Metadata(String),

	/// Factory settings could not be parsed.
	#[error("Settings error: {0}")]
	Settings(#[from] toml::de::Error),
}

fn quote_fields(fields: &[String]) -> String {
	fields
		.iter()
		.map(|field| format!("'{}'", field))
		.collect::<Vec<_>>()
		.join(", ")
}

/// Result type alias for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;
