//! Capability interface consumed by the fixture factory
//!
//! The factory never talks to an ORM directly. Type resolution, schema
//! introspection, bare instantiation, reflective field access, collection
//! construction and persistence staging are all provided by an implementation
//! of [`EntityManager`], one per target backend.

use std::fmt;

use crate::error::FactoryResult;
use crate::value::{FieldValue, FieldValues};

/// Classification of a declared persistent field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
	/// Plain column value
	Scalar,
	/// Reference to a single related entity
	ToOne {
		/// Collection field on the related type mapped back to this one
		inverse: Option<String>,
	},
	/// Collection of related entities
	ToMany {
		/// Field on the related type that owns the relation
		inverse: Option<String>,
	},
}

impl FieldKind {
	pub fn is_association(&self) -> bool {
		!matches!(self, FieldKind::Scalar)
	}

	pub fn inverse(&self) -> Option<&str> {
		match self {
			FieldKind::Scalar => None,
			FieldKind::ToOne { inverse } | FieldKind::ToMany { inverse } => inverse.as_deref(),
		}
	}
}

/// Persistence metadata of one mapped type
pub trait EntityMetadata {
	/// Fully-qualified name of the mapped type
	fn type_name(&self) -> &str;

	/// Declared persistent fields and associations, in declaration order
	fn field_names(&self) -> Vec<String>;

	/// Classify a field, or `None` if it is not declared
	fn field_kind(&self, field: &str) -> Option<FieldKind>;

	fn has_field(&self, field: &str) -> bool {
		self.field_kind(field).is_some()
	}

	/// Inverse association name of a bidirectional association field
	fn inverse_of(&self, field: &str) -> Option<String> {
		self.field_kind(field)
			.and_then(|kind| kind.inverse().map(str::to_string))
	}
}

/// Type resolution, introspection and reflective access for a backend
///
/// Entity and collection handles are expected to be cheap to clone and to
/// share identity across clones, so that a reference assigned to one entity
/// and mutated through another handle stays consistent.
pub trait MetadataProvider {
	/// Handle to a constructed entity instance
	type Entity: Clone + fmt::Debug;

	/// Ordered, duplicate-tolerant container of entities
	type Collection: Clone + fmt::Debug;

	/// Metadata describing one mapped type
	type Metadata: EntityMetadata + Clone;

	/// Whether a type with this fully-qualified name exists at all
	fn type_exists(&self, type_name: &str) -> bool;

	/// Persistence metadata for a type, `None` if the type is not mapped
	fn metadata_for(&self, type_name: &str) -> Option<Self::Metadata>;

	/// Persistence metadata for the type of an existing instance
	fn metadata_of(&self, entity: &Self::Entity) -> Option<Self::Metadata>;

	/// Allocate an instance without running any user constructor logic
	fn new_instance(&self, metadata: &Self::Metadata) -> FactoryResult<Self::Entity>;

	/// Read a field, bypassing encapsulation
	fn get_field(&self, entity: &Self::Entity, field: &str) -> FactoryResult<Value<Self>>;

	/// Write a field, bypassing encapsulation
	fn set_field(&self, entity: &Self::Entity, field: &str, value: Value<Self>)
	-> FactoryResult<()>;

	/// Build a fresh collection holding `elements` in order
	fn new_collection(&self, elements: Vec<Self::Entity>) -> Self::Collection;

	/// Append an element to an existing collection
	fn collection_add(&self, collection: &Self::Collection, element: Self::Entity);
}

/// Metadata provider that can also stage instances for persistence
pub trait EntityManager: MetadataProvider {
	/// Mark an entity for a future flush. Must not commit by itself.
	fn persist(&self, entity: &Self::Entity) -> FactoryResult<()>;
}

/// Field value bound to a provider's handle types
pub type Value<M> =
	FieldValue<<M as MetadataProvider>::Entity, <M as MetadataProvider>::Collection>;

/// Ordered field values bound to a provider's handle types
pub type Values<M> =
	FieldValues<<M as MetadataProvider>::Entity, <M as MetadataProvider>::Collection>;
