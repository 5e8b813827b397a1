//! Model schemas for the in-memory backend
//!
//! Schemas are declared with builders modelled on field and foreign key
//! declarations:
//!
//! ```
//! use entity_factory_memory::{FieldSchema, ModelSchema};
//!
//! let ship = ModelSchema::new("fleet::SpaceShip")
//!     .field(FieldSchema::identifier("id"))
//!     .field(FieldSchema::scalar("name"))
//!     .field(FieldSchema::one_to_many("crew", "fleet::Person").mapped_by("space_ship"));
//!
//! assert_eq!(ship.field_names(), vec!["id", "name", "crew"]);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use entity_factory_core::{EntityMetadata, FieldKind};
use indexmap::IndexMap;

use crate::entity::{EntityCollection, EntityRef, MemoryValue};

/// Kind of relation a field declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
	Column,
	ManyToOne,
	OneToMany,
}

/// One declared persistent field
#[derive(Debug, Clone)]
pub struct FieldSchema {
	name: String,
	relation: Relation,
	target: Option<String>,
	inverse: Option<String>,
	default: Option<MemoryValue>,
	identifier: bool,
}

impl FieldSchema {
	fn new(name: impl Into<String>, relation: Relation, target: Option<String>) -> Self {
		Self {
			name: name.into(),
			relation,
			target,
			inverse: None,
			default: None,
			identifier: false,
		}
	}

	/// Plain column
	pub fn scalar(name: impl Into<String>) -> Self {
		Self::new(name, Relation::Column, None)
	}

	/// Column receiving the identity assigned on flush
	pub fn identifier(name: impl Into<String>) -> Self {
		let mut field = Self::scalar(name);
		field.identifier = true;
		field
	}

	/// Reference to a single entity of `target`
	pub fn many_to_one(name: impl Into<String>, target: impl Into<String>) -> Self {
		Self::new(name, Relation::ManyToOne, Some(target.into()))
	}

	/// Collection of entities of `target`
	pub fn one_to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
		Self::new(name, Relation::OneToMany, Some(target.into()))
	}

	/// Value a bare instance starts with
	pub fn default(mut self, value: impl Into<MemoryValue>) -> Self {
		self.default = Some(value.into());
		self
	}

	/// Collection field on the target that holds the other side
	pub fn inversed_by(mut self, field: impl Into<String>) -> Self {
		self.inverse = Some(field.into());
		self
	}

	/// Field on the target that owns the relation
	pub fn mapped_by(mut self, field: impl Into<String>) -> Self {
		self.inverse = Some(field.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn relation(&self) -> Relation {
		self.relation
	}

	pub fn target(&self) -> Option<&str> {
		self.target.as_deref()
	}

	pub fn kind(&self) -> FieldKind {
		match self.relation {
			Relation::Column => FieldKind::Scalar,
			Relation::ManyToOne => FieldKind::ToOne {
				inverse: self.inverse.clone(),
			},
			Relation::OneToMany => FieldKind::ToMany {
				inverse: self.inverse.clone(),
			},
		}
	}

	/// Value a freshly allocated instance holds for this field
	pub(crate) fn initial_value(&self) -> MemoryValue {
		match (&self.default, self.relation) {
			(Some(value), _) => value.clone(),
			(None, Relation::OneToMany) => MemoryValue::Collection(EntityCollection::new()),
			(None, _) => MemoryValue::Null,
		}
	}
}

/// Constructor logic of a model, run only on explicit construction
pub type Constructor = Rc<dyn Fn(&EntityRef)>;

/// Declared fields of one mapped type
#[derive(Clone)]
pub struct ModelSchema {
	type_name: String,
	fields: IndexMap<String, FieldSchema>,
	constructor: Option<Constructor>,
}

impl ModelSchema {
	pub fn new(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			fields: IndexMap::new(),
			constructor: None,
		}
	}

	/// Declare a field, replacing an earlier declaration with the same name
	pub fn field(mut self, field: FieldSchema) -> Self {
		self.fields.insert(field.name.clone(), field);
		self
	}

	pub fn constructor<F>(mut self, constructor: F) -> Self
	where
		F: Fn(&EntityRef) + 'static,
	{
		self.constructor = Some(Rc::new(constructor));
		self
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Declared fields in declaration order
	pub fn fields(&self) -> impl Iterator<Item = &FieldSchema> {
		self.fields.values()
	}

	pub fn field_schema(&self, name: &str) -> Option<&FieldSchema> {
		self.fields.get(name)
	}

	pub fn field_names(&self) -> Vec<&str> {
		self.fields.keys().map(String::as_str).collect()
	}

	pub fn identifier(&self) -> Option<&FieldSchema> {
		self.fields.values().find(|f| f.identifier)
	}

	pub(crate) fn constructor_fn(&self) -> Option<&Constructor> {
		self.constructor.as_ref()
	}
}

impl fmt::Debug for ModelSchema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModelSchema")
			.field("type_name", &self.type_name)
			.field("fields", &self.fields)
			.field("constructor", &self.constructor.is_some())
			.finish()
	}
}

/// Shared handle to a registered [`ModelSchema`]
#[derive(Debug, Clone)]
pub struct MemoryMetadata(Rc<ModelSchema>);

impl MemoryMetadata {
	pub fn schema(&self) -> &ModelSchema {
		&self.0
	}
}

impl EntityMetadata for MemoryMetadata {
	fn type_name(&self) -> &str {
		self.0.type_name()
	}

	fn field_names(&self) -> Vec<String> {
		self.0.fields.keys().cloned().collect()
	}

	fn field_kind(&self, field: &str) -> Option<FieldKind> {
		self.0.field_schema(field).map(FieldSchema::kind)
	}
}

/// Known types of the backend, mapped or not
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
	models: HashMap<String, MemoryMetadata>,
	unmapped: HashSet<String>,
}

impl TypeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a mapped type
	pub fn register(mut self, schema: ModelSchema) -> Self {
		self.models
			.insert(schema.type_name.clone(), MemoryMetadata(Rc::new(schema)));
		self
	}

	/// Register a type that exists but carries no persistence metadata
	pub fn register_unmapped(mut self, type_name: impl Into<String>) -> Self {
		self.unmapped.insert(type_name.into());
		self
	}

	pub fn contains(&self, type_name: &str) -> bool {
		self.models.contains_key(type_name) || self.unmapped.contains(type_name)
	}

	pub fn metadata(&self, type_name: &str) -> Option<MemoryMetadata> {
		self.models.get(type_name).cloned()
	}

	pub fn len(&self) -> usize {
		self.models.len() + self.unmapped.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
