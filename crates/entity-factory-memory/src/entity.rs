//! Entity and collection handles
//!
//! Handles are reference counted. Cloning a handle never copies the
//! underlying record, and equality is identity.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use entity_factory_core::{FieldValue, FieldValues};

/// Field value stored by the in-memory backend
pub type MemoryValue = FieldValue<EntityRef, EntityCollection>;

/// Ordered field values stored by the in-memory backend
pub type MemoryValues = FieldValues<EntityRef, EntityCollection>;

#[derive(Debug)]
pub(crate) struct EntityRecord {
	pub(crate) type_name: String,
	pub(crate) identifier: Option<String>,
	pub(crate) fields: MemoryValues,
	pub(crate) constructed: bool,
}

/// Shared handle to one entity instance
#[derive(Clone)]
pub struct EntityRef(Rc<RefCell<EntityRecord>>);

impl EntityRef {
	pub(crate) fn new(
		type_name: impl Into<String>,
		identifier: Option<String>,
		fields: MemoryValues,
	) -> Self {
		Self(Rc::new(RefCell::new(EntityRecord {
			type_name: type_name.into(),
			identifier,
			fields,
			constructed: false,
		})))
	}

	pub fn type_name(&self) -> String {
		self.0.borrow().type_name.clone()
	}

	/// Current value of a field, `None` if the field is not declared
	pub fn get(&self, field: &str) -> Option<MemoryValue> {
		self.0.borrow().fields.get(field).cloned()
	}

	pub fn string(&self, field: &str) -> Option<String> {
		self.get(field).and_then(|v| v.as_str().map(str::to_string))
	}

	pub fn integer(&self, field: &str) -> Option<i64> {
		self.get(field).and_then(|v| v.as_integer())
	}

	pub fn entity(&self, field: &str) -> Option<EntityRef> {
		self.get(field).and_then(|v| v.as_entity().cloned())
	}

	pub fn collection(&self, field: &str) -> Option<EntityCollection> {
		self.get(field).and_then(|v| v.as_collection().cloned())
	}

	/// Value of the identifier field, set once the entity is flushed
	pub fn id(&self) -> Option<i64> {
		let record = self.0.borrow();
		let identifier = record.identifier.as_deref()?;
		record.fields.get(identifier).and_then(|v| v.as_integer())
	}

	/// Whether constructor logic has run on this instance
	pub fn was_constructed(&self) -> bool {
		self.0.borrow().constructed
	}

	pub fn ptr_eq(&self, other: &EntityRef) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	/// Overwrite a field directly, without any schema check
	pub fn set(&self, field: &str, value: MemoryValue) {
		self.0.borrow_mut().fields.insert(field, value);
	}

	pub(crate) fn mark_constructed(&self) {
		self.0.borrow_mut().constructed = true;
	}
}

impl PartialEq for EntityRef {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl Eq for EntityRef {}

// Associations form cycles, so only the type and scalar fields are printed.
impl fmt::Debug for EntityRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let record = self.0.borrow();
		let mut out = f.debug_struct(&record.type_name);
		for (name, value) in record.fields.iter() {
			match value {
				FieldValue::Entity(_) => out.field(name, &"<entity>"),
				FieldValue::Collection(c) => out.field(name, &format!("<{} entities>", c.len())),
				FieldValue::List(items) => out.field(name, &format!("<{} items>", items.len())),
				scalar => out.field(name, scalar),
			};
		}
		out.finish()
	}
}

impl From<EntityRef> for MemoryValue {
	fn from(entity: EntityRef) -> Self {
		FieldValue::Entity(entity)
	}
}

/// Shared, ordered, duplicate-tolerant entity collection
#[derive(Clone, Default)]
pub struct EntityCollection(Rc<RefCell<Vec<EntityRef>>>);

impl EntityCollection {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_vec(elements: Vec<EntityRef>) -> Self {
		Self(Rc::new(RefCell::new(elements)))
	}

	pub fn add(&self, entity: EntityRef) {
		self.0.borrow_mut().push(entity);
	}

	pub fn contains(&self, entity: &EntityRef) -> bool {
		self.0.borrow().iter().any(|e| e.ptr_eq(entity))
	}

	pub fn len(&self) -> usize {
		self.0.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.borrow().is_empty()
	}

	pub fn get(&self, index: usize) -> Option<EntityRef> {
		self.0.borrow().get(index).cloned()
	}

	/// Snapshot of the current elements
	pub fn to_vec(&self) -> Vec<EntityRef> {
		self.0.borrow().clone()
	}

	pub fn ptr_eq(&self, other: &EntityCollection) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl PartialEq for EntityCollection {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl fmt::Debug for EntityCollection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list()
			.entries(self.0.borrow().iter().map(|e| e.type_name()))
			.finish()
	}
}

impl From<EntityCollection> for MemoryValue {
	fn from(collection: EntityCollection) -> Self {
		FieldValue::Collection(collection)
	}
}
