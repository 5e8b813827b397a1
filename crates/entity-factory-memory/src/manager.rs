//! In-memory entity manager
//!
//! [`MemoryEntityManager`] implements the factory's capability interface over
//! a [`TypeRegistry`]. Persisting only stages an entity; [`flush`] assigns
//! identifiers and moves staged entities into the store.
//!
//! [`flush`]: MemoryEntityManager::flush

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use entity_factory_core::{
	EntityManager, FactoryError, FactoryResult, FieldValue, MetadataProvider,
};

use crate::entity::{EntityCollection, EntityRef, MemoryValue, MemoryValues};
use crate::schema::{MemoryMetadata, TypeRegistry};

#[derive(Debug, Default)]
struct Store {
	staged: Vec<EntityRef>,
	stored: HashMap<String, Vec<EntityRef>>,
	next_id: HashMap<String, i64>,
}

/// Entity manager keeping every flushed entity in memory
///
/// Clones share the same store.
#[derive(Debug, Clone)]
pub struct MemoryEntityManager {
	registry: Rc<TypeRegistry>,
	store: Rc<RefCell<Store>>,
}

impl MemoryEntityManager {
	pub fn new(registry: TypeRegistry) -> Self {
		Self {
			registry: Rc::new(registry),
			store: Rc::new(RefCell::new(Store::default())),
		}
	}

	/// Number of entities waiting for a flush
	pub fn staged_len(&self) -> usize {
		self.store.borrow().staged.len()
	}

	pub fn is_staged(&self, entity: &EntityRef) -> bool {
		self.store.borrow().staged.iter().any(|e| e.ptr_eq(entity))
	}

	/// Store every staged entity, assigning identifiers per type
	///
	/// Returns the number of entities stored.
	pub fn flush(&self) -> FactoryResult<usize> {
		let mut store = self.store.borrow_mut();
		let staged = std::mem::take(&mut store.staged);
		let count = staged.len();

		for entity in staged {
			let type_name = entity.type_name();
			let metadata = self
				.registry
				.metadata(&type_name)
				.ok_or_else(|| FactoryError::NotAnEntity(type_name.clone()))?;

			if let Some(identifier) = metadata.schema().identifier() {
				if entity.get(identifier.name()).is_none_or(|id| id.is_null()) {
					let next = store.next_id.entry(type_name.clone()).or_insert(1);
					entity.set(identifier.name(), MemoryValue::Integer(*next));
					*next += 1;
				}
			}

			store.stored.entry(type_name).or_default().push(entity);
		}

		tracing::debug!(count, "flushed staged entities");
		Ok(count)
	}

	/// Stored entity of `type_name` whose identifier equals `id`
	pub fn find(&self, type_name: &str, id: i64) -> Option<EntityRef> {
		self.store
			.borrow()
			.stored
			.get(type_name)?
			.iter()
			.find(|e| e.id() == Some(id))
			.cloned()
	}

	/// Every stored entity of `type_name`, in flush order
	pub fn all(&self, type_name: &str) -> Vec<EntityRef> {
		self.store
			.borrow()
			.stored
			.get(type_name)
			.cloned()
			.unwrap_or_default()
	}

	/// Allocate an instance and run its constructor logic
	///
	/// The factory never calls this. Tests use it to tell constructed
	/// instances from bare ones.
	pub fn construct(&self, type_name: &str) -> FactoryResult<EntityRef> {
		let metadata = self
			.metadata_for(type_name)
			.ok_or_else(|| FactoryError::NotAnEntity(type_name.to_string()))?;
		let entity = self.new_instance(&metadata)?;
		self.run_constructor(&entity)?;
		Ok(entity)
	}

	/// Run the constructor logic of the entity's model on an existing instance
	pub fn run_constructor(&self, entity: &EntityRef) -> FactoryResult<()> {
		let metadata = self
			.metadata_of(entity)
			.ok_or_else(|| FactoryError::NotAnEntity(entity.type_name()))?;
		if let Some(constructor) = metadata.schema().constructor_fn() {
			constructor(entity);
		}
		entity.mark_constructed();
		Ok(())
	}
}

impl MetadataProvider for MemoryEntityManager {
	type Entity = EntityRef;
	type Collection = EntityCollection;
	type Metadata = MemoryMetadata;

	fn type_exists(&self, type_name: &str) -> bool {
		self.registry.contains(type_name)
	}

	fn metadata_for(&self, type_name: &str) -> Option<MemoryMetadata> {
		self.registry.metadata(type_name)
	}

	fn metadata_of(&self, entity: &EntityRef) -> Option<MemoryMetadata> {
		self.registry.metadata(&entity.type_name())
	}

	fn new_instance(&self, metadata: &MemoryMetadata) -> FactoryResult<EntityRef> {
		let schema = metadata.schema();
		let fields: MemoryValues = schema
			.fields()
			.map(|field| (field.name(), field.initial_value()))
			.collect();
		tracing::trace!(entity_type = schema.type_name(), "allocated bare instance");
		let identifier = schema.identifier().map(|f| f.name().to_string());
		Ok(EntityRef::new(schema.type_name(), identifier, fields))
	}

	fn get_field(&self, entity: &EntityRef, field: &str) -> FactoryResult<MemoryValue> {
		entity.get(field).ok_or_else(|| {
			FactoryError::Metadata(format!(
				"{} has no field '{}'",
				entity.type_name(),
				field
			))
		})
	}

	/// Assign a declared field, checking referenced entities against the
	/// relation's target type
	fn set_field(&self, entity: &EntityRef, field: &str, value: MemoryValue) -> FactoryResult<()> {
		let metadata = self
			.metadata_of(entity)
			.ok_or_else(|| FactoryError::NotAnEntity(entity.type_name()))?;
		let schema = metadata.schema().field_schema(field).ok_or_else(|| {
			FactoryError::Metadata(format!(
				"{} has no field '{}'",
				entity.type_name(),
				field
			))
		})?;
		if let Some(target) = schema.target() {
			check_target(field, target, &value)?;
		}
		entity.set(field, value);
		Ok(())
	}

	fn new_collection(&self, elements: Vec<EntityRef>) -> EntityCollection {
		EntityCollection::from_vec(elements)
	}

	fn collection_add(&self, collection: &EntityCollection, element: EntityRef) {
		collection.add(element);
	}
}

/// Fail if an entity in `value` is not of the `target` type
fn check_target(field: &str, target: &str, value: &MemoryValue) -> FactoryResult<()> {
	let entities = match value {
		FieldValue::Entity(entity) => vec![entity.clone()],
		FieldValue::Collection(collection) => collection.to_vec(),
		_ => Vec::new(),
	};
	match entities.iter().map(EntityRef::type_name).find(|t| t != target) {
		Some(actual) => Err(FactoryError::TypeMismatch {
			field: field.to_string(),
			expected: target.to_string(),
			actual,
		}),
		None => Ok(()),
	}
}

impl EntityManager for MemoryEntityManager {
	fn persist(&self, entity: &EntityRef) -> FactoryResult<()> {
		let mut store = self.store.borrow_mut();
		if !store.staged.iter().any(|e| e.ptr_eq(entity)) {
			store.staged.push(entity.clone());
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{FieldSchema, ModelSchema};
	use rstest::{fixture, rstest};

	#[fixture]
	fn manager() -> MemoryEntityManager {
		MemoryEntityManager::new(
			TypeRegistry::new()
				.register(
					ModelSchema::new("fleet::SpaceShip")
						.field(FieldSchema::identifier("id"))
						.field(FieldSchema::scalar("name"))
						.field(
							FieldSchema::one_to_many("crew", "fleet::Person")
								.mapped_by("space_ship"),
						)
						.constructor(|ship| ship.set("name", MemoryValue::from("Unnamed"))),
				)
				.register(
					ModelSchema::new("fleet::SpaceStation")
						.field(FieldSchema::scalar("name").default("Babylon5")),
				)
				.register_unmapped("fleet::NotAnEntity"),
		)
	}

	#[rstest]
	fn test_new_instance_applies_defaults(manager: MemoryEntityManager) {
		let station = manager.metadata_for("fleet::SpaceStation").unwrap();
		let station = manager.new_instance(&station).unwrap();
		assert_eq!(station.string("name").as_deref(), Some("Babylon5"));

		let ship = manager.metadata_for("fleet::SpaceShip").unwrap();
		let ship = manager.new_instance(&ship).unwrap();
		assert!(ship.get("name").unwrap().is_null());
		assert!(ship.collection("crew").unwrap().is_empty());
		assert!(!ship.was_constructed());
	}

	#[rstest]
	fn test_construct_runs_constructor(manager: MemoryEntityManager) {
		let ship = manager.construct("fleet::SpaceShip").unwrap();
		assert!(ship.was_constructed());
		assert_eq!(ship.string("name").as_deref(), Some("Unnamed"));
	}

	#[rstest]
	fn test_unmapped_type(manager: MemoryEntityManager) {
		assert!(manager.type_exists("fleet::NotAnEntity"));
		assert!(manager.metadata_for("fleet::NotAnEntity").is_none());
		assert!(matches!(
			manager.construct("fleet::NotAnEntity"),
			Err(FactoryError::NotAnEntity(_))
		));
	}

	#[rstest]
	fn test_set_undeclared_field_fails(manager: MemoryEntityManager) {
		let ship = manager.metadata_for("fleet::SpaceShip").unwrap();
		let ship = manager.new_instance(&ship).unwrap();
		let result = manager.set_field(&ship, "pie_type", MemoryValue::from("blueberry"));
		assert!(matches!(result, Err(FactoryError::Metadata(_))));
		assert!(manager.get_field(&ship, "pie_type").is_err());
	}

	#[rstest]
	fn test_set_checks_target_type(manager: MemoryEntityManager) {
		let ship = manager.construct("fleet::SpaceShip").unwrap();
		let station = manager.construct("fleet::SpaceStation").unwrap();

		let crew = EntityCollection::from_vec(vec![station.clone()]);
		let result = manager.set_field(&ship, "crew", crew.into());
		assert!(matches!(
			result,
			Err(FactoryError::TypeMismatch { ref expected, ref actual, .. })
				if expected == "fleet::Person" && actual == "fleet::SpaceStation"
		));
		assert!(ship.collection("crew").unwrap().is_empty());

		manager
			.set_field(&ship, "crew", EntityCollection::new().into())
			.unwrap();
	}

	#[rstest]
	fn test_persist_stages_until_flush(manager: MemoryEntityManager) {
		let metadata = manager.metadata_for("fleet::SpaceShip").unwrap();
		let first = manager.new_instance(&metadata).unwrap();
		let second = manager.new_instance(&metadata).unwrap();

		manager.persist(&first).unwrap();
		manager.persist(&first).unwrap();
		manager.persist(&second).unwrap();
		assert_eq!(manager.staged_len(), 2);
		assert!(first.get("id").unwrap().is_null());
		assert!(manager.all("fleet::SpaceShip").is_empty());

		assert_eq!(manager.flush().unwrap(), 2);
		assert_eq!(manager.staged_len(), 0);
		assert_eq!(first.id(), Some(1));
		assert_eq!(second.id(), Some(2));
		assert_eq!(manager.find("fleet::SpaceShip", 2), Some(second));
		assert_eq!(manager.all("fleet::SpaceShip").len(), 2);
	}

	#[rstest]
	fn test_clones_share_store(manager: MemoryEntityManager) {
		let handle = manager.clone();
		let metadata = manager.metadata_for("fleet::SpaceStation").unwrap();
		let station = manager.new_instance(&metadata).unwrap();
		handle.persist(&station).unwrap();
		assert!(manager.is_staged(&station));
	}
}
