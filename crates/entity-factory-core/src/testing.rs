//! Minimal entity manager for unit tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{FactoryError, FactoryResult};
use crate::metadata::{EntityManager, EntityMetadata, FieldKind, MetadataProvider, Value};

#[derive(Debug)]
pub(crate) struct Record {
	pub(crate) type_name: String,
	pub(crate) fields: HashMap<String, Value<TestManager>>,
}

#[derive(Debug, Clone)]
pub(crate) struct TestEntity(pub(crate) Rc<RefCell<Record>>);

impl TestEntity {
	pub(crate) fn field(&self, name: &str) -> Value<TestManager> {
		self.0
			.borrow()
			.fields
			.get(name)
			.cloned()
			.unwrap_or(Value::<TestManager>::Null)
	}
}

impl PartialEq for TestEntity {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TestCollection(pub(crate) Rc<RefCell<Vec<TestEntity>>>);

impl PartialEq for TestCollection {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

#[derive(Debug, Clone)]
pub(crate) struct TestMetadata {
	type_name: String,
	fields: Vec<(String, FieldKind)>,
}

impl TestMetadata {
	pub(crate) fn new(type_name: &str) -> Self {
		Self {
			type_name: type_name.to_string(),
			fields: Vec::new(),
		}
	}

	pub(crate) fn field(mut self, name: &str, kind: FieldKind) -> Self {
		self.fields.push((name.to_string(), kind));
		self
	}
}

impl EntityMetadata for TestMetadata {
	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn field_names(&self) -> Vec<String> {
		self.fields.iter().map(|(name, _)| name.clone()).collect()
	}

	fn field_kind(&self, field: &str) -> Option<FieldKind> {
		self.fields
			.iter()
			.find(|(name, _)| name == field)
			.map(|(_, kind)| kind.clone())
	}
}

/// Ships with crews, people aboard ships and one unmapped type
#[derive(Debug, Clone)]
pub(crate) struct TestManager {
	types: Rc<HashMap<String, TestMetadata>>,
	pub(crate) persisted: Rc<RefCell<Vec<TestEntity>>>,
}

impl TestManager {
	pub(crate) fn new() -> Self {
		let ship = TestMetadata::new("SpaceShip")
			.field("name", FieldKind::Scalar)
			.field(
				"crew",
				FieldKind::ToMany {
					inverse: Some("space_ship".to_string()),
				},
			);
		let person = TestMetadata::new("Person")
			.field("name", FieldKind::Scalar)
			.field(
				"space_ship",
				FieldKind::ToOne {
					inverse: Some("crew".to_string()),
				},
			);
		let types = [ship, person]
			.into_iter()
			.map(|m| (m.type_name.clone(), m))
			.collect();
		Self {
			types: Rc::new(types),
			persisted: Rc::new(RefCell::new(Vec::new())),
		}
	}
}

impl MetadataProvider for TestManager {
	type Entity = TestEntity;
	type Collection = TestCollection;
	type Metadata = TestMetadata;

	fn type_exists(&self, type_name: &str) -> bool {
		self.types.contains_key(type_name) || type_name == "Plain"
	}

	fn metadata_for(&self, type_name: &str) -> Option<TestMetadata> {
		self.types.get(type_name).cloned()
	}

	fn metadata_of(&self, entity: &TestEntity) -> Option<TestMetadata> {
		self.metadata_for(&entity.0.borrow().type_name)
	}

	fn new_instance(&self, metadata: &TestMetadata) -> FactoryResult<TestEntity> {
		let fields = metadata
			.fields
			.iter()
			.map(|(name, kind)| {
				let value = match kind {
					FieldKind::ToMany { .. } => {
						Value::<TestManager>::Collection(TestCollection::default())
					}
					_ => Value::<TestManager>::Null,
				};
				(name.clone(), value)
			})
			.collect();
		Ok(TestEntity(Rc::new(RefCell::new(Record {
			type_name: metadata.type_name.clone(),
			fields,
		}))))
	}

	fn get_field(&self, entity: &TestEntity, field: &str) -> FactoryResult<Value<Self>> {
		entity
			.0
			.borrow()
			.fields
			.get(field)
			.cloned()
			.ok_or_else(|| FactoryError::Metadata(format!("no field {}", field)))
	}

	fn set_field(&self, entity: &TestEntity, field: &str, value: Value<Self>) -> FactoryResult<()> {
		entity.0.borrow_mut().fields.insert(field.to_string(), value);
		Ok(())
	}

	fn new_collection(&self, elements: Vec<TestEntity>) -> TestCollection {
		TestCollection(Rc::new(RefCell::new(elements)))
	}

	fn collection_add(&self, collection: &TestCollection, element: TestEntity) {
		collection.0.borrow_mut().push(element);
	}
}

impl EntityManager for TestManager {
	fn persist(&self, entity: &TestEntity) -> FactoryResult<()> {
		self.persisted.borrow_mut().push(entity.clone());
		Ok(())
	}
}
