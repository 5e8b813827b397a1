//! In-memory backend for the fixture factory.
//!
//! Provides a [`MemoryEntityManager`] that maps types declared through
//! [`ModelSchema`] builders, allocates bare instances, exposes their fields
//! reflectively and keeps persisted entities in a process-local store.
//!
//! ```
//! use entity_factory_core::{FieldDefs, FieldValues, FixtureFactory};
//! use entity_factory_memory::{FieldSchema, MemoryEntityManager, ModelSchema, TypeRegistry};
//!
//! let registry = TypeRegistry::new().register(
//!     ModelSchema::new("SpaceShip").field(FieldSchema::scalar("name")),
//! );
//! let mut factory = FixtureFactory::new(MemoryEntityManager::new(registry));
//! factory.define("SpaceShip", FieldDefs::new().field("name", "Star")).unwrap();
//!
//! let ship = factory.get("SpaceShip", FieldValues::new()).unwrap();
//! assert_eq!(ship.string("name").as_deref(), Some("Star"));
//! ```

pub mod entity;
pub mod manager;
pub mod schema;

pub use entity::{EntityCollection, EntityRef, MemoryValue, MemoryValues};
pub use manager::MemoryEntityManager;
pub use schema::{Constructor, FieldSchema, MemoryMetadata, ModelSchema, Relation, TypeRegistry};
