//! # Entity Factory
//!
//! Fixture factory for ORM-backed tests.
//!
//! Declare a default recipe per entity once, then ask the factory for fully
//! populated instances. Referenced entities are built on demand, both sides
//! of bidirectional associations are kept consistent, and user constructors
//! are never called.
//!
//! ## Feature Flags
//!
//! - `memory` (default) - in-memory [`EntityManager`] backend
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "memory")]
//! # fn main() -> entity_factory::FactoryResult<()> {
//! use entity_factory::memory::{FieldSchema, MemoryEntityManager, ModelSchema, TypeRegistry};
//! use entity_factory::prelude::*;
//!
//! let registry = TypeRegistry::new()
//!     .register(
//!         ModelSchema::new("SpaceShip")
//!             .field(FieldSchema::scalar("name"))
//!             .field(FieldSchema::one_to_many("crew", "Person").mapped_by("space_ship")),
//!     )
//!     .register(
//!         ModelSchema::new("Person")
//!             .field(FieldSchema::scalar("name"))
//!             .field(FieldSchema::many_to_one("space_ship", "SpaceShip").inversed_by("crew")),
//!     );
//!
//! let mut factory = FixtureFactory::new(MemoryEntityManager::new(registry));
//! factory
//!     .define("SpaceShip", FieldDefs::new().field("name", "Enterprise"))?
//!     .define(
//!         "Person",
//!         FieldDefs::new()
//!             .field("name", FieldDef::sequence("Crew #{n}"))
//!             .field("space_ship", FieldDef::reference("SpaceShip")),
//!     )?;
//!
//! let person = factory.get("Person", FieldValues::new())?;
//! let ship = person.entity("space_ship").unwrap();
//! assert!(ship.collection("crew").unwrap().contains(&person));
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "memory"))]
//! # fn main() {}
//! ```

#[cfg(feature = "memory")]
pub mod memory;

// Re-export the engine at crate root
pub use entity_factory_core::{
	AfterCreate, EntityConfig, EntityDefinition, EntityManager, EntityMetadata, FactoryError,
	FactoryResult, FactorySettings, FieldDef, FieldDefs, FieldKind, FieldValue, FieldValues,
	FixtureFactory, MetadataProvider, Sequence, Value, Values,
};

// Lower-level modules
pub use entity_factory_core::{definition, registry, settings, singleton};

/// Prelude module for convenient imports
///
/// ```rust
/// use entity_factory::prelude::*;
/// ```
pub mod prelude {
	pub use entity_factory_core::prelude::*;

	#[cfg(feature = "memory")]
	pub use crate::memory::{EntityCollection, EntityRef, MemoryEntityManager};
}
