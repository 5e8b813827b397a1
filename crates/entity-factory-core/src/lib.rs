//! Construction engine for ORM test fixtures.
//!
//! Given a set of entity definitions, [`FixtureFactory`] produces fully
//! populated instances whose associations are consistent on both sides,
//! without calling constructors or wiring relations by hand.
//!
//! The engine is backend-agnostic. Everything it needs from the ORM is
//! expressed by the [`EntityManager`] capability trait:
//!
//! - type resolution and persistence metadata ([`EntityMetadata`])
//! - bare instantiation and reflective field access
//! - collection construction
//! - persistence staging
//!
//! # Architecture
//!
//! - [`FieldDef`] - field value producers (constants, generators,
//!   references, sequences)
//! - [`EntityDefinition`] - validated recipe binding a name to a type
//! - [`DefinitionRegistry`](registry::DefinitionRegistry) - name to definition
//! - [`SingletonTable`](singleton::SingletonTable) - name to shared instance
//! - [`FixtureFactory`] - the orchestrator
//!
//! # Concurrency
//!
//! A factory is single-threaded. Producers and handles use `Rc`/`Cell`
//! and the factory is neither `Send` nor `Sync`; use one factory per test.

pub mod definition;
pub mod error;
pub mod factory;
pub mod field_def;
pub mod metadata;
pub mod prelude;
pub mod registry;
pub mod settings;
pub mod singleton;
pub mod value;

#[cfg(test)]
mod testing;

// Re-export commonly used types at crate root
pub use definition::{AfterCreate, EntityConfig, EntityDefinition, FieldDefs};
pub use error::{FactoryError, FactoryResult};
pub use factory::FixtureFactory;
pub use field_def::{FieldDef, Sequence};
pub use metadata::{EntityManager, EntityMetadata, FieldKind, MetadataProvider, Value, Values};
pub use settings::FactorySettings;
pub use value::{FieldValue, FieldValues};
