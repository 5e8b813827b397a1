//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use entity_factory_core::prelude::*;
//! ```

// Error types
pub use crate::error::{FactoryError, FactoryResult};

// Values
pub use crate::value::{FieldValue, FieldValues};

// Capability interface
pub use crate::metadata::{
	EntityManager, EntityMetadata, FieldKind, MetadataProvider, Value, Values,
};

// Definitions and producers
pub use crate::definition::{AfterCreate, EntityConfig, EntityDefinition, FieldDefs};
pub use crate::field_def::{FieldDef, Sequence};

// Engine
pub use crate::factory::FixtureFactory;
pub use crate::settings::FactorySettings;
