//! In-memory backend module.
//!
//! # Examples
//!
//! ```rust,no_run
//! # #[cfg(feature = "memory")]
//! use entity_factory::memory::{MemoryEntityManager, TypeRegistry};
//! ```

#[cfg(feature = "memory")]
pub use entity_factory_memory::*;
