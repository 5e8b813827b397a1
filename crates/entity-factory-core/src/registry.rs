//! Definition registry
//!
//! Maps entity names to their definitions. Each name can be defined once.

use std::collections::HashMap;
use std::rc::Rc;

use crate::definition::EntityDefinition;
use crate::error::{FactoryError, FactoryResult};
use crate::metadata::EntityManager;

/// Name to [`EntityDefinition`] mapping owned by one factory
pub struct DefinitionRegistry<M: EntityManager> {
	definitions: HashMap<String, Rc<EntityDefinition<M>>>,
}

impl<M: EntityManager> DefinitionRegistry<M> {
	pub fn new() -> Self {
		Self {
			definitions: HashMap::new(),
		}
	}

	/// Register a definition under its own name
	///
	/// Fails with [`FactoryError::DuplicateDefinition`] if the name is taken;
	/// the existing definition is left untouched.
	pub fn register(&mut self, definition: EntityDefinition<M>) -> FactoryResult<()> {
		let name = definition.name().to_string();
		if self.definitions.contains_key(&name) {
			return Err(FactoryError::DuplicateDefinition(name));
		}
		self.definitions.insert(name, Rc::new(definition));
		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<Rc<EntityDefinition<M>>> {
		self.definitions.get(name).cloned()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.definitions.contains_key(name)
	}

	/// Registered names, sorted
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.definitions.keys().cloned().collect();
		names.sort();
		names
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

impl<M: EntityManager> Default for DefinitionRegistry<M> {
	fn default() -> Self {
		Self::new()
	}
}
