//! Singleton table
//!
//! While a name holds an entry here, every request for that name returns the
//! stored instance instead of building a new one.

use std::collections::HashMap;

use crate::error::{FactoryError, FactoryResult};

/// Name to shared instance mapping
#[derive(Debug, Clone)]
pub struct SingletonTable<E> {
	entries: HashMap<String, E>,
}

impl<E> SingletonTable<E> {
	pub fn new() -> Self {
		Self {
			entries: HashMap::new(),
		}
	}

	/// Store `entity` for `name`, replacing any previous entry
	pub fn set(&mut self, name: impl Into<String>, entity: E) {
		self.entries.insert(name.into(), entity);
	}

	/// Store `entity` for `name`, failing if an entry already exists
	pub fn insert_new(&mut self, name: impl Into<String>, entity: E) -> FactoryResult<()> {
		let name = name.into();
		if self.entries.contains_key(&name) {
			return Err(FactoryError::DuplicateSingleton(name));
		}
		self.entries.insert(name, entity);
		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<&E> {
		self.entries.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Remove the entry for `name`; nothing happens if there is none
	pub fn remove(&mut self, name: &str) -> Option<E> {
		self.entries.remove(name)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<E> Default for SingletonTable<E> {
	fn default() -> Self {
		Self::new()
	}
}
