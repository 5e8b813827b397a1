//! Fixture factory
//!
//! [`FixtureFactory`] is the construction engine. It owns the definition
//! registry and the singleton table, resolves field producers, allocates bare
//! instances through the [`EntityManager`], assigns fields, keeps
//! bidirectional associations consistent and optionally stages the result
//! for persistence.
//!
//! # Examples
//!
//! ```ignore
//! use entity_factory::prelude::*;
//!
//! let mut factory = FixtureFactory::new(manager);
//! factory
//!     .define("SpaceShip", FieldDefs::new().field("name", "Star"))?
//!     .define(
//!         "Person",
//!         FieldDefs::new().field("space_ship", FieldDef::reference("SpaceShip")),
//!     )?;
//!
//! let ship = factory.get("SpaceShip", FieldValues::new())?;
//! let nova = factory.get("SpaceShip", FieldValues::new().with("name", "Nova"))?;
//! let crew = factory.get_list("Person", FieldValues::new(), 3)?;
//! ```

use std::rc::Rc;

use crate::definition::{EntityConfig, EntityDefinition, FieldDefs};
use crate::error::{FactoryError, FactoryResult};
use crate::metadata::{EntityManager, EntityMetadata, FieldKind, Value, Values};
use crate::registry::DefinitionRegistry;
use crate::settings::{FactorySettings, normalize_namespace};
use crate::singleton::SingletonTable;
use crate::value::{FieldValue, FieldValues};

/// Creates relationship-consistent entities for use in tests
pub struct FixtureFactory<M: EntityManager> {
	manager: M,
	settings: FactorySettings,
	definitions: DefinitionRegistry<M>,
	singletons: SingletonTable<M::Entity>,
	depth: usize,
}

impl<M: EntityManager> FixtureFactory<M> {
	pub fn new(manager: M) -> Self {
		Self::with_settings(manager, FactorySettings::default())
	}

	pub fn with_settings(manager: M, settings: FactorySettings) -> Self {
		Self {
			manager,
			settings,
			definitions: DefinitionRegistry::new(),
			singletons: SingletonTable::new(),
			depth: 0,
		}
	}

	pub fn manager(&self) -> &M {
		&self.manager
	}

	pub fn settings(&self) -> &FactorySettings {
		&self.settings
	}

	/// Set the namespace prefixed to relative entity names
	///
	/// Only affects definitions made afterwards.
	pub fn set_entity_namespace(&mut self, namespace: impl AsRef<str>) {
		self.settings.entity_namespace = normalize_namespace(namespace.as_ref());
	}

	pub fn entity_namespace(&self) -> &str {
		&self.settings.entity_namespace
	}

	/// Toggle staging of every constructed instance; flushing stays with the
	/// caller
	pub fn persist_on_get(&mut self, enabled: bool) {
		self.settings.persist_on_get = enabled;
	}

	pub fn is_persisting_on_get(&self) -> bool {
		self.settings.persist_on_get
	}

	pub fn has_definition(&self, name: &str) -> bool {
		self.definitions.contains(name)
	}

	pub fn definitions(&self) -> &DefinitionRegistry<M> {
		&self.definitions
	}

	/// Define how to build a default entity registered as `name`
	///
	/// The concrete type is `name` resolved against the entity namespace.
	/// Returns the factory so definitions can be chained.
	pub fn define_entity(
		&mut self,
		name: &str,
		fields: FieldDefs<M>,
		config: EntityConfig<M>,
	) -> FactoryResult<&mut Self> {
		if self.definitions.contains(name) {
			return Err(FactoryError::DuplicateDefinition(name.to_string()));
		}

		let entity_type = self.settings.qualify(name);
		if !self.manager.type_exists(&entity_type) {
			return Err(FactoryError::UnknownType(entity_type));
		}

		let definition = EntityDefinition::new(&self.manager, name, entity_type, fields, config)?;
		tracing::debug!(
			name,
			entity_type = definition.entity_type(),
			fields = definition.field_defs().len(),
			"defined entity"
		);
		self.definitions.register(definition)?;
		Ok(self)
	}

	/// [`define_entity`](Self::define_entity) without extra configuration
	pub fn define(&mut self, name: &str, fields: FieldDefs<M>) -> FactoryResult<&mut Self> {
		self.define_entity(name, fields, EntityConfig::default())
	}

	/// Get an entity and its dependencies
	///
	/// Returns the singleton for `name` if one is set, ignoring `overrides`.
	/// Otherwise builds a new instance, using `overrides` in place of the
	/// defined producers.
	pub fn get(&mut self, name: &str, overrides: Values<M>) -> FactoryResult<M::Entity> {
		if let Some(singleton) = self.singletons.get(name) {
			return Ok(singleton.clone());
		}

		let definition = self
			.definitions
			.get(name)
			.ok_or_else(|| FactoryError::UnknownEntity(name.to_string()))?;
		definition.check_overrides(&overrides)?;

		// `depth` counts the entities already under construction
		if self.depth > self.settings.max_depth {
			return Err(FactoryError::RecursionLimit {
				name: name.to_string(),
				limit: self.settings.max_depth,
			});
		}

		self.depth += 1;
		let result = self.build(&definition, overrides);
		self.depth -= 1;
		result
	}

	/// Get `count` entities, built left to right
	///
	/// Under an active singleton the count is clamped to 1.
	pub fn get_list(
		&mut self,
		name: &str,
		overrides: Values<M>,
		count: usize,
	) -> FactoryResult<Vec<M::Entity>> {
		if count < 1 {
			return Err(FactoryError::InvalidCount(count));
		}

		let count = if count > 1 && self.singletons.contains(name) {
			tracing::warn!(
				name,
				requested = count,
				"singleton is active, returning a single instance"
			);
			1
		} else {
			count
		};

		(0..count)
			.map(|_| self.get(name, overrides.clone()))
			.collect()
	}

	/// Make `entity` the instance returned for `name`
	pub fn set_singleton(&mut self, name: &str, entity: M::Entity) {
		tracing::debug!(name, "singleton set");
		self.singletons.set(name, entity);
	}

	/// Build an entity and keep it as the singleton for `name`
	///
	/// Fails if `name` already has a singleton.
	pub fn get_as_singleton(
		&mut self,
		name: &str,
		overrides: Values<M>,
	) -> FactoryResult<M::Entity> {
		if self.singletons.contains(name) {
			return Err(FactoryError::DuplicateSingleton(name.to_string()));
		}
		let entity = self.get(name, overrides)?;
		self.singletons.insert_new(name, entity.clone())?;
		tracing::debug!(name, "singleton created");
		Ok(entity)
	}

	/// Make `get(name)` return new entities again
	pub fn unset_singleton(&mut self, name: &str) {
		if self.singletons.remove(name).is_some() {
			tracing::debug!(name, "singleton unset");
		}
	}

	pub fn singleton(&self, name: &str) -> Option<&M::Entity> {
		self.singletons.get(name)
	}

	fn build(
		&mut self,
		definition: &Rc<EntityDefinition<M>>,
		mut overrides: Values<M>,
	) -> FactoryResult<M::Entity> {
		let mut values = FieldValues::with_capacity(definition.field_defs().len());
		for (field, field_def) in definition.field_defs() {
			let value = match overrides.remove(field) {
				Some(value) => value,
				None => field_def.resolve(self)?,
			};
			tracing::trace!(
				entity = definition.name(),
				field = field.as_str(),
				kind = value.kind(),
				"resolved field"
			);
			values.insert(field.clone(), value);
		}

		let entity = self.manager.new_instance(definition.metadata())?;
		for (field, value) in values.iter() {
			self.assign(definition, &entity, field, value.clone())?;
		}

		if let Some(hook) = definition.config().after_create_hook() {
			hook(&entity, &values)?;
		}

		if self.settings.persist_on_get {
			self.manager.persist(&entity)?;
		}

		tracing::debug!(
			name = definition.name(),
			entity_type = definition.entity_type(),
			depth = self.depth,
			"built entity"
		);
		Ok(entity)
	}

	fn assign(
		&self,
		definition: &EntityDefinition<M>,
		entity: &M::Entity,
		field: &str,
		value: Value<M>,
	) -> FactoryResult<()> {
		match definition.metadata().field_kind(field) {
			Some(FieldKind::ToMany { .. }) => {
				let collection = self.collection_from(field, value)?;
				self.manager
					.set_field(entity, field, FieldValue::Collection(collection))
			}
			Some(FieldKind::ToOne { inverse }) => {
				let target = value.as_entity().cloned();
				self.manager.set_field(entity, field, value)?;
				match (target, inverse) {
					(Some(target), Some(inverse)) => self.add_to_inverse(entity, &target, &inverse),
					_ => Ok(()),
				}
			}
			_ => self.manager.set_field(entity, field, value),
		}
	}

	/// Coerce a resolved value into a fresh collection
	///
	/// Lists keep their elements in order; any other value, including an
	/// existing collection, becomes an empty collection.
	fn collection_from(&self, field: &str, value: Value<M>) -> FactoryResult<M::Collection> {
		let elements = match value {
			FieldValue::List(items) => items
				.into_iter()
				.map(|item| match item {
					FieldValue::Entity(entity) => Ok(entity),
					other => Err(FactoryError::TypeMismatch {
						field: field.to_string(),
						expected: "entity".to_string(),
						actual: other.kind().to_string(),
					}),
				})
				.collect::<FactoryResult<Vec<_>>>()?,
			_ => Vec::new(),
		};
		Ok(self.manager.new_collection(elements))
	}

	/// Add `entity` to the inverse collection on `target`
	fn add_to_inverse(
		&self,
		entity: &M::Entity,
		target: &M::Entity,
		inverse: &str,
	) -> FactoryResult<()> {
		if let FieldValue::Collection(collection) = self.manager.get_field(target, inverse)? {
			self.manager.collection_add(&collection, entity.clone());
		}
		Ok(())
	}
}
