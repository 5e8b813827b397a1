//! Entity definitions
//!
//! An [`EntityDefinition`] binds a registry name to a mapped type, the
//! producers of its fields and its auxiliary configuration. Definitions are
//! validated against the type's metadata when they are created and are
//! immutable afterwards.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{FactoryError, FactoryResult};
use crate::field_def::FieldDef;
use crate::metadata::{EntityManager, EntityMetadata, MetadataProvider, Values};

/// Hook run once per constructed instance, after every field is assigned
///
/// Receives the instance and the resolved value of every field.
pub type AfterCreate<M> =
	Rc<dyn Fn(&<M as MetadataProvider>::Entity, &Values<M>) -> FactoryResult<()>>;

/// Ordered field name to producer mapping supplied at definition time
///
/// Cloning forks every sequence, so two definitions built from copies of
/// one `FieldDefs` count independently.
///
/// # Examples
///
/// ```ignore
/// let fields = FieldDefs::new()
///     .field("name", "Eve")
///     .field("space_ship", FieldDef::reference("SpaceShip"));
/// ```
pub struct FieldDefs<M: EntityManager> {
	defs: IndexMap<String, FieldDef<M>>,
}

impl<M: EntityManager> FieldDefs<M> {
	pub fn new() -> Self {
		Self {
			defs: IndexMap::new(),
		}
	}

	/// Bind `name` to a producer, replacing an earlier binding of the same name
	pub fn field(mut self, name: impl Into<String>, def: impl Into<FieldDef<M>>) -> Self {
		self.insert(name, def);
		self
	}

	pub fn insert(&mut self, name: impl Into<String>, def: impl Into<FieldDef<M>>) {
		self.defs.insert(name.into(), def.into());
	}

	pub fn get(&self, name: &str) -> Option<&FieldDef<M>> {
		self.defs.get(name)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.defs.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.defs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.defs.is_empty()
	}
}

impl<M: EntityManager> Default for FieldDefs<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M: EntityManager> Clone for FieldDefs<M> {
	fn clone(&self) -> Self {
		Self {
			defs: self
				.defs
				.iter()
				.map(|(name, def)| (name.clone(), def.fork()))
				.collect(),
		}
	}
}

impl<M: EntityManager> fmt::Debug for FieldDefs<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map()
			.entries(self.defs.iter())
			.finish()
	}
}

/// Auxiliary configuration of an entity definition
pub struct EntityConfig<M: EntityManager> {
	after_create: Option<AfterCreate<M>>,
}

impl<M: EntityManager> EntityConfig<M> {
	pub fn new() -> Self {
		Self { after_create: None }
	}

	pub fn after_create_hook(&self) -> Option<&AfterCreate<M>> {
		self.after_create.as_ref()
	}
}

impl<M: EntityManager + 'static> EntityConfig<M> {
	/// Run `hook` after each instance is built
	///
	/// Errors returned by the hook propagate out of the `get` call that
	/// triggered it.
	pub fn after_create<F>(mut self, hook: F) -> Self
	where
		F: Fn(&M::Entity, &Values<M>) -> FactoryResult<()> + 'static,
	{
		self.after_create = Some(Rc::new(hook));
		self
	}
}

impl<M: EntityManager> Default for EntityConfig<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M: EntityManager> Clone for EntityConfig<M> {
	fn clone(&self) -> Self {
		Self {
			after_create: self.after_create.clone(),
		}
	}
}

impl<M: EntityManager> fmt::Debug for EntityConfig<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EntityConfig")
			.field("after_create", &self.after_create.is_some())
			.finish()
	}
}

/// Validated, immutable recipe for building one kind of entity
pub struct EntityDefinition<M: EntityManager> {
	name: String,
	entity_type: String,
	metadata: M::Metadata,
	field_defs: IndexMap<String, FieldDef<M>>,
	config: EntityConfig<M>,
}

impl<M: EntityManager> EntityDefinition<M> {
	/// Validate `field_defs` against the metadata of `entity_type`
	///
	/// Every declared field without a producer gets a constant producer
	/// holding the value it has on a bare instance, so type-level defaults
	/// survive and every declared field can be overridden at request time.
	/// Supplied producers come first, defaults follow in metadata order.
	pub fn new(
		manager: &M,
		name: impl Into<String>,
		entity_type: impl Into<String>,
		field_defs: FieldDefs<M>,
		config: EntityConfig<M>,
	) -> FactoryResult<Self> {
		let name = name.into();
		let entity_type = entity_type.into();

		let metadata = manager
			.metadata_for(&entity_type)
			.ok_or_else(|| FactoryError::NotAnEntity(entity_type.clone()))?;

		let unknown: Vec<String> = field_defs
			.names()
			.filter(|field| !metadata.has_field(field))
			.map(str::to_string)
			.collect();
		if !unknown.is_empty() {
			return Err(FactoryError::UnknownField {
				entity_type,
				fields: unknown,
			});
		}

		let mut defs = field_defs.defs;
		let missing: Vec<String> = metadata
			.field_names()
			.into_iter()
			.filter(|field| !defs.contains_key(field))
			.collect();
		if !missing.is_empty() {
			let bare = manager.new_instance(&metadata)?;
			for field in missing {
				let default = manager.get_field(&bare, &field)?;
				defs.insert(field, FieldDef::Constant(default));
			}
		}

		Ok(Self {
			name,
			entity_type,
			metadata,
			field_defs: defs,
			config,
		})
	}

	/// Registry name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Fully-qualified type name
	pub fn entity_type(&self) -> &str {
		&self.entity_type
	}

	pub fn metadata(&self) -> &M::Metadata {
		&self.metadata
	}

	pub fn config(&self) -> &EntityConfig<M> {
		&self.config
	}

	/// Every field with its producer, in resolution order
	pub fn field_defs(&self) -> &IndexMap<String, FieldDef<M>> {
		&self.field_defs
	}

	pub fn field_names(&self) -> impl Iterator<Item = &str> {
		self.field_defs.keys().map(String::as_str)
	}

	pub fn has_field(&self, field: &str) -> bool {
		self.field_defs.contains_key(field)
	}

	/// Fail with every override key that is not a field of this definition
	pub fn check_overrides(&self, overrides: &Values<M>) -> FactoryResult<()> {
		let extra: Vec<String> = overrides
			.keys()
			.filter(|key| !self.has_field(key))
			.map(str::to_string)
			.collect();
		if extra.is_empty() {
			Ok(())
		} else {
			Err(FactoryError::UnknownField {
				entity_type: self.entity_type.clone(),
				fields: extra,
			})
		}
	}
}

impl<M: EntityManager> fmt::Debug for EntityDefinition<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EntityDefinition")
			.field("name", &self.name)
			.field("entity_type", &self.entity_type)
			.field("fields", &self.field_names().collect::<Vec<_>>())
			.field("config", &self.config)
			.finish()
	}
}
