//! Shared fixtures for integration tests
//!
//! Models a small fleet domain in the in-memory backend: ships with crews,
//! badges owned by people, stations with a default name and a
//! self-referencing node type.

#![allow(dead_code)]

use std::sync::Once;

use entity_factory::memory::{FieldSchema, MemoryEntityManager, MemoryValue, ModelSchema, TypeRegistry};
use entity_factory::prelude::*;
use rstest::fixture;

/// Namespace relative entity names resolve against
pub const NAMESPACE: &str = "fleet";

pub type Factory = FixtureFactory<MemoryEntityManager>;

static INIT: Once = Once::new();

/// Initialize logging for tests (call once)
pub fn init_test_logging() {
	INIT.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_max_level(tracing::Level::TRACE)
			.with_test_writer()
			.try_init();
	});
}

pub fn registry() -> TypeRegistry {
	TypeRegistry::new()
		.register(
			ModelSchema::new("fleet::SpaceShip")
				.field(FieldSchema::identifier("id"))
				.field(FieldSchema::scalar("name"))
				.field(FieldSchema::one_to_many("crew", "fleet::Person").mapped_by("space_ship"))
				.constructor(|ship| ship.set("name", MemoryValue::from("Unnamed"))),
		)
		.register(
			ModelSchema::new("fleet::Person")
				.field(FieldSchema::identifier("id"))
				.field(FieldSchema::scalar("name"))
				.field(
					FieldSchema::many_to_one("space_ship", "fleet::SpaceShip").inversed_by("crew"),
				),
		)
		.register(
			ModelSchema::new("fleet::Badge")
				.field(FieldSchema::identifier("id"))
				.field(FieldSchema::scalar("label"))
				.field(FieldSchema::many_to_one("owner", "fleet::Person")),
		)
		.register(
			ModelSchema::new("fleet::SpaceStation")
				.field(FieldSchema::identifier("id"))
				.field(FieldSchema::scalar("name").default("Babylon5")),
		)
		.register(
			ModelSchema::new("fleet::Node")
				.field(FieldSchema::identifier("id"))
				.field(FieldSchema::many_to_one("parent", "fleet::Node")),
		)
		.register(
			ModelSchema::new("fleet::person::User")
				.field(FieldSchema::identifier("id"))
				.field(FieldSchema::scalar("name")),
		)
		.register(
			ModelSchema::new("gallery::Artist")
				.field(FieldSchema::identifier("id"))
				.field(FieldSchema::scalar("name")),
		)
		.register_unmapped("fleet::NotAnEntity")
}

/// Factory over a fresh store, with relative names resolved in [`NAMESPACE`]
pub fn new_factory() -> Factory {
	init_test_logging();
	FixtureFactory::with_settings(
		MemoryEntityManager::new(registry()),
		FactorySettings::new().with_entity_namespace(NAMESPACE),
	)
}

#[fixture]
pub fn factory() -> Factory {
	new_factory()
}

/// Factory with ships and people defined, people referencing a ship
#[fixture]
pub fn crewed_factory(mut factory: Factory) -> Factory {
	factory
		.define("SpaceShip", FieldDefs::new())
		.unwrap()
		.define(
			"Person",
			FieldDefs::new()
				.field("name", "Eve")
				.field("space_ship", FieldDef::reference("SpaceShip")),
		)
		.unwrap();
	factory
}

pub fn none() -> Values<MemoryEntityManager> {
	FieldValues::new()
}
