//! Persistence staging
//!
//! Tests for persist_on_get against the in-memory store.

mod common;

use common::{Factory, factory, none};
use entity_factory::prelude::*;
use rstest::rstest;

fn define_ship(factory: &mut Factory) {
	factory
		.define("SpaceShip", FieldDefs::new().field("name", "Zeta"))
		.unwrap();
}

/// Test automatic persisting
///
/// **Category**: Happy Path
/// **Verifies**: Built entities are staged and stored on flush
#[rstest]
fn test_automatic_persist_can_be_turned_on(mut factory: Factory) {
	define_ship(&mut factory);
	factory.persist_on_get(true);
	assert!(factory.is_persisting_on_get());

	let ship = factory.get("SpaceShip", none()).unwrap();
	assert_eq!(factory.manager().staged_len(), 1);
	factory.manager().flush().unwrap();

	let id = ship.integer("id").unwrap();
	assert_eq!(factory.manager().find("fleet::SpaceShip", id), Some(ship));
}

/// Test the default
///
/// **Category**: Happy Path
/// **Verifies**: Nothing is staged unless persist_on_get is enabled
#[rstest]
fn test_does_not_persist_by_default(mut factory: Factory) {
	define_ship(&mut factory);

	let ship = factory.get("SpaceShip", none()).unwrap();
	factory.manager().flush().unwrap();

	assert!(ship.get("id").unwrap().is_null());
	assert!(factory.manager().all("fleet::SpaceShip").is_empty());
}

/// Test persisting stays staged
///
/// **Category**: Edge Case
/// **Verifies**: The factory stages but never flushes
#[rstest]
fn test_persist_does_not_flush(mut factory: Factory) {
	define_ship(&mut factory);
	factory.persist_on_get(true);

	let ship = factory.get("SpaceShip", none()).unwrap();
	assert!(factory.manager().is_staged(&ship));
	assert!(ship.get("id").unwrap().is_null());
	assert!(factory.manager().all("fleet::SpaceShip").is_empty());
}

/// Test referenced entities are persisted too
///
/// **Category**: Happy Path
/// **Verifies**: Every entity built by one get is staged
#[rstest]
fn test_referenced_entities_are_persisted(mut factory: Factory) {
	factory
		.define("SpaceShip", FieldDefs::new())
		.unwrap()
		.define(
			"Person",
			FieldDefs::new().field("space_ship", FieldDef::reference("SpaceShip")),
		)
		.unwrap();
	factory.persist_on_get(true);

	let person = factory.get("Person", none()).unwrap();
	assert_eq!(factory.manager().staged_len(), 2);
	assert_eq!(factory.manager().flush().unwrap(), 2);

	let ship = person.entity("space_ship").unwrap();
	assert_eq!(ship.integer("id"), Some(1));
	assert_eq!(person.integer("id"), Some(1));
}

/// Test turning persisting off again
///
/// **Category**: Happy Path
/// **Verifies**: Disabling persist_on_get stops staging
#[rstest]
fn test_persist_can_be_turned_off(mut factory: Factory) {
	define_ship(&mut factory);
	factory.persist_on_get(true);
	factory.get("SpaceShip", none()).unwrap();
	factory.persist_on_get(false);
	factory.get("SpaceShip", none()).unwrap();

	assert_eq!(factory.manager().staged_len(), 1);
}

/// Test persisting configured through settings
///
/// **Category**: Happy Path
/// **Verifies**: persist_on_get can be enabled from TOML settings
#[rstest]
fn test_persist_from_settings() {
	let settings = FactorySettings::from_toml_str(
		r#"
		entity_namespace = "fleet"
		persist_on_get = true
		"#,
	)
	.unwrap();
	let mut factory = FixtureFactory::with_settings(
		entity_factory::memory::MemoryEntityManager::new(common::registry()),
		settings,
	);
	define_ship(&mut factory);

	factory.get("SpaceShip", none()).unwrap();
	assert_eq!(factory.manager().staged_len(), 1);
}
