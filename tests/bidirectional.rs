//! Bidirectional association consistency
//!
//! Tests that assigning the owning side of an association also updates the
//! inverse collection on the referenced entity.

mod common;

use common::{Factory, crewed_factory, factory, none};
use entity_factory::prelude::*;
use rstest::rstest;

/// Test one-to-many references are assigned both ways
///
/// **Category**: Happy Path
/// **Verifies**: The person appears in the crew of its generated ship
#[rstest]
fn test_one_to_many_assigned_both_ways(mut crewed_factory: Factory) {
	let person = crewed_factory.get("Person", none()).unwrap();
	let ship = person.entity("space_ship").unwrap();

	let crew = ship.collection("crew").unwrap();
	assert!(crew.contains(&person));
	assert_eq!(crew.len(), 1);
}

/// Test explicit owners receive the new entity
///
/// **Category**: Happy Path
/// **Verifies**: Overriding the owning side still updates the inverse side
#[rstest]
fn test_overridden_owner_gets_child(mut crewed_factory: Factory) {
	let ship = crewed_factory.get("SpaceShip", none()).unwrap();
	let p1 = crewed_factory
		.get("Person", FieldValues::new().with("space_ship", ship.clone()))
		.unwrap();
	let p2 = crewed_factory
		.get("Person", FieldValues::new().with("space_ship", ship.clone()))
		.unwrap();

	assert_eq!(ship.collection("crew").unwrap().to_vec(), vec![p1, p2]);
}

/// Test unidirectional references
///
/// **Category**: Happy Path
/// **Verifies**: A reference without an inverse is assigned as usual
#[rstest]
fn test_unidirectional_references(mut factory: Factory) {
	factory
		.define(
			"Badge",
			FieldDefs::new()
				.field("label", "Captain")
				.field("owner", FieldDef::reference("Person")),
		)
		.unwrap()
		.define("Person", FieldDefs::new())
		.unwrap();

	let badge = factory.get("Badge", none()).unwrap();
	let owner = badge.entity("owner").unwrap();
	assert_eq!(owner.type_name(), "fleet::Person");
	assert!(owner.entity("space_ship").is_none());
}

/// Test a singleton on the one side
///
/// **Category**: Happy Path
/// **Verifies**: A singleton ship collects every person built afterwards
#[rstest]
fn test_singleton_one_side_gets_several_children(mut crewed_factory: Factory) {
	let ship = crewed_factory.get_as_singleton("SpaceShip", none()).unwrap();
	let p1 = crewed_factory.get("Person", none()).unwrap();
	let p2 = crewed_factory.get("Person", none()).unwrap();

	let crew = ship.collection("crew").unwrap();
	assert!(crew.contains(&p1));
	assert!(crew.contains(&p2));
	assert_eq!(p1.entity("space_ship"), Some(ship.clone()));
	assert_eq!(p2.entity("space_ship"), Some(ship));
}

/// Test list construction keeps both sides consistent
///
/// **Category**: Happy Path
/// **Verifies**: Every person of a list sits in its own ship's crew
#[rstest]
fn test_list_children_are_consistent(mut crewed_factory: Factory) {
	let people = crewed_factory.get_list("Person", none(), 3).unwrap();

	for person in &people {
		let ship = person.entity("space_ship").unwrap();
		assert_eq!(ship.collection("crew").unwrap().to_vec(), vec![person.clone()]);
	}
}

/// Test a null owner
///
/// **Category**: Edge Case
/// **Verifies**: A null reference leaves other collections untouched
#[rstest]
fn test_null_owner_touches_nothing(mut crewed_factory: Factory) {
	let ship = crewed_factory.get_as_singleton("SpaceShip", none()).unwrap();
	let person = crewed_factory
		.get("Person", FieldValues::new().with("space_ship", FieldValue::Null))
		.unwrap();

	assert!(person.entity("space_ship").is_none());
	assert!(ship.collection("crew").unwrap().is_empty());
}
