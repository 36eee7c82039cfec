//! Pattern and predicate selection through the facade.

use super::helpers::{counter, facade, name};
use palladio::{InMemoryManagementFacade, ObjectName, QueryExpr, registry::domain::Attribute};
use rstest::{fixture, rstest};
use std::collections::BTreeSet;
use std::sync::Arc;

const NAMES: [&str; 5] = [
    "billing:type=Counter,name=orders",
    "billing:type=Counter,name=refunds",
    "billing:type=Gauge,name=latency",
    "shipping:type=Counter,name=parcels",
    "shipping:type=Counter,name=returns,zone=eu",
];

/// Facade holding every name in [`NAMES`], with `Count` set to its index.
#[fixture]
fn populated(facade: InMemoryManagementFacade) -> InMemoryManagementFacade {
    for (count, text) in (0_i64..).zip(NAMES) {
        let object_name = name(text);
        facade
            .register(object_name.clone(), Arc::new(counter(text)))
            .expect("registers");
        facade
            .set_attribute(&object_name, &Attribute::new("Count", count))
            .expect("writes");
    }
    facade
}

fn texts(names: &BTreeSet<ObjectName>) -> BTreeSet<String> {
    names.iter().map(ToString::to_string).collect()
}

#[rstest]
#[case("*:*")]
#[case("billing:*")]
#[case("*:type=Counter,*")]
#[case("bill*:type=Counter,*")]
#[case("?hipping:*")]
#[case("*:name=re*,*")]
#[case("shipping:type=Counter,name=parcels")]
#[case("nothing:*")]
fn pattern_queries_are_sound_and_complete(
    populated: InMemoryManagementFacade,
    #[case] pattern: &str,
) {
    let parsed = name(pattern);
    let expected: BTreeSet<ObjectName> = NAMES
        .into_iter()
        .map(name)
        .filter(|candidate| parsed.matches(candidate))
        .collect();

    let selected = populated.query_names(Some(&parsed), None);

    assert_eq!(selected, expected);
}

#[rstest]
fn absent_pattern_selects_everything(populated: InMemoryManagementFacade) {
    let selected = populated.query_names(None, None);

    assert_eq!(selected.len(), NAMES.len());
}

#[rstest]
fn property_order_does_not_change_the_selection(populated: InMemoryManagementFacade) {
    let forward = populated.query_names(Some(&name("*:type=Counter,name=orders")), None);
    let reversed = populated.query_names(Some(&name("*:name=orders,type=Counter")), None);

    assert_eq!(forward, reversed);
    assert_eq!(
        texts(&forward),
        BTreeSet::from(["billing:name=orders,type=Counter".to_owned()])
    );
}

#[rstest]
fn property_list_patterns_require_every_listed_key(populated: InMemoryManagementFacade) {
    let selected = populated.query_names(Some(&name("shipping:zone=eu,*")), None);

    assert_eq!(selected, BTreeSet::from([name("shipping:type=Counter,name=returns,zone=eu")]));
}

#[rstest]
fn predicates_filter_pattern_matches(populated: InMemoryManagementFacade) {
    let predicate = QueryExpr::parse("Count >= 1 and Count <= 3").expect("valid predicate");

    let selected = populated.query_names(Some(&name("*:type=Counter,*")), Some(&predicate));

    assert_eq!(selected, BTreeSet::from([name("billing:type=Counter,name=refunds"), name("shipping:type=Counter,name=parcels")]));
}

#[rstest]
fn predicates_over_undeclared_attributes_select_nothing(populated: InMemoryManagementFacade) {
    let predicate = QueryExpr::parse("Missing = 1").expect("valid predicate");

    let selected = populated.query_names(None, Some(&predicate));

    assert!(selected.is_empty());
}

#[rstest]
fn query_objects_pairs_names_with_classes(populated: InMemoryManagementFacade) {
    let objects = populated.query_objects(Some(&name("billing:type=Gauge,*")), None);

    let [only] = objects.as_slice() else {
        panic!("expected one object, got {objects:?}");
    };
    assert_eq!(only.name, name("billing:type=Gauge,name=latency"));
    assert_eq!(only.class_name, "org.example.Counter");
}
