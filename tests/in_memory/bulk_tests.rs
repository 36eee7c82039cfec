//! Partial success of bulk attribute access.

use super::helpers::{counter, facade, name};
use palladio::{
    FaultKind, InMemoryManagementFacade,
    registry::domain::{Attribute, AttributeList},
};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

#[rstest]
fn bulk_reads_skip_undeclared_attributes(facade: InMemoryManagementFacade) {
    let foo = name("domain:type=Foo,name=X");
    facade
        .register(foo.clone(), Arc::new(counter("x")))
        .expect("registers");

    let values = facade
        .get_attributes(&foo, &["Count", "Missing", "Label"])
        .expect("bulk read");

    assert_eq!(values.names(), vec!["Count", "Label"]);
    assert_eq!(values.get("Label"), Some(&json!("x")));
}

#[rstest]
fn bulk_writes_report_only_applied_values(facade: InMemoryManagementFacade) {
    let foo = name("domain:type=Foo,name=X");
    facade
        .register(foo.clone(), Arc::new(counter("x")))
        .expect("registers");
    facade
        .set_attribute(&foo, &Attribute::new("Count", 3))
        .expect("writes");

    let mut request = AttributeList::new();
    request.push(Attribute::new("Count", -1));
    request.push(Attribute::new("Label", "renamed"));
    request.push(Attribute::new("Missing", 1));
    let applied = facade.set_attributes(&foo, request).expect("bulk write");

    assert!(applied.is_empty());
    assert_eq!(facade.get_attribute(&foo, "Count").ok(), Some(json!(3)));
    assert_eq!(facade.get_attribute(&foo, "Label").ok(), Some(json!("x")));
}

#[rstest]
fn bulk_writes_apply_valid_values_in_order(facade: InMemoryManagementFacade) {
    let foo = name("domain:type=Foo,name=X");
    facade
        .register(foo.clone(), Arc::new(counter("x")))
        .expect("registers");

    let mut request = AttributeList::new();
    request.push(Attribute::new("Count", 7));
    request.push(Attribute::new("Count", "seven"));
    let applied = facade.set_attributes(&foo, request).expect("bulk write");

    assert_eq!(applied.names(), vec!["Count"]);
    assert_eq!(applied.get("Count"), Some(&json!(7)));
    assert_eq!(facade.get_attribute(&foo, "Count").ok(), Some(json!(7)));
}

#[rstest]
fn invalid_single_writes_leave_the_value_unchanged(facade: InMemoryManagementFacade) {
    let foo = name("domain:type=Foo,name=X");
    facade
        .register(foo.clone(), Arc::new(counter("x")))
        .expect("registers");

    let err = facade
        .set_attribute(&foo, &Attribute::new("Count", -4))
        .expect_err("below minimum");

    assert_eq!(err.kind(), FaultKind::InvalidAttributeValue);
    assert_eq!(facade.get_attribute(&foo, "Count").ok(), Some(json!(0)));
}

#[rstest]
fn bulk_calls_still_require_a_registered_name(facade: InMemoryManagementFacade) {
    let missing = name("domain:type=Foo,name=Missing");

    let read = facade.get_attributes(&missing, &["Count"]);
    let write = facade.set_attributes(&missing, AttributeList::new());

    assert_eq!(read.map_err(|err| err.kind()).err(), Some(FaultKind::InstanceNotFound));
    assert_eq!(write.map_err(|err| err.kind()).err(), Some(FaultKind::InstanceNotFound));
}
