//! End-to-end lifecycle of a single managed object.

use super::helpers::{counter, facade, name};
use palladio::{
    FaultKind, InMemoryManagementFacade, ManagementError,
    registry::domain::{Attribute, ValueType},
};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

#[rstest]
fn register_write_invoke_unregister(facade: InMemoryManagementFacade) {
    let foo = name("domain:type=Foo,name=X");

    let instance = facade
        .register(foo.clone(), Arc::new(counter("x")))
        .expect("registers");
    assert_eq!(instance.class_name, "org.example.Counter");
    assert_eq!(facade.get_attribute(&foo, "Count").ok(), Some(json!(0)));

    facade
        .set_attribute(&foo, &Attribute::new("Count", 5))
        .expect("writes");
    assert_eq!(facade.get_attribute(&foo, "Count").ok(), Some(json!(5)));

    let reset = facade.invoke(&foo, "reset", &[], &[]).expect("invokes");
    assert_eq!(reset, Value::Null);
    assert_eq!(facade.get_attribute(&foo, "Count").ok(), Some(json!(0)));

    facade.unregister(&foo).expect("unregisters");
    let err = facade
        .get_attribute(&foo, "Count")
        .expect_err("object is gone");
    assert!(matches!(err, ManagementError::InstanceNotFound(ref missing) if *missing == foo));
}

#[rstest]
fn invoke_passes_typed_parameters(facade: InMemoryManagementFacade) {
    let foo = name("domain:type=Foo,name=X");
    facade
        .register(foo.clone(), Arc::new(counter("x")))
        .expect("registers");

    let total = facade
        .invoke(&foo, "add", &[json!(4)], &[ValueType::Integer])
        .expect("invokes");

    assert_eq!(total, json!(4));
    assert_eq!(facade.get_attribute(&foo, "Count").ok(), Some(json!(4)));
}

#[rstest]
#[case(&[json!("four")], &[ValueType::Integer])]
#[case(&[], &[ValueType::Integer])]
#[case(&[json!(4)], &[ValueType::String])]
fn invoke_rejects_mismatched_calls(
    facade: InMemoryManagementFacade,
    #[case] params: &[Value],
    #[case] signature: &[ValueType],
) {
    let foo = name("domain:type=Foo,name=X");
    facade
        .register(foo.clone(), Arc::new(counter("x")))
        .expect("registers");

    let err = facade
        .invoke(&foo, "add", params, signature)
        .expect_err("call rejected");

    assert_eq!(err.kind(), FaultKind::Reflection);
    assert_eq!(facade.get_attribute(&foo, "Count").ok(), Some(json!(0)));
}

#[rstest]
fn read_only_attributes_refuse_writes(facade: InMemoryManagementFacade) {
    let foo = name("domain:type=Foo,name=X");
    facade
        .register(foo.clone(), Arc::new(counter("x")))
        .expect("registers");

    let err = facade
        .set_attribute(&foo, &Attribute::new("Label", "y"))
        .expect_err("read-only");

    assert_eq!(err.kind(), FaultKind::AttributeNotFound);
    assert_eq!(facade.get_attribute(&foo, "Label").ok(), Some(json!("x")));
}

#[rstest]
fn names_can_be_reused_after_unregistering(facade: InMemoryManagementFacade) {
    let foo = name("domain:type=Foo,name=X");
    facade
        .register(foo.clone(), Arc::new(counter("first")))
        .expect("registers");
    facade.unregister(&foo).expect("unregisters");

    facade
        .register(foo.clone(), Arc::new(counter("second")))
        .expect("registers again");

    assert_eq!(facade.get_attribute(&foo, "Label").ok(), Some(json!("second")));
}

#[rstest]
fn equivalent_spellings_address_the_same_object(facade: InMemoryManagementFacade) {
    facade
        .register(name("domain:type=Foo,name=X"), Arc::new(counter("x")))
        .expect("registers");

    let reordered = name("domain:name=X,type=Foo");
    let duplicate = facade.register(reordered.clone(), Arc::new(counter("y")));

    assert_eq!(duplicate.map(|_| ()).map_err(|err| err.kind()), Err(FaultKind::DuplicateName));
    assert_eq!(facade.get_attribute(&reordered, "Label").ok(), Some(json!("x")));
}

#[rstest]
fn describe_reports_declared_metadata(facade: InMemoryManagementFacade) {
    let foo = name("domain:type=Foo,name=X");
    facade
        .register(foo.clone(), Arc::new(counter("x")))
        .expect("registers");

    let info = facade.describe(&foo).expect("describes");

    assert_eq!(info.class_name(), "org.example.Counter");
    assert_eq!(info.description(), "Monotonic counter");
    let count = info.attribute("Count").expect("Count declared");
    assert!(count.is_readable() && count.is_writable());
    assert!(info.operation("add", &[ValueType::Integer]).is_some());
}
