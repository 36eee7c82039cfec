//! When steps for management facade BDD scenarios.

use super::world::{FacadeWorld, parse_value};
use eyre::WrapErr;
use palladio::{ObjectName, QueryExpr, registry::domain::Attribute};
use rstest_bdd_macros::when;

#[when(r#"names matching "{pattern}" are queried where "{predicate}""#)]
fn query_names(
    world: &mut FacadeWorld,
    pattern: String,
    predicate: String,
) -> Result<(), eyre::Report> {
    let selector: ObjectName = pattern.parse().wrap_err("parse query pattern")?;
    let expr = QueryExpr::parse(&predicate).wrap_err("parse query predicate")?;
    world.last_query = Some(world.facade.query_names(Some(&selector), Some(&expr)));
    Ok(())
}

#[when(r#"attribute "{attribute}" is set to "{value}""#)]
fn set_attribute(
    world: &mut FacadeWorld,
    attribute: String,
    value: String,
) -> Result<(), eyre::Report> {
    let queue = world.queue()?.clone();
    let written = Attribute::new(attribute, parse_value(&value)?);
    world.last_result = Some(
        world
            .facade
            .set_attribute(&queue, &written)
            .map(|()| serde_json::Value::Null),
    );
    Ok(())
}

#[when(r#"attributes "{attributes}" are read together"#)]
fn read_attributes(world: &mut FacadeWorld, attributes: String) -> Result<(), eyre::Report> {
    let queue = world.queue()?.clone();
    let requested: Vec<&str> = attributes.split(',').collect();
    let values = world
        .facade
        .get_attributes(&queue, requested.as_slice())
        .wrap_err("bulk read")?;
    world.last_bulk = Some(values);
    Ok(())
}

#[when(r#"operation "{operation}" is invoked"#)]
fn invoke_operation(world: &mut FacadeWorld, operation: String) -> Result<(), eyre::Report> {
    let queue = world.queue()?.clone();
    world.last_result = Some(world.facade.invoke(&queue, &operation, &[], &[]));
    Ok(())
}

#[when("the queue is unregistered")]
fn unregister_queue(world: &mut FacadeWorld) -> Result<(), eyre::Report> {
    let queue = world.queue()?.clone();
    world.facade.unregister(&queue).wrap_err("unregister queue")
}
