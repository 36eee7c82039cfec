//! Then steps for management facade BDD scenarios.

use super::world::{FacadeWorld, parse_value};
use eyre::WrapErr;
use palladio::ObjectName;
use rstest_bdd_macros::then;

#[then(r#"the query returns only "{name}""#)]
fn query_returns_only(world: &FacadeWorld, name: String) -> Result<(), eyre::Report> {
    let expected: ObjectName = name.parse().wrap_err("parse expected name")?;
    let selected = world
        .last_query
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing query result in scenario world"))?;
    if selected.len() != 1 || !selected.contains(&expected) {
        return Err(eyre::eyre!("expected only {expected}, got {selected:?}"));
    }
    Ok(())
}

#[then(r#"the call fails with fault "{code}""#)]
fn call_fails_with(world: &FacadeWorld, code: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing call result in scenario world"))?;
    match result {
        Err(err) if err.kind().as_str() == code => Ok(()),
        other => Err(eyre::eyre!("expected fault {code}, got {other:?}")),
    }
}

#[then(r#"the call returns "{value}""#)]
fn call_returns(world: &FacadeWorld, value: String) -> Result<(), eyre::Report> {
    let expected = parse_value(&value)?;
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing call result in scenario world"))?;
    match result {
        Ok(returned) if *returned == expected => Ok(()),
        other => Err(eyre::eyre!("expected {expected}, got {other:?}")),
    }
}

#[then(r#"attribute "{attribute}" reads "{value}""#)]
fn attribute_reads(
    world: &FacadeWorld,
    attribute: String,
    value: String,
) -> Result<(), eyre::Report> {
    let expected = parse_value(&value)?;
    let queue = world.queue()?;
    let current = world
        .facade
        .get_attribute(queue, &attribute)
        .wrap_err("read attribute")?;
    if current != expected {
        return Err(eyre::eyre!("expected {attribute} = {expected}, got {current}"));
    }
    Ok(())
}

#[then(r#"the bulk result lists "{attributes}""#)]
fn bulk_result_lists(world: &FacadeWorld, attributes: String) -> Result<(), eyre::Report> {
    let values = world
        .last_bulk
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing bulk result in scenario world"))?;
    let expected: Vec<&str> = attributes.split(',').collect();
    if values.names() != expected {
        return Err(eyre::eyre!("expected {expected:?}, got {:?}", values.names()));
    }
    Ok(())
}

#[then("no subscriptions remain for the queue")]
fn no_subscriptions_remain(world: &FacadeWorld) -> Result<(), eyre::Report> {
    let queue = world.queue()?;
    let remaining = world.facade.listener_registry().subscriptions(queue);
    if !remaining.is_empty() {
        return Err(eyre::eyre!("expected no subscriptions, found {}", remaining.len()));
    }
    Ok(())
}

#[then(r#"reading attribute "{attribute}" fails with fault "{code}""#)]
fn reading_fails_with(
    world: &FacadeWorld,
    attribute: String,
    code: String,
) -> Result<(), eyre::Report> {
    let queue = world.queue()?;
    match world.facade.get_attribute(queue, &attribute) {
        Err(err) if err.kind().as_str() == code => Ok(()),
        other => Err(eyre::eyre!("expected fault {code}, got {other:?}")),
    }
}
