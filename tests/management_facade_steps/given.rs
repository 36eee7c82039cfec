//! Given steps for management facade BDD scenarios.

use super::world::{FacadeWorld, queue_object};
use eyre::WrapErr;
use palladio::{ObjectName, listener::domain::ListenerHandle};
use rstest_bdd_macros::given;
use std::sync::Arc;

#[given(r#"a registered queue "{name}" holding {depth:i64} messages"#)]
fn registered_queue(
    world: &mut FacadeWorld,
    name: String,
    depth: i64,
) -> Result<(), eyre::Report> {
    let object_name: ObjectName = name.parse().wrap_err("parse queue name")?;
    world
        .facade
        .register(object_name.clone(), Arc::new(queue_object(depth)))
        .wrap_err("register queue for scenario")?;
    world.queue = Some(object_name);
    Ok(())
}

#[given(r#"listener "{handle}" is subscribed to the queue"#)]
fn listener_subscribed(world: &mut FacadeWorld, handle: String) -> Result<(), eyre::Report> {
    let queue = world.queue()?.clone();
    world
        .facade
        .add_listener(&queue, ListenerHandle::new(handle), None, None)
        .wrap_err("subscribe listener for scenario")?;
    Ok(())
}
