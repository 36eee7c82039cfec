//! Application services for query, introspection and dispatch.

mod dispatcher;
mod introspector;
mod query;

pub use dispatcher::Dispatcher;
pub use introspector::Introspector;
pub use query::QueryEngine;
