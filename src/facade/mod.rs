//! Management facade: the uniform surface clients and hosting collaborators
//! talk to.
//!
//! [`ManagementFacade`] composes the object registry, the query engine, the
//! introspector, the dispatcher and the listener ledger behind one set of
//! operations that all fail with [`ManagementError`](crate::ManagementError).

mod config;
mod service;

pub use config::{ConfigError, FacadeConfig};
pub use service::{InMemoryManagementFacade, ManagementFacade};
