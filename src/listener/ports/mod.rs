//! Port contract for the listener ledger.

mod registry;

pub use registry::{ListenerRegistry, ListenerRegistryError, ListenerRegistryResult};
