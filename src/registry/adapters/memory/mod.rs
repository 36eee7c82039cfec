//! In-memory adapters.

mod managed_object;
mod registry;

pub use managed_object::{InMemoryManagedObject, InMemoryManagedObjectBuilder, OperationHandler};
pub use registry::InMemoryObjectRegistry;
