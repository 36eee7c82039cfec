//! Port contracts for managed objects and the object registry.

mod managed_object;
mod registry;

pub use managed_object::{ManagedObject, ManagedObjectFault, ManagedObjectResult};
pub use registry::{ObjectRegistry, RegistryError, RegistryResult};
