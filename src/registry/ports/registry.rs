//! Registry port binding concrete names to managed objects.

use crate::naming::ObjectName;
use crate::registry::domain::{ManagedObjectDescriptor, RegistrySnapshot};
use std::sync::Arc;
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Storage contract for registered managed objects.
///
/// Mutations are linearizable. Readers work from immutable snapshots and
/// never observe a half-applied registration.
pub trait ObjectRegistry: Send + Sync {
    /// Stores a new entry and returns the shared descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] when the name is bound.
    fn register(
        &self,
        descriptor: ManagedObjectDescriptor,
    ) -> RegistryResult<Arc<ManagedObjectDescriptor>>;

    /// Removes an entry and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InstanceNotFound`] when the name is unbound.
    fn unregister(&self, name: &ObjectName) -> RegistryResult<Arc<ManagedObjectDescriptor>>;

    /// Finds an entry by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InstanceNotFound`] when the name is unbound.
    fn lookup(&self, name: &ObjectName) -> RegistryResult<Arc<ManagedObjectDescriptor>>;

    /// Returns whether the name is bound.
    fn is_registered(&self, name: &ObjectName) -> bool;

    /// Returns the number of entries.
    fn count(&self) -> usize;

    /// Returns the current snapshot of all entries.
    fn snapshot(&self) -> RegistrySnapshot;
}

/// Errors returned by registry implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The name is already bound.
    #[error("an object is already registered as {0}")]
    DuplicateName(ObjectName),

    /// The name is not bound.
    #[error("no object is registered as {0}")]
    InstanceNotFound(ObjectName),
}
