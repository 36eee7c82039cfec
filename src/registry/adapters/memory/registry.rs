//! Snapshot-publishing in-memory object registry.

use crate::naming::ObjectName;
use crate::registry::{
    domain::{ManagedObjectDescriptor, RegistrySnapshot},
    ports::{ObjectRegistry, RegistryError, RegistryResult},
};
use arc_swap::ArcSwap;
use std::collections::BTreeMap;
use std::sync::Arc;

type Entries = BTreeMap<ObjectName, Arc<ManagedObjectDescriptor>>;

/// Thread-safe in-memory registry.
///
/// Every mutation builds a replacement map and publishes it with a
/// compare-and-swap; a writer that loses the race retries from the latest
/// map. Readers load the current map without locking.
#[derive(Debug)]
pub struct InMemoryObjectRegistry {
    entries: ArcSwap<Entries>,
}

impl InMemoryObjectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(BTreeMap::new()),
        }
    }

    /// Applies `edit` to a copy of the current map and publishes the result.
    ///
    /// `edit` may run more than once when writers race, and must derive its
    /// answer from the map it is given.
    fn publish<T>(&self, mut edit: impl FnMut(&mut Entries) -> RegistryResult<T>) -> RegistryResult<T> {
        loop {
            let current = self.entries.load_full();
            let mut next = Entries::clone(&current);
            let outcome = edit(&mut next)?;
            let previous = self.entries.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&previous, &current) {
                return Ok(outcome);
            }
        }
    }
}

impl Default for InMemoryObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectRegistry for InMemoryObjectRegistry {
    fn register(
        &self,
        descriptor: ManagedObjectDescriptor,
    ) -> RegistryResult<Arc<ManagedObjectDescriptor>> {
        let entry = Arc::new(descriptor);
        self.publish(|entries| {
            let name = entry.name();
            if entries.contains_key(name) {
                return Err(RegistryError::DuplicateName(name.clone()));
            }
            entries.insert(name.clone(), Arc::clone(&entry));
            Ok(Arc::clone(&entry))
        })
    }

    fn unregister(&self, name: &ObjectName) -> RegistryResult<Arc<ManagedObjectDescriptor>> {
        self.publish(|entries| {
            entries
                .remove(name)
                .ok_or_else(|| RegistryError::InstanceNotFound(name.clone()))
        })
    }

    fn lookup(&self, name: &ObjectName) -> RegistryResult<Arc<ManagedObjectDescriptor>> {
        self.entries
            .load()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::InstanceNotFound(name.clone()))
    }

    fn is_registered(&self, name: &ObjectName) -> bool {
        self.entries.load().contains_key(name)
    }

    fn count(&self) -> usize {
        self.entries.load().len()
    }

    fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::new(self.entries.load_full())
    }
}
