//! Immutable view of the registry at one point in time.

use super::ManagedObjectDescriptor;
use crate::naming::ObjectName;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Entries published by one registry mutation.
///
/// Cloning is cheap and iteration can be restarted any number of times;
/// registrations made after the snapshot was taken are never visible
/// through it.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    entries: Arc<BTreeMap<ObjectName, Arc<ManagedObjectDescriptor>>>,
}

impl RegistrySnapshot {
    /// Wraps a published entry map.
    #[must_use]
    pub const fn new(entries: Arc<BTreeMap<ObjectName, Arc<ManagedObjectDescriptor>>>) -> Self {
        Self { entries }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the snapshot has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds an entry by exact name.
    #[must_use]
    pub fn get(&self, name: &ObjectName) -> Option<&Arc<ManagedObjectDescriptor>> {
        self.entries.get(name)
    }

    /// Iterates over entries in canonical name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectName, &Arc<ManagedObjectDescriptor>)> {
        self.entries.iter()
    }

    /// Iterates over entry names in canonical name order.
    pub fn names(&self) -> impl Iterator<Item = &ObjectName> {
        self.entries.keys()
    }
}
