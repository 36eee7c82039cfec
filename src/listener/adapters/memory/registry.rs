//! In-memory listener ledger.

use crate::listener::{
    domain::{Subscription, SubscriptionId},
    ports::{ListenerRegistry, ListenerRegistryError, ListenerRegistryResult},
};
use crate::naming::ObjectName;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Ledger = BTreeMap<ObjectName, Vec<Subscription>>;

/// Thread-safe in-memory listener ledger.
///
/// Every operation is a single insert, removal or read, so a poisoned lock
/// still guards a consistent ledger and is recovered.
#[derive(Debug, Default)]
pub struct InMemoryListenerRegistry {
    ledger: RwLock<Ledger>,
}

impl InMemoryListenerRegistry {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.ledger.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.ledger.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ListenerRegistry for InMemoryListenerRegistry {
    fn add_listener(&self, subscription: Subscription) -> SubscriptionId {
        let id = subscription.id();
        self.write()
            .entry(subscription.name().clone())
            .or_default()
            .push(subscription);
        id
    }

    fn remove_listener(
        &self,
        name: &ObjectName,
        id: SubscriptionId,
    ) -> ListenerRegistryResult<Subscription> {
        let mut ledger = self.write();
        let not_found = || ListenerRegistryError::NotFound {
            name: name.clone(),
            id,
        };
        let subscriptions = ledger.get_mut(name).ok_or_else(not_found)?;
        let position = subscriptions
            .iter()
            .position(|subscription| subscription.id() == id)
            .ok_or_else(not_found)?;
        let removed = subscriptions.remove(position);
        if subscriptions.is_empty() {
            ledger.remove(name);
        }
        Ok(removed)
    }

    fn remove_listeners(&self, name: &ObjectName) -> usize {
        self.write().remove(name).map_or(0, |subscriptions| subscriptions.len())
    }

    fn subscriptions(&self, name: &ObjectName) -> Vec<Subscription> {
        self.read().get(name).cloned().unwrap_or_default()
    }

    fn interested(&self, name: &ObjectName, notification_type: &str) -> Vec<Subscription> {
        self.read()
            .get(name)
            .map(|subscriptions| {
                subscriptions
                    .iter()
                    .filter(|subscription| subscription.is_interested(notification_type))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
