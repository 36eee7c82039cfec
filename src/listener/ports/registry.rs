//! Listener ledger port.

use crate::listener::domain::{Subscription, SubscriptionId};
use crate::naming::ObjectName;
use thiserror::Error;

/// Result type for listener ledger operations.
pub type ListenerRegistryResult<T> = Result<T, ListenerRegistryError>;

/// Ledger of listener subscriptions keyed by object name.
///
/// The ledger only records subscriptions; it does not check that the
/// observed object exists.
pub trait ListenerRegistry: Send + Sync {
    /// Records a subscription and returns its identifier.
    fn add_listener(&self, subscription: Subscription) -> SubscriptionId;

    /// Removes one subscription and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerRegistryError::NotFound`] when `id` is not recorded
    /// for `name`.
    fn remove_listener(
        &self,
        name: &ObjectName,
        id: SubscriptionId,
    ) -> ListenerRegistryResult<Subscription>;

    /// Removes every subscription for `name` and returns how many there were.
    fn remove_listeners(&self, name: &ObjectName) -> usize;

    /// Lists subscriptions for `name` in registration order.
    fn subscriptions(&self, name: &ObjectName) -> Vec<Subscription>;

    /// Lists subscriptions for `name` whose filter enables
    /// `notification_type`.
    fn interested(&self, name: &ObjectName, notification_type: &str) -> Vec<Subscription>;
}

/// Errors returned by listener ledger implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListenerRegistryError {
    /// The subscription is not recorded for the name.
    #[error("no subscription {id} is recorded for {name}")]
    NotFound {
        /// Observed object name.
        name: ObjectName,
        /// Subscription identifier.
        id: SubscriptionId,
    },
}
