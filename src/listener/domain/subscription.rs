//! Listener subscription record.

use super::{ListenerHandle, NotificationFilter, SubscriptionId};
use crate::naming::ObjectName;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One listener registered against one managed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    id: SubscriptionId,
    name: ObjectName,
    listener: ListenerHandle,
    filter: Option<NotificationFilter>,
    handback: Option<Value>,
    created_at: DateTime<Utc>,
}

impl Subscription {
    /// Creates a subscription with a fresh identifier and no filter.
    #[must_use]
    pub fn new(name: ObjectName, listener: ListenerHandle, clock: &impl Clock) -> Self {
        Self {
            id: SubscriptionId::new(),
            name,
            listener,
            filter: None,
            handback: None,
            created_at: clock.utc(),
        }
    }

    /// Restricts the subscription to the filter's enabled types.
    #[must_use]
    pub fn with_filter(mut self, filter: NotificationFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Attaches an opaque value returned with every delivery.
    #[must_use]
    pub fn with_handback(mut self, handback: Value) -> Self {
        self.handback = Some(handback);
        self
    }

    /// Returns the subscription identifier.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the observed object name.
    #[must_use]
    pub const fn name(&self) -> &ObjectName {
        &self.name
    }

    /// Returns the listener handle.
    #[must_use]
    pub const fn listener(&self) -> &ListenerHandle {
        &self.listener
    }

    /// Returns the filter, if any.
    #[must_use]
    pub const fn filter(&self) -> Option<&NotificationFilter> {
        self.filter.as_ref()
    }

    /// Returns the handback value, if any.
    #[must_use]
    pub const fn handback(&self) -> Option<&Value> {
        self.handback.as_ref()
    }

    /// Returns when the subscription was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether a notification of `notification_type` should reach
    /// this listener. Without a filter every type does.
    #[must_use]
    pub fn is_interested(&self, notification_type: &str) -> bool {
        self.filter
            .as_ref()
            .is_none_or(|filter| filter.is_enabled(notification_type))
    }
}
