//! Notification-type filter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Selects notifications by type prefix.
///
/// A type is enabled when it starts with any enabled prefix. A new filter
/// enables nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFilter {
    enabled_types: BTreeSet<String>,
}

impl NotificationFilter {
    /// Creates a filter that enables nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled_types: BTreeSet::new(),
        }
    }

    /// Creates a filter enabling the given prefixes.
    #[must_use]
    pub fn enabling(prefixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            enabled_types: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Enables every type starting with `prefix`.
    pub fn enable_type(&mut self, prefix: impl Into<String>) {
        self.enabled_types.insert(prefix.into());
    }

    /// Removes `prefix` from the enabled set.
    pub fn disable_type(&mut self, prefix: &str) {
        self.enabled_types.remove(prefix);
    }

    /// Removes every enabled prefix.
    pub fn disable_all_types(&mut self) {
        self.enabled_types.clear();
    }

    /// Returns the enabled prefixes.
    #[must_use]
    pub const fn enabled_types(&self) -> &BTreeSet<String> {
        &self.enabled_types
    }

    /// Returns whether notifications of `notification_type` pass.
    #[must_use]
    pub fn is_enabled(&self, notification_type: &str) -> bool {
        self.enabled_types
            .iter()
            .any(|prefix| notification_type.starts_with(prefix.as_str()))
    }
}
