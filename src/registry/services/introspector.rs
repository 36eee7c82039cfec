//! Metadata introspection for registered objects.

use crate::error::{ManagementError, ManagementResult};
use crate::naming::ObjectName;
use crate::registry::{domain::ManagedObjectInfo, ports::ObjectRegistry};
use std::sync::Arc;
use tracing::debug;

/// Answers `describe` requests.
///
/// With refresh enabled the object is asked for fresh metadata on every
/// call and the entry's snapshot is replaced once the new metadata
/// validates. Without it the registration-time snapshot is returned.
pub struct Introspector<R>
where
    R: ObjectRegistry,
{
    registry: Arc<R>,
    refresh: bool,
}

impl<R> Introspector<R>
where
    R: ObjectRegistry,
{
    /// Creates an introspector over `registry`.
    #[must_use]
    pub const fn new(registry: Arc<R>, refresh: bool) -> Self {
        Self { registry, refresh }
    }

    /// Returns whether `describe` re-reads metadata from the object.
    #[must_use]
    pub const fn refreshes(&self) -> bool {
        self.refresh
    }

    /// Describes the object registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementError::InstanceNotFound`] for an unbound name,
    /// [`ManagementError::Introspection`] when the object cannot produce
    /// valid metadata and [`ManagementError::Reflection`] when the object
    /// reports a reflective fault.
    pub fn describe(&self, name: &ObjectName) -> ManagementResult<Arc<ManagedObjectInfo>> {
        let descriptor = self.registry.lookup(name)?;
        if !self.refresh {
            return Ok(descriptor.info());
        }

        let info = descriptor
            .object()
            .describe()
            .map_err(|fault| ManagementError::from_describe_fault(name, fault))?;

        let refreshed = descriptor
            .refresh_info(info)
            .map_err(|err| ManagementError::Introspection {
                name: name.clone(),
                reason: err.to_string(),
            })?;
        debug!(name = %name, class = refreshed.class_name(), "refreshed metadata");
        Ok(refreshed)
    }
}

impl<R> Clone for Introspector<R>
where
    R: ObjectRegistry,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            refresh: self.refresh,
        }
    }
}
