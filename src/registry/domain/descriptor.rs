//! Registry entry binding a concrete name to an object and its metadata.

use super::{DescriptorError, InfoValidationError, ManagedObjectInfo};
use crate::naming::ObjectName;
use crate::registry::ports::ManagedObject;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A registered managed object.
///
/// The metadata snapshot is taken at registration and replaced whenever the
/// object is introspected again. Readers holding an earlier snapshot keep
/// seeing it; there are no live updates between introspections.
pub struct ManagedObjectDescriptor {
    name: ObjectName,
    info: ArcSwap<ManagedObjectInfo>,
    object: Arc<dyn ManagedObject>,
    registered_at: DateTime<Utc>,
}

impl ManagedObjectDescriptor {
    /// Builds an entry from a concrete name, a validated snapshot and the
    /// object accessor.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Name`] when `name` is a pattern and
    /// [`DescriptorError::Info`] when the snapshot fails validation.
    pub fn new(
        name: ObjectName,
        info: ManagedObjectInfo,
        object: Arc<dyn ManagedObject>,
        clock: &impl Clock,
    ) -> Result<Self, DescriptorError> {
        name.ensure_concrete()?;
        info.validate()?;
        Ok(Self {
            name,
            info: ArcSwap::from_pointee(info),
            object,
            registered_at: clock.utc(),
        })
    }

    /// Returns the registration name.
    #[must_use]
    pub const fn name(&self) -> &ObjectName {
        &self.name
    }

    /// Returns the current metadata snapshot.
    #[must_use]
    pub fn info(&self) -> Arc<ManagedObjectInfo> {
        self.info.load_full()
    }

    /// Returns the class name from the current snapshot.
    #[must_use]
    pub fn class_name(&self) -> String {
        self.info.load().class_name().to_owned()
    }

    /// Returns the object accessor.
    #[must_use]
    pub const fn object(&self) -> &Arc<dyn ManagedObject> {
        &self.object
    }

    /// Returns when the entry was created.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Validates and publishes a refreshed snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`InfoValidationError`] and keeps the previous snapshot when
    /// `info` is invalid.
    pub fn refresh_info(
        &self,
        info: ManagedObjectInfo,
    ) -> Result<Arc<ManagedObjectInfo>, InfoValidationError> {
        info.validate()?;
        let refreshed = Arc::new(info);
        self.info.store(Arc::clone(&refreshed));
        Ok(refreshed)
    }

    /// Returns the `(name, class name)` pair for query results.
    #[must_use]
    pub fn instance(&self) -> ObjectInstance {
        ObjectInstance {
            name: self.name.clone(),
            class_name: self.class_name(),
        }
    }
}

impl fmt::Debug for ManagedObjectDescriptor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ManagedObjectDescriptor")
            .field("name", &self.name)
            .field("class_name", &self.class_name())
            .field("registered_at", &self.registered_at)
            .finish_non_exhaustive()
    }
}

/// A registered name together with its implementation class.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectInstance {
    /// Registration name.
    pub name: ObjectName,
    /// Class name from the entry's metadata snapshot.
    pub class_name: String,
}
