//! Fault taxonomy returned across the management boundary.
//!
//! Every facade operation fails with exactly one [`ManagementError`]
//! variant. Transports map [`ManagementError::kind`] to their own wire codes.

use crate::listener::{domain::SubscriptionId, ports::ListenerRegistryError};
use crate::naming::{MalformedNameError, ObjectName};
use crate::registry::{
    domain::ValueRejection,
    ports::{ManagedObjectFault, RegistryError},
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for facade operations.
pub type ManagementResult<T> = Result<T, ManagementError>;

/// Why an attribute could not be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeAccess {
    /// The object does not declare the attribute.
    Undeclared,
    /// The attribute is declared write-only.
    NotReadable,
    /// The attribute is declared read-only.
    NotWritable,
}

impl AttributeAccess {
    /// Returns a short description.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undeclared => "not declared",
            Self::NotReadable => "not readable",
            Self::NotWritable => "not writable",
        }
    }
}

impl fmt::Display for AttributeAccess {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Faults surfaced by the management facade.
#[derive(Debug, Clone, Error)]
pub enum ManagementError {
    /// A name or pattern is syntactically invalid, or a pattern was given
    /// where a concrete name is required.
    #[error(transparent)]
    MalformedName(#[from] MalformedNameError),

    /// No object is registered under the name.
    #[error("no object is registered as {0}")]
    InstanceNotFound(ObjectName),

    /// An object is already registered under the name.
    #[error("an object is already registered as {0}")]
    DuplicateName(ObjectName),

    /// The attribute is undeclared or not accessible in the requested way.
    #[error("attribute '{attribute}' of {name} is {reason}")]
    AttributeNotFound {
        /// Object name.
        name: ObjectName,
        /// Attribute name.
        attribute: String,
        /// Why it could not be reached.
        reason: AttributeAccess,
    },

    /// A written value failed the declared type or constraints.
    #[error("invalid value for attribute '{attribute}' of {name}: {reason}")]
    InvalidAttributeValue {
        /// Object name.
        name: ObjectName,
        /// Attribute name.
        attribute: String,
        /// Rejected check.
        reason: ValueRejection,
    },

    /// Metadata could not be derived or failed validation.
    #[error("cannot introspect {name}: {reason}")]
    Introspection {
        /// Object name.
        name: ObjectName,
        /// Failure description.
        reason: String,
    },

    /// The call could not be dispatched: unknown operation or signature,
    /// parameter mismatch, nonconforming result or a reflective fault.
    #[error("reflective call on {name} failed: {reason}")]
    Reflection {
        /// Object name.
        name: ObjectName,
        /// Failure description.
        reason: String,
    },

    /// The managed object's own logic failed.
    #[error("managed object {name} failed: {source}")]
    ManagedObject {
        /// Object name.
        name: ObjectName,
        /// Original failure.
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The subscription is not recorded for the name.
    #[error("no listener subscription {subscription} on {name}")]
    ListenerNotFound {
        /// Object name.
        name: ObjectName,
        /// Subscription identifier.
        subscription: SubscriptionId,
    },
}

impl ManagementError {
    /// Returns the fault kind.
    #[must_use]
    pub const fn kind(&self) -> FaultKind {
        match self {
            Self::MalformedName(_) => FaultKind::MalformedName,
            Self::InstanceNotFound(_) => FaultKind::InstanceNotFound,
            Self::DuplicateName(_) => FaultKind::DuplicateName,
            Self::AttributeNotFound { .. } => FaultKind::AttributeNotFound,
            Self::InvalidAttributeValue { .. } => FaultKind::InvalidAttributeValue,
            Self::Introspection { .. } => FaultKind::Introspection,
            Self::Reflection { .. } => FaultKind::Reflection,
            Self::ManagedObject { .. } => FaultKind::ManagedObject,
            Self::ListenerNotFound { .. } => FaultKind::ListenerNotFound,
        }
    }

    /// Maps a fault raised while reading, writing or invoking on the object
    /// registered as `name`. Metadata faults count as reflection failures.
    pub(crate) fn from_fault(name: &ObjectName, fault: ManagedObjectFault) -> Self {
        match fault {
            ManagedObjectFault::Introspection(reason) | ManagedObjectFault::Reflection(reason) => {
                Self::Reflection {
                    name: name.clone(),
                    reason,
                }
            }
            ManagedObjectFault::Failed(source) => {
                tracing::warn!(name = %name, error = %source, "managed object fault");
                Self::ManagedObject {
                    name: name.clone(),
                    source,
                }
            }
        }
    }

    /// Maps a fault raised while the object registered as `name` describes
    /// itself. Domain failures count as introspection failures here.
    pub(crate) fn from_describe_fault(name: &ObjectName, fault: ManagedObjectFault) -> Self {
        match fault {
            ManagedObjectFault::Reflection(reason) => Self::Reflection {
                name: name.clone(),
                reason,
            },
            ManagedObjectFault::Introspection(reason) => Self::Introspection {
                name: name.clone(),
                reason,
            },
            ManagedObjectFault::Failed(source) => Self::Introspection {
                name: name.clone(),
                reason: source.to_string(),
            },
        }
    }
}

impl From<RegistryError> for ManagementError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::DuplicateName(name) => Self::DuplicateName(name),
            RegistryError::InstanceNotFound(name) => Self::InstanceNotFound(name),
        }
    }
}

impl From<ListenerRegistryError> for ManagementError {
    fn from(err: ListenerRegistryError) -> Self {
        match err {
            ListenerRegistryError::NotFound { name, id } => Self::ListenerNotFound {
                name,
                subscription: id,
            },
        }
    }
}

/// Discriminant of a [`ManagementError`] with a stable wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// See [`ManagementError::MalformedName`].
    MalformedName,
    /// See [`ManagementError::InstanceNotFound`].
    InstanceNotFound,
    /// See [`ManagementError::DuplicateName`].
    DuplicateName,
    /// See [`ManagementError::AttributeNotFound`].
    AttributeNotFound,
    /// See [`ManagementError::InvalidAttributeValue`].
    InvalidAttributeValue,
    /// See [`ManagementError::Introspection`].
    Introspection,
    /// See [`ManagementError::Reflection`].
    Reflection,
    /// See [`ManagementError::ManagedObject`].
    ManagedObject,
    /// See [`ManagementError::ListenerNotFound`].
    ListenerNotFound,
}

impl FaultKind {
    /// Returns the stable wire code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedName => "malformed_name",
            Self::InstanceNotFound => "instance_not_found",
            Self::DuplicateName => "duplicate_name",
            Self::AttributeNotFound => "attribute_not_found",
            Self::InvalidAttributeValue => "invalid_attribute_value",
            Self::Introspection => "introspection",
            Self::Reflection => "reflection",
            Self::ManagedObject => "managed_object",
            Self::ListenerNotFound => "listener_not_found",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
