//! Accessor port implemented by every managed object.

use crate::registry::domain::{Attribute, ManagedObjectInfo, ValueType};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for managed-object calls.
pub type ManagedObjectResult<T> = Result<T, ManagedObjectFault>;

/// Uniform access to one managed object.
///
/// The dispatcher validates names, access flags, types and signatures
/// against the registered metadata before calling into the object, so
/// implementations only see requests their metadata allows.
pub trait ManagedObject: Send + Sync {
    /// Derives the current metadata snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ManagedObjectFault::Introspection`] when metadata cannot be
    /// derived.
    fn describe(&self) -> ManagedObjectResult<ManagedObjectInfo>;

    /// Reads an attribute.
    ///
    /// # Errors
    ///
    /// Returns a [`ManagedObjectFault`] when the read fails.
    fn get_attribute(&self, attribute: &str) -> ManagedObjectResult<Value>;

    /// Writes an attribute.
    ///
    /// # Errors
    ///
    /// Returns a [`ManagedObjectFault`] when the write fails.
    fn set_attribute(&self, attribute: &Attribute) -> ManagedObjectResult<()>;

    /// Invokes the operation identified by `operation` and `signature`.
    ///
    /// # Errors
    ///
    /// Returns a [`ManagedObjectFault`] when the operation fails.
    fn invoke(
        &self,
        operation: &str,
        params: &[Value],
        signature: &[ValueType],
    ) -> ManagedObjectResult<Value>;
}

/// Faults reported by a managed object.
#[derive(Debug, Clone, Error)]
pub enum ManagedObjectFault {
    /// Metadata could not be derived.
    #[error("metadata cannot be derived: {0}")]
    Introspection(String),

    /// The reflective call itself failed, independent of domain logic.
    #[error("reflective access failed: {0}")]
    Reflection(String),

    /// The object's own logic failed.
    #[error("managed object failed: {0}")]
    Failed(Arc<dyn std::error::Error + Send + Sync>),
}

impl ManagedObjectFault {
    /// Wraps a domain failure raised by the object.
    pub fn failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failed(Arc::new(err))
    }
}
