//! Attribute-table managed object for collaborators and tests.

use crate::registry::{
    domain::{
        Attribute, AttributeInfo, ManagedObjectInfo, NotificationInfo, OperationInfo, ValueType,
        format_signature,
    },
    ports::{ManagedObject, ManagedObjectFault, ManagedObjectResult},
};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Closure implementing one declared operation.
///
/// Handlers receive the object itself so they can read and store attribute
/// values, plus the already type-checked parameters.
pub type OperationHandler =
    Arc<dyn Fn(&InMemoryManagedObject, &[Value]) -> ManagedObjectResult<Value> + Send + Sync>;

struct Operation {
    name: String,
    signature: Vec<ValueType>,
    handler: OperationHandler,
}

/// Managed object backed by an attribute table and operation closures.
pub struct InMemoryManagedObject {
    info: RwLock<ManagedObjectInfo>,
    values: RwLock<HashMap<String, Value>>,
    operations: Vec<Operation>,
}

impl InMemoryManagedObject {
    /// Starts a builder for the given class name.
    #[must_use]
    pub fn builder(class_name: impl Into<String>) -> InMemoryManagedObjectBuilder {
        InMemoryManagedObjectBuilder {
            info: ManagedObjectInfo::new(class_name),
            values: HashMap::new(),
            operations: Vec::new(),
        }
    }

    /// Reads a stored value.
    ///
    /// # Errors
    ///
    /// Returns [`ManagedObjectFault::Reflection`] when no value is stored
    /// under `name`.
    pub fn value(&self, name: &str) -> ManagedObjectResult<Value> {
        let values = self.values.read().map_err(poisoned)?;
        values
            .get(name)
            .cloned()
            .ok_or_else(|| ManagedObjectFault::Reflection(format!("no attribute '{name}'")))
    }

    /// Stores a value without consulting the metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ManagedObjectFault::Failed`] when the table lock is poisoned.
    pub fn store(&self, name: impl Into<String>, value: impl Into<Value>) -> ManagedObjectResult<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.insert(name.into(), value.into());
        Ok(())
    }

    /// Declares a new attribute after construction.
    ///
    /// Registered snapshots do not see the attribute until the object is
    /// introspected again.
    ///
    /// # Errors
    ///
    /// Returns [`ManagedObjectFault::Failed`] when a lock is poisoned.
    pub fn declare_attribute(
        &self,
        attribute: AttributeInfo,
        initial: impl Into<Value>,
    ) -> ManagedObjectResult<()> {
        let name = attribute.name().to_owned();
        {
            let mut info = self.info.write().map_err(poisoned)?;
            *info = info.clone().with_attribute(attribute);
        }
        self.store(name, initial)
    }
}

impl ManagedObject for InMemoryManagedObject {
    fn describe(&self) -> ManagedObjectResult<ManagedObjectInfo> {
        let info = self.info.read().map_err(poisoned)?;
        Ok(info.clone())
    }

    fn get_attribute(&self, attribute: &str) -> ManagedObjectResult<Value> {
        self.value(attribute)
    }

    fn set_attribute(&self, attribute: &Attribute) -> ManagedObjectResult<()> {
        self.store(attribute.name.clone(), attribute.value.clone())
    }

    fn invoke(
        &self,
        operation: &str,
        params: &[Value],
        signature: &[ValueType],
    ) -> ManagedObjectResult<Value> {
        let handler = self
            .operations
            .iter()
            .find(|candidate| candidate.name == operation && candidate.signature == signature)
            .map(|candidate| Arc::clone(&candidate.handler))
            .ok_or_else(|| {
                ManagedObjectFault::Reflection(format!(
                    "no operation '{operation}{}'",
                    format_signature(signature)
                ))
            })?;
        handler(self, params)
    }
}

impl fmt::Debug for InMemoryManagedObject {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operations: Vec<&str> = self
            .operations
            .iter()
            .map(|operation| operation.name.as_str())
            .collect();
        formatter
            .debug_struct("InMemoryManagedObject")
            .field("info", &self.info)
            .field("values", &self.values)
            .field("operations", &operations)
            .finish()
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> ManagedObjectFault {
    ManagedObjectFault::failed(std::io::Error::other(err.to_string()))
}

/// Builder for [`InMemoryManagedObject`].
pub struct InMemoryManagedObjectBuilder {
    info: ManagedObjectInfo,
    values: HashMap<String, Value>,
    operations: Vec<Operation>,
}

impl InMemoryManagedObjectBuilder {
    /// Sets the object description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.info = self.info.with_description(description);
        self
    }

    /// Declares an attribute with its initial value.
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeInfo, initial: impl Into<Value>) -> Self {
        self.values
            .insert(attribute.name().to_owned(), initial.into());
        self.info = self.info.with_attribute(attribute);
        self
    }

    /// Declares an operation and the closure implementing it.
    #[must_use]
    pub fn operation<F>(mut self, operation: OperationInfo, handler: F) -> Self
    where
        F: Fn(&InMemoryManagedObject, &[Value]) -> ManagedObjectResult<Value>
            + Send
            + Sync
            + 'static,
    {
        self.operations.push(Operation {
            name: operation.name().to_owned(),
            signature: operation.signature(),
            handler: Arc::new(handler),
        });
        self.info = self.info.with_operation(operation);
        self
    }

    /// Declares an emitted notification.
    #[must_use]
    pub fn notification(mut self, notification: NotificationInfo) -> Self {
        self.info = self.info.with_notification(notification);
        self
    }

    /// Finishes the object.
    #[must_use]
    pub fn build(self) -> InMemoryManagedObject {
        InMemoryManagedObject {
            info: RwLock::new(self.info),
            values: RwLock::new(self.values),
            operations: self.operations,
        }
    }
}

impl fmt::Debug for InMemoryManagedObjectBuilder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("InMemoryManagedObjectBuilder")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
