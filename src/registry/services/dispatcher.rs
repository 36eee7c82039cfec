//! Attribute and operation dispatch against registered objects.

use crate::error::{AttributeAccess, ManagementError, ManagementResult};
use crate::naming::ObjectName;
use crate::registry::{
    domain::{Attribute, AttributeList, ManagedObjectDescriptor, ValueType, format_signature},
    ports::ObjectRegistry,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Routes attribute reads, writes and operation calls to managed objects.
///
/// Every request is checked against the entry's current metadata snapshot
/// before the object is touched, so an undeclared attribute or a mistyped
/// value never reaches the object.
pub struct Dispatcher<R>
where
    R: ObjectRegistry,
{
    registry: Arc<R>,
}

impl<R> Dispatcher<R>
where
    R: ObjectRegistry,
{
    /// Creates a dispatcher over `registry`.
    #[must_use]
    pub const fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }

    /// Reads one attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementError::InstanceNotFound`] for an unbound name,
    /// [`ManagementError::AttributeNotFound`] when the attribute is
    /// undeclared or write-only, and the mapped object fault otherwise.
    pub fn get_attribute(&self, name: &ObjectName, attribute: &str) -> ManagementResult<Value> {
        let descriptor = self.registry.lookup(name)?;
        read_attribute(&descriptor, attribute)
    }

    /// Reads several attributes, best effort.
    ///
    /// The result keeps request order and omits every attribute that could
    /// not be read.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementError::InstanceNotFound`] for an unbound name.
    pub fn get_attributes<S>(
        &self,
        name: &ObjectName,
        attributes: &[S],
    ) -> ManagementResult<AttributeList>
    where
        S: AsRef<str>,
    {
        let descriptor = self.registry.lookup(name)?;
        let mut values = AttributeList::new();
        for attribute in attributes.iter().map(AsRef::as_ref) {
            match read_attribute(&descriptor, attribute) {
                Ok(value) => values.push(Attribute::new(attribute, value)),
                Err(err) => debug!(name = %name, attribute, error = %err, "skipping attribute"),
            }
        }
        Ok(values)
    }

    /// Writes one attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementError::InstanceNotFound`] for an unbound name,
    /// [`ManagementError::AttributeNotFound`] when the attribute is
    /// undeclared or read-only, [`ManagementError::InvalidAttributeValue`]
    /// when the value fails the declared type or constraints, and the mapped
    /// object fault otherwise.
    pub fn set_attribute(&self, name: &ObjectName, attribute: &Attribute) -> ManagementResult<()> {
        let descriptor = self.registry.lookup(name)?;
        write_attribute(&descriptor, attribute)
    }

    /// Writes several attributes, best effort.
    ///
    /// Returns the pairs that were applied, in request order.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementError::InstanceNotFound`] for an unbound name.
    pub fn set_attributes(
        &self,
        name: &ObjectName,
        attributes: AttributeList,
    ) -> ManagementResult<AttributeList> {
        let descriptor = self.registry.lookup(name)?;
        let mut applied = AttributeList::new();
        for attribute in attributes {
            match write_attribute(&descriptor, &attribute) {
                Ok(()) => applied.push(attribute),
                Err(err) => debug!(
                    name = %name,
                    attribute = %attribute.name,
                    error = %err,
                    "attribute not applied"
                ),
            }
        }
        Ok(applied)
    }

    /// Invokes the operation declared as `operation` with `signature`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementError::InstanceNotFound`] for an unbound name,
    /// [`ManagementError::Reflection`] when no operation matches, the
    /// parameters disagree with the signature or the result does not conform
    /// to the declared return type, and [`ManagementError::ManagedObject`]
    /// when the operation itself fails.
    pub fn invoke(
        &self,
        name: &ObjectName,
        operation: &str,
        params: &[Value],
        signature: &[ValueType],
    ) -> ManagementResult<Value> {
        let descriptor = self.registry.lookup(name)?;
        let info = descriptor.info();
        let declared = info.operation(operation, signature).ok_or_else(|| {
            reflection(
                name,
                format!(
                    "no operation '{operation}{}'",
                    format_signature(signature)
                ),
            )
        })?;

        if params.len() != signature.len() {
            return Err(reflection(
                name,
                format!(
                    "operation '{operation}' expects {} parameters, got {}",
                    signature.len(),
                    params.len()
                ),
            ));
        }
        if let Some((position, (expected, _))) = signature
            .iter()
            .zip(params)
            .enumerate()
            .find(|(_, (expected, param))| !expected.accepts(param))
        {
            return Err(reflection(
                name,
                format!("parameter {position} of '{operation}' is not of type {expected}"),
            ));
        }

        let result = descriptor
            .object()
            .invoke(operation, params, signature)
            .map_err(|fault| ManagementError::from_fault(name, fault))?;

        let return_type = declared.return_type();
        if !return_type.accepts(&result) {
            return Err(reflection(
                name,
                format!("operation '{operation}' returned a value not of type {return_type}"),
            ));
        }
        Ok(result)
    }
}

impl<R> Clone for Dispatcher<R>
where
    R: ObjectRegistry,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

/// Reads `attribute` from an entry after checking it is declared readable.
pub(crate) fn read_attribute(
    descriptor: &ManagedObjectDescriptor,
    attribute: &str,
) -> ManagementResult<Value> {
    let name = descriptor.name();
    let info = descriptor.info();
    let declared = info
        .attribute(attribute)
        .ok_or_else(|| not_found(name, attribute, AttributeAccess::Undeclared))?;
    if !declared.is_readable() {
        return Err(not_found(name, attribute, AttributeAccess::NotReadable));
    }
    descriptor
        .object()
        .get_attribute(attribute)
        .map_err(|fault| ManagementError::from_fault(name, fault))
}

fn write_attribute(
    descriptor: &ManagedObjectDescriptor,
    attribute: &Attribute,
) -> ManagementResult<()> {
    let name = descriptor.name();
    let info = descriptor.info();
    let declared = info
        .attribute(&attribute.name)
        .ok_or_else(|| not_found(name, &attribute.name, AttributeAccess::Undeclared))?;
    if !declared.is_writable() {
        return Err(not_found(name, &attribute.name, AttributeAccess::NotWritable));
    }
    declared
        .check_value(&attribute.value)
        .map_err(|reason| ManagementError::InvalidAttributeValue {
            name: name.clone(),
            attribute: attribute.name.clone(),
            reason,
        })?;
    descriptor
        .object()
        .set_attribute(attribute)
        .map_err(|fault| ManagementError::from_fault(name, fault))
}

fn not_found(name: &ObjectName, attribute: &str, reason: AttributeAccess) -> ManagementError {
    ManagementError::AttributeNotFound {
        name: name.clone(),
        attribute: attribute.to_owned(),
        reason,
    }
}

fn reflection(name: &ObjectName, reason: String) -> ManagementError {
    ManagementError::Reflection {
        name: name.clone(),
        reason,
    }
}
