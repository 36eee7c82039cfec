//! Metadata snapshots describing what a managed object exposes.

use super::{InfoValidationError, ValueRejection, ValueType, format_signature};
use crate::query::compare_values;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Declared attribute of a managed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeInfo {
    name: String,
    value_type: ValueType,
    #[serde(default)]
    description: String,
    readable: bool,
    writable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    legal_values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_value: Option<Value>,
}

impl AttributeInfo {
    /// Declares a read-only attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            description: String::new(),
            readable: true,
            writable: false,
            legal_values: Vec::new(),
            min_value: None,
            max_value: None,
        }
    }

    /// Makes the attribute writable as well as readable.
    #[must_use]
    pub const fn writable(mut self) -> Self {
        self.writable = true;
        self
    }

    /// Makes the attribute writable but not readable.
    #[must_use]
    pub const fn write_only(mut self) -> Self {
        self.readable = false;
        self.writable = true;
        self
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Restricts written values to the given set.
    #[must_use]
    pub fn with_legal_values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.legal_values = values.into_iter().collect();
        self
    }

    /// Sets an inclusive lower bound.
    #[must_use]
    pub fn with_min_value(mut self, value: impl Into<Value>) -> Self {
        self.min_value = Some(value.into());
        self
    }

    /// Sets an inclusive upper bound.
    #[must_use]
    pub fn with_max_value(mut self, value: impl Into<Value>) -> Self {
        self.max_value = Some(value.into());
        self
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the attribute can be read.
    #[must_use]
    pub const fn is_readable(&self) -> bool {
        self.readable
    }

    /// Returns whether the attribute can be written.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        self.writable
    }

    /// Returns the legal values; empty means unrestricted.
    #[must_use]
    pub fn legal_values(&self) -> &[Value] {
        &self.legal_values
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub const fn min_value(&self) -> Option<&Value> {
        self.min_value.as_ref()
    }

    /// Returns the inclusive upper bound.
    #[must_use]
    pub const fn max_value(&self) -> Option<&Value> {
        self.max_value.as_ref()
    }

    /// Checks a candidate value against the type and constraints.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValueRejection`] that applies.
    pub fn check_value(&self, value: &Value) -> Result<(), ValueRejection> {
        if !self.value_type.accepts(value) {
            return Err(ValueRejection::TypeMismatch {
                expected: self.value_type,
            });
        }
        if !self.legal_values.is_empty()
            && !self.legal_values.iter().any(|legal| {
                legal == value || compare_values(legal, value) == Some(Ordering::Equal)
            })
        {
            return Err(ValueRejection::NotLegal);
        }
        if let Some(min) = &self.min_value
            && matches!(compare_values(value, min), Some(Ordering::Less) | None)
        {
            return Err(ValueRejection::BelowMinimum(min.to_string()));
        }
        if let Some(max) = &self.max_value
            && matches!(compare_values(value, max), Some(Ordering::Greater) | None)
        {
            return Err(ValueRejection::AboveMaximum(max.to_string()));
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), InfoValidationError> {
        if self.name.trim().is_empty() {
            return Err(InfoValidationError::EmptyAttributeName);
        }
        if self.value_type == ValueType::Void {
            return Err(InfoValidationError::VoidAttribute(self.name.clone()));
        }
        if !self.readable && !self.writable {
            return Err(InfoValidationError::InaccessibleAttribute(self.name.clone()));
        }

        let constraints = self
            .legal_values
            .iter()
            .chain(self.min_value.iter())
            .chain(self.max_value.iter());
        for constraint in constraints {
            if !self.value_type.accepts(constraint) {
                return Err(InfoValidationError::ConstraintType {
                    attribute: self.name.clone(),
                    value_type: self.value_type,
                });
            }
        }

        let orderable = |bound: &Value| {
            matches!(bound, Value::Number(_) | Value::String(_) | Value::Bool(_))
        };
        if !self.min_value.iter().chain(self.max_value.iter()).all(orderable) {
            return Err(InfoValidationError::InvalidRange(self.name.clone()));
        }
        if let (Some(min), Some(max)) = (&self.min_value, &self.max_value)
            && compare_values(min, max) == Some(Ordering::Greater)
        {
            return Err(InfoValidationError::InvalidRange(self.name.clone()));
        }
        Ok(())
    }
}

/// Declared parameter of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    name: String,
    value_type: ValueType,
    #[serde(default)]
    description: String,
}

impl ParameterInfo {
    /// Declares a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            description: String::new(),
        }
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Effect an operation has on the managed object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    /// Returns information without changing state.
    Info,
    /// Changes state without returning information.
    Action,
    /// Changes state and returns information.
    ActionInfo,
    /// Not declared.
    #[default]
    Unknown,
}

/// Declared operation of a managed object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationInfo {
    name: String,
    #[serde(default)]
    parameters: Vec<ParameterInfo>,
    return_type: ValueType,
    #[serde(default)]
    description: String,
    #[serde(default)]
    impact: Impact,
}

impl OperationInfo {
    /// Declares an operation with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: ValueType) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type,
            description: String::new(),
            impact: Impact::Unknown,
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterInfo) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the declared impact.
    #[must_use]
    pub const fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self
    }

    /// Returns the operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared parameters.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    /// Returns the parameter types in order.
    #[must_use]
    pub fn signature(&self) -> Vec<ValueType> {
        self.parameters.iter().map(ParameterInfo::value_type).collect()
    }

    /// Returns the declared return type.
    #[must_use]
    pub const fn return_type(&self) -> ValueType {
        self.return_type
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the declared impact.
    #[must_use]
    pub const fn impact(&self) -> Impact {
        self.impact
    }

    /// Returns whether this operation is `name` with exactly `signature`.
    #[must_use]
    pub fn matches(&self, name: &str, signature: &[ValueType]) -> bool {
        self.name == name
            && self.parameters.len() == signature.len()
            && self
                .parameters
                .iter()
                .zip(signature)
                .all(|(parameter, value_type)| parameter.value_type == *value_type)
    }
}

/// Declared notification emitted by a managed object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationInfo {
    name: String,
    notification_types: Vec<String>,
    #[serde(default)]
    description: String,
}

impl NotificationInfo {
    /// Declares a notification class emitting the given types.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        notification_types: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            notification_types: notification_types.into_iter().map(Into::into).collect(),
            description: String::new(),
        }
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the notification class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the emitted notification types.
    #[must_use]
    pub fn notification_types(&self) -> &[String] {
        &self.notification_types
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Metadata snapshot of one managed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedObjectInfo {
    class_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    attributes: Vec<AttributeInfo>,
    #[serde(default)]
    operations: Vec<OperationInfo>,
    #[serde(default)]
    notifications: Vec<NotificationInfo>,
}

impl ManagedObjectInfo {
    /// Starts an empty snapshot for the given class.
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            description: String::new(),
            attributes: Vec::new(),
            operations: Vec::new(),
            notifications: Vec::new(),
        }
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends an attribute declaration.
    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeInfo) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Appends an operation declaration.
    #[must_use]
    pub fn with_operation(mut self, operation: OperationInfo) -> Self {
        self.operations.push(operation);
        self
    }

    /// Appends a notification declaration.
    #[must_use]
    pub fn with_notification(mut self, notification: NotificationInfo) -> Self {
        self.notifications.push(notification);
        self
    }

    /// Returns the implementation class name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the declared attributes.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeInfo] {
        &self.attributes
    }

    /// Returns the declared operations.
    #[must_use]
    pub fn operations(&self) -> &[OperationInfo] {
        &self.operations
    }

    /// Returns the declared notifications.
    #[must_use]
    pub fn notifications(&self) -> &[NotificationInfo] {
        &self.notifications
    }

    /// Finds an attribute declaration by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    /// Finds an operation declaration by name and parameter signature.
    #[must_use]
    pub fn operation(&self, name: &str, signature: &[ValueType]) -> Option<&OperationInfo> {
        self.operations
            .iter()
            .find(|operation| operation.matches(name, signature))
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`InfoValidationError`] for empty or duplicate names, `void`
    /// attribute or parameter types, and constraints that do not fit their
    /// attribute.
    pub fn validate(&self) -> Result<(), InfoValidationError> {
        if self.class_name.trim().is_empty() {
            return Err(InfoValidationError::EmptyClassName);
        }

        let mut attribute_names = HashSet::new();
        for attribute in &self.attributes {
            attribute.validate()?;
            if !attribute_names.insert(attribute.name.as_str()) {
                return Err(InfoValidationError::DuplicateAttribute(
                    attribute.name.clone(),
                ));
            }
        }

        let mut signatures = HashSet::new();
        for operation in &self.operations {
            if operation.name.trim().is_empty() {
                return Err(InfoValidationError::EmptyOperationName);
            }
            if let Some(parameter) = operation
                .parameters
                .iter()
                .find(|parameter| parameter.value_type == ValueType::Void)
            {
                return Err(InfoValidationError::VoidParameter {
                    operation: operation.name.clone(),
                    parameter: parameter.name.clone(),
                });
            }
            let signature = operation.signature();
            if !signatures.insert((operation.name.as_str(), signature.clone())) {
                return Err(InfoValidationError::DuplicateOperation {
                    name: operation.name.clone(),
                    signature: format_signature(&signature),
                });
            }
        }
        Ok(())
    }
}
