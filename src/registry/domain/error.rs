//! Error types for managed-object metadata validation.

use super::ValueType;
use crate::naming::MalformedNameError;
use thiserror::Error;

/// Reasons a [`ManagedObjectInfo`](super::ManagedObjectInfo) snapshot is
/// rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InfoValidationError {
    /// The class name is empty after trimming.
    #[error("managed object class name must not be empty")]
    EmptyClassName,

    /// An attribute has an empty name.
    #[error("attribute name must not be empty")]
    EmptyAttributeName,

    /// Two attributes share a name.
    #[error("attribute '{0}' is declared more than once")]
    DuplicateAttribute(String),

    /// An attribute is declared with the `void` type.
    #[error("attribute '{0}' cannot have type void")]
    VoidAttribute(String),

    /// An attribute is neither readable nor writable.
    #[error("attribute '{0}' is neither readable nor writable")]
    InaccessibleAttribute(String),

    /// A constraint value does not conform to the attribute type.
    #[error("constraint on attribute '{attribute}' does not conform to type {value_type}")]
    ConstraintType {
        /// Attribute name.
        attribute: String,
        /// Declared attribute type.
        value_type: ValueType,
    },

    /// The minimum bound is greater than the maximum bound, or the bounds
    /// cannot be ordered.
    #[error("attribute '{0}' has an invalid range")]
    InvalidRange(String),

    /// An operation has an empty name.
    #[error("operation name must not be empty")]
    EmptyOperationName,

    /// Two operations share a name and parameter signature.
    #[error("operation '{name}{signature}' is declared more than once")]
    DuplicateOperation {
        /// Operation name.
        name: String,
        /// Formatted parameter signature.
        signature: String,
    },

    /// A parameter is declared with the `void` type.
    #[error("parameter '{parameter}' of operation '{operation}' cannot have type void")]
    VoidParameter {
        /// Operation name.
        operation: String,
        /// Parameter name.
        parameter: String,
    },
}

/// Errors raised while building a registry entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescriptorError {
    /// The name is a pattern and cannot key an entry.
    #[error(transparent)]
    Name(#[from] MalformedNameError),

    /// The metadata snapshot is invalid.
    #[error(transparent)]
    Info(#[from] InfoValidationError),
}

/// Why a value was refused for an attribute.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueRejection {
    /// The value does not conform to the declared type.
    #[error("expected a value of type {expected}")]
    TypeMismatch {
        /// Declared type.
        expected: ValueType,
    },

    /// The value is not one of the declared legal values.
    #[error("value is not one of the legal values")]
    NotLegal,

    /// The value is below the declared minimum.
    #[error("value is below the minimum {0}")]
    BelowMinimum(String),

    /// The value is above the declared maximum.
    #[error("value is above the maximum {0}")]
    AboveMaximum(String),
}

/// Error returned while parsing a [`ValueType`] from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown value type: {0}")]
pub struct ParseValueTypeError(pub String);
