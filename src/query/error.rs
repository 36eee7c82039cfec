//! Error types for query parsing and evaluation.

use crate::naming::WildcardError;
use thiserror::Error;

/// Errors raised while building, parsing or evaluating a query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The query text could not be parsed.
    #[error("query syntax error at offset {offset}: {message}")]
    Syntax {
        /// Byte offset of the offending token.
        offset: usize,
        /// Description of what was expected.
        message: String,
    },

    /// A string-match pattern is not a valid wildcard.
    #[error("invalid match pattern: {0}")]
    InvalidPattern(#[from] WildcardError),

    /// An attribute could not be read from the candidate object.
    #[error("attribute '{attribute}' is unavailable: {reason}")]
    AttributeUnavailable {
        /// Attribute name.
        attribute: String,
        /// Read failure description.
        reason: String,
    },

    /// Two values of different kinds were ordered against each other.
    #[error("cannot order a {left} value against a {right} value")]
    Incomparable {
        /// Kind of the left operand.
        left: &'static str,
        /// Kind of the right operand.
        right: &'static str,
    },

    /// An arithmetic operator was applied to unsupported operands.
    #[error("operator '{operator}' cannot combine {left} and {right} values")]
    InvalidOperands {
        /// Operator symbol.
        operator: &'static str,
        /// Kind of the left operand.
        left: &'static str,
        /// Kind of the right operand.
        right: &'static str,
    },

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Integer arithmetic overflowed or a float result was not finite.
    #[error("arithmetic overflow in '{0}'")]
    Overflow(&'static str),

    /// A string operation was applied to a non-string attribute.
    #[error("attribute '{attribute}' holds a {kind} value, not a string")]
    NotAString {
        /// Attribute name.
        attribute: String,
        /// Kind of the value found.
        kind: &'static str,
    },
}
