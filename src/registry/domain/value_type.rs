//! Declared value types for attributes, parameters and return values.

use super::ParseValueTypeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// JSON-level type declared for an attribute, parameter or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// `true` or `false`.
    Boolean,
    /// A number without a fractional part.
    Integer,
    /// Any number.
    Float,
    /// A string.
    String,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
    /// Any value, `null` included.
    Any,
    /// No value; only valid as an operation return type.
    Void,
}

impl ValueType {
    /// Returns the canonical lowercase spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
            Self::Void => "void",
        }
    }

    /// Returns whether `value` conforms to this type.
    ///
    /// `null` conforms only to [`ValueType::Any`] and [`ValueType::Void`].
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _)
            | (Self::Void, Value::Null)
            | (Self::Boolean, Value::Bool(_))
            | (Self::Float, Value::Number(_))
            | (Self::String, Value::String(_))
            | (Self::Array, Value::Array(_))
            | (Self::Object, Value::Object(_)) => true,
            (Self::Integer, Value::Number(number)) => number.is_i64() || number.is_u64(),
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ValueType {
    type Error = ParseValueTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "boolean" => Ok(Self::Boolean),
            "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "string" => Ok(Self::String),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            "any" => Ok(Self::Any),
            "void" => Ok(Self::Void),
            _ => Err(ParseValueTypeError(value.to_owned())),
        }
    }
}

impl std::str::FromStr for ValueType {
    type Err = ParseValueTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value)
    }
}

/// Formats a signature as `(integer, string)`.
pub(crate) fn format_signature(signature: &[ValueType]) -> String {
    let parts: Vec<&str> = signature.iter().map(|value_type| value_type.as_str()).collect();
    format!("({})", parts.join(", "))
}
