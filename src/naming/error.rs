//! Error types for object name parsing and validation.

use thiserror::Error;

/// Errors returned while constructing an [`super::ObjectName`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedNameError {
    /// The name has no `:` separating the domain from the properties.
    #[error("object name '{0}' is missing the ':' domain separator")]
    MissingDomainSeparator(String),

    /// A concrete name was given an empty domain.
    #[error("object name '{0}' has an empty domain")]
    EmptyDomain(String),

    /// The domain contains a character that is never allowed.
    #[error("domain '{domain}' contains the reserved character {character:?}")]
    InvalidDomain {
        /// Offending domain text.
        domain: String,
        /// Reserved character found.
        character: char,
    },

    /// The name carries no key properties.
    #[error("object name '{0}' must declare at least one key property")]
    MissingProperties(String),

    /// A property is not of the form `key=value`.
    #[error("property '{0}' is not of the form key=value")]
    MissingEquals(String),

    /// A property key is empty.
    #[error("object name '{0}' contains an empty property key")]
    EmptyKey(String),

    /// A property key contains a reserved character.
    #[error("property key '{key}' contains the reserved character {character:?}")]
    InvalidKey {
        /// Offending key.
        key: String,
        /// Reserved character found.
        character: char,
    },

    /// An unquoted property value contains a reserved character.
    #[error("value of property '{key}' contains the reserved character {character:?}")]
    InvalidValue {
        /// Key whose value is invalid.
        key: String,
        /// Reserved character found.
        character: char,
    },

    /// A property value is empty.
    #[error("property '{0}' has an empty value")]
    EmptyValue(String),

    /// The same key appears more than once.
    #[error("property key '{0}' is declared more than once")]
    DuplicateKey(String),

    /// A quoted value is missing its closing quote.
    #[error("quoted value of property '{0}' is not terminated")]
    UnterminatedQuote(String),

    /// A quoted value contains an unsupported escape sequence.
    #[error("quoted value of property '{key}' contains the invalid escape '\\{escape}'")]
    InvalidEscape {
        /// Key whose value is invalid.
        key: String,
        /// Character following the backslash.
        escape: char,
    },

    /// Characters follow the closing quote of a quoted value.
    #[error("quoted value of property '{0}' is followed by unexpected characters")]
    TrailingCharacters(String),

    /// A wildcard could not be compiled into a matcher.
    #[error("wildcard '{fragment}' is invalid: {reason}")]
    InvalidWildcard {
        /// Wildcard source text.
        fragment: String,
        /// Compilation failure reason.
        reason: String,
    },

    /// A pattern was supplied where a concrete name is required.
    #[error("object name '{0}' is a pattern; a concrete name is required")]
    PatternNotAllowed(String),
}
