//! Structured object names and name patterns.
//!
//! An [`ObjectName`] identifies a managed object by a domain and an ordered
//! list of `key=value` properties, written `domain:key=value,key2=value2`.
//! Names may also be patterns used to select objects:
//!
//! - a domain containing `*` or `?` matches domains by wildcard;
//! - a property value containing an unescaped `*` or `?` matches values by
//!   wildcard;
//! - a trailing `,*` (or a property list of just `*`) opens the property list
//!   so that names carrying additional properties also match.
//!
//! Names are validated eagerly: every syntax violation surfaces as a
//! [`MalformedNameError`] at construction time, so matching never fails.

mod error;
mod name;
mod parser;
mod wildcard;

#[cfg(test)]
mod tests;

pub use error::MalformedNameError;
pub use name::{ObjectName, ObjectNameBuilder};
pub(crate) use parser::validate_domain;
pub use wildcard::{Wildcard, WildcardError, WildcardSyntax};
