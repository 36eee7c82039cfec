//! Query expressions evaluated against managed-object attributes.
//!
//! A [`QueryExpr`] is a pure boolean predicate tree. It reads attribute values
//! through an [`AttributeSource`] and never mutates the object it inspects,
//! so evaluating the same expression against the same state always yields
//! the same answer.
//!
//! Expressions can be assembled with the constructor API or parsed from a
//! compact text syntax:
//!
//! ```
//! use palladio::query::{CompareOp, QueryExpr, ValueExpr};
//!
//! let parsed = QueryExpr::parse("Count > 3 and State like 'run*'")?;
//! let built = QueryExpr::compare(
//!     ValueExpr::attribute("Count"),
//!     CompareOp::Gt,
//!     ValueExpr::constant(3),
//! )
//! .and(QueryExpr::matches("State", "run*")?);
//!
//! assert_eq!(parsed, built);
//! # Ok::<(), palladio::query::QueryError>(())
//! ```

mod error;
mod eval;
mod expr;
mod parser;

#[cfg(test)]
mod tests;

pub use error::QueryError;
pub use eval::AttributeSource;
pub(crate) use eval::compare_values;
pub use expr::{ArithmeticOp, CompareOp, QueryExpr, SubstringPosition, ValueExpr};
