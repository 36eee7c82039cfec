//! Query expression tree.

use super::QueryError;
use crate::naming::{Wildcard, WildcardSyntax};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::Not;

/// Relational operator used by [`QueryExpr::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// Returns the operator symbol used by the text syntax.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Arithmetic operator used by [`ValueExpr::Arithmetic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOp {
    /// `+`; also concatenates strings.
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`; integer operands truncate.
    Divide,
}

impl ArithmeticOp {
    /// Returns the operator symbol used by the text syntax.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

/// Where a substring must occur for [`QueryExpr::Substring`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstringPosition {
    /// The attribute starts with the needle.
    Initial,
    /// The attribute ends with the needle.
    Final,
    /// The needle occurs anywhere in the attribute.
    Any,
}

impl SubstringPosition {
    /// Returns the keyword used by the text syntax.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Initial => "startswith",
            Self::Final => "endswith",
            Self::Any => "contains",
        }
    }
}

/// A value-producing sub-expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueExpr {
    /// Current value of a named attribute.
    Attribute {
        /// Attribute name.
        name: String,
    },
    /// A literal value.
    Constant {
        /// Literal value.
        value: Value,
    },
    /// Binary arithmetic over two sub-expressions.
    Arithmetic {
        /// Operator.
        op: ArithmeticOp,
        /// Left operand.
        left: Box<ValueExpr>,
        /// Right operand.
        right: Box<ValueExpr>,
    },
}

impl ValueExpr {
    /// References an attribute by name.
    #[must_use]
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute { name: name.into() }
    }

    /// Wraps a literal value.
    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant {
            value: value.into(),
        }
    }

    /// Combines two expressions arithmetically.
    #[must_use]
    pub fn arithmetic(op: ArithmeticOp, left: Self, right: Self) -> Self {
        Self::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// A boolean predicate over the attributes of one managed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryExpr {
    /// True when every operand is true; empty is true.
    And {
        /// Conjuncts, evaluated left to right.
        operands: Vec<QueryExpr>,
    },
    /// True when any operand is true; empty is false.
    Or {
        /// Disjuncts, evaluated left to right.
        operands: Vec<QueryExpr>,
    },
    /// Negation.
    Not {
        /// Negated expression.
        operand: Box<QueryExpr>,
    },
    /// A fixed answer.
    Constant {
        /// The answer.
        value: bool,
    },
    /// Relational comparison of two values.
    Compare {
        /// Left operand.
        left: ValueExpr,
        /// Operator.
        op: CompareOp,
        /// Right operand.
        right: ValueExpr,
    },
    /// Inclusive range check.
    Between {
        /// Tested value.
        value: ValueExpr,
        /// Lower bound.
        low: ValueExpr,
        /// Upper bound.
        high: ValueExpr,
    },
    /// Membership in a list of candidates.
    In {
        /// Tested value.
        value: ValueExpr,
        /// Accepted values.
        candidates: Vec<ValueExpr>,
    },
    /// Wildcard match of a string attribute.
    Match {
        /// Attribute name.
        attribute: String,
        /// Wildcard pattern.
        pattern: Wildcard,
    },
    /// Substring test of a string attribute.
    Substring {
        /// Attribute name.
        attribute: String,
        /// Required position of the needle.
        position: SubstringPosition,
        /// Substring to look for.
        needle: String,
    },
    /// True when the attribute can be read without a fault.
    Present {
        /// Attribute name.
        attribute: String,
    },
}

impl QueryExpr {
    /// Returns a constant predicate.
    #[must_use]
    pub const fn constant(value: bool) -> Self {
        Self::Constant { value }
    }

    /// Compares two value expressions.
    #[must_use]
    pub const fn compare(left: ValueExpr, op: CompareOp, right: ValueExpr) -> Self {
        Self::Compare { left, op, right }
    }

    /// Shorthand for `attribute = value`.
    #[must_use]
    pub fn attribute_equals(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(
            ValueExpr::attribute(attribute),
            CompareOp::Eq,
            ValueExpr::constant(value),
        )
    }

    /// Inclusive range check.
    #[must_use]
    pub const fn between(value: ValueExpr, low: ValueExpr, high: ValueExpr) -> Self {
        Self::Between { value, low, high }
    }

    /// Membership check.
    #[must_use]
    pub fn is_in(value: ValueExpr, candidates: impl IntoIterator<Item = ValueExpr>) -> Self {
        Self::In {
            value,
            candidates: candidates.into_iter().collect(),
        }
    }

    /// Wildcard match of a string attribute (`*`, `?`, `[...]`, `[!...]`,
    /// backslash escapes).
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidPattern`] when the pattern is malformed.
    pub fn matches(attribute: impl Into<String>, pattern: &str) -> Result<Self, QueryError> {
        Ok(Self::Match {
            attribute: attribute.into(),
            pattern: Wildcard::compile(pattern, WildcardSyntax::Query)?,
        })
    }

    /// Substring test of a string attribute.
    #[must_use]
    pub fn substring(
        attribute: impl Into<String>,
        position: SubstringPosition,
        needle: impl Into<String>,
    ) -> Self {
        Self::Substring {
            attribute: attribute.into(),
            position,
            needle: needle.into(),
        }
    }

    /// Presence check.
    #[must_use]
    pub fn present(attribute: impl Into<String>) -> Self {
        Self::Present {
            attribute: attribute.into(),
        }
    }

    /// Conjunction; nested conjunctions on the left are flattened.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::And { mut operands } => {
                operands.push(other);
                Self::And { operands }
            }
            first => Self::And {
                operands: vec![first, other],
            },
        }
    }

    /// Disjunction; nested disjunctions on the left are flattened.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Or { mut operands } => {
                operands.push(other);
                Self::Or { operands }
            }
            first => Self::Or {
                operands: vec![first, other],
            },
        }
    }

    /// Parses the text syntax.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Syntax`] with the byte offset of the first
    /// unexpected token, or [`QueryError::InvalidPattern`] for a malformed
    /// `like` pattern.
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        super::parser::parse(text)
    }

    const fn is_compound(&self) -> bool {
        matches!(self, Self::And { .. } | Self::Or { .. })
    }
}

impl Not for QueryExpr {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Not {
            operand: Box::new(self),
        }
    }
}

impl fmt::Display for ValueExpr {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute { name } => write_identifier(formatter, name),
            Self::Constant { value } => write_literal(formatter, value),
            Self::Arithmetic { op, left, right } => {
                write!(formatter, "({left} {} {right})", op.symbol())
            }
        }
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And { operands } => write_junction(formatter, operands, "and", "true"),
            Self::Or { operands } => write_junction(formatter, operands, "or", "false"),
            Self::Not { operand } => {
                if operand.is_compound() {
                    write!(formatter, "not ({operand})")
                } else {
                    write!(formatter, "not {operand}")
                }
            }
            Self::Constant { value } => write!(formatter, "{value}"),
            Self::Compare { left, op, right } => {
                write!(formatter, "{left} {} {right}", op.symbol())
            }
            Self::Between { value, low, high } => {
                write!(formatter, "{value} between {low} and {high}")
            }
            Self::In { value, candidates } => {
                write!(formatter, "{value} in (")?;
                for (index, candidate) in candidates.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{candidate}")?;
                }
                formatter.write_str(")")
            }
            Self::Match { attribute, pattern } => {
                write_identifier(formatter, attribute)?;
                formatter.write_str(" like ")?;
                write_string(formatter, pattern.as_str())
            }
            Self::Substring {
                attribute,
                position,
                needle,
            } => {
                write_identifier(formatter, attribute)?;
                write!(formatter, " {} ", position.keyword())?;
                write_string(formatter, needle)
            }
            Self::Present { attribute } => {
                formatter.write_str("present(")?;
                write_identifier(formatter, attribute)?;
                formatter.write_str(")")
            }
        }
    }
}

fn write_junction(
    formatter: &mut fmt::Formatter<'_>,
    operands: &[QueryExpr],
    keyword: &str,
    empty: &str,
) -> fmt::Result {
    if operands.is_empty() {
        return formatter.write_str(empty);
    }
    for (index, operand) in operands.iter().enumerate() {
        if index > 0 {
            write!(formatter, " {keyword} ")?;
        }
        if operand.is_compound() {
            write!(formatter, "({operand})")?;
        } else {
            write!(formatter, "{operand}")?;
        }
    }
    Ok(())
}

fn write_identifier(formatter: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if super::parser::is_plain_identifier(name) {
        formatter.write_str(name)
    } else {
        write!(formatter, "`{name}`")
    }
}

fn write_literal(formatter: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::String(text) => write_string(formatter, text),
        other => write!(formatter, "{other}"),
    }
}

fn write_string(formatter: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    formatter.write_str("'")?;
    for character in text.chars() {
        match character {
            '\'' => formatter.write_str("\\'")?,
            '\\' => formatter.write_str("\\\\")?,
            '\n' => formatter.write_str("\\n")?,
            other => write!(formatter, "{other}")?,
        }
    }
    formatter.write_str("'")
}
