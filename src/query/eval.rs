//! Evaluation of query expressions against attribute values.

use super::{ArithmeticOp, CompareOp, QueryError, QueryExpr, SubstringPosition, ValueExpr};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read-only access to the attributes of one candidate object.
pub trait AttributeSource {
    /// Returns the current value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AttributeUnavailable`] when the attribute is
    /// undeclared, unreadable or its read faulted.
    fn attribute(&self, name: &str) -> Result<Value, QueryError>;
}

impl AttributeSource for BTreeMap<String, Value> {
    fn attribute(&self, name: &str) -> Result<Value, QueryError> {
        self.get(name).cloned().ok_or_else(|| missing(name))
    }
}

impl<S: BuildHasher> AttributeSource for HashMap<String, Value, S> {
    fn attribute(&self, name: &str) -> Result<Value, QueryError> {
        self.get(name).cloned().ok_or_else(|| missing(name))
    }
}

fn missing(name: &str) -> QueryError {
    QueryError::AttributeUnavailable {
        attribute: name.to_owned(),
        reason: "no such attribute".to_owned(),
    }
}

impl QueryExpr {
    /// Evaluates the predicate against `source`.
    ///
    /// Conjunctions and disjunctions short-circuit from left to right, so an
    /// operand after the deciding one is never read.
    ///
    /// # Errors
    ///
    /// Returns the first [`QueryError`] raised while reading attributes,
    /// ordering values or computing arithmetic.
    pub fn evaluate(&self, source: &dyn AttributeSource) -> Result<bool, QueryError> {
        match self {
            Self::And { operands } => {
                for operand in operands {
                    if !operand.evaluate(source)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Or { operands } => {
                for operand in operands {
                    if operand.evaluate(source)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::Not { operand } => Ok(!operand.evaluate(source)?),
            Self::Constant { value } => Ok(*value),
            Self::Compare { left, op, right } => {
                let lhs = left.evaluate(source)?;
                let rhs = right.evaluate(source)?;
                compare(&lhs, *op, &rhs)
            }
            Self::Between { value, low, high } => {
                let tested = value.evaluate(source)?;
                let lower = low.evaluate(source)?;
                let upper = high.evaluate(source)?;
                Ok(ordering(&lower, &tested)? != Ordering::Greater
                    && ordering(&tested, &upper)? != Ordering::Greater)
            }
            Self::In { value, candidates } => {
                let tested = value.evaluate(source)?;
                for candidate in candidates {
                    if values_equal(&tested, &candidate.evaluate(source)?) {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::Match { attribute, pattern } => {
                let text = string_attribute(source, attribute)?;
                Ok(pattern.is_match(&text))
            }
            Self::Substring {
                attribute,
                position,
                needle,
            } => {
                let text = string_attribute(source, attribute)?;
                Ok(match position {
                    SubstringPosition::Initial => text.starts_with(needle.as_str()),
                    SubstringPosition::Final => text.ends_with(needle.as_str()),
                    SubstringPosition::Any => text.contains(needle.as_str()),
                })
            }
            Self::Present { attribute } => Ok(source.attribute(attribute).is_ok()),
        }
    }
}

impl ValueExpr {
    /// Computes the value of the expression against `source`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when an attribute cannot be read or arithmetic
    /// fails.
    pub fn evaluate(&self, source: &dyn AttributeSource) -> Result<Value, QueryError> {
        match self {
            Self::Attribute { name } => source.attribute(name),
            Self::Constant { value } => Ok(value.clone()),
            Self::Arithmetic { op, left, right } => {
                let lhs = left.evaluate(source)?;
                let rhs = right.evaluate(source)?;
                arithmetic(*op, &lhs, &rhs)
            }
        }
    }
}

fn string_attribute(source: &dyn AttributeSource, attribute: &str) -> Result<String, QueryError> {
    match source.attribute(attribute)? {
        Value::String(text) => Ok(text),
        other => Err(QueryError::NotAString {
            attribute: attribute.to_owned(),
            kind: kind_name(&other),
        }),
    }
}

/// Returns the JSON kind of `value` for diagnostics.
const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn compare(lhs: &Value, op: CompareOp, rhs: &Value) -> Result<bool, QueryError> {
    Ok(match op {
        CompareOp::Eq => values_equal(lhs, rhs),
        CompareOp::Ne => !values_equal(lhs, rhs),
        CompareOp::Lt => ordering(lhs, rhs)? == Ordering::Less,
        CompareOp::Le => ordering(lhs, rhs)? != Ordering::Greater,
        CompareOp::Gt => ordering(lhs, rhs)? == Ordering::Greater,
        CompareOp::Ge => ordering(lhs, rhs)? != Ordering::Less,
    })
}

/// Equality with numeric coercion; values of different kinds are unequal.
fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(left), Value::Number(right)) => {
            number_ordering(left, right) == Ordering::Equal
        }
        _ => lhs == rhs,
    }
}

fn ordering(lhs: &Value, rhs: &Value) -> Result<Ordering, QueryError> {
    compare_values(lhs, rhs).ok_or_else(|| QueryError::Incomparable {
        left: kind_name(lhs),
        right: kind_name(rhs),
    })
}

/// Orders two values of the same kind; `None` when the kinds differ or the
/// kind has no ordering.
pub(crate) fn compare_values(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Number(left), Value::Number(right)) => Some(number_ordering(left, right)),
        (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
        (Value::Bool(left), Value::Bool(right)) => Some(left.cmp(right)),
        _ => None,
    }
}

fn number_ordering(left: &Number, right: &Number) -> Ordering {
    if let (Some(a), Some(b)) = (left.as_i64(), right.as_i64()) {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (left.as_u64(), right.as_u64()) {
        return a.cmp(&b);
    }
    // One side is a u64 above i64::MAX and the other is negative.
    if left.is_u64() && right.is_i64() {
        return Ordering::Greater;
    }
    if left.is_i64() && right.is_u64() {
        return Ordering::Less;
    }
    as_float(left).total_cmp(&as_float(right))
}

fn as_float(number: &Number) -> f64 {
    number.as_f64().unwrap_or(f64::NAN)
}

fn arithmetic(op: ArithmeticOp, lhs: &Value, rhs: &Value) -> Result<Value, QueryError> {
    match (lhs, rhs) {
        (Value::Number(left), Value::Number(right)) => {
            if let (Some(a), Some(b)) = (left.as_i64(), right.as_i64()) {
                integer_arithmetic(op, a, b).map(Value::from)
            } else {
                float_arithmetic(op, as_float(left), as_float(right)).map(Value::Number)
            }
        }
        (Value::String(left), Value::String(right)) if op == ArithmeticOp::Add => {
            Ok(Value::String(format!("{left}{right}")))
        }
        _ => Err(QueryError::InvalidOperands {
            operator: op.symbol(),
            left: kind_name(lhs),
            right: kind_name(rhs),
        }),
    }
}

fn integer_arithmetic(op: ArithmeticOp, left: i64, right: i64) -> Result<i64, QueryError> {
    let result = match op {
        ArithmeticOp::Add => left.checked_add(right),
        ArithmeticOp::Subtract => left.checked_sub(right),
        ArithmeticOp::Multiply => left.checked_mul(right),
        ArithmeticOp::Divide => {
            if right == 0 {
                return Err(QueryError::DivisionByZero);
            }
            left.checked_div(right)
        }
    };
    result.ok_or(QueryError::Overflow(op.symbol()))
}

#[expect(
    clippy::float_arithmetic,
    reason = "query arithmetic over non-integer numbers is defined in f64"
)]
fn float_arithmetic(op: ArithmeticOp, left: f64, right: f64) -> Result<Number, QueryError> {
    let result = match op {
        ArithmeticOp::Add => left + right,
        ArithmeticOp::Subtract => left - right,
        ArithmeticOp::Multiply => left * right,
        ArithmeticOp::Divide => {
            if right == 0.0 {
                return Err(QueryError::DivisionByZero);
            }
            left / right
        }
    };
    Number::from_f64(result).ok_or(QueryError::Overflow(op.symbol()))
}
