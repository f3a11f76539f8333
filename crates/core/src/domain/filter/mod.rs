//! Filter expressions over job fields.
//!
//! A filter is parsed once from the `filter` query parameter into a tree of
//! typed predicates. Field names and value types are resolved at parse time,
//! so a `FilterExpression` that exists is always well-typed. Storage adapters
//! translate the tree into their own query language; [`FilterExpression::matches`]
//! is the reference semantics they must agree with.

mod error;
mod field;
mod parser;


pub use error::ParseError;
pub use field::{Field, FieldType, Operator};
pub use parser::{parse, MAX_DEPTH, MAX_PREDICATES};

use crate::domain::job::normalize_skill;
use crate::domain::{ClusterLabel, Job, JobLevel};
use std::fmt;

/// Typed literal bound by a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Level(JobLevel),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => {
                f.write_str("'")?;
                for ch in s.chars() {
                    if ch == '\'' || ch == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", ch)?;
                }
                f.write_str("'")
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Level(level) => f.write_str(level.as_str()),
            Value::Null => f.write_str("null"),
        }
    }
}

/// Leaf node: `field op value`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    field: Field,
    op: Operator,
    value: Value,
}

impl Predicate {
    /// Build a well-typed predicate.
    ///
    /// Integer literals are widened for float fields and skill names are
    /// normalized; anything else that does not fit the field is rejected.
    pub fn new(field: Field, op: Operator, value: Value) -> Result<Self, ParseError> {
        if !field.supports(op) {
            return Err(ParseError::UnsupportedOperator {
                field: field.name().to_string(),
                op: op.symbol().to_string(),
            });
        }

        let value = match (field.field_type(), value) {
            (_, Value::Null) => {
                if field.is_nullable() && matches!(op, Operator::Eq | Operator::Ne) {
                    Value::Null
                } else {
                    return Err(ParseError::NullNotAllowed {
                        field: field.name().to_string(),
                    });
                }
            }
            (FieldType::Integer, v @ Value::Int(_)) => v,
            (FieldType::Float, Value::Float(x)) if x.is_finite() => Value::Float(x),
            (FieldType::Float, Value::Int(i)) => Value::Float(i as f64),
            (FieldType::Text, v @ Value::Text(_)) => v,
            (FieldType::Boolean, v @ Value::Bool(_)) => v,
            (FieldType::Level, v @ Value::Level(_)) => v,
            (FieldType::SkillSet, Value::Text(raw)) if !normalize_skill(&raw).is_empty() => {
                Value::Text(normalize_skill(&raw))
            }
            (ty, other) => {
                return Err(ParseError::InvalidValue {
                    field: field.name().to_string(),
                    value: other.to_string(),
                    expected: ty.describe(),
                })
            }
        };

        Ok(Self { field, op, value })
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn matches(&self, job: &Job) -> bool {
        if self.field == Field::Skills {
            let Value::Text(skill) = &self.value else {
                return false;
            };
            let has = job.skills.contains(skill);
            return match self.op {
                Operator::Eq => has,
                Operator::Ne => !has,
                _ => false,
            };
        }

        self.field
            .value_of(job)
            .is_some_and(|actual| compare(&actual, self.op, &self.value))
    }
}

/// SQL-style comparison: anything compared with a null column is false,
/// except the explicit `: null` / `! null` checks.
fn compare(actual: &Value, op: Operator, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Null, Value::Null) => op == Operator::Eq,
        (_, Value::Null) => op == Operator::Ne,
        (Value::Null, _) => false,
        (Value::Int(a), Value::Int(b)) => op.accepts(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).is_some_and(|o| op.accepts(o)),
        (Value::Text(a), Value::Text(b)) => match op {
            // ASCII-only case folding, same as SQLite LIKE
            Operator::Like => a
                .to_ascii_lowercase()
                .contains(&b.to_ascii_lowercase()),
            _ => op.accepts(a.cmp(b)),
        },
        (Value::Bool(a), Value::Bool(b)) => op.accepts(a.cmp(b)),
        (Value::Level(a), Value::Level(b)) => op.accepts(a.cmp(b)),
        _ => false,
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

/// Tree of predicates combined with AND / OR
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterExpression {
    /// Matches every job (absent or blank filter)
    #[default]
    All,
    Predicate(Predicate),
    And(Vec<FilterExpression>),
    Or(Vec<FilterExpression>),
}

impl FilterExpression {
    /// Parse a filter query string
    pub fn parse(query: &str) -> Result<Self, ParseError> {
        parser::parse(query)
    }

    /// Single-predicate expression
    pub fn predicate(field: Field, op: Operator, value: Value) -> Result<Self, ParseError> {
        Predicate::new(field, op, value).map(FilterExpression::Predicate)
    }

    /// `cluster : label`
    pub fn cluster_eq(label: ClusterLabel) -> Self {
        FilterExpression::Predicate(Predicate {
            field: Field::Cluster,
            op: Operator::Eq,
            value: Value::Int(label as i64),
        })
    }

    /// AND-composition of two filters.
    ///
    /// Pure: neither input is modified. Nested ANDs are flattened so the
    /// result is the same however a chain of compositions is grouped.
    pub fn combine_and(a: &FilterExpression, b: &FilterExpression) -> FilterExpression {
        match (a, b) {
            (FilterExpression::All, other) | (other, FilterExpression::All) => other.clone(),
            _ => {
                let mut children = Vec::new();
                for side in [a, b] {
                    match side {
                        FilterExpression::And(inner) => children.extend(inner.iter().cloned()),
                        other => children.push(other.clone()),
                    }
                }
                FilterExpression::And(children)
            }
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterExpression::All)
    }

    pub fn matches(&self, job: &Job) -> bool {
        match self {
            FilterExpression::All => true,
            FilterExpression::Predicate(p) => p.matches(job),
            FilterExpression::And(children) => children.iter().all(|c| c.matches(job)),
            FilterExpression::Or(children) => children.iter().any(|c| c.matches(job)),
        }
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpression::All => Ok(()),
            FilterExpression::Predicate(p) => write!(f, "{}", p),
            FilterExpression::And(children) => write_joined(f, children, " and "),
            FilterExpression::Or(children) => write_joined(f, children, " or "),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    children: &[FilterExpression],
    separator: &str,
) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        match child {
            FilterExpression::And(_) | FilterExpression::Or(_) => write!(f, "({})", child)?,
            _ => write!(f, "{}", child)?,
        }
    }
    Ok(())
}
