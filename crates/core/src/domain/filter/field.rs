// Known Job attributes and comparison operators

use crate::domain::filter::Value;
use crate::domain::Job;

/// Filterable Job attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    Description,
    Location,
    Salary,
    Quantity,
    Level,
    Active,
    Skills,
    Cluster,
    CreatedAt,
    UpdatedAt,
}

/// Declared type of a field, drives value coercion and operator support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Float,
    Text,
    Boolean,
    Level,
    SkillSet,
}

impl FieldType {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldType::Integer => "an integer",
            FieldType::Float => "a number",
            FieldType::Text => "a string",
            FieldType::Boolean => "true or false",
            FieldType::Level => "one of INTERN, FRESHER, JUNIOR, MIDDLE, SENIOR",
            FieldType::SkillSet => "a skill name",
        }
    }
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Id,
        Field::Name,
        Field::Description,
        Field::Location,
        Field::Salary,
        Field::Quantity,
        Field::Level,
        Field::Active,
        Field::Skills,
        Field::Cluster,
        Field::CreatedAt,
        Field::UpdatedAt,
    ];

    /// Resolve a query-string field name (`title` is accepted for `name`)
    pub fn from_name(name: &str) -> Option<Field> {
        match name {
            "id" => Some(Field::Id),
            "name" | "title" => Some(Field::Name),
            "description" => Some(Field::Description),
            "location" => Some(Field::Location),
            "salary" => Some(Field::Salary),
            "quantity" => Some(Field::Quantity),
            "level" => Some(Field::Level),
            "active" => Some(Field::Active),
            "skills" => Some(Field::Skills),
            "cluster" => Some(Field::Cluster),
            "createdAt" | "created_at" => Some(Field::CreatedAt),
            "updatedAt" | "updated_at" => Some(Field::UpdatedAt),
            _ => None,
        }
    }

    /// Canonical query-string name
    pub fn name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Description => "description",
            Field::Location => "location",
            Field::Salary => "salary",
            Field::Quantity => "quantity",
            Field::Level => "level",
            Field::Active => "active",
            Field::Skills => "skills",
            Field::Cluster => "cluster",
            Field::CreatedAt => "createdAt",
            Field::UpdatedAt => "updatedAt",
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Field::Id | Field::Quantity | Field::Cluster | Field::CreatedAt | Field::UpdatedAt => {
                FieldType::Integer
            }
            Field::Salary => FieldType::Float,
            Field::Name | Field::Description | Field::Location => FieldType::Text,
            Field::Level => FieldType::Level,
            Field::Active => FieldType::Boolean,
            Field::Skills => FieldType::SkillSet,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Field::Cluster | Field::UpdatedAt)
    }

    pub fn is_sortable(&self) -> bool {
        *self != Field::Skills
    }

    /// Whether `op` is defined for this field's type
    pub fn supports(&self, op: Operator) -> bool {
        match self.field_type() {
            FieldType::Integer | FieldType::Float => op != Operator::Like,
            FieldType::Text => matches!(op, Operator::Eq | Operator::Ne | Operator::Like),
            FieldType::Boolean | FieldType::Level | FieldType::SkillSet => {
                matches!(op, Operator::Eq | Operator::Ne)
            }
        }
    }

    /// Scalar value of this field on `job`; `None` for set-valued fields
    pub fn value_of(&self, job: &Job) -> Option<Value> {
        let value = match self {
            Field::Id => Value::Int(job.id),
            Field::Name => Value::Text(job.name.clone()),
            Field::Description => Value::Text(job.description.clone()),
            Field::Location => Value::Text(job.location.clone()),
            Field::Salary => Value::Float(job.salary),
            Field::Quantity => Value::Int(job.quantity),
            Field::Level => Value::Level(job.level),
            Field::Active => Value::Bool(job.active),
            Field::Skills => return None,
            Field::Cluster => job.cluster.map_or(Value::Null, |c| Value::Int(c as i64)),
            Field::CreatedAt => Value::Int(job.created_at),
            Field::UpdatedAt => job.updated_at.map_or(Value::Null, Value::Int),
        };
        Some(value)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `:`
    Eq,
    /// `!`
    Ne,
    /// `>`
    Gt,
    /// `>:`
    Ge,
    /// `<`
    Lt,
    /// `<:`
    Le,
    /// `~` case-insensitive substring match
    Like,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Ge,
        Operator::Lt,
        Operator::Le,
        Operator::Like,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => ":",
            Operator::Ne => "!",
            Operator::Gt => ">",
            Operator::Ge => ">:",
            Operator::Lt => "<",
            Operator::Le => "<:",
            Operator::Like => "~",
        }
    }

    /// Apply an ordering result to a comparison operator
    pub(crate) fn accepts(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Operator::Eq => ordering == Equal,
            Operator::Ne => ordering != Equal,
            Operator::Gt => ordering == Greater,
            Operator::Ge => ordering != Less,
            Operator::Lt => ordering == Less,
            Operator::Le => ordering != Greater,
            Operator::Like => false,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
