// Filter parse errors

use thiserror::Error;

/// Why a filter string could not be turned into a FilterExpression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unknown field '{field}' at position {position}")]
    UnknownField { field: String, position: usize },

    #[error("operator '{op}' is not supported for field '{field}'")]
    UnsupportedOperator { field: String, op: String },

    #[error("invalid value '{value}' for field '{field}': expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("null is only allowed with ':' or '!' on nullable fields, not on '{field}'")]
    NullNotAllowed { field: String },

    #[error("unexpected {found} at position {position}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        position: usize,
    },

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unterminated string starting at position {0}")]
    UnterminatedString(usize),

    #[error("filter nesting deeper than {0} levels")]
    TooDeep(usize),

    #[error("filter has more than {0} conditions")]
    TooManyPredicates(usize),
}

impl ParseError {
    /// Field the error refers to, for field-level error detail
    pub fn field(&self) -> Option<&str> {
        match self {
            ParseError::UnknownField { field, .. }
            | ParseError::UnsupportedOperator { field, .. }
            | ParseError::InvalidValue { field, .. }
            | ParseError::NullNotAllowed { field } => Some(field),
            _ => None,
        }
    }
}
