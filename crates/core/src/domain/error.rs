// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid mutation state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid job level: {0}")]
    InvalidLevel(String),

    #[error("Invalid page request: {0}")]
    InvalidPage(String),

    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
