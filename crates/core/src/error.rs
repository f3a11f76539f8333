// Central Error Type for the Application

use crate::domain::filter::ParseError;
use crate::domain::{MutationKind, UserId};
use crate::port::{ExecutionFailure, ResolutionFailure};
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Filter error: {0}")]
    Filter(#[from] ParseError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionFailure),

    #[error("Orchestration error: {0}")]
    Orchestration(#[from] OrchestrationFailure),
}

/// Failure while combining two otherwise independent sub-operations
/// (cluster resolution + query, or persistence + cluster refresh).
#[derive(Error, Debug)]
pub enum OrchestrationFailure {
    #[error("Cluster unavailable for user {user_id}: {source}")]
    ClusterUnavailable {
        user_id: UserId,
        #[source]
        source: ResolutionFailure,
    },

    #[error("Cluster sync failed after {kind}: {source}")]
    ClusterSyncFailed {
        kind: MutationKind,
        #[source]
        source: ResolutionFailure,
    },

    #[error(transparent)]
    Execution(#[from] ExecutionFailure),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
