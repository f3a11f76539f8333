//! HTTP Error Mapping
//!
//! Client faults (bad filter, bad page, validation, unknown id, cluster service
//! unable to place the user) are 400. Storage faults and a failed post-write
//! cluster refresh are 500.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jobmatch_core::domain::{DomainError, ParseError};
use jobmatch_core::port::ExecutionFailure;
use jobmatch_core::{AppError, OrchestrationFailure};
use serde::Serialize;
use tracing::error;

/// Wire shape of every error response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    field: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            field: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = match &err {
            AppError::Domain(_)
            | AppError::Filter(_)
            | AppError::Validation(_)
            | AppError::NotFound(_)
            | AppError::Orchestration(OrchestrationFailure::ClusterUnavailable { .. }) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Orchestration(_) | AppError::Execution(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let field = match &err {
            AppError::Filter(e) => e.field().map(str::to_string),
            _ => None,
        };
        Self {
            status,
            message: err.to_string(),
            field,
        }
    }
}

impl From<OrchestrationFailure> for ApiError {
    fn from(err: OrchestrationFailure) -> Self {
        AppError::from(err).into()
    }
}

impl From<ExecutionFailure> for ApiError {
    fn from(err: ExecutionFailure) -> Self {
        AppError::from(err).into()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        AppError::from(err).into()
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        AppError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), message = %self.message, "Request failed");
        }
        let body = ErrorBody {
            status_code: self.status.as_u16(),
            error: self
                .status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message: self.message,
            field: self.field,
        };
        (self.status, Json(body)).into_response()
    }
}
