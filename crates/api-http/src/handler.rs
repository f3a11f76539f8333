//! HTTP Handlers
//!
//! Thin glue: decode the request, call the application service, encode the result.

use crate::error::ApiError;
use crate::types::{
    ClusterJobsQuery, CreatedJobResponse, ListJobsQuery, PageEnvelope, UpdatedJobResponse,
};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use jobmatch_core::application::{JobCommandService, JobQueryService, UpdateJobRequest};
use jobmatch_core::domain::{Job, JobDraft, JobId, PageLimits};
use std::sync::Arc;
use tracing::debug;

/// Shared handler state with injected services
#[derive(Clone)]
pub struct AppState {
    pub queries: Arc<JobQueryService>,
    pub commands: Arc<JobCommandService>,
    pub limits: PageLimits,
}

/// GET /api/v1/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    query: Result<Query<ListJobsQuery>, QueryRejection>,
) -> Result<Json<PageEnvelope<Job>>, ApiError> {
    let Query(query) = query?;
    let filter = query.filter()?;
    let page = query.page_request(&state.limits)?;

    let result = state.queries.fetch_page(&filter, &page).await?;
    Ok(Json(result.into()))
}

/// GET /api/v1/job-cluster/jobs
pub async fn list_cluster_jobs(
    State(state): State<AppState>,
    query: Result<Query<ClusterJobsQuery>, QueryRejection>,
) -> Result<Json<PageEnvelope<Job>>, ApiError> {
    let Query(query) = query?;
    let user_id = query.user_id()?;
    let listing = query.listing();
    let filter = listing.filter()?;
    let page = listing.page_request(&state.limits)?;

    let result = state
        .queries
        .fetch_page_for_user_cluster(user_id, &filter, &page)
        .await?;
    Ok(Json(result.into()))
}

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    id: Result<Path<JobId>, PathRejection>,
) -> Result<Json<Job>, ApiError> {
    let Path(id) = id?;
    let job = state.queries.find_job(id).await?;
    Ok(Json(job))
}

/// POST /api/v1/jobs
pub async fn create_job(
    State(state): State<AppState>,
    body: Result<Json<JobDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedJobResponse>), ApiError> {
    let Json(draft) = body?;
    let job = state.commands.create(draft).await?;
    debug!(job_id = job.id, "Created job via HTTP");
    Ok((StatusCode::CREATED, Json(job.into())))
}

/// PUT /api/v1/jobs
pub async fn update_job(
    State(state): State<AppState>,
    body: Result<Json<UpdateJobRequest>, JsonRejection>,
) -> Result<Json<UpdatedJobResponse>, ApiError> {
    let Json(req) = body?;
    let job = state.commands.update(req).await?;
    Ok(Json(job.into()))
}

/// DELETE /api/v1/jobs/{id}
pub async fn delete_job(
    State(state): State<AppState>,
    id: Result<Path<JobId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.commands.delete(id).await?;
    Ok(StatusCode::OK)
}
