// Update Job Use Case

use super::sync_clusters;
use crate::application::JobQueryService;
use crate::domain::{Job, JobDraft, JobId, Mutation, MutationKind};
use crate::error::{AppError, Result};
use crate::port::{JobRepository, TimeProvider};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Update request: the full client-editable field set plus the target id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateJobRequest {
    pub id: Option<JobId>,
    #[serde(flatten)]
    pub draft: JobDraft,
}

/// Execute update use case
///
/// Keeps `id`, `cluster` and `created_at`; everything else is replaced.
pub async fn execute(
    jobs: &dyn JobRepository,
    query: &JobQueryService,
    time_provider: &dyn TimeProvider,
    req: UpdateJobRequest,
) -> Result<Job> {
    let id = req
        .id
        .ok_or_else(|| AppError::Validation("id is required for update".to_string()))?;
    req.draft.validate()?;
    let mut mutation = Mutation::validated(MutationKind::Update);

    let mut job = jobs
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", id)))?;

    job.apply(req.draft, time_provider.now_millis());

    // Deleted between read and write
    if !jobs.update(&job).await? {
        return Err(AppError::NotFound(format!("Job {} not found", id)));
    }
    mutation.persisted(id)?;

    info!(job_id = id, "Job updated");

    sync_clusters(query, &mut mutation).await?;
    Ok(job)
}
