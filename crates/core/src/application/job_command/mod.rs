// Job Command Service - create / update / delete use cases

pub mod create;
pub mod update;

pub use update::UpdateJobRequest;

use crate::application::JobQueryService;
use crate::domain::{Job, JobDraft, JobId, Mutation};
use crate::error::{AppError, Result};
use crate::port::{JobRepository, TimeProvider};
use std::sync::Arc;
use tracing::{info, warn};

pub struct JobCommandService {
    jobs: Arc<dyn JobRepository>,
    query: Arc<JobQueryService>,
    time_provider: Arc<dyn TimeProvider>,
}

impl JobCommandService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        query: Arc<JobQueryService>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            jobs,
            query,
            time_provider,
        }
    }

    /// Create a job, then refresh clusters
    pub async fn create(&self, draft: JobDraft) -> Result<Job> {
        create::execute(
            self.jobs.as_ref(),
            self.query.as_ref(),
            self.time_provider.as_ref(),
            draft,
        )
        .await
    }

    /// Update an existing job, then refresh clusters
    pub async fn update(&self, req: UpdateJobRequest) -> Result<Job> {
        update::execute(
            self.jobs.as_ref(),
            self.query.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await
    }

    /// Delete a job. No cluster refresh follows a delete.
    pub async fn delete(&self, id: JobId) -> Result<()> {
        if !self.jobs.delete(id).await? {
            return Err(AppError::NotFound(format!("Job {} not found", id)));
        }
        info!(job_id = id, "Job deleted");
        Ok(())
    }
}

/// Persisted -> ClusterSyncPending -> ClusterSyncOk | ClusterSyncFailed
async fn sync_clusters(query: &JobQueryService, mutation: &mut Mutation) -> Result<()> {
    mutation.sync_pending()?;
    match query.post_mutation_sync(mutation.kind()).await {
        Ok(()) => {
            mutation.sync_ok()?;
            info!(
                kind = %mutation.kind(),
                job_id = ?mutation.job_id(),
                state = %mutation.state(),
                "Mutation completed"
            );
            Ok(())
        }
        Err(e) => {
            mutation.sync_failed()?;
            warn!(
                kind = %mutation.kind(),
                job_id = ?mutation.job_id(),
                state = %mutation.state(),
                error = %e,
                "Mutation persisted but cluster sync failed"
            );
            Err(e.into())
        }
    }
}
