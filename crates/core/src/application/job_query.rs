// Job Query Service
// Filter + cluster enrichment pipeline and the post-write cluster refresh

use crate::domain::{
    ClusterLabel, FilterExpression, Job, JobId, MutationKind, PageRequest, PageResult, UserId,
};
use crate::error::{AppError, OrchestrationFailure, Result};
use crate::port::{ClusterResolver, ExecutionFailure, JobRepository};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct JobQueryService {
    jobs: Arc<dyn JobRepository>,
    resolver: Arc<dyn ClusterResolver>,
}

impl JobQueryService {
    pub fn new(jobs: Arc<dyn JobRepository>, resolver: Arc<dyn ClusterResolver>) -> Self {
        Self { jobs, resolver }
    }

    /// Plain listing: the caller's filter, nothing added
    pub async fn fetch_page(
        &self,
        filter: &FilterExpression,
        page: &PageRequest,
    ) -> std::result::Result<PageResult<Job>, ExecutionFailure> {
        let result = self.jobs.execute(filter, page).await?;
        debug!(
            filter = %filter,
            page = page.index(),
            size = page.size(),
            total = result.total_count,
            "Fetched job page"
        );
        Ok(result)
    }

    /// Listing restricted to the cluster the prediction service assigns to `user_id`.
    ///
    /// A resolution failure aborts the request; the query is never run without
    /// the cluster constraint.
    pub async fn fetch_page_for_user_cluster(
        &self,
        user_id: UserId,
        filter: &FilterExpression,
        page: &PageRequest,
    ) -> std::result::Result<PageResult<Job>, OrchestrationFailure> {
        let cluster: ClusterLabel = match self.resolver.resolve_cluster(user_id).await {
            Ok(label) => label,
            Err(source) => {
                warn!(
                    user_id,
                    error = %source,
                    retryable = source.is_retryable(),
                    "Cluster resolution failed"
                );
                return Err(OrchestrationFailure::ClusterUnavailable { user_id, source });
            }
        };

        let combined = FilterExpression::combine_and(filter, &FilterExpression::cluster_eq(cluster));
        let result = self.jobs.execute(&combined, page).await?;

        info!(
            user_id,
            cluster,
            total = result.total_count,
            returned = result.items.len(),
            "Fetched cluster-restricted job page"
        );
        Ok(result)
    }

    /// Single job by id
    pub async fn find_job(&self, id: JobId) -> Result<Job> {
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", id)))
    }

    /// Ask the prediction service to recompute clusters after a create/update.
    ///
    /// Any failure fails the surrounding mutation even though the write has
    /// already been committed.
    pub async fn post_mutation_sync(
        &self,
        kind: MutationKind,
    ) -> std::result::Result<(), OrchestrationFailure> {
        match self.resolver.refresh_clusters().await {
            Ok(()) => {
                debug!(kind = %kind, "Cluster refresh succeeded");
                Ok(())
            }
            Err(source) => {
                warn!(kind = %kind, error = %source, "Cluster refresh failed");
                Err(OrchestrationFailure::ClusterSyncFailed { kind, source })
            }
        }
    }
}
