// Create Job Use Case

use super::sync_clusters;
use crate::application::JobQueryService;
use crate::domain::{Job, JobDraft, Mutation, MutationKind};
use crate::error::Result;
use crate::port::{JobRepository, TimeProvider};
use tracing::info;

/// Execute create use case
///
/// # Arguments
///
/// * `jobs` - Job repository
/// * `query` - Owner of the post-mutation cluster refresh
/// * `time_provider` - Time provider (injected for determinism)
/// * `draft` - Client input
pub async fn execute(
    jobs: &dyn JobRepository,
    query: &JobQueryService,
    time_provider: &dyn TimeProvider,
    draft: JobDraft,
) -> Result<Job> {
    draft.validate()?;
    let mut mutation = Mutation::validated(MutationKind::Create);

    let mut job = Job::new(draft, time_provider.now_millis());
    job.id = jobs.insert(&job).await?;
    mutation.persisted(job.id)?;

    info!(job_id = job.id, name = %job.name, "Job created");

    sync_clusters(query, &mut mutation).await?;
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::super::tests::{draft, fixture};
    use crate::domain::DomainError;
    use crate::error::{AppError, OrchestrationFailure};
    use crate::port::job_repository::mocks::InMemoryJobRepository;
    use crate::port::ResolutionFailure;

    #[tokio::test]
    async fn test_create_persists_and_refreshes() {
        let fx = fixture(InMemoryJobRepository::new(), 7000);

        let job = fx.service.create(draft("  Backend Engineer ")).await.unwrap();

        assert_eq!(job.id, 1);
        assert_eq!(job.name, "Backend Engineer");
        assert_eq!(job.created_at, 7000);
        assert_eq!(job.updated_at, None);
        assert_eq!(job.cluster, None);
        assert_eq!(
            job.skills.iter().cloned().collect::<Vec<_>>(),
            vec!["rust".to_string(), "sql".to_string()]
        );
        assert_eq!(fx.repo.get(1), Some(job));
        assert_eq!(fx.resolver.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft_before_persisting() {
        let fx = fixture(InMemoryJobRepository::new(), 7000);
        let mut bad = draft("x");
        bad.salary = -1.0;

        let err = fx.service.create(bad).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::ValidationError(_))
        ));
        assert!(fx.repo.is_empty());
        assert_eq!(fx.resolver.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_with_failing_sync_still_persists() {
        let fx = fixture(InMemoryJobRepository::new(), 7000);
        fx.resolver.set_refresh_result(Err(ResolutionFailure::Status(500)));

        let err = fx.service.create(draft("Data Engineer")).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Orchestration(OrchestrationFailure::ClusterSyncFailed { .. })
        ));
        assert_eq!(fx.repo.len(), 1);
    }
}
