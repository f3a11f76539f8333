// Job Repository Port (Interface)
// Persistence plus the filter-and-page query executor

use crate::domain::{FilterExpression, Job, JobId, PageRequest, PageResult};
use async_trait::async_trait;
use thiserror::Error;

/// Storage-layer failure. Reported upward as-is, never turned into an empty page.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionFailure {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupt row for job {id}: {reason}")]
    CorruptRow { id: JobId, reason: String },
}

/// Repository interface for Job persistence and querying
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a new job, returning the id assigned by storage
    async fn insert(&self, job: &Job) -> Result<JobId, ExecutionFailure>;

    /// Find job by ID
    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, ExecutionFailure>;

    /// Overwrite the client-editable fields and `updated_at` of an existing job.
    /// `cluster` and `created_at` keep their stored values. Returns false if no
    /// job has that id.
    async fn update(&self, job: &Job) -> Result<bool, ExecutionFailure>;

    /// Delete a job. Returns false if no job has that id.
    async fn delete(&self, id: JobId) -> Result<bool, ExecutionFailure>;

    /// Apply `filter`, count every match, and return the requested slice.
    ///
    /// Ordering is the requested sort (if any) followed by `id ASC`, so repeated
    /// calls without intervening writes return identical pages.
    async fn execute(
        &self,
        filter: &FilterExpression,
        page: &PageRequest,
    ) -> Result<PageResult<Job>, ExecutionFailure>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::filter::Value;
    use crate::domain::SortDirection;
    use std::cmp::Ordering;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Store {
        jobs: BTreeMap<JobId, Job>,
        next_id: JobId,
        failure: Option<String>,
    }

    /// In-memory JobRepository evaluating filters with `FilterExpression::matches`
    #[derive(Default)]
    pub struct InMemoryJobRepository {
        store: Mutex<Store>,
    }

    impl InMemoryJobRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed with jobs; ids of 0 are assigned sequentially
        pub fn with_jobs(jobs: impl IntoIterator<Item = Job>) -> Self {
            let repo = Self::new();
            {
                let mut store = repo.store.lock().unwrap();
                for mut job in jobs {
                    if job.id == 0 {
                        store.next_id += 1;
                        job.id = store.next_id;
                    } else {
                        store.next_id = store.next_id.max(job.id);
                    }
                    store.jobs.insert(job.id, job);
                }
            }
            repo
        }

        /// Make every subsequent call fail with a storage error
        pub fn fail_with(&self, message: impl Into<String>) {
            self.store.lock().unwrap().failure = Some(message.into());
        }

        pub fn len(&self) -> usize {
            self.store.lock().unwrap().jobs.len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        pub fn get(&self, id: JobId) -> Option<Job> {
            self.store.lock().unwrap().jobs.get(&id).cloned()
        }

        fn check(store: &Store) -> Result<(), ExecutionFailure> {
            match &store.failure {
                Some(msg) => Err(ExecutionFailure::Storage(msg.clone())),
                None => Ok(()),
            }
        }
    }

    /// Same ordering the SQL adapter applies: NULL first, text by bytes,
    /// level by seniority
    fn sort_cmp(a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Int(x), Value::Int(y)) => x.cmp(y),
            (Value::Float(x), Value::Float(y)) => x.total_cmp(y),
            (Value::Text(x), Value::Text(y)) => x.cmp(y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Level(x), Value::Level(y)) => x.cmp(y),
            _ => Ordering::Equal,
        }
    }

    #[async_trait]
    impl JobRepository for InMemoryJobRepository {
        async fn insert(&self, job: &Job) -> Result<JobId, ExecutionFailure> {
            let mut store = self.store.lock().unwrap();
            Self::check(&store)?;
            store.next_id += 1;
            let id = store.next_id;
            let mut job = job.clone();
            job.id = id;
            store.jobs.insert(id, job);
            Ok(id)
        }

        async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, ExecutionFailure> {
            let store = self.store.lock().unwrap();
            Self::check(&store)?;
            Ok(store.jobs.get(&id).cloned())
        }

        async fn update(&self, job: &Job) -> Result<bool, ExecutionFailure> {
            let mut store = self.store.lock().unwrap();
            Self::check(&store)?;
            match store.jobs.get_mut(&job.id) {
                Some(existing) => {
                    let (cluster, created_at) = (existing.cluster, existing.created_at);
                    *existing = job.clone();
                    existing.cluster = cluster;
                    existing.created_at = created_at;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: JobId) -> Result<bool, ExecutionFailure> {
            let mut store = self.store.lock().unwrap();
            Self::check(&store)?;
            Ok(store.jobs.remove(&id).is_some())
        }

        async fn execute(
            &self,
            filter: &FilterExpression,
            page: &PageRequest,
        ) -> Result<PageResult<Job>, ExecutionFailure> {
            let store = self.store.lock().unwrap();
            Self::check(&store)?;

            let mut matched: Vec<&Job> = store.jobs.values().filter(|j| filter.matches(j)).collect();

            if let Some(sort) = page.sort() {
                matched.sort_by(|a, b| {
                    let primary = match (sort.field.value_of(a), sort.field.value_of(b)) {
                        (Some(x), Some(y)) => sort_cmp(&x, &y),
                        _ => Ordering::Equal,
                    };
                    let primary = match sort.direction {
                        SortDirection::Asc => primary,
                        SortDirection::Desc => primary.reverse(),
                    };
                    primary.then(a.id.cmp(&b.id))
                });
            }

            let total = matched.len() as u64;
            let items = matched
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
                .take(page.size() as usize)
                .cloned()
                .collect();

            Ok(PageResult::new(items, total, page))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::InMemoryJobRepository;
    use super::*;
    use crate::domain::Sort;

    fn jobs(n: usize) -> Vec<Job> {
        (0..n)
            .map(|i| {
                let mut job = Job::new_test(format!("job-{}", i), Some((i % 3) as i32));
                job.salary = (i * 100) as f64;
                job
            })
            .collect()
    }

    #[tokio::test]
    async fn test_pages_partition_the_matches() {
        let repo = InMemoryJobRepository::with_jobs(jobs(23));
        let filter = FilterExpression::All;

        let mut seen = Vec::new();
        for index in 0..3 {
            let page = PageRequest::new(index, 10).unwrap();
            let result = repo.execute(&filter, &page).await.unwrap();
            assert_eq!(result.total_count, 23);
            assert_eq!(result.total_pages, 3);
            seen.extend(result.items.into_iter().map(|j| j.id));
        }

        let mut deduped = seen.clone();
        deduped.dedup();
        assert_eq!(seen.len(), 23);
        assert_eq!(deduped, seen);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty_with_metadata() {
        let repo = InMemoryJobRepository::with_jobs(jobs(5));
        let page = PageRequest::new(4, 2).unwrap();
        let result = repo.execute(&FilterExpression::All, &page).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.total_count, 5);
        assert_eq!(result.total_pages, 3);
    }

    #[tokio::test]
    async fn test_sort_desc_with_id_tie_break() {
        let repo = InMemoryJobRepository::with_jobs(jobs(6));
        let page = PageRequest::new(0, 10)
            .unwrap()
            .with_sort(Some(Sort::parse("cluster,desc").unwrap()));
        let result = repo.execute(&FilterExpression::All, &page).await.unwrap();
        let order: Vec<_> = result.items.iter().map(|j| (j.cluster, j.id)).collect();
        assert_eq!(
            order,
            vec![
                (Some(2), 3),
                (Some(2), 6),
                (Some(1), 2),
                (Some(1), 5),
                (Some(0), 1),
                (Some(0), 4)
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_is_reported_not_swallowed() {
        let repo = InMemoryJobRepository::with_jobs(jobs(3));
        repo.fail_with("disk on fire");
        let page = PageRequest::new(0, 10).unwrap();
        let err = repo.execute(&FilterExpression::All, &page).await.unwrap_err();
        assert_eq!(err, ExecutionFailure::Storage("disk on fire".to_string()));
    }
}
