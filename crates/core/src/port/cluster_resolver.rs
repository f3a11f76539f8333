// Cluster Resolver Port (Interface)
// Talks to the external clustering service

use crate::domain::{ClusterLabel, UserId};
use async_trait::async_trait;
use thiserror::Error;

/// Why the clustering service could not answer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionFailure {
    #[error("cluster service timed out after {0}ms")]
    Timeout(u64),

    #[error("cluster service unreachable: {0}")]
    Transport(String),

    #[error("cluster service returned HTTP {0}")]
    Status(u16),

    #[error("cluster service returned malformed body: {0}")]
    MalformedBody(String),

    #[error("cluster service response is missing '{0}'")]
    MissingField(&'static str),

    #[error("cluster label is not an integer: {0}")]
    NonInteger(String),
}

impl ResolutionFailure {
    /// Transient failures a caller could reasonably retry later
    pub fn is_retryable(&self) -> bool {
        match self {
            ResolutionFailure::Timeout(_) | ResolutionFailure::Transport(_) => true,
            ResolutionFailure::Status(code) => *code >= 500,
            _ => false,
        }
    }
}

/// External clustering service
#[async_trait]
pub trait ClusterResolver: Send + Sync {
    /// Cluster label the service currently assigns to `user_id`
    async fn resolve_cluster(&self, user_id: UserId) -> Result<ClusterLabel, ResolutionFailure>;

    /// Ask the service to recompute cluster assignments after a job write
    async fn refresh_clusters(&self) -> Result<(), ResolutionFailure>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted resolver with call counters
    pub struct MockClusterResolver {
        resolve: Mutex<Result<ClusterLabel, ResolutionFailure>>,
        refresh: Mutex<Result<(), ResolutionFailure>>,
        resolve_calls: AtomicUsize,
        refresh_calls: AtomicUsize,
    }

    impl MockClusterResolver {
        /// Every user resolves to `label`; refresh succeeds
        pub fn with_label(label: ClusterLabel) -> Self {
            Self {
                resolve: Mutex::new(Ok(label)),
                refresh: Mutex::new(Ok(())),
                resolve_calls: AtomicUsize::new(0),
                refresh_calls: AtomicUsize::new(0),
            }
        }

        /// Resolution fails with `failure`; refresh succeeds
        pub fn failing(failure: ResolutionFailure) -> Self {
            let mock = Self::with_label(0);
            *mock.resolve.lock().unwrap() = Err(failure);
            mock
        }

        pub fn set_refresh_result(&self, result: Result<(), ResolutionFailure>) {
            *self.refresh.lock().unwrap() = result;
        }

        pub fn resolve_calls(&self) -> usize {
            self.resolve_calls.load(Ordering::SeqCst)
        }

        pub fn refresh_calls(&self) -> usize {
            self.refresh_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ClusterResolver for MockClusterResolver {
        async fn resolve_cluster(&self, _user_id: UserId) -> Result<ClusterLabel, ResolutionFailure> {
            self.resolve_calls.fetch_add(1, Ordering::SeqCst);
            self.resolve.lock().unwrap().clone()
        }

        async fn refresh_clusters(&self) -> Result<(), ResolutionFailure> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            self.refresh.lock().unwrap().clone()
        }
    }
}
