// Port Layer - Interfaces for external dependencies

pub mod cluster_resolver;
pub mod job_repository;
pub mod time_provider;

// Re-exports
pub use cluster_resolver::{ClusterResolver, ResolutionFailure};
pub use job_repository::{ExecutionFailure, JobRepository};
pub use time_provider::TimeProvider;
