// Domain Layer - Pure business logic and entities

pub mod cluster;
pub mod error;
pub mod filter;
pub mod job;
pub mod mutation;
pub mod page;

// Re-exports
pub use cluster::{ClusterLabel, UserId};
pub use error::DomainError;
pub use filter::{FilterExpression, ParseError};
pub use job::{Job, JobDraft, JobId, JobLevel};
pub use mutation::{Mutation, MutationKind, MutationState};
pub use page::{PageLimits, PageRequest, PageResult, Sort, SortDirection};
