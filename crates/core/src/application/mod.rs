// Application Layer - Use Cases and Business Logic

pub mod job_command;
pub mod job_query;

// Re-exports
pub use job_command::{JobCommandService, UpdateJobRequest};
pub use job_query::JobQueryService;
