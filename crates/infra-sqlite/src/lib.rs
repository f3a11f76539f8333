// Jobmatch Infrastructure - SQLite Adapter
// Implements: JobRepository (persistence + filter/page query executor)

mod connection;
mod error;
mod job_repository;
mod migration;
mod sql_filter;

pub use connection::create_pool;
pub use job_repository::SqliteJobRepository;
pub use migration::run_migrations;

// Note: sqlx::Error conversion is handled by a helper function (error::map_sqlx_error)
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for ExecutionFailure here)
