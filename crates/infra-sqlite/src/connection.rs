// SQLite Connection Pool Setup

use crate::error::map_sqlx_error;
use jobmatch_core::port::ExecutionFailure;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Create SQLite connection pool with WAL mode and foreign keys on every connection
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, ExecutionFailure> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(map_sqlx_error)?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true)
        .create_if_missing(true);

    // min 1: a shared `sqlite::memory:` database dies with its last connection
    SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(10)
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)
}
