// sqlx::Error -> ExecutionFailure

use jobmatch_core::port::ExecutionFailure;

/// Convert sqlx::Error to ExecutionFailure with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> ExecutionFailure {
    let message = match &err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            // SQLite error codes: https://www.sqlite.org/rescode.html
            Some(code) => match code.as_ref() {
                "2067" | "1555" => format!("Unique constraint violation: {}", db_err.message()),
                "787" | "3850" => format!("Foreign key constraint violation: {}", db_err.message()),
                "275" | "531" => format!("Check constraint violation: {}", db_err.message()),
                "5" => format!("Database locked (SQLITE_BUSY): {}", db_err.message()),
                "13" => format!("Database full: {}", db_err.message()),
                other => format!("Database error [{}]: {}", other, db_err.message()),
            },
            None => format!("Database error: {}", db_err.message()),
        },
        sqlx::Error::RowNotFound => "Row not found".to_string(),
        sqlx::Error::ColumnNotFound(col) => format!("Column not found: {}", col),
        // Connection, pool, protocol errors
        _ => err.to_string(),
    };
    ExecutionFailure::Storage(message)
}
