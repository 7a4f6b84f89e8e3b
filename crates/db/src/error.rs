//! Classification of driver errors into [`CoreError`].

use crackmes_core::error::CoreError;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error onto the domain taxonomy.
///
/// Connection-level failures become `Unavailable` so callers fail fast
/// instead of treating an unreachable database as an empty result.
pub fn db_error(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => CoreError::Unavailable(err.to_string()),
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            CoreError::Conflict(match db.constraint() {
                Some(constraint) => format!("Duplicate value violates {constraint}"),
                None => "Duplicate value".to_string(),
            })
        }
        _ => CoreError::Internal(err.to_string()),
    }
}
