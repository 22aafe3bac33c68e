use core_types::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("database not initialized; call Database::initialize and handle::install first")]
    NotInitialized,

    #[error("database already initialized; the handle can be installed only once per process")]
    AlreadyInitialized,

    #[error("invalid database location '{0}'")]
    ConnectionConfig(String),

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("insert or update violates a foreign-key reference")]
    ReferentialIntegrity,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("the requested record was not found in the database")]
    NotFound,

    #[error("an error occurred during JSON serialization/deserialization: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed stored timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
}

// SQLite reports foreign-key violations as a constraint error; surface
// those as ReferentialIntegrity so callers do not have to inspect driver
// error codes themselves.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let fk_code = db_err.code().as_deref() == Some("787");
            if fk_code || db_err.message().contains("FOREIGN KEY constraint failed") {
                return DbError::ReferentialIntegrity;
            }
        }
        DbError::Sqlx(err)
    }
}
