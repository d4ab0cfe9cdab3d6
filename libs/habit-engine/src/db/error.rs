//! Database error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("store not initialized")]
    NotInitialized,

    /// A duplicate `(habit id, date)` insert or a dangling habit reference
    /// outside the replace-by-date path. Indicates a logic error upstream;
    /// surfaced, never swallowed.
    #[error("constraint violation: {0}")]
    ConstraintViolation(rusqlite::Error),

    #[error("invalid input: {0}")]
    Validation(#[from] habit_core::ValidationError),
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::ConstraintViolation(e)
            }
            _ => Self::Sqlite(e),
        }
    }
}
