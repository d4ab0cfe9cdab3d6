//! Error types for habit-core.

use thiserror::Error;

/// Errors raised for invalid caller-supplied input.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("habit name must not be empty")]
    EmptyName,

    #[error("habit name too long: {len} chars (max {max})")]
    NameTooLong { len: usize, max: usize },

    #[error("habit description too long: {len} chars (max {max})")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("invalid date key {value:?}, expected YYYY-MM-DD")]
    InvalidDateKey { value: String },
}
