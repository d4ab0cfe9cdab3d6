//! Core habit library shared by the engine and its consumers.
//!
//! Provides:
//! - Calendar-day keys with the stable `YYYY-MM-DD` format
//! - Shared types (HabitDefinition, DayEntry, Selection) and input validation
//! - The streak-counting walk
//! - Built-in habit seed data

pub mod builtins;
pub mod date_key;
pub mod error;
pub mod streak;
pub mod types;

pub use builtins::builtin_definitions;
pub use date_key::{DateKey, DATE_KEY_FORMAT};
pub use error::ValidationError;
pub use streak::{current_streak, longest_run};
pub use types::{
    validate_description, validate_name, DayEntry, HabitDefinition, Selection,
    CUSTOM_CATEGORY_ID, CUSTOM_CATEGORY_NAME, DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS,
};
