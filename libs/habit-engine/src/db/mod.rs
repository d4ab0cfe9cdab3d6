//! Local SQLite storage.

pub mod date_utils;
pub mod error;
pub mod repository;
pub mod schema;

pub use date_utils::today_key;
pub use error::DbError;
pub use repository::{
    CalendarDay, CatalogRepository, HabitStats, SelectionRepository, SqliteRepository,
    StatsRepository, StreakRepository,
};
