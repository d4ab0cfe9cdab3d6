//! Habit scheduling & streak engine.
//!
//! A date-keyed selection store over local SQLite, day-to-day suggestion,
//! streak counting, and debounced write coordination. A presentation layer
//! consumes this through [`Engine`] or the process-wide [`state::ENGINE`]
//! handle; nothing here renders or schedules notifications.

pub mod coordinator;
pub mod db;
pub mod engine;
pub mod state;

pub use coordinator::WriteCoordinator;
pub use db::{today_key, CalendarDay, DbError, HabitStats, SqliteRepository};
pub use engine::{Engine, EngineConfig};
pub use state::{default_db_path, SharedEngine, ENGINE};
