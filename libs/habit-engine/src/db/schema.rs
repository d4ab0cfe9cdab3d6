//! SQLite schema definitions.

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local habit store.
pub const SCHEMA: &str = r#"
-- Habit definitions (built-in and custom)
CREATE TABLE IF NOT EXISTS habits (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    icon TEXT,
    category_id INTEGER,
    category_name TEXT
);

-- One row per (habit, day); a day's selection is the set of its rows.
-- position preserves the order tasks were scheduled in.
CREATE TABLE IF NOT EXISTS day_entries (
    habit_id TEXT NOT NULL REFERENCES habits(id),
    date_key TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    position INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (habit_id, date_key)
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_day_entries_date ON day_entries(date_key);
CREATE INDEX IF NOT EXISTS idx_day_entries_completed ON day_entries(habit_id, completed, date_key);
"#;
