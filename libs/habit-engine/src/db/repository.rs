//! Repository pattern for database access.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use habit_core::streak::SCAN_CAP;
use habit_core::{
    current_streak, longest_run, validate_description, validate_name, DateKey, DayEntry,
    HabitDefinition, Selection, CUSTOM_CATEGORY_ID, CUSTOM_CATEGORY_NAME,
};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::error::DbError;

type Result<T> = std::result::Result<T, DbError>;

/// Repository for habit catalog operations.
pub trait CatalogRepository {
    fn seed_builtins(&mut self, definitions: &[HabitDefinition]) -> Result<usize>;
    fn create_custom(
        &mut self,
        name: &str,
        description: Option<&str>,
        icon: Option<&str>,
    ) -> Result<HabitDefinition>;
    fn delete_habit(&mut self, habit_id: &str) -> Result<()>;
    fn get_habit(&self, habit_id: &str) -> Result<Option<HabitDefinition>>;
    fn list_habits(&self) -> Result<Vec<HabitDefinition>>;
    fn list_custom(&self) -> Result<Vec<HabitDefinition>>;
    fn categories_for(&self, habit_ids: &[String]) -> Result<Vec<i64>>;
}

/// Repository for day-selection operations.
pub trait SelectionRepository {
    fn write_selection(
        &mut self,
        date_key: DateKey,
        selection: &Selection,
        propagate_to_future: bool,
    ) -> Result<()>;
    fn read_selection(&self, date_key: DateKey) -> Result<Option<Selection>>;
    fn read_all(&self) -> Result<BTreeMap<DateKey, Selection>>;
    fn remove_habit_on_date(&mut self, habit_id: &str, date_key: DateKey) -> Result<()>;
    fn toggle_completion(&mut self, habit_id: &str, date_key: DateKey, completed: bool)
        -> Result<()>;
    fn reset_all(&mut self) -> Result<()>;
    fn suggest(&self, date_key: DateKey) -> Result<Vec<String>>;
}

/// Repository for streak queries.
pub trait StreakRepository {
    fn streak_for(&self, habit_id: &str, as_of: DateKey) -> Result<u32>;
    fn streaks_for(&self, habit_ids: &[String], as_of: DateKey) -> Result<HashMap<String, u32>>;
}

/// Per-day completion counts for calendar views.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CalendarDay {
    pub date: DateKey,
    pub scheduled: usize,
    pub completed: usize,
}

/// Aggregate numbers for one habit.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HabitStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: usize,
}

/// Repository for statistics operations.
pub trait StatsRepository {
    fn completion_calendar(&self, days: usize, as_of: DateKey) -> Result<Vec<CalendarDay>>;
    fn habit_stats(&self, habit_id: &str, as_of: DateKey) -> Result<HabitStats>;
}

/// SQLite implementation of the repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.pragma_update(None, "foreign_keys", true)?;
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![super::schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }

    fn row_to_habit(row: &rusqlite::Row) -> rusqlite::Result<HabitDefinition> {
        Ok(HabitDefinition {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            icon: row.get(3)?,
            category_id: row.get(4)?,
            category_name: row.get(5)?,
        })
    }

    /// Completed dates for one habit up to `as_of`, newest first.
    fn completion_dates(
        &self,
        habit_id: &str,
        as_of: DateKey,
        limit: Option<usize>,
    ) -> Result<Vec<DateKey>> {
        let sql = match limit {
            Some(_) => {
                "SELECT date_key FROM day_entries
                 WHERE habit_id = ?1 AND date_key <= ?2 AND completed = 1
                 ORDER BY date_key DESC LIMIT ?3"
            }
            None => {
                "SELECT date_key FROM day_entries
                 WHERE habit_id = ?1 AND date_key <= ?2 AND completed = 1
                 ORDER BY date_key DESC"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;
        let keys = if let Some(limit) = limit {
            stmt.query_map(
                params![habit_id, as_of.to_string(), limit as i64],
                |row| row.get::<_, String>(0),
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            stmt.query_map(params![habit_id, as_of.to_string()], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?
        };
        let dates = keys
            .iter()
            .map(|key| key.parse::<DateKey>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(dates)
    }
}

/// Replace every entry of one date with `tasks`, flagging those in `completed`.
fn replace_date(conn: &Connection, key: &str, tasks: &[String], completed: &[String]) -> Result<()> {
    conn.execute("DELETE FROM day_entries WHERE date_key = ?1", params![key])?;
    for (position, habit_id) in tasks.iter().enumerate() {
        let done = completed.iter().any(|id| id == habit_id);
        conn.execute(
            "INSERT INTO day_entries (habit_id, date_key, completed, position) VALUES (?1, ?2, ?3, ?4)",
            params![habit_id, key, done, position as i64],
        )?;
    }
    Ok(())
}

impl CatalogRepository for SqliteRepository {
    fn seed_builtins(&mut self, definitions: &[HabitDefinition]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        for def in definitions {
            inserted += tx.execute(
                "INSERT OR IGNORE INTO habits (id, name, description, icon, category_id, category_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    def.id,
                    def.name,
                    def.description,
                    def.icon,
                    def.category_id,
                    def.category_name
                ],
            )?;
        }
        tx.commit()?;
        if inserted > 0 {
            info!(inserted, "built-in habits seeded");
        }
        Ok(inserted)
    }

    fn create_custom(
        &mut self,
        name: &str,
        description: Option<&str>,
        icon: Option<&str>,
    ) -> Result<HabitDefinition> {
        let name = validate_name(name)?;
        let description = match description {
            Some(text) => {
                let text = validate_description(text)?;
                (!text.is_empty()).then(|| text.to_string())
            }
            None => None,
        };
        let def = HabitDefinition {
            id: format!("custom-{}", Uuid::new_v4()),
            name: name.to_string(),
            description,
            icon: icon.map(str::to_string),
            category_id: Some(CUSTOM_CATEGORY_ID),
            category_name: Some(CUSTOM_CATEGORY_NAME.to_string()),
        };
        self.conn.execute(
            "INSERT INTO habits (id, name, description, icon, category_id, category_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                def.id,
                def.name,
                def.description,
                def.icon,
                def.category_id,
                def.category_name
            ],
        )?;
        info!(id = %def.id, "custom habit created");
        Ok(def)
    }

    fn delete_habit(&mut self, habit_id: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        let entries = tx.execute(
            "DELETE FROM day_entries WHERE habit_id = ?1",
            params![habit_id],
        )?;
        let removed = tx.execute("DELETE FROM habits WHERE id = ?1", params![habit_id])?;
        tx.commit()?;
        if removed > 0 {
            info!(id = habit_id, entries, "habit deleted");
        }
        Ok(())
    }

    fn get_habit(&self, habit_id: &str) -> Result<Option<HabitDefinition>> {
        self.conn
            .query_row(
                "SELECT id, name, description, icon, category_id, category_name
                 FROM habits WHERE id = ?1",
                params![habit_id],
                Self::row_to_habit,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_habits(&self) -> Result<Vec<HabitDefinition>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, icon, category_id, category_name
             FROM habits ORDER BY category_id, id",
        )?;
        let habits = stmt
            .query_map([], Self::row_to_habit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    fn list_custom(&self) -> Result<Vec<HabitDefinition>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, icon, category_id, category_name
             FROM habits WHERE category_id = ?1 ORDER BY id",
        )?;
        let habits = stmt
            .query_map(params![CUSTOM_CATEGORY_ID], Self::row_to_habit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    fn categories_for(&self, habit_ids: &[String]) -> Result<Vec<i64>> {
        if habit_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders: String = habit_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!(
            "SELECT DISTINCT category_id FROM habits
             WHERE id IN ({placeholders}) AND category_id IS NOT NULL
             ORDER BY category_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let ids: Vec<&dyn rusqlite::ToSql> = habit_ids
            .iter()
            .map(|id| id as &dyn rusqlite::ToSql)
            .collect();
        let categories = stmt
            .query_map(ids.as_slice(), |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(categories)
    }
}

impl SelectionRepository for SqliteRepository {
    fn write_selection(
        &mut self,
        date_key: DateKey,
        selection: &Selection,
        propagate_to_future: bool,
    ) -> Result<()> {
        let selection = selection.normalized();
        let key = date_key.to_string();
        let tx = self.conn.transaction()?;
        replace_date(&tx, &key, &selection.tasks, &selection.completed)?;
        if propagate_to_future {
            let mut stmt = tx.prepare(
                "SELECT DISTINCT date_key FROM day_entries WHERE date_key > ?1 ORDER BY date_key",
            )?;
            let future = stmt
                .query_map(params![key], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            drop(stmt);
            for later in &future {
                replace_date(&tx, later, &selection.tasks, &[])?;
            }
        }
        tx.commit()?;
        debug!(
            date = %date_key,
            tasks = selection.tasks.len(),
            propagate_to_future,
            "selection written"
        );
        Ok(())
    }

    fn read_selection(&self, date_key: DateKey) -> Result<Option<Selection>> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id, completed FROM day_entries WHERE date_key = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![date_key.to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if rows.is_empty() {
            return Ok(None);
        }
        let tasks: Vec<String> = rows.iter().map(|(id, _)| id.clone()).collect();
        let completed: Vec<String> = rows
            .iter()
            .filter(|(_, done)| *done)
            .map(|(id, _)| id.clone())
            .collect();
        let categories = self.categories_for(&tasks)?;
        Ok(Some(Selection {
            categories,
            tasks,
            completed,
        }))
    }

    fn read_all(&self) -> Result<BTreeMap<DateKey, Selection>> {
        let mut stmt = self.conn.prepare(
            "SELECT date_key, habit_id, completed FROM day_entries ORDER BY date_key, position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
            ))
        })?;
        let mut grouped: BTreeMap<DateKey, Selection> = BTreeMap::new();
        for row in rows {
            let (key, habit_id, completed) = row?;
            let entry = DayEntry {
                habit_id,
                date_key: key.parse()?,
                completed,
            };
            let selection = grouped.entry(entry.date_key).or_default();
            selection.tasks.push(entry.habit_id.clone());
            if entry.completed {
                selection.completed.push(entry.habit_id);
            }
        }
        for selection in grouped.values_mut() {
            selection.categories = self.categories_for(&selection.tasks)?;
        }
        Ok(grouped)
    }

    fn remove_habit_on_date(&mut self, habit_id: &str, date_key: DateKey) -> Result<()> {
        let removed = self.conn.execute(
            "DELETE FROM day_entries WHERE habit_id = ?1 AND date_key = ?2",
            params![habit_id, date_key.to_string()],
        )?;
        if removed > 0 {
            debug!(id = habit_id, date = %date_key, "habit removed from day");
        }
        Ok(())
    }

    fn toggle_completion(
        &mut self,
        habit_id: &str,
        date_key: DateKey,
        completed: bool,
    ) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE day_entries SET completed = ?3 WHERE habit_id = ?1 AND date_key = ?2",
            params![habit_id, date_key.to_string(), completed],
        )?;
        if updated == 0 {
            debug!(id = habit_id, date = %date_key, "toggle ignored: habit not scheduled that day");
        }
        Ok(())
    }

    fn reset_all(&mut self) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM day_entries", [])?;
        info!(removed, "all day entries cleared");
        Ok(())
    }

    fn suggest(&self, date_key: DateKey) -> Result<Vec<String>> {
        let nearest: Option<String> = self
            .conn
            .query_row(
                "SELECT date_key FROM day_entries WHERE date_key < ?1
                 ORDER BY date_key DESC LIMIT 1",
                params![date_key.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(nearest) = nearest else {
            return Ok(Vec::new());
        };
        let mut stmt = self
            .conn
            .prepare("SELECT habit_id FROM day_entries WHERE date_key = ?1 ORDER BY position")?;
        let tasks = stmt
            .query_map(params![nearest], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(tasks)
    }
}

impl StreakRepository for SqliteRepository {
    fn streak_for(&self, habit_id: &str, as_of: DateKey) -> Result<u32> {
        let dates = self.completion_dates(habit_id, as_of, Some(SCAN_CAP))?;
        Ok(current_streak(&dates, as_of))
    }

    fn streaks_for(
        &self,
        habit_ids: &[String],
        as_of: DateKey,
    ) -> Result<HashMap<String, u32>> {
        let mut streaks: HashMap<String, u32> =
            habit_ids.iter().map(|id| (id.clone(), 0)).collect();
        if habit_ids.is_empty() {
            return Ok(streaks);
        }
        let placeholders: String = habit_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!(
            "SELECT habit_id, date_key FROM day_entries
             WHERE habit_id IN ({placeholders}) AND date_key <= ? AND completed = 1
             ORDER BY date_key DESC"
        );
        let as_of_key = as_of.to_string();
        let mut bindings: Vec<&dyn rusqlite::ToSql> = habit_ids
            .iter()
            .map(|id| id as &dyn rusqlite::ToSql)
            .collect();
        bindings.push(&as_of_key);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(bindings.as_slice(), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        // Rows are globally date-descending, so each habit's bucket stays
        // descending; the cap applies per habit, as in the single query.
        let mut grouped: HashMap<String, Vec<DateKey>> = HashMap::new();
        for row in rows {
            let (habit_id, key) = row?;
            let dates = grouped.entry(habit_id).or_default();
            if dates.len() < SCAN_CAP {
                dates.push(key.parse()?);
            }
        }
        for (habit_id, dates) in grouped {
            streaks.insert(habit_id, current_streak(&dates, as_of));
        }
        Ok(streaks)
    }
}

impl StatsRepository for SqliteRepository {
    fn completion_calendar(&self, days: usize, as_of: DateKey) -> Result<Vec<CalendarDay>> {
        let mut data = Vec::with_capacity(days);
        for i in 0..days {
            let Some(date) = as_of.minus_days(i as u64) else {
                break;
            };
            let (scheduled, completed) = self.conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(completed), 0) FROM day_entries WHERE date_key = ?1",
                params![date.to_string()],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)? as usize,
                        row.get::<_, i64>(1)? as usize,
                    ))
                },
            )?;
            data.push(CalendarDay {
                date,
                scheduled,
                completed,
            });
        }
        // Oldest first
        data.reverse();
        Ok(data)
    }

    fn habit_stats(&self, habit_id: &str, as_of: DateKey) -> Result<HabitStats> {
        let dates = self.completion_dates(habit_id, as_of, None)?;
        Ok(HabitStats {
            current_streak: current_streak(&dates, as_of),
            longest_streak: longest_run(&dates),
            total_completions: dates.len(),
        })
    }
}
