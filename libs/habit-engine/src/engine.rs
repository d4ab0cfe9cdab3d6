//! The engine facade consumed by the presentation layer.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use habit_core::{DateKey, HabitDefinition, Selection};
use serde::{Deserialize, Serialize};

use crate::coordinator::WriteCoordinator;
use crate::db::{
    CalendarDay, CatalogRepository, DbError, HabitStats, SelectionRepository, SqliteRepository,
    StatsRepository, StreakRepository,
};

type Result<T> = std::result::Result<T, DbError>;

/// Engine tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Window within which repeated writes to one day collapse.
    pub debounce_ms: u64,
    /// Persist suggested selections on first read of an unset day.
    pub materialize_suggestions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            materialize_suggestions: true,
        }
    }
}

/// Habit scheduling and streak engine over one local store.
///
/// Cheap to clone; clones share the store and the pending-write state.
#[derive(Clone)]
pub struct Engine {
    repository: Arc<Mutex<SqliteRepository>>,
    coordinator: WriteCoordinator,
    config: EngineConfig,
}

impl Engine {
    /// Open the engine over a database file, creating it if necessary.
    pub fn open<P: AsRef<Path>>(path: P, config: EngineConfig) -> Result<Self> {
        Self::with_repository(SqliteRepository::open(path)?, config)
    }

    /// Open the engine over an in-memory store (for testing).
    pub fn open_in_memory(config: EngineConfig) -> Result<Self> {
        Self::with_repository(SqliteRepository::open_in_memory()?, config)
    }

    fn with_repository(repository: SqliteRepository, config: EngineConfig) -> Result<Self> {
        let repository = Arc::new(Mutex::new(repository));
        let coordinator = WriteCoordinator::new(
            Arc::clone(&repository),
            Duration::from_millis(config.debounce_ms),
        );
        Ok(Self {
            repository,
            coordinator,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn repo(&self) -> MutexGuard<'_, SqliteRepository> {
        self.repository.lock().expect("repository lock")
    }

    // === Catalog ===

    /// Idempotently insert built-in definitions; returns how many were new.
    pub async fn seed_builtins(&self, definitions: &[HabitDefinition]) -> Result<usize> {
        self.repo().seed_builtins(definitions)
    }

    /// Create a user-defined habit under the reserved custom category.
    pub async fn create_custom(
        &self,
        name: &str,
        description: Option<&str>,
        icon: Option<&str>,
    ) -> Result<HabitDefinition> {
        self.repo().create_custom(name, description, icon)
    }

    /// Delete a habit and every day entry referencing it. No-op for
    /// unknown ids.
    pub async fn delete_habit(&self, habit_id: &str) -> Result<()> {
        // Pending selections may still reference the habit; land them first
        // so the cascade removes those rows too.
        self.coordinator.flush_all().await?;
        self.repo().delete_habit(habit_id)
    }

    pub async fn habit(&self, habit_id: &str) -> Result<Option<HabitDefinition>> {
        self.repo().get_habit(habit_id)
    }

    pub async fn habits(&self) -> Result<Vec<HabitDefinition>> {
        self.repo().list_habits()
    }

    pub async fn custom_habits(&self) -> Result<Vec<HabitDefinition>> {
        self.repo().list_custom()
    }

    // === Selections ===

    /// Replace a day's selection immediately, superseding any pending write
    /// for that day. With `propagate_to_future`, every later day that
    /// already has entries receives the same task list, uncompleted.
    pub async fn write_selection(
        &self,
        date_key: DateKey,
        selection: &Selection,
        propagate_to_future: bool,
    ) -> Result<()> {
        self.coordinator.cancel(date_key).await;
        self.repo()
            .write_selection(date_key, selection, propagate_to_future)
    }

    /// Debounced write: rapid calls for the same day collapse into one
    /// commit of the latest state.
    pub async fn schedule_write(&self, date_key: DateKey, selection: Selection) {
        self.coordinator.schedule(date_key, selection).await;
    }

    /// A day's selection: pending state if a write is in flight, else the
    /// stored rows, else a suggestion derived from the nearest earlier day.
    pub async fn read_selection(&self, date_key: DateKey) -> Result<Selection> {
        if let Some(pending) = self.coordinator.peek(date_key).await {
            let categories = self.repo().categories_for(&pending.tasks)?;
            return Ok(Selection {
                categories,
                ..pending
            });
        }
        if let Some(stored) = self.repo().read_selection(date_key)? {
            return Ok(stored);
        }
        let suggestion = self.suggest(date_key).await?;
        if self.config.materialize_suggestions && !suggestion.is_empty() {
            self.coordinator
                .schedule(date_key, suggestion.clone())
                .await;
        }
        Ok(suggestion)
    }

    /// The selection a new, unset day would start with: the nearest earlier
    /// day's tasks, nothing completed. Never writes.
    pub async fn suggest(&self, date_key: DateKey) -> Result<Selection> {
        let repo = self.repo();
        let tasks = repo.suggest(date_key)?;
        let categories = repo.categories_for(&tasks)?;
        Ok(Selection {
            categories,
            tasks,
            completed: Vec::new(),
        })
    }

    /// Every day that has entries, with pending writes flushed first.
    pub async fn read_all(&self) -> Result<BTreeMap<DateKey, Selection>> {
        self.coordinator.flush_all().await?;
        self.repo().read_all()
    }

    /// Remove one habit from one day only. No-op if not scheduled.
    pub async fn remove_habit_on_date(&self, habit_id: &str, date_key: DateKey) -> Result<()> {
        self.coordinator.flush(date_key).await?;
        self.repo().remove_habit_on_date(habit_id, date_key)
    }

    /// Flip one habit's completion on one day. A pending write for the day
    /// lands first so the toggle applies to the latest state.
    pub async fn toggle_completion(
        &self,
        habit_id: &str,
        date_key: DateKey,
        completed: bool,
    ) -> Result<()> {
        self.coordinator.flush(date_key).await?;
        self.repo().toggle_completion(habit_id, date_key, completed)
    }

    /// Irreversibly delete every day entry. Pending writes are dropped, not
    /// flushed.
    pub async fn reset_all(&self) -> Result<()> {
        self.coordinator.cancel_all().await;
        self.repo().reset_all()
    }

    // === Streaks ===

    pub async fn streak_for(&self, habit_id: &str, as_of: DateKey) -> Result<u32> {
        self.coordinator.flush_all().await?;
        self.repo().streak_for(habit_id, as_of)
    }

    /// Batched streak query; identical results to calling [`Self::streak_for`]
    /// per id.
    pub async fn streaks_for(
        &self,
        habit_ids: &[String],
        as_of: DateKey,
    ) -> Result<HashMap<String, u32>> {
        self.coordinator.flush_all().await?;
        self.repo().streaks_for(habit_ids, as_of)
    }

    // === Stats ===

    /// Per-day scheduled/completed counts for the `days` days ending at
    /// `as_of`, oldest first.
    pub async fn completion_calendar(&self, days: usize, as_of: DateKey) -> Result<Vec<CalendarDay>> {
        self.coordinator.flush_all().await?;
        self.repo().completion_calendar(days, as_of)
    }

    pub async fn habit_stats(&self, habit_id: &str, as_of: DateKey) -> Result<HabitStats> {
        self.coordinator.flush_all().await?;
        self.repo().habit_stats(habit_id, as_of)
    }
}
