//! Shared engine handle.
//!
//! One lazily-initialized engine per process; concurrent first callers
//! share a single in-flight initialization instead of racing their own.

use std::path::PathBuf;

use tokio::sync::OnceCell;
use tracing::info;

use crate::db::DbError;
use crate::engine::{Engine, EngineConfig};

/// Database location under the per-user data directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("habitkit")
        .join("habits.db")
}

/// A lazily-initialized engine slot.
pub struct SharedEngine {
    cell: OnceCell<Engine>,
}

impl SharedEngine {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    /// Initialize against the default database path. Safe to call from any
    /// number of tasks; all callers share one initialization and later
    /// calls return the existing engine.
    pub async fn init(&self, config: EngineConfig) -> Result<&Engine, DbError> {
        self.init_with(|| {
            let path = default_db_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            info!(path = %path.display(), "opening habit store");
            Engine::open(&path, config)
        })
        .await
    }

    /// Initialize with an explicit constructor (custom path or in-memory).
    pub async fn init_with<F>(&self, open: F) -> Result<&Engine, DbError>
    where
        F: FnOnce() -> Result<Engine, DbError>,
    {
        self.cell.get_or_try_init(|| async { open() }).await
    }

    /// The engine, once initialization has completed.
    pub fn get(&self) -> Result<&Engine, DbError> {
        self.cell.get().ok_or(DbError::NotInitialized)
    }
}

impl Default for SharedEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide engine handle.
pub static ENGINE: SharedEngine = SharedEngine::new();
