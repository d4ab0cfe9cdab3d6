//! Debounced write coordination.
//!
//! Reactive auto-persist collapses rapid mutations of the same day into a
//! single write of the latest state. User-triggered mutations flush pending
//! state first, so they observe and are ordered after it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use habit_core::{DateKey, Selection};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::db::{DbError, SelectionRepository, SqliteRepository};

/// A write that has been scheduled but not yet committed.
struct PendingWrite {
    selection: Selection,
    timer: JoinHandle<()>,
}

/// Per-date debounce of selection writes over the shared repository.
#[derive(Clone)]
pub struct WriteCoordinator {
    repository: Arc<Mutex<SqliteRepository>>,
    pending: Arc<AsyncMutex<HashMap<DateKey, PendingWrite>>>,
    delay: Duration,
}

impl WriteCoordinator {
    pub fn new(repository: Arc<Mutex<SqliteRepository>>, delay: Duration) -> Self {
        Self {
            repository,
            pending: Arc::new(AsyncMutex::new(HashMap::new())),
            delay,
        }
    }

    /// Schedule a debounced write, superseding any pending write for the key.
    pub async fn schedule(&self, date_key: DateKey, selection: Selection) {
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.remove(&date_key) {
            previous.timer.abort();
        }
        let repository = Arc::clone(&self.repository);
        let map = Arc::clone(&self.pending);
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut pending = map.lock().await;
            // No await between remove and commit: an aborted timer has
            // either not touched the map or fully committed.
            if let Some(write) = pending.remove(&date_key) {
                commit(&repository, date_key, &write.selection);
            }
        });
        pending.insert(date_key, PendingWrite { selection, timer });
        debug!(date = %date_key, "write scheduled");
    }

    /// Commit the pending write for a date immediately, if any.
    pub async fn flush(&self, date_key: DateKey) -> Result<(), DbError> {
        let mut pending = self.pending.lock().await;
        match pending.remove(&date_key) {
            Some(write) => {
                write.timer.abort();
                debug!(date = %date_key, "pending write flushed");
                self.write(date_key, &write.selection)
            }
            None => Ok(()),
        }
    }

    /// Commit every pending write immediately. Returns the last error if
    /// any commit failed; all entries are drained regardless.
    pub async fn flush_all(&self) -> Result<(), DbError> {
        let mut pending = self.pending.lock().await;
        let mut result = Ok(());
        for (date_key, write) in pending.drain() {
            write.timer.abort();
            if let Err(e) = self.write(date_key, &write.selection) {
                error!(date = %date_key, error = %e, "flush failed");
                result = Err(e);
            }
        }
        result
    }

    /// The pending, not-yet-committed selection for a date, if any.
    pub async fn peek(&self, date_key: DateKey) -> Option<Selection> {
        self.pending
            .lock()
            .await
            .get(&date_key)
            .map(|write| write.selection.clone())
    }

    /// Drop the pending write for a date without committing it.
    pub async fn cancel(&self, date_key: DateKey) {
        if let Some(write) = self.pending.lock().await.remove(&date_key) {
            write.timer.abort();
        }
    }

    /// Drop every pending write without committing.
    pub async fn cancel_all(&self) {
        let mut pending = self.pending.lock().await;
        for (_, write) in pending.drain() {
            write.timer.abort();
        }
    }

    fn write(&self, date_key: DateKey, selection: &Selection) -> Result<(), DbError> {
        let mut repo = self.repository.lock().expect("repository lock");
        repo.write_selection(date_key, selection, false)
    }
}

/// Commit from a timer task; there is no caller to surface errors to.
fn commit(repository: &Mutex<SqliteRepository>, date_key: DateKey, selection: &Selection) {
    let mut repo = repository.lock().expect("repository lock");
    if let Err(e) = repo.write_selection(date_key, selection, false) {
        error!(date = %date_key, error = %e, "debounced write failed");
    }
}
