//! Write coordination and shared-handle tests.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::{key, sample_habits, seeded_engine, tasks};
use habit_engine::{DbError, Engine, EngineConfig, SharedEngine};
use pretty_assertions::assert_eq;
use tokio::time::sleep;

#[tokio::test]
async fn rapid_schedules_collapse_into_the_latest_state() -> anyhow::Result<()> {
    let engine = seeded_engine().await;
    let day = key("2025-01-10");

    engine.schedule_write(day, tasks(&["read"])).await;
    engine.schedule_write(day, tasks(&["read", "run"])).await;
    engine
        .schedule_write(day, tasks(&["read", "run", "meditate"]))
        .await;

    sleep(Duration::from_millis(120)).await;
    let selection = engine.read_selection(day).await?;
    assert_eq!(
        selection.tasks,
        vec![
            "read".to_string(),
            "run".to_string(),
            "meditate".to_string()
        ]
    );
    Ok(())
}

#[tokio::test]
async fn read_all_flushes_pending_writes_exactly_once() -> anyhow::Result<()> {
    let engine = seeded_engine().await;
    let day = key("2025-01-10");

    engine.schedule_write(day, tasks(&["read"])).await;

    // read_all flushes the pending write first, so the entry must be there,
    // and the cancelled timer must not fire a second, stale write later.
    let all = engine.read_all().await?;
    assert_eq!(all[&day].tasks, vec!["read".to_string()]);
    sleep(Duration::from_millis(120)).await;
    assert_eq!(engine.read_all().await?[&day].tasks, vec!["read".to_string()]);
    Ok(())
}

#[tokio::test]
async fn reads_see_the_pending_state_before_commit() -> anyhow::Result<()> {
    let engine = seeded_engine().await;
    let day = key("2025-01-10");
    engine
        .write_selection(day, &tasks(&["meditate"]), false)
        .await?;

    engine.schedule_write(day, tasks(&["read", "run"])).await;

    // Immediately after scheduling, the read reflects the pending write,
    // not the stored row, and categories are freshly computed.
    let selection = engine.read_selection(day).await?;
    assert_eq!(selection.tasks, vec!["read".to_string(), "run".to_string()]);
    assert_eq!(selection.categories, vec![2, 4]);
    Ok(())
}

#[tokio::test]
async fn a_direct_write_supersedes_the_pending_one() -> anyhow::Result<()> {
    let engine = seeded_engine().await;
    let day = key("2025-01-10");

    engine.schedule_write(day, tasks(&["read", "run"])).await;
    engine.write_selection(day, &tasks(&["meditate"]), false).await?;

    // The debounced write was cancelled; it must not clobber the explicit
    // one when its window elapses.
    sleep(Duration::from_millis(120)).await;
    let selection = engine.read_selection(day).await?;
    assert_eq!(selection.tasks, vec!["meditate".to_string()]);
    Ok(())
}

#[tokio::test]
async fn toggling_right_after_scheduling_lands_on_the_scheduled_state() -> anyhow::Result<()> {
    let engine = seeded_engine().await;
    let day = key("2025-01-10");

    engine.schedule_write(day, tasks(&["read", "run"])).await;
    // No sleep: the toggle must flush the pending selection first, then
    // flip the flag on it.
    engine.toggle_completion("read", day, true).await?;

    let selection = engine.read_selection(day).await?;
    assert_eq!(selection.tasks, vec!["read".to_string(), "run".to_string()]);
    assert_eq!(selection.completed, vec!["read".to_string()]);
    Ok(())
}

#[tokio::test]
async fn streak_queries_observe_pending_writes() -> anyhow::Result<()> {
    let engine = seeded_engine().await;
    let day = key("2025-01-10");
    let mut done = tasks(&["read"]);
    done.completed = vec!["read".to_string()];

    engine.schedule_write(day, done).await;
    assert_eq!(engine.streak_for("read", day).await?, 1);
    Ok(())
}

#[tokio::test]
async fn reset_drops_pending_writes_instead_of_flushing_them() -> anyhow::Result<()> {
    let engine = seeded_engine().await;
    engine.schedule_write(key("2025-01-10"), tasks(&["read"])).await;

    engine.reset_all().await?;

    sleep(Duration::from_millis(120)).await;
    assert!(engine.read_all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn pending_writes_for_different_days_are_independent() -> anyhow::Result<()> {
    let engine = seeded_engine().await;
    engine.schedule_write(key("2025-01-10"), tasks(&["read"])).await;
    engine.schedule_write(key("2025-01-11"), tasks(&["run"])).await;

    sleep(Duration::from_millis(120)).await;
    let all = engine.read_all().await?;
    assert_eq!(all[&key("2025-01-10")].tasks, vec!["read".to_string()]);
    assert_eq!(all[&key("2025-01-11")].tasks, vec!["run".to_string()]);
    Ok(())
}

#[tokio::test]
async fn the_shared_handle_rejects_use_before_init() {
    static UNINITIALIZED: SharedEngine = SharedEngine::new();
    assert!(matches!(
        UNINITIALIZED.get(),
        Err(DbError::NotInitialized)
    ));
}

#[tokio::test]
async fn concurrent_initialization_collapses_into_one_open() -> anyhow::Result<()> {
    static SHARED: SharedEngine = SharedEngine::new();
    static OPENS: AtomicUsize = AtomicUsize::new(0);

    let mut handles = Vec::new();
    for _ in 0..8 {
        handles.push(tokio::spawn(async {
            SHARED
                .init_with(|| {
                    OPENS.fetch_add(1, Ordering::SeqCst);
                    Engine::open_in_memory(EngineConfig::default())
                })
                .await
                .map(|_| ())
        }));
    }
    for handle in handles {
        handle.await.expect("join")?;
    }

    assert_eq!(OPENS.load(Ordering::SeqCst), 1);
    assert!(SHARED.get().is_ok());
    Ok(())
}

#[tokio::test]
async fn data_survives_reopening_the_same_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("habits.db");

    {
        let engine = Engine::open(&path, EngineConfig::default())?;
        engine.seed_builtins(&sample_habits()).await?;
        let mut done = tasks(&["read"]);
        done.completed = vec!["read".to_string()];
        engine.write_selection(key("2025-01-10"), &done, false).await?;
    }

    let engine = Engine::open(&path, EngineConfig::default())?;
    let selection = engine.read_selection(key("2025-01-10")).await?;
    assert_eq!(selection.tasks, vec!["read".to_string()]);
    assert_eq!(selection.completed, vec!["read".to_string()]);
    assert_eq!(engine.streak_for("read", key("2025-01-10")).await?, 1);
    Ok(())
}
