//! Habit catalog tests.

mod common;

use common::{key, sample_habits, seeded_engine, tasks, test_engine};
use habit_core::{ValidationError, CUSTOM_CATEGORY_ID, NAME_MAX_CHARS};
use habit_engine::DbError;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn seeding_is_idempotent() {
    let engine = test_engine();
    let first = engine.seed_builtins(&sample_habits()).await.unwrap();
    assert_eq!(first, sample_habits().len());

    let second = engine.seed_builtins(&sample_habits()).await.unwrap();
    assert_eq!(second, 0);
    assert_eq!(engine.habits().await.unwrap().len(), sample_habits().len());
}

#[tokio::test]
async fn seeding_never_overwrites_existing_definitions() {
    let engine = test_engine();
    engine.seed_builtins(&sample_habits()).await.unwrap();

    let mut renamed = sample_habits();
    renamed[0].name = "Something else".to_string();
    engine.seed_builtins(&renamed).await.unwrap();

    let read = engine.habit("read").await.unwrap().unwrap();
    assert_eq!(read.name, "Read");
}

#[tokio::test]
async fn custom_habits_get_prefixed_ids_and_reserved_category() {
    let engine = test_engine();
    let def = engine
        .create_custom("  Water the plants  ", Some("Every pot"), Some("🪴"))
        .await
        .unwrap();

    assert!(def.id.starts_with("custom-"));
    assert_eq!(def.name, "Water the plants");
    assert_eq!(def.category_id, Some(CUSTOM_CATEGORY_ID));
    assert!(def.is_custom());

    let other = engine.create_custom("Another", None, None).await.unwrap();
    assert_ne!(def.id, other.id);
}

#[tokio::test]
async fn list_custom_excludes_builtins() {
    let engine = seeded_engine().await;
    engine.create_custom("Stretch neck", None, None).await.unwrap();

    let custom = engine.custom_habits().await.unwrap();
    assert_eq!(custom.len(), 1);
    assert_eq!(custom[0].name, "Stretch neck");
    assert_eq!(
        engine.habits().await.unwrap().len(),
        sample_habits().len() + 1
    );
}

#[tokio::test]
async fn empty_name_is_rejected() {
    let engine = test_engine();
    let err = engine.create_custom("   ", None, None).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::Validation(ValidationError::EmptyName)
    ));
}

#[tokio::test]
async fn overlong_name_is_rejected() {
    let engine = test_engine();
    let long = "x".repeat(NAME_MAX_CHARS + 1);
    let err = engine.create_custom(&long, None, None).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::Validation(ValidationError::NameTooLong { .. })
    ));
}

#[tokio::test]
async fn deleting_a_habit_cascades_to_its_day_entries() -> anyhow::Result<()> {
    let engine = seeded_engine().await;
    engine
        .write_selection(key("2025-01-10"), &tasks(&["read", "run"]), false)
        .await?;
    engine
        .write_selection(key("2025-01-11"), &tasks(&["read"]), false)
        .await?;

    engine.delete_habit("read").await?;

    assert!(engine.habit("read").await?.is_none());
    let all = engine.read_all().await?;
    assert!(all
        .values()
        .all(|selection| !selection.tasks.iter().any(|id| id == "read")));
    // The other habit's entry survives.
    assert_eq!(all[&key("2025-01-10")].tasks, vec!["run".to_string()]);
    // 2025-01-11 held only the deleted habit and is gone entirely.
    assert!(!all.contains_key(&key("2025-01-11")));
    Ok(())
}

#[tokio::test]
async fn deleting_an_unknown_habit_is_a_noop() {
    let engine = seeded_engine().await;
    engine.delete_habit("no-such-habit").await.unwrap();
    assert_eq!(engine.habits().await.unwrap().len(), sample_habits().len());
}
