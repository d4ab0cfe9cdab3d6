//! Shared fixtures for engine integration tests.

use habit_core::{DateKey, HabitDefinition, Selection};
use habit_engine::{Engine, EngineConfig};

/// Engine over in-memory SQLite with a short debounce window and no
/// suggestion materialization, so reads stay side-effect free unless a
/// test opts in.
pub fn test_engine() -> Engine {
    engine_with(EngineConfig {
        debounce_ms: 40,
        materialize_suggestions: false,
    })
}

pub fn engine_with(config: EngineConfig) -> Engine {
    Engine::open_in_memory(config).expect("open in-memory engine")
}

/// Definitions used across tests: three built-ins over three categories.
pub fn sample_habits() -> Vec<HabitDefinition> {
    vec![
        HabitDefinition::builtin("read", "Read", "📖", 4, "Productivity"),
        HabitDefinition::builtin("run", "Run", "🏃", 2, "Fitness"),
        HabitDefinition::builtin("meditate", "Meditate", "🧘", 3, "Mindfulness"),
    ]
}

pub async fn seeded_engine() -> Engine {
    let engine = test_engine();
    engine
        .seed_builtins(&sample_habits())
        .await
        .expect("seed built-ins");
    engine
}

pub fn key(s: &str) -> DateKey {
    s.parse().expect("date key")
}

pub fn tasks(ids: &[&str]) -> Selection {
    Selection::from_tasks(ids.iter().map(|s| s.to_string()).collect())
}
