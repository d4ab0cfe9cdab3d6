//! Built-in habit catalog.
//!
//! Seeded idempotently at startup. Ids are stable and must never change:
//! persisted day entries reference them.

use crate::types::HabitDefinition;

/// The default built-in definitions.
pub fn builtin_definitions() -> Vec<HabitDefinition> {
    vec![
        HabitDefinition::builtin("drink-water", "Drink water", "💧", 1, "Health"),
        HabitDefinition::builtin("eat-fruit", "Eat fruit", "🍎", 1, "Health"),
        HabitDefinition::builtin("sleep-early", "Sleep early", "😴", 1, "Health"),
        HabitDefinition::builtin("go-for-a-run", "Go for a run", "🏃", 2, "Fitness"),
        HabitDefinition::builtin("stretch", "Stretch", "🤸", 2, "Fitness"),
        HabitDefinition::builtin("take-a-walk", "Take a walk", "🚶", 2, "Fitness"),
        HabitDefinition::builtin("meditate", "Meditate", "🧘", 3, "Mindfulness"),
        HabitDefinition::builtin("write-journal", "Write in journal", "📓", 3, "Mindfulness"),
        HabitDefinition::builtin("practice-gratitude", "Practice gratitude", "🙏", 3, "Mindfulness"),
        HabitDefinition::builtin("read", "Read", "📖", 4, "Productivity"),
        HabitDefinition::builtin("plan-the-day", "Plan the day", "🗓️", 4, "Productivity"),
        HabitDefinition::builtin("tidy-up", "Tidy up", "🧹", 5, "Home"),
    ]
}
