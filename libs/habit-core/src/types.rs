//! Core types for the habit engine.

use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::error::ValidationError;

/// Reserved category id marking user-created habits.
pub const CUSTOM_CATEGORY_ID: i64 = 999;

/// Display name of the reserved custom category.
pub const CUSTOM_CATEGORY_NAME: &str = "Custom";

/// Maximum habit name length, in characters.
pub const NAME_MAX_CHARS: usize = 50;

/// Maximum habit description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// A habit definition: built-in (seeded) or custom (user-created).
///
/// Ids are immutable once created; day entries reference them by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitDefinition {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

impl HabitDefinition {
    /// Build a built-in definition with a stable id.
    pub fn builtin(id: &str, name: &str, icon: &str, category_id: i64, category_name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            icon: Some(icon.to_string()),
            category_id: Some(category_id),
            category_name: Some(category_name.to_string()),
        }
    }

    pub fn is_custom(&self) -> bool {
        self.category_id == Some(CUSTOM_CATEGORY_ID)
    }
}

/// Validate a habit name, returning the trimmed form.
pub fn validate_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let len = trimmed.chars().count();
    if len > NAME_MAX_CHARS {
        return Err(ValidationError::NameTooLong {
            len,
            max: NAME_MAX_CHARS,
        });
    }
    Ok(trimmed)
}

/// Validate a habit description, returning the trimmed form.
pub fn validate_description(description: &str) -> Result<&str, ValidationError> {
    let trimmed = description.trim();
    let len = trimmed.chars().count();
    if len > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionTooLong {
            len,
            max: DESCRIPTION_MAX_CHARS,
        });
    }
    Ok(trimmed)
}

/// One `(habit id, day)` record with a completion flag; the atomic storage unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub habit_id: String,
    pub date_key: DateKey,
    pub completed: bool,
}

/// The set of habits scheduled for one day, with completion state.
///
/// `tasks` is order-preserving and duplicate-free, `completed` is a subset of
/// `tasks`. `categories` is a projection recomputed from `tasks` through the
/// catalog; it is never authoritative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub categories: Vec<i64>,
    pub tasks: Vec<String>,
    pub completed: Vec<String>,
}

impl Selection {
    /// A selection scheduling `tasks` with nothing completed yet.
    pub fn from_tasks(tasks: Vec<String>) -> Self {
        Self {
            categories: Vec::new(),
            tasks,
            completed: Vec::new(),
        }
        .normalized()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_completed(&self, habit_id: &str) -> bool {
        self.completed.iter().any(|id| id == habit_id)
    }

    /// Enforce the selection invariants: `tasks` deduplicated preserving
    /// first occurrence, `completed` restricted to `tasks` in task order.
    pub fn normalized(&self) -> Self {
        let mut tasks: Vec<String> = Vec::with_capacity(self.tasks.len());
        for id in &self.tasks {
            if !tasks.contains(id) {
                tasks.push(id.clone());
            }
        }
        let completed = tasks
            .iter()
            .filter(|id| self.completed.contains(id))
            .cloned()
            .collect();
        Self {
            categories: self.categories.clone(),
            tasks,
            completed,
        }
    }

    /// Copy of this selection with one habit's completion flag changed,
    /// for read-modify-write callers.
    pub fn with_completion(&self, habit_id: &str, completed: bool) -> Self {
        let mut next = self.clone();
        next.completed.retain(|id| id != habit_id);
        if completed && next.tasks.iter().any(|id| id == habit_id) {
            next.completed.push(habit_id.to_string());
        }
        next.normalized()
    }
}
