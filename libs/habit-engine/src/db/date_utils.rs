//! Date helpers.

use chrono::Local;
use habit_core::DateKey;

/// Today's key from the local calendar; the day boundary is local midnight.
pub fn today_key() -> DateKey {
    DateKey::new(Local::now().date_naive())
}
