//! Streak counting.
//!
//! A streak is an unbroken run of completed days ending exactly at the
//! queried day: if that day itself is not completed, the streak is 0 no
//! matter what came before.

use crate::date_key::DateKey;

/// Most recent completions considered per habit. Streaks past this are
/// reported as the cap; unbounded scans buy nothing in practice.
pub const SCAN_CAP: usize = 100;

/// Count the consecutive run of completed days ending at `as_of`.
///
/// `completions` must hold distinct dates `<= as_of`, sorted descending
/// (newest first).
pub fn current_streak(completions: &[DateKey], as_of: DateKey) -> u32 {
    let mut streak: u32 = 0;
    for date in completions.iter().take(SCAN_CAP) {
        let expected = match as_of.minus_days(u64::from(streak)) {
            Some(d) => d,
            None => break,
        };
        if *date == expected {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Longest consecutive run anywhere in `completions` (distinct dates,
/// sorted descending).
pub fn longest_run(completions: &[DateKey]) -> u32 {
    let mut best: u32 = 0;
    let mut run: u32 = 0;
    let mut prev: Option<DateKey> = None;
    for date in completions {
        run = match prev {
            Some(p) if p.minus_days(1) == Some(*date) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(*date);
    }
    best
}
