//! Calendar-day keys.
//!
//! The engine's sole time axis is the local calendar day, carried as a
//! zero-padded `YYYY-MM-DD` string on disk and over the interface. `DateKey`
//! parses that format strictly and always renders it back canonically, so
//! lexicographic order of stored keys matches chronological order.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The stable wire and storage format. Changing this breaks historical data.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day, no time of day, no timezone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `days` calendar days before this one, if representable.
    pub fn minus_days(&self, days: u64) -> Option<Self> {
        self.0.checked_sub_days(Days::new(days)).map(Self)
    }

    /// `days` calendar days after this one, if representable.
    pub fn plus_days(&self, days: u64) -> Option<Self> {
        self.0.checked_add_days(Days::new(days)).map(Self)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidDateKey {
            value: s.to_string(),
        };
        let date = NaiveDate::parse_from_str(s, DATE_KEY_FORMAT).map_err(|_| invalid())?;
        // parse_from_str accepts unpadded fields; the stored format does not.
        if date.format(DATE_KEY_FORMAT).to_string() != s {
            return Err(invalid());
        }
        Ok(Self(date))
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for DateKey {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
