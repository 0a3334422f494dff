//! Patient models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    /// Numeric ID, assigned from 1 upwards and never reused
    pub id: i64,
    /// Patient name (never empty)
    pub name: String,
    /// Gender as entered (e.g., "Female", "Male", "Other")
    pub gender: String,
    /// Birth date, `YYYY-MM-DD`
    pub birth_date: String,
    /// Number of sessions recorded for this patient
    pub visit_count: u32,
}

impl Patient {
    /// Create a patient with no visits yet.
    pub fn new(id: i64, name: String, gender: String, birth_date: String) -> Self {
        Self {
            id,
            name,
            gender,
            birth_date,
            visit_count: 0,
        }
    }

    /// Check whether at least one session has been recorded.
    pub fn has_visits(&self) -> bool {
        self.visit_count > 0
    }

    /// Case-insensitive substring match against the name.
    ///
    /// `needle` must already be lowercase.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

/// Approximate a birth date from an age in years.
///
/// Only the year is known, so the date is pinned to January 1st of
/// `today.year() - age`. Precision below one year is lost.
pub fn birth_date_from_age(age: u32, today: NaiveDate) -> String {
    let year = i64::from(today.year()) - i64::from(age);
    format!("{:04}-01-01", year)
}
