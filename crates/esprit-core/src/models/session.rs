//! Therapy session and recent-visit models.

use serde::{Deserialize, Serialize};

/// Date format used for session dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A recorded therapy session. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Session ID, independent of patient IDs
    pub session_id: i64,
    /// Patient this session belongs to
    pub patient_id: i64,
    /// Date the session was recorded, `YYYY-MM-DD`
    pub date: String,
    /// Free-text notes (may be empty)
    pub notes: String,
}

impl Session {
    /// One-line summary used by the session list view.
    pub fn display_line(&self) -> String {
        format!(
            "Patient ID: {} | Date: {} | Notes: {}",
            self.patient_id, self.date, self.notes
        )
    }
}

/// Today's local date in [`DATE_FORMAT`].
pub fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

/// A "patient was seen" event held by the recency tracker.
///
/// The name is captured when the visit is recorded and is not re-resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecentVisit {
    pub patient_id: i64,
    pub patient_name: String,
}
