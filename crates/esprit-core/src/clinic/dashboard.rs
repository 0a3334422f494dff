//! Dashboard view: recent and frequent patients.

use serde::{Deserialize, Serialize};

use crate::models::Patient;

/// What the dashboard shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dashboard {
    /// Recently seen patients, most recent first, with current visit counts
    pub recent: Vec<Patient>,
    /// Most frequently seen patients; patients never seen are left out
    pub frequent: Vec<Patient>,
}

impl Dashboard {
    /// Build from the recency view (oldest first) and a raw ranking.
    pub fn new(recent_oldest_first: Vec<Patient>, ranked: Vec<Patient>) -> Self {
        let mut recent = recent_oldest_first;
        recent.reverse();
        let frequent = ranked.into_iter().filter(Patient::has_visits).collect();
        Self { recent, frequent }
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty() && self.frequent.is_empty()
    }
}
