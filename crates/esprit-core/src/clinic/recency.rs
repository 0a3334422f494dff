//! Bounded history of recent patient visits.

use std::collections::VecDeque;

use crate::config::DEFAULT_RECENT_CAPACITY;
use crate::models::RecentVisit;

/// Fixed-capacity FIFO of the last visits, oldest evicted first.
///
/// Entries are not deduplicated: a patient seen twice occupies two slots.
#[derive(Debug, Clone)]
pub struct RecencyTracker {
    entries: VecDeque<RecentVisit>,
    capacity: usize,
}

impl Default for RecencyTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RECENT_CAPACITY)
    }
}

impl RecencyTracker {
    /// Create a tracker holding at most `capacity` entries.
    ///
    /// A zero capacity tracker records nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a visit, evicting the oldest entry when full.
    pub fn record_visit(&mut self, patient_id: i64, patient_name: &str) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::debug!(patient_id = evicted.patient_id, "Evicted recent visit");
            }
        }
        self.entries.push_back(RecentVisit {
            patient_id,
            patient_name: patient_name.to_string(),
        });
    }

    /// Entries in insertion order, oldest first.
    pub fn snapshot(&self) -> Vec<RecentVisit> {
        self.entries.iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
