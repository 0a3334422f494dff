//! Frequency ranking by visit count.

use super::PatientStore;
use crate::models::Patient;

/// Ranks patients by how often they have been seen.
///
/// Recomputes from the store on every call.
pub struct RankingEngine<'a> {
    patients: &'a PatientStore,
}

impl<'a> RankingEngine<'a> {
    /// Create a new ranking engine over a patient store.
    pub fn new(patients: &'a PatientStore) -> Self {
        Self { patients }
    }

    /// Top `n` patients by visit count, descending.
    ///
    /// Ties keep insertion order. Zero-visit patients are included.
    pub fn top_by_visit_count(&self, n: usize) -> Vec<Patient> {
        let mut ranked = self.patients.get_all();
        // stable: equal counts stay in insertion order
        ranked.sort_by(|a, b| b.visit_count.cmp(&a.visit_count));
        ranked.truncate(n);
        tracing::debug!(requested = n, returned = ranked.len(), "Ranked patients");
        ranked
    }
}
