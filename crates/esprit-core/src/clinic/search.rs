//! Patient lookup by ID or name.

use super::{ClinicError, ClinicResult, PatientStore};
use crate::models::Patient;

/// Resolves user-entered tokens to patients.
///
/// Name matches are ordered by lowercase name, then ID, so results are
/// reproducible when names repeat.
pub struct SearchIndex<'a> {
    patients: &'a PatientStore,
}

impl<'a> SearchIndex<'a> {
    /// Create a new search index over a patient store.
    pub fn new(patients: &'a PatientStore) -> Self {
        Self { patients }
    }

    /// Resolve a token to a single patient.
    ///
    /// An all-digit token is an exact ID lookup; anything else is a name
    /// query returning the first match. Blank tokens resolve to nothing.
    pub fn resolve(&self, token: &str) -> Option<Patient> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        if let Some(id) = parse_id(token) {
            return id.and_then(|id| self.patients.get_by_id(id).cloned());
        }

        self.matches(token).into_iter().next().cloned()
    }

    /// All patients whose name contains `token`, case-insensitively.
    pub fn search_by_name(&self, token: &str) -> ClinicResult<Vec<Patient>> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ClinicError::Validation("search text is required".into()));
        }

        let results: Vec<Patient> = self.matches(token).into_iter().cloned().collect();
        tracing::debug!(count = results.len(), "Name search");
        Ok(results)
    }

    fn matches(&self, token: &str) -> Vec<&'a Patient> {
        let needle = token.to_lowercase();
        let mut found: Vec<(String, &'a Patient)> = self
            .patients
            .iter()
            .filter(|p| p.name_contains(&needle))
            .map(|p| (p.name.to_lowercase(), p))
            .collect();
        found.sort_by(|(a_name, a), (b_name, b)| a_name.cmp(b_name).then(a.id.cmp(&b.id)));
        found.into_iter().map(|(_, p)| p).collect()
    }
}

/// `Some(_)` when the token is all ASCII digits. The inner value is `None`
/// if the number does not fit an ID.
fn parse_id(token: &str) -> Option<Option<i64>> {
    if token.bytes().all(|b| b.is_ascii_digit()) {
        Some(token.parse().ok())
    } else {
        None
    }
}
