//! Authoritative in-memory patient collection.

use super::{ClinicError, ClinicResult};
use crate::models::Patient;
use crate::store::Persistence;

/// Owns every patient record, in ID order.
///
/// IDs are handed out monotonically, so the backing vector stays sorted by
/// ID and lookups can binary search.
#[derive(Debug)]
pub struct PatientStore {
    patients: Vec<Patient>,
    next_id: i64,
}

impl Default for PatientStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientStore {
    /// Create an empty store; the first patient gets ID 1.
    pub fn new() -> Self {
        Self {
            patients: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild from previously persisted records.
    pub fn hydrate(mut patients: Vec<Patient>) -> Self {
        patients.sort_by_key(|p| p.id);
        let next_id = patients.last().map_or(1, |p| p.id + 1);
        Self { patients, next_id }
    }

    /// Add a patient, persisting it before it becomes visible.
    pub fn add_patient(
        &mut self,
        store: &mut dyn Persistence,
        name: &str,
        gender: &str,
        birth_date: &str,
    ) -> ClinicResult<Patient> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClinicError::Validation("patient name is required".into()));
        }

        let patient = Patient::new(
            self.next_id,
            name.to_string(),
            gender.trim().to_string(),
            birth_date.trim().to_string(),
        );

        if let Err(e) = store.persist_patient(&patient) {
            tracing::warn!(error = %e, name = %patient.name, "Failed to persist patient");
            return Err(e.into());
        }

        self.next_id += 1;
        self.patients.push(patient.clone());
        tracing::info!(patient_id = patient.id, "Patient added");
        Ok(patient)
    }

    /// Get a patient by ID.
    pub fn get_by_id(&self, id: i64) -> Option<&Patient> {
        self.position(id).map(|idx| &self.patients[idx])
    }

    /// Snapshot of all patients in insertion order.
    pub fn get_all(&self) -> Vec<Patient> {
        self.patients.clone()
    }

    /// Borrow all patients in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Patient> {
        self.patients.iter()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Count one more visit for a patient.
    ///
    /// Callers validate the ID first; a miss is logged and otherwise ignored.
    pub(crate) fn increment_visit_count(&mut self, id: i64) {
        match self.position(id) {
            Some(idx) => {
                let patient = &mut self.patients[idx];
                patient.visit_count = patient.visit_count.saturating_add(1);
            }
            None => tracing::warn!(patient_id = id, "Visit count increment for unknown patient"),
        }
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.patients.binary_search_by_key(&id, |p| p.id).ok()
    }
}
