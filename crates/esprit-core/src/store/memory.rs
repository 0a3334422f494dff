//! Volatile in-process persistence.

use super::{Persistence, StoreError, StoreResult};
use crate::models::{Patient, Session};

/// Store that keeps records only for the life of the process.
///
/// Enforces the same constraints as the SQLite schema: unique IDs and
/// sessions that reference a stored patient.
#[derive(Debug, Default)]
pub struct MemoryStore {
    patients: Vec<Patient>,
    sessions: Vec<Session>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for MemoryStore {
    fn persist_patient(&mut self, patient: &Patient) -> StoreResult<()> {
        if self.patients.iter().any(|p| p.id == patient.id) {
            return Err(StoreError::Rejected(format!(
                "duplicate patient id {}",
                patient.id
            )));
        }
        self.patients.push(patient.clone());
        Ok(())
    }

    fn load_patients(&self) -> StoreResult<Vec<Patient>> {
        let mut patients = self.patients.clone();
        patients.sort_by_key(|p| p.id);
        Ok(patients)
    }

    fn persist_session(&mut self, session: &Session) -> StoreResult<()> {
        if self.sessions.iter().any(|s| s.session_id == session.session_id) {
            return Err(StoreError::Rejected(format!(
                "duplicate session id {}",
                session.session_id
            )));
        }
        let patient = self
            .patients
            .iter_mut()
            .find(|p| p.id == session.patient_id)
            .ok_or_else(|| {
                StoreError::Rejected(format!("unknown patient {}", session.patient_id))
            })?;

        patient.visit_count = patient.visit_count.saturating_add(1);
        self.sessions.push(session.clone());
        Ok(())
    }

    fn load_sessions_for_patient(&self, patient_id: i64) -> StoreResult<Vec<Session>> {
        Ok(self
            .sessions
            .iter()
            .rev()
            .filter(|s| s.patient_id == patient_id)
            .cloned()
            .collect())
    }

    fn load_sessions(&self) -> StoreResult<Vec<Session>> {
        Ok(self.sessions.clone())
    }
}
