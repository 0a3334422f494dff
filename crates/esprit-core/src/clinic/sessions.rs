//! Append-only session history.

use super::{ClinicError, ClinicResult, PatientStore};
use crate::models::{today, Session};
use crate::store::Persistence;

/// Ordered history of every recorded session.
///
/// Sessions reference patients by ID only.
#[derive(Debug)]
pub struct SessionLog {
    sessions: Vec<Session>,
    next_id: i64,
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLog {
    /// Create an empty log; the first session gets ID 1.
    pub fn new() -> Self {
        Self {
            sessions: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild from previously persisted sessions.
    pub fn hydrate(mut sessions: Vec<Session>) -> Self {
        sessions.sort_by_key(|s| s.session_id);
        let next_id = sessions.last().map_or(1, |s| s.session_id + 1);
        Self { sessions, next_id }
    }

    /// Record a session dated today.
    pub fn add_session(
        &mut self,
        store: &mut dyn Persistence,
        patients: &mut PatientStore,
        patient_id: i64,
        notes: &str,
    ) -> ClinicResult<Session> {
        self.add_session_on(store, patients, patient_id, notes, today())
    }

    /// Record a session with an explicit date.
    ///
    /// Persist, append and visit-count increment happen together or not at
    /// all: nothing in memory changes until the store accepted the write.
    pub fn add_session_on(
        &mut self,
        store: &mut dyn Persistence,
        patients: &mut PatientStore,
        patient_id: i64,
        notes: &str,
        date: String,
    ) -> ClinicResult<Session> {
        if patients.get_by_id(patient_id).is_none() {
            return Err(ClinicError::NotFound(format!("patient {}", patient_id)));
        }

        let session = Session {
            session_id: self.next_id,
            patient_id,
            date,
            notes: notes.trim().to_string(),
        };

        if let Err(e) = store.persist_session(&session) {
            tracing::warn!(error = %e, patient_id, "Failed to persist session");
            return Err(e.into());
        }

        self.next_id += 1;
        self.sessions.push(session.clone());
        patients.increment_visit_count(patient_id);

        tracing::info!(session_id = session.session_id, patient_id, "Session added");
        Ok(session)
    }

    /// Sessions for one patient, newest first.
    pub fn get_sessions_for_patient(&self, patient_id: i64) -> Vec<Session> {
        self.sessions
            .iter()
            .rev()
            .filter(|s| s.patient_id == patient_id)
            .cloned()
            .collect()
    }

    /// Every session in append order.
    pub fn get_all_sessions_ordered(&self) -> Vec<Session> {
        self.sessions.clone()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
