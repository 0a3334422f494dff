//! SQLite-backed persistence.

use super::{Persistence, StoreResult};
use crate::db::Database;
use crate::models::{Patient, Session};

impl Persistence for Database {
    fn persist_patient(&mut self, patient: &Patient) -> StoreResult<()> {
        Ok(self.insert_patient(patient)?)
    }

    fn load_patients(&self) -> StoreResult<Vec<Patient>> {
        Ok(self.list_patients()?)
    }

    fn persist_session(&mut self, session: &Session) -> StoreResult<()> {
        Ok(self.insert_session(session)?)
    }

    fn load_sessions_for_patient(&self, patient_id: i64) -> StoreResult<Vec<Session>> {
        Ok(self.list_sessions_for_patient(patient_id)?)
    }

    fn load_sessions(&self) -> StoreResult<Vec<Session>> {
        Ok(self.list_sessions()?)
    }
}
