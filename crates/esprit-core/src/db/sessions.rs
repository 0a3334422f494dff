//! Session database operations.

use rusqlite::{params, Row};

use super::{write_error, Database, DbError, DbResult};
use crate::models::Session;

const SESSION_COLUMNS: &str = "session_id, patient_id, session_date, session_notes";

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        session_id: row.get(0)?,
        patient_id: row.get(1)?,
        date: row.get(2)?,
        notes: row.get(3)?,
    })
}

impl Database {
    /// Insert a session and bump the patient's visit count.
    ///
    /// Both writes share one transaction: either the session exists and the
    /// count moved by one, or neither happened.
    pub fn insert_session(&mut self, session: &Session) -> DbResult<()> {
        let tx = self.conn.transaction()?;

        let updated = tx.execute(
            "UPDATE patients SET visit_count = visit_count + 1 WHERE patient_id = ?",
            [session.patient_id],
        )?;
        if updated == 0 {
            return Err(DbError::NotFound(format!("patient {}", session.patient_id)));
        }

        tx.execute(
            r#"
            INSERT INTO sessions (session_id, patient_id, session_date, session_notes)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                session.session_id,
                session.patient_id,
                session.date,
                session.notes,
            ],
        )
        .map_err(|e| write_error(e, &format!("session {}", session.session_id)))?;

        tx.commit()?;
        Ok(())
    }

    /// Sessions for one patient, newest first.
    pub fn list_sessions_for_patient(&self, patient_id: i64) -> DbResult<Vec<Session>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE patient_id = ? ORDER BY session_id DESC"
        ))?;

        let rows = stmt.query_map([patient_id], session_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// All sessions in append order.
    pub fn list_sessions(&self) -> DbResult<Vec<Session>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY session_id"
        ))?;

        let rows = stmt.query_map([], session_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
