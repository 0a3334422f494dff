//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{write_error, Database, DbResult};
use crate::models::Patient;

const PATIENT_COLUMNS: &str = "patient_id, name, gender, birth_date, visit_count";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        gender: row.get(2)?,
        birth_date: row.get(3)?,
        visit_count: row.get(4)?,
    })
}

impl Database {
    /// Insert a new patient, keeping the ID assigned by the caller.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (patient_id, name, gender, birth_date, visit_count)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                patient.id,
                patient.name,
                patient.gender,
                patient.birth_date,
                patient.visit_count,
            ],
        )
        .map_err(|e| write_error(e, &format!("patient {}", patient.id)))?;
        Ok(())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE patient_id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all patients in ID (insertion) order.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY patient_id"
        ))?;

        let rows = stmt.query_map([], patient_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
