//! Persistence collaborator.
//!
//! The clinic keeps its working state in memory and writes through a
//! [`Persistence`] implementation before committing any change. Two are
//! provided: [`Database`](crate::db::Database) for durable SQLite storage
//! and [`MemoryStore`] for volatile sessions and tests.

mod memory;
mod sqlite;

pub use memory::*;

use thiserror::Error;

use crate::db::DbError;
use crate::models::{Patient, Session};

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Write rejected: {0}")]
    Rejected(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable storage for patients and sessions.
pub trait Persistence: Send {
    /// Write a new patient. The ID is already assigned.
    fn persist_patient(&mut self, patient: &Patient) -> StoreResult<()>;

    /// All stored patients, ordered by ID.
    fn load_patients(&self) -> StoreResult<Vec<Patient>>;

    /// Write a new session and increment the owning patient's visit count,
    /// atomically. Fails if the patient is not stored.
    fn persist_session(&mut self, session: &Session) -> StoreResult<()>;

    /// Stored sessions for one patient, newest first.
    fn load_sessions_for_patient(&self, patient_id: i64) -> StoreResult<Vec<Session>>;

    /// All stored sessions, in append order.
    fn load_sessions(&self) -> StoreResult<Vec<Session>>;
}
