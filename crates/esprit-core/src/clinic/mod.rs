//! Clinic backend: patients, sessions, recency, ranking and search.
//!
//! Flow: a caller resolves a patient through [`SearchIndex`], records a
//! session through [`SessionLog`] (which bumps the visit count held by
//! [`PatientStore`]), then marks the visit in [`RecencyTracker`]. The
//! dashboard reads [`RecencyTracker`] and [`RankingEngine`].

mod dashboard;
mod patients;
mod ranking;
mod recency;
mod search;
mod sessions;

pub use dashboard::*;
pub use patients::*;
pub use ranking::*;
pub use recency::*;
pub use search::*;
pub use sessions::*;

use thiserror::Error;

use crate::config::{ClinicConfig, ConfigError, StorageConfig};
use crate::db::{Database, DbError};
use crate::models::{Patient, RecentVisit, Session};
use crate::store::{MemoryStore, Persistence, StoreError};

/// Clinic errors.
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<DbError> for ClinicError {
    fn from(e: DbError) -> Self {
        ClinicError::Persistence(StoreError::Database(e))
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;

/// The clinic backend: owns the store and every in-memory index.
pub struct Clinic {
    store: Box<dyn Persistence>,
    patients: PatientStore,
    sessions: SessionLog,
    recent: RecencyTracker,
    frequent_count: usize,
}

impl Clinic {
    /// Open the backend selected by configuration.
    pub fn open(config: &ClinicConfig) -> ClinicResult<Self> {
        config.validate()?;
        let store: Box<dyn Persistence> = match &config.storage {
            StorageConfig::Memory => Box::new(MemoryStore::new()),
            StorageConfig::Sqlite { path } => Box::new(Database::open(path)?),
        };
        Self::with_store(store, config)
    }

    /// Volatile clinic with default settings.
    pub fn in_memory() -> Self {
        let config = ClinicConfig::default();
        Self {
            store: Box::new(MemoryStore::new()),
            patients: PatientStore::new(),
            sessions: SessionLog::new(),
            recent: RecencyTracker::with_capacity(config.recent_capacity),
            frequent_count: config.frequent_count,
        }
    }

    /// Build over an existing store, loading whatever it already holds.
    pub fn with_store(store: Box<dyn Persistence>, config: &ClinicConfig) -> ClinicResult<Self> {
        let patients = PatientStore::hydrate(store.load_patients()?);
        let sessions = SessionLog::hydrate(store.load_sessions()?);
        tracing::info!(
            patients = patients.len(),
            sessions = sessions.len(),
            "Clinic loaded"
        );
        Ok(Self {
            store,
            patients,
            sessions,
            recent: RecencyTracker::with_capacity(config.recent_capacity),
            frequent_count: config.frequent_count,
        })
    }

    // =========================================================================
    // Patients
    // =========================================================================

    /// Add a patient.
    pub fn add_patient(
        &mut self,
        name: &str,
        gender: &str,
        birth_date: &str,
    ) -> ClinicResult<Patient> {
        self.patients
            .add_patient(self.store.as_mut(), name, gender, birth_date)
    }

    /// Get a patient by ID.
    pub fn patient(&self, id: i64) -> Option<Patient> {
        self.patients.get_by_id(id).cloned()
    }

    /// All patients in insertion order.
    pub fn patients(&self) -> Vec<Patient> {
        self.patients.get_all()
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Record a session for a patient.
    pub fn add_session(&mut self, patient_id: i64, notes: &str) -> ClinicResult<Session> {
        self.sessions
            .add_session(self.store.as_mut(), &mut self.patients, patient_id, notes)
    }

    /// Sessions for one patient, newest first.
    pub fn sessions_for_patient(&self, patient_id: i64) -> Vec<Session> {
        self.sessions.get_sessions_for_patient(patient_id)
    }

    /// Every session in append order.
    pub fn all_sessions(&self) -> Vec<Session> {
        self.sessions.get_all_sessions_ordered()
    }

    /// Session list lines in append order.
    pub fn session_list_display(&self) -> Vec<String> {
        self.sessions
            .get_all_sessions_ordered()
            .iter()
            .map(Session::display_line)
            .collect()
    }

    // =========================================================================
    // Recency & Ranking
    // =========================================================================

    /// Mark a patient as seen.
    pub fn record_visit(&mut self, patient_id: i64, patient_name: &str) {
        self.recent.record_visit(patient_id, patient_name);
        tracing::debug!(patient_id, "Recorded recent visit");
    }

    /// Recent visits, oldest first.
    pub fn recent_visits(&self) -> Vec<RecentVisit> {
        self.recent.snapshot()
    }

    /// Recent visits resolved to current patient records, oldest first.
    ///
    /// Entries whose patient no longer resolves are skipped.
    pub fn recent_patients(&self) -> Vec<Patient> {
        self.recent
            .snapshot()
            .iter()
            .filter_map(|visit| self.patients.get_by_id(visit.patient_id).cloned())
            .collect()
    }

    /// Top `n` patients by visit count.
    pub fn top_by_visit_count(&self, n: usize) -> Vec<Patient> {
        RankingEngine::new(&self.patients).top_by_visit_count(n)
    }

    /// Dashboard view using the configured frequent-patient count.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(
            self.recent_patients(),
            self.top_by_visit_count(self.frequent_count),
        )
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Resolve a name or ID token to one patient.
    pub fn resolve(&self, token: &str) -> Option<Patient> {
        SearchIndex::new(&self.patients).resolve(token)
    }

    /// All patients whose name contains `token`.
    pub fn search_by_name(&self, token: &str) -> ClinicResult<Vec<Patient>> {
        SearchIndex::new(&self.patients).search_by_name(token)
    }

    // =========================================================================
    // Workflows
    // =========================================================================

    /// Record a session and mark the patient as recently seen.
    pub fn log_session(&mut self, patient_id: i64, notes: &str) -> ClinicResult<Session> {
        let session = self.add_session(patient_id, notes)?;
        if let Some(name) = self.patients.get_by_id(patient_id).map(|p| p.name.clone()) {
            self.record_visit(patient_id, &name);
        }
        Ok(session)
    }

    /// Register a new patient; non-blank notes become their first session.
    ///
    /// Fails only if the patient itself could not be added. Once the patient
    /// is committed it is always returned: a first session that fails to
    /// persist is logged and left out, visible as `visit_count == 0`.
    pub fn admit_patient(
        &mut self,
        name: &str,
        gender: &str,
        birth_date: &str,
        notes: &str,
    ) -> ClinicResult<Patient> {
        let patient = self.add_patient(name, gender, birth_date)?;
        if !notes.trim().is_empty() {
            if let Err(e) = self.add_session(patient.id, notes) {
                tracing::warn!(
                    error = %e,
                    patient_id = patient.id,
                    "Patient admitted without first session"
                );
            }
        }
        self.record_visit(patient.id, &patient.name);
        Ok(self.patient(patient.id).unwrap_or(patient))
    }
}
