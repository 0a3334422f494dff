//! EspritCare Core Library
//!
//! Patient and therapy-session tracking backend for a clinic front desk.
//!
//! # Architecture
//!
//! ```text
//!   Forms (add patient / add session / search / dashboard)
//!                          │
//!                    ┌─────▼─────┐
//!                    │  Clinic   │
//!                    └─────┬─────┘
//!       ┌──────────┬───────┼────────┬──────────────┐
//!       ▼          ▼       ▼        ▼              ▼
//!   SearchIndex  SessionLog  RecencyTracker  RankingEngine
//!       │          │                               │
//!       └──────────┴──────► PatientStore ◄─────────┘
//!                                 │
//!                     ┌───────────▼───────────┐
//!                     │      Persistence      │
//!                     │  SQLite  │  in-memory │
//!                     └───────────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **The store is written first.** No patient or session becomes visible in
//! memory unless the persistence write succeeded.
//!
//! # Modules
//!
//! - [`clinic`]: Patient store, session log, recency, ranking, search
//! - [`db`]: SQLite database layer
//! - [`store`]: Persistence trait and in-memory implementation
//! - [`models`]: Domain types (Patient, Session, RecentVisit)
//! - [`config`]: Configuration and logging

pub mod clinic;
pub mod config;
pub mod db;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use clinic::{
    Clinic, ClinicError, ClinicResult, Dashboard, PatientStore, RankingEngine, RecencyTracker,
    SearchIndex, SessionLog,
};
pub use config::{ClinicConfig, StorageConfig};
pub use db::Database;
pub use models::{Patient, RecentVisit, Session};
pub use store::{MemoryStore, Persistence};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum EspritError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<ClinicError> for EspritError {
    fn from(e: ClinicError) -> Self {
        match e {
            ClinicError::Validation(msg) => EspritError::ValidationError(msg),
            ClinicError::NotFound(msg) => EspritError::NotFound(msg),
            ClinicError::Persistence(e) => EspritError::PersistenceError(e.to_string()),
            ClinicError::Config(e) => EspritError::ConfigError(e.to_string()),
        }
    }
}

impl From<config::ConfigError> for EspritError {
    fn from(e: config::ConfigError) -> Self {
        EspritError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for EspritError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        EspritError::PersistenceError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the log subscriber. Safe to call more than once.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) -> bool {
    let installed =
        config::init_logging(filter.as_deref().unwrap_or(config::default_log_filter()));
    tracing::info!("{} core v{}", config::APP_NAME, config::APP_VERSION);
    installed
}

/// Open or create a clinic database at the given path.
#[uniffi::export]
pub fn open_clinic(path: String) -> Result<Arc<EspritCore>, EspritError> {
    let clinic = Clinic::open(&ClinicConfig::sqlite(path))?;
    Ok(EspritCore::wrap(clinic))
}

/// Create a volatile clinic (for testing and demos).
#[uniffi::export]
pub fn open_clinic_in_memory() -> Arc<EspritCore> {
    EspritCore::wrap(Clinic::in_memory())
}

/// Open a clinic as described by a JSON config file.
///
/// Also installs logging with the config's `log_filter` unless a subscriber
/// is already in place.
#[uniffi::export]
pub fn open_clinic_from_config(config_path: String) -> Result<Arc<EspritCore>, EspritError> {
    let config = ClinicConfig::load(&config_path)?;
    if config.init_logging() {
        tracing::info!(filter = %config.log_filter, "Logging initialised from config");
    }
    let clinic = Clinic::open(&config)?;
    Ok(EspritCore::wrap(clinic))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe clinic wrapper for FFI.
///
/// The mutex serialises every operation, so recency insert-and-evict and
/// session commit are never interleaved.
#[derive(uniffi::Object)]
pub struct EspritCore {
    clinic: Mutex<Clinic>,
}

impl EspritCore {
    fn wrap(clinic: Clinic) -> Arc<Self> {
        Arc::new(Self {
            clinic: Mutex::new(clinic),
        })
    }
}

#[uniffi::export]
impl EspritCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Add a new patient.
    pub fn add_patient(
        &self,
        name: String,
        gender: String,
        birth_date: String,
    ) -> Result<FfiPatient, EspritError> {
        let mut clinic = self.clinic.lock()?;
        let patient = clinic.add_patient(&name, &gender, &birth_date)?;
        Ok(patient.into())
    }

    /// Add a patient, an optional first session, and a recent-visit entry.
    pub fn admit_patient(
        &self,
        name: String,
        gender: String,
        birth_date: String,
        notes: String,
    ) -> Result<FfiPatient, EspritError> {
        let mut clinic = self.clinic.lock()?;
        let patient = clinic.admit_patient(&name, &gender, &birth_date, &notes)?;
        Ok(patient.into())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: i64) -> Result<Option<FfiPatient>, EspritError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.patient(id).map(Into::into))
    }

    /// List all patients in insertion order.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, EspritError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.patients().into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Record a session.
    pub fn add_session(&self, patient_id: i64, notes: String) -> Result<FfiSession, EspritError> {
        let mut clinic = self.clinic.lock()?;
        let session = clinic.add_session(patient_id, &notes)?;
        Ok(session.into())
    }

    /// Record a session and mark the patient as recently seen.
    pub fn log_session(&self, patient_id: i64, notes: String) -> Result<FfiSession, EspritError> {
        let mut clinic = self.clinic.lock()?;
        let session = clinic.log_session(patient_id, &notes)?;
        Ok(session.into())
    }

    /// Sessions for one patient, newest first.
    pub fn sessions_for_patient(&self, patient_id: i64) -> Result<Vec<FfiSession>, EspritError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .sessions_for_patient(patient_id)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Every session in append order.
    pub fn all_sessions(&self) -> Result<Vec<FfiSession>, EspritError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.all_sessions().into_iter().map(Into::into).collect())
    }

    /// Session list lines for display.
    pub fn session_list_display(&self) -> Result<Vec<String>, EspritError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.session_list_display())
    }

    // =========================================================================
    // Recency & Ranking
    // =========================================================================

    /// Mark a patient as recently seen.
    pub fn record_visit(&self, patient_id: i64, patient_name: String) -> Result<(), EspritError> {
        let mut clinic = self.clinic.lock()?;
        clinic.record_visit(patient_id, &patient_name);
        Ok(())
    }

    /// Recent visits, oldest first.
    pub fn recent_visits(&self) -> Result<Vec<FfiRecentVisit>, EspritError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.recent_visits().into_iter().map(Into::into).collect())
    }

    /// Top patients by visit count.
    pub fn top_by_visit_count(&self, n: u32) -> Result<Vec<FfiPatient>, EspritError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .top_by_visit_count(n as usize)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Dashboard view.
    pub fn dashboard(&self) -> Result<FfiDashboard, EspritError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.dashboard().into())
    }

    // =========================================================================
    // Search Operations
    // =========================================================================

    /// Resolve a name or ID to one patient.
    pub fn resolve_patient(&self, token: String) -> Result<Option<FfiPatient>, EspritError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.resolve(&token).map(Into::into))
    }

    /// Search patients by partial name.
    pub fn search_patients(&self, query: String) -> Result<Vec<FfiPatient>, EspritError> {
        let clinic = self.clinic.lock()?;
        let patients = clinic.search_by_name(&query)?;
        Ok(patients.into_iter().map(Into::into).collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub birth_date: String,
    pub visit_count: u32,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            gender: patient.gender,
            birth_date: patient.birth_date,
            visit_count: patient.visit_count,
        }
    }
}

/// FFI-safe session.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSession {
    pub session_id: i64,
    pub patient_id: i64,
    pub date: String,
    pub notes: String,
}

impl From<Session> for FfiSession {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.session_id,
            patient_id: session.patient_id,
            date: session.date,
            notes: session.notes,
        }
    }
}

/// FFI-safe recent visit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecentVisit {
    pub patient_id: i64,
    pub patient_name: String,
}

impl From<RecentVisit> for FfiRecentVisit {
    fn from(visit: RecentVisit) -> Self {
        Self {
            patient_id: visit.patient_id,
            patient_name: visit.patient_name,
        }
    }
}

/// FFI-safe dashboard.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDashboard {
    pub recent: Vec<FfiPatient>,
    pub frequent: Vec<FfiPatient>,
}

impl From<Dashboard> for FfiDashboard {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            recent: dashboard.recent.into_iter().map(Into::into).collect(),
            frequent: dashboard.frequent.into_iter().map(Into::into).collect(),
        }
    }
}
