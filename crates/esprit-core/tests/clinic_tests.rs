//! Clinic backend integration tests.
//!
//! Covers ID assignment, visit counting, recency bounds, ranking order,
//! search and all-or-nothing writes when the store fails.

use esprit_core::clinic::{Clinic, ClinicError};
use esprit_core::config::ClinicConfig;
use esprit_core::models::{Patient, Session};
use esprit_core::store::{MemoryStore, Persistence, StoreError, StoreResult};
use proptest::prelude::*;

/// Store that refuses writes on demand.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_patients: bool,
    fail_sessions: bool,
}

impl Persistence for FlakyStore {
    fn persist_patient(&mut self, patient: &Patient) -> StoreResult<()> {
        if self.fail_patients {
            return Err(StoreError::Rejected("disk full".into()));
        }
        self.inner.persist_patient(patient)
    }

    fn load_patients(&self) -> StoreResult<Vec<Patient>> {
        self.inner.load_patients()
    }

    fn persist_session(&mut self, session: &Session) -> StoreResult<()> {
        if self.fail_sessions {
            return Err(StoreError::Rejected("disk full".into()));
        }
        self.inner.persist_session(session)
    }

    fn load_sessions_for_patient(&self, patient_id: i64) -> StoreResult<Vec<Session>> {
        self.inner.load_sessions_for_patient(patient_id)
    }

    fn load_sessions(&self) -> StoreResult<Vec<Session>> {
        self.inner.load_sessions()
    }
}

/// Clinic whose store already holds one patient and fails the next session write.
fn clinic_failing_sessions() -> Clinic {
    let mut store = FlakyStore::default();
    store
        .inner
        .persist_patient(&Patient::new(1, "Rina".into(), "Female".into(), "1990-01-01".into()))
        .unwrap();
    store.fail_sessions = true;
    Clinic::with_store(Box::new(store), &ClinicConfig::default()).unwrap()
}

fn clinic_with_counts(counts: &[u32]) -> Clinic {
    let mut clinic = Clinic::in_memory();
    for (i, &count) in counts.iter().enumerate() {
        let patient = clinic
            .add_patient(&format!("Patient {}", i + 1), "Other", "1990-01-01")
            .unwrap();
        for _ in 0..count {
            clinic.add_session(patient.id, "").unwrap();
        }
    }
    clinic
}

// ── Patients ─────────────────────────────────────────────────────────────────

#[test]
fn test_patient_failure_leaves_no_record() {
    let store = FlakyStore {
        fail_patients: true,
        ..FlakyStore::default()
    };
    let mut clinic = Clinic::with_store(Box::new(store), &ClinicConfig::default()).unwrap();

    let result = clinic.add_patient("Rina", "Female", "1990-01-01");

    assert!(matches!(result, Err(ClinicError::Persistence(_))));
    assert!(clinic.patients().is_empty());
    assert!(clinic.resolve("1").is_none());
}

#[test]
fn test_patient_ids_not_consumed_by_failures() {
    let mut clinic = Clinic::in_memory();
    assert!(clinic.add_patient("", "Female", "1990-01-01").is_err());

    let first = clinic.add_patient("Rina", "Female", "1990-01-01").unwrap();
    assert_eq!(first.id, 1);
}

// ── Sessions ─────────────────────────────────────────────────────────────────

#[test]
fn test_round_trip_rina() {
    let mut clinic = Clinic::in_memory();
    let rina = clinic.add_patient("Rina", "Female", "1990-01-01").unwrap();

    clinic.add_session(rina.id, "follow-up").unwrap();

    let sessions = clinic.sessions_for_patient(rina.id);
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].patient_id, rina.id);
    assert_eq!(sessions[0].notes, "follow-up");
    assert_eq!(clinic.patient(rina.id).unwrap().visit_count, 1);
}

#[test]
fn test_unknown_patient_session_changes_nothing() {
    let mut clinic = Clinic::in_memory();
    let rina = clinic.add_patient("Rina", "Female", "1990-01-01").unwrap();
    let before = clinic.patients();

    let result = clinic.add_session(rina.id + 1, "x");

    assert!(matches!(result, Err(ClinicError::NotFound(_))));
    assert_eq!(clinic.patients(), before);
    assert!(clinic.all_sessions().is_empty());
}

#[test]
fn test_session_failure_is_not_counted() {
    let mut clinic = clinic_failing_sessions();

    let result = clinic.log_session(1, "follow-up");

    assert!(matches!(result, Err(ClinicError::Persistence(_))));
    assert_eq!(clinic.patient(1).unwrap().visit_count, 0);
    assert!(clinic.all_sessions().is_empty());
    assert!(clinic.recent_visits().is_empty());
}

#[test]
fn test_admit_keeps_patient_when_first_session_fails() {
    let store = FlakyStore {
        fail_sessions: true,
        ..FlakyStore::default()
    };
    let mut clinic = Clinic::with_store(Box::new(store), &ClinicConfig::default()).unwrap();

    let admitted = clinic
        .admit_patient("Rina", "Female", "1990-01-01", "intake")
        .unwrap();

    assert_eq!(admitted.id, 1);
    assert_eq!(admitted.visit_count, 0);
    assert_eq!(clinic.patients().len(), 1);
    assert!(clinic.all_sessions().is_empty());

    let recent = clinic.recent_visits();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].patient_id, admitted.id);

    // The caller saw success, so nothing prompts a duplicate admission
    assert_eq!(clinic.search_by_name("rina").unwrap().len(), 1);
}

#[test]
fn test_session_ids_fresh_after_failure() {
    let mut clinic = Clinic::in_memory();
    let rina = clinic.add_patient("Rina", "Female", "1990-01-01").unwrap();

    assert!(clinic.add_session(99, "").is_err());
    let session = clinic.add_session(rina.id, "").unwrap();
    assert_eq!(session.session_id, 1);
}

// ── Recency ──────────────────────────────────────────────────────────────────

#[test]
fn test_recency_drops_first_entry() {
    let mut clinic = Clinic::in_memory();
    for id in 1..=6 {
        clinic.record_visit(id, &format!("Patient {}", id));
    }

    let snapshot = clinic.recent_visits();
    assert_eq!(snapshot.len(), 5);
    assert!(snapshot.iter().all(|v| v.patient_id != 1));
    assert_eq!(snapshot[0].patient_id, 2);
    assert_eq!(snapshot[4].patient_id, 6);
}

#[test]
fn test_recency_capacity_configurable() {
    let config = ClinicConfig {
        recent_capacity: 2,
        ..ClinicConfig::default()
    };
    let mut clinic = Clinic::open(&config).unwrap();
    for id in 1..=4 {
        clinic.record_visit(id, "x");
    }
    assert_eq!(clinic.recent_visits().len(), 2);
}

#[test]
fn test_recent_patients_show_current_counts() {
    let mut clinic = Clinic::in_memory();
    let rina = clinic.add_patient("Rina", "Female", "1990-01-01").unwrap();

    clinic.log_session(rina.id, "").unwrap();
    clinic.add_session(rina.id, "").unwrap();

    let recent = clinic.recent_patients();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].visit_count, 2);
}

// ── Ranking ──────────────────────────────────────────────────────────────────

#[test]
fn test_ranking_top_three() {
    let clinic = clinic_with_counts(&[3, 1, 4, 1, 5]);

    let counts: Vec<u32> = clinic
        .top_by_visit_count(3)
        .iter()
        .map(|p| p.visit_count)
        .collect();
    assert_eq!(counts, vec![5, 4, 3]);
}

#[test]
fn test_ranking_ties_keep_insertion_order() {
    let clinic = clinic_with_counts(&[3, 1, 4, 1, 5]);

    let ids: Vec<i64> = clinic.top_by_visit_count(5).iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![5, 3, 1, 2, 4]);
}

#[test]
fn test_ranking_repeatable() {
    let clinic = clinic_with_counts(&[2, 2, 0, 7]);
    assert_eq!(clinic.top_by_visit_count(5), clinic.top_by_visit_count(5));
}

#[test]
fn test_ranking_sees_new_sessions() {
    let mut clinic = clinic_with_counts(&[2, 1]);
    assert_eq!(clinic.top_by_visit_count(1)[0].id, 1);

    clinic.add_session(2, "").unwrap();
    clinic.add_session(2, "").unwrap();
    assert_eq!(clinic.top_by_visit_count(1)[0].id, 2);
}

// ── Search ───────────────────────────────────────────────────────────────────

#[test]
fn test_resolve_by_id() {
    let clinic = clinic_with_counts(&[0; 7]);
    assert_eq!(clinic.resolve("7").unwrap().id, 7);
    assert!(clinic.resolve("8").is_none());
}

#[test]
fn test_resolve_by_partial_name() {
    let mut clinic = Clinic::in_memory();
    for name in ["Ann Smith", "Joanna", "annabel", "Bob"] {
        clinic.add_patient(name, "Other", "1990-01-01").unwrap();
    }

    let names: Vec<String> = clinic
        .search_by_name("ann")
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"Ann Smith".to_string()));
    assert!(names.contains(&"Joanna".to_string()));
    assert!(names.contains(&"annabel".to_string()));

    assert_eq!(clinic.resolve("ann").unwrap().name, "Ann Smith");
    assert!(clinic.resolve("carl").is_none());
}

#[test]
fn test_blank_search_is_validation_error() {
    let clinic = Clinic::in_memory();
    assert!(matches!(
        clinic.search_by_name(""),
        Err(ClinicError::Validation(_))
    ));
}

// ── Properties ───────────────────────────────────────────────────────────────

proptest! {
    /// N patients get IDs 1..=N in call order.
    #[test]
    fn prop_patient_ids_sequential(names in prop::collection::vec("[A-Za-z]{1,12}", 1..20)) {
        let mut clinic = Clinic::in_memory();
        for (i, name) in names.iter().enumerate() {
            let patient = clinic.add_patient(name, "Other", "1990-01-01").unwrap();
            prop_assert_eq!(patient.id, i as i64 + 1);
        }
        prop_assert_eq!(clinic.patients().len(), names.len());
    }

    /// Every session adds exactly one visit to its patient and nothing else.
    #[test]
    fn prop_visit_counts_match_sessions(targets in prop::collection::vec(1i64..=4, 0..40)) {
        let mut clinic = Clinic::in_memory();
        for name in ["Ann", "Bob", "Cy", "Dee"] {
            clinic.add_patient(name, "Other", "1990-01-01").unwrap();
        }

        let mut ids = Vec::new();
        for &pid in &targets {
            ids.push(clinic.add_session(pid, "").unwrap().session_id);
        }

        for patient in clinic.patients() {
            let expected = targets.iter().filter(|&&t| t == patient.id).count();
            prop_assert_eq!(patient.visit_count as usize, expected);
            prop_assert_eq!(clinic.sessions_for_patient(patient.id).len(), expected);
        }

        let expected_ids: Vec<i64> = (1..=targets.len() as i64).collect();
        prop_assert_eq!(ids, expected_ids);
    }

    /// The recency structure never exceeds its capacity and keeps the latest visits.
    #[test]
    fn prop_recency_bounded(
        capacity in 1usize..8,
        visits in prop::collection::vec(1i64..50, 0..30),
    ) {
        let config = ClinicConfig { recent_capacity: capacity, ..ClinicConfig::default() };
        let mut clinic = Clinic::open(&config).unwrap();
        for &id in &visits {
            clinic.record_visit(id, "x");
        }

        let snapshot: Vec<i64> = clinic.recent_visits().iter().map(|v| v.patient_id).collect();
        let keep = visits.len().min(capacity);
        prop_assert_eq!(snapshot.as_slice(), &visits[visits.len() - keep..]);
    }

    /// Ranking is sorted descending and never longer than requested.
    #[test]
    fn prop_ranking_sorted(counts in prop::collection::vec(0u32..6, 0..10), n in 0usize..12) {
        let clinic = clinic_with_counts(&counts);
        let ranked = clinic.top_by_visit_count(n);

        prop_assert_eq!(ranked.len(), n.min(counts.len()));
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].visit_count >= pair[1].visit_count);
            if pair[0].visit_count == pair[1].visit_count {
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }
}
