//! End-to-end oracle checks: registries through replay, flaky-check,
//! and report aggregation.

use optcheck_core::{
    BackendOutcome, CompilerBackend, Environment, EntryOutcome, Expectation, Harness,
    InMemoryActionSpace, InMemoryCorpus, Registry, TrajectoryRecord, EXPECTED_FAIL,
    EXPECTED_PASS, VALIDATION_FLAKINESS,
};
use std::sync::{Arc, Mutex};

/// Backend that passes until a designated invocation, then fails once
struct FlakyBackend {
    fail_on_call: usize,
    calls: Mutex<usize>,
}

impl FlakyBackend {
    fn new(fail_on_call: usize) -> Self {
        Self {
            fail_on_call,
            calls: Mutex::new(0),
        }
    }
}

impl CompilerBackend for FlakyBackend {
    fn build_and_compare(&self, _env: &Environment) -> Result<BackendOutcome, String> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        if *calls == self.fail_on_call {
            Ok(BackendOutcome::Mismatch(
                "intermittent output divergence".to_string(),
            ))
        } else {
            Ok(BackendOutcome::Ok)
        }
    }
}

struct AlwaysOk;

impl CompilerBackend for AlwaysOk {
    fn build_and_compare(&self, _env: &Environment) -> Result<BackendOutcome, String> {
        Ok(BackendOutcome::Ok)
    }
}

fn harness(backend: Arc<dyn CompilerBackend>) -> Harness {
    Harness::new(
        Arc::new(InMemoryCorpus::default()),
        Arc::new(InMemoryActionSpace::default()),
        backend,
        VALIDATION_FLAKINESS,
    )
}

#[test]
fn builtin_registries_are_disjoint() {
    assert!(optcheck_core::registry::overlapping_ids(&EXPECTED_PASS, &EXPECTED_FAIL).is_empty());
}

#[test]
fn builtin_records_round_trip_through_csv() {
    for entry in EXPECTED_PASS.entries.iter().chain(&EXPECTED_FAIL.entries) {
        let decoded = TrajectoryRecord::from_csv(&entry.record.to_csv()).unwrap();
        assert_eq!(decoded.benchmark, entry.record.benchmark);
        assert_eq!(decoded.commandline, entry.record.commandline);
    }
}

#[test]
fn expected_pass_registry_is_clean_under_a_deterministic_backend() {
    let report = harness(Arc::new(AlwaysOk)).run([&*EXPECTED_PASS, &*EXPECTED_FAIL]);
    assert_eq!(report.entries.len(), EXPECTED_PASS.len() + EXPECTED_FAIL.len());
    assert_eq!(report.passed(), EXPECTED_PASS.len());
    assert!(report.is_clean());
}

#[test]
fn a_single_intermittent_failure_is_reported_as_a_regression() {
    // The backend fails exactly once, on its 7th invocation. With 8
    // entries at 10 attempts each, a majority-vote policy would hide
    // it; worst-of-N must not.
    let report = harness(Arc::new(FlakyBackend::new(7))).run([&*EXPECTED_PASS]);
    assert_eq!(report.regressions(), 1);
    assert!(!report.is_clean());

    let regression = report
        .entries
        .iter()
        .find_map(|entry| match &entry.outcome {
            EntryOutcome::Regression { result } => Some(result),
            _ => None,
        })
        .expect("one entry must have regressed");
    assert_eq!(regression.attempt, 7);
    assert!(!regression.okay());
}

#[test]
fn replayed_commandline_matches_the_record() {
    let record = &EXPECTED_PASS.entries[0].record;
    let engine = optcheck_core::ReplayEngine::new(
        Arc::new(InMemoryCorpus::default()),
        Arc::new(InMemoryActionSpace::default()),
    );
    let env = engine.replay_fresh(record).unwrap();
    assert_eq!(env.benchmark().uri, record.benchmark);
    assert_eq!(env.commandline(), record.commandline);
}

#[test]
fn external_registry_files_join_the_run() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "demo/extra,,,opt -mem2reg input.bc -o output.bc").unwrap();
    let extra = Registry::load_file(file.path(), Expectation::Pass).unwrap();

    let report = harness(Arc::new(AlwaysOk)).run([&*EXPECTED_PASS, &extra]);
    assert_eq!(report.passed(), EXPECTED_PASS.len() + 1);
}
