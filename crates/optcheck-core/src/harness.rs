//! Oracle harness
//!
//! Drives registry entries through replay and the flaky-check driver,
//! compares each outcome against the entry's expected disposition, and
//! aggregates the per-entry classifications into a report.

use crate::env::{ActionSpace, BenchmarkCorpus, CompilerBackend};
use crate::registry::{Expectation, Registry, RegistryEntry};
use crate::replay::ReplayEngine;
use crate::result::ValidationResult;
use crate::validate::Validator;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Classification of one registry entry after a harness run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum EntryOutcome {
    /// Expected to pass and did
    Passed,
    /// Expected to pass but validation failed; full diagnostics attached
    Regression { result: ValidationResult },
    /// Expected to fail and did; the defect is still present
    KnownFailure { result: ValidationResult },
    /// Expected to fail but validated successfully. Never a pass: the
    /// registry needs updating.
    UnexpectedSuccess,
    /// The trajectory could not be replayed at all
    ReplayError { error: String },
}

/// Per-entry line of a harness report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryReport {
    /// Entry identity, `benchmark,commandline`
    pub id: String,
    pub outcome: EntryOutcome,
}

/// Aggregated result of running the harness over registries
#[derive(Debug, Clone, Default, Serialize)]
pub struct HarnessReport {
    pub entries: Vec<EntryReport>,
}

impl HarnessReport {
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Passed))
    }

    pub fn regressions(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Regression { .. }))
    }

    pub fn known_failures(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::KnownFailure { .. }))
    }

    pub fn unexpected_successes(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::UnexpectedSuccess))
    }

    pub fn replay_errors(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::ReplayError { .. }))
    }

    /// A clean report has every entry behaving as its registry expects
    pub fn is_clean(&self) -> bool {
        self.regressions() == 0 && self.unexpected_successes() == 0 && self.replay_errors() == 0
    }

    fn count(&self, predicate: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.outcome))
            .count()
    }
}

/// Runs registry entries through replay + flaky-check
pub struct Harness {
    engine: ReplayEngine,
    validator: Validator,
    attempts: u32,
}

impl Harness {
    pub fn new(
        corpus: Arc<dyn BenchmarkCorpus>,
        actions: Arc<dyn ActionSpace>,
        backend: Arc<dyn CompilerBackend>,
        attempts: u32,
    ) -> Self {
        Self {
            engine: ReplayEngine::new(corpus, actions),
            validator: Validator::new(backend),
            attempts,
        }
    }

    /// Replay one entry onto a fresh environment, run the flaky-check
    /// driver, and classify the outcome against the expectation
    pub fn check_entry(&self, entry: &RegistryEntry) -> EntryOutcome {
        let env = match self.engine.replay_fresh(&entry.record) {
            Ok(env) => env,
            Err(err) => {
                error!(id = %entry.id(), %err, "replay failed");
                return EntryOutcome::ReplayError {
                    error: err.to_string(),
                };
            }
        };

        let result = self.validator.check_flaky(&env, self.attempts);
        match (entry.expectation, result.okay()) {
            (Expectation::Pass, true) => EntryOutcome::Passed,
            (Expectation::Pass, false) => {
                warn!(id = %entry.id(), diagnostics = %result, "regression");
                EntryOutcome::Regression { result }
            }
            (Expectation::Fail, false) => EntryOutcome::KnownFailure { result },
            (Expectation::Fail, true) => {
                warn!(id = %entry.id(), "known-bad trajectory validated; update the registry");
                EntryOutcome::UnexpectedSuccess
            }
        }
    }

    /// Run every entry of the given registries and aggregate a report
    pub fn run<'a>(&self, registries: impl IntoIterator<Item = &'a Registry>) -> HarnessReport {
        let mut report = HarnessReport::default();
        for registry in registries {
            info!(registry = %registry.name, entries = registry.len(), "checking registry");
            for entry in &registry.entries {
                let outcome = self.check_entry(entry);
                report.entries.push(EntryReport {
                    id: entry.id(),
                    outcome,
                });
            }
        }
        report
    }
}
