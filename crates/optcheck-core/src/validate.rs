//! Validator and flaky-check driver
//!
//! The validator asks the compiler backend for one build/execute/compare
//! cycle and wraps the outcome in a [`ValidationResult`]. The flaky-check
//! driver repeats that check against the same replayed state to surface
//! latent non-determinism: a correct validation is deterministic and
//! should never fail even once, so any single failure fails the check.

use crate::env::{BackendOutcome, CompilerBackend, Environment};
use crate::result::{ValidationFailure, ValidationFailureKind, ValidationResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default number of repeated validation attempts
pub const VALIDATION_FLAKINESS: u32 = 10;

/// Stateless validator over a compiler-backend collaborator.
///
/// No result caching: the flaky-check driver depends on every call
/// re-evaluating the state independently.
pub struct Validator {
    backend: Arc<dyn CompilerBackend>,
}

impl Validator {
    /// Create a validator over the given backend
    pub fn new(backend: Arc<dyn CompilerBackend>) -> Self {
        Self { backend }
    }

    /// Run one equivalence check against the environment's current state
    pub fn validate(&self, env: &Environment) -> ValidationResult {
        let mut failures = Vec::new();
        match self.backend.build_and_compare(env) {
            Ok(BackendOutcome::Ok) => {}
            Ok(BackendOutcome::BuildFailure(detail)) => {
                failures.push(ValidationFailure::new(
                    ValidationFailureKind::BuildFailure,
                    detail,
                ));
            }
            Ok(BackendOutcome::ExecutionFailure(detail)) => {
                failures.push(ValidationFailure::new(
                    ValidationFailureKind::ExecutionFailure,
                    detail,
                ));
            }
            Ok(BackendOutcome::Mismatch(detail)) => {
                failures.push(ValidationFailure::new(
                    ValidationFailureKind::OutputMismatch,
                    detail,
                ));
            }
            Err(detail) => {
                warn!(%detail, "compiler backend could not be invoked");
                failures.push(ValidationFailure::new(
                    ValidationFailureKind::BackendUnavailable,
                    detail,
                ));
            }
        }

        ValidationResult {
            benchmark: env.benchmark().uri.clone(),
            commandline: env.commandline(),
            failures,
            attempt: 1,
        }
    }

    /// Repeat `validate()` up to `attempts` times against the same
    /// state, stopping at the first failure.
    ///
    /// Worst-of-N, not a majority vote: the returned result is the
    /// first failing one (its `attempt` field says which repetition
    /// failed), or the last passing one when all attempts pass. There
    /// is no re-replay, no backoff, and no timeout of its own;
    /// `attempts` below 1 is treated as 1.
    pub fn check_flaky(&self, env: &Environment, attempts: u32) -> ValidationResult {
        let attempts = attempts.max(1);
        let mut attempt = 1;
        let mut result = self.attempt(env, attempt);
        while result.okay() && attempt < attempts {
            attempt += 1;
            result = self.attempt(env, attempt);
        }
        result
    }

    fn attempt(&self, env: &Environment, attempt: u32) -> ValidationResult {
        debug!(attempt, benchmark = %env.benchmark().uri, "validation attempt");
        let mut result = self.validate(env);
        result.attempt = attempt;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::BenchmarkHandle;
    use std::sync::Mutex;

    /// Backend scripted with a per-call outcome sequence; the last
    /// entry repeats. Counts invocations.
    struct ScriptedBackend {
        script: Vec<Result<BackendOutcome, String>>,
        calls: Mutex<usize>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<BackendOutcome, String>>) -> Self {
            Self {
                script,
                calls: Mutex::new(0),
            }
        }

        fn always(outcome: BackendOutcome) -> Self {
            Self::new(vec![Ok(outcome)])
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl CompilerBackend for ScriptedBackend {
        fn build_and_compare(&self, _env: &Environment) -> Result<BackendOutcome, String> {
            let mut calls = self.calls.lock().unwrap();
            let index = (*calls).min(self.script.len() - 1);
            *calls += 1;
            self.script[index].clone()
        }
    }

    fn env() -> Environment {
        Environment::new(BenchmarkHandle::new("demo/foo"))
    }

    #[test]
    fn test_all_attempts_pass() {
        let backend = Arc::new(ScriptedBackend::always(BackendOutcome::Ok));
        let validator = Validator::new(backend.clone());
        let result = validator.check_flaky(&env(), VALIDATION_FLAKINESS);
        assert!(result.okay());
        assert_eq!(result.attempt, VALIDATION_FLAKINESS);
        assert_eq!(backend.calls(), VALIDATION_FLAKINESS as usize);
    }

    #[test]
    fn test_first_failure_stops_the_driver() {
        // Passes 4 times, then mismatches.
        let mut script = vec![Ok(BackendOutcome::Ok); 4];
        script.push(Ok(BackendOutcome::Mismatch("stdout differs".to_string())));
        let backend = Arc::new(ScriptedBackend::new(script));
        let validator = Validator::new(backend.clone());

        let result = validator.check_flaky(&env(), VALIDATION_FLAKINESS);
        assert!(!result.okay());
        assert_eq!(result.attempt, 5);
        assert_eq!(backend.calls(), 5);
        assert_eq!(
            result.failures[0].kind,
            ValidationFailureKind::OutputMismatch
        );
    }

    #[test]
    fn test_single_attempt_degenerates_to_validate() {
        let backend = Arc::new(ScriptedBackend::always(BackendOutcome::BuildFailure(
            "ld returned 1".to_string(),
        )));
        let validator = Validator::new(backend.clone());

        let flaky = validator.check_flaky(&env(), 1);
        let single = validator.validate(&env());
        assert_eq!(flaky.failures, single.failures);
        assert_eq!(flaky.attempt, 1);
        assert_eq!(backend.calls(), 2);
    }

    #[test]
    fn test_zero_attempts_treated_as_one() {
        let backend = Arc::new(ScriptedBackend::always(BackendOutcome::Ok));
        let validator = Validator::new(backend.clone());
        let result = validator.check_flaky(&env(), 0);
        assert!(result.okay());
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn test_backend_unavailable_is_a_failure() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err(
            "failed to spawn toolchain".to_string()
        )]));
        let validator = Validator::new(backend);
        let result = validator.check_flaky(&env(), VALIDATION_FLAKINESS);
        assert!(!result.okay());
        assert!(result.inconclusive());
        assert_eq!(result.attempt, 1);
    }

    #[test]
    fn test_no_caching_between_invocations() {
        // Fails only on the third call; a cached first success would
        // hide it.
        let backend = Arc::new(ScriptedBackend::new(vec![
            Ok(BackendOutcome::Ok),
            Ok(BackendOutcome::Ok),
            Ok(BackendOutcome::ExecutionFailure("sigsegv".to_string())),
            Ok(BackendOutcome::Ok),
        ]));
        let validator = Validator::new(backend.clone());
        let result = validator.check_flaky(&env(), VALIDATION_FLAKINESS);
        assert!(!result.okay());
        assert_eq!(result.attempt, 3);
    }
}
