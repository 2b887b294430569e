//! Environment handle and collaborator interfaces
//!
//! The validation subsystem does not know how benchmarks are stored,
//! how actions transform program representation, or how the compiler
//! toolchain builds and compares artifacts. Those collaborators are
//! consumed through the narrow traits defined here.

use crate::error::{OptcheckError, OptcheckResult};
use serde::{Deserialize, Serialize};

/// Opaque handle to a program resolved in the benchmark corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkHandle {
    /// The URI this handle was resolved from
    pub uri: String,
}

impl BenchmarkHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// A single named, atomic program transformation from the action catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The commandline token this action was resolved from
    pub token: String,
}

impl Action {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

/// Benchmark corpus collaborator: maps URIs to benchmark handles
pub trait BenchmarkCorpus: Send + Sync {
    /// Resolve a benchmark URI, failing with
    /// [`OptcheckError::UnknownBenchmark`] when the corpus does not
    /// contain it.
    fn resolve(&self, uri: &str) -> OptcheckResult<BenchmarkHandle>;
}

/// Action catalog collaborator: maps tokens to actions and applies them
pub trait ActionSpace: Send + Sync {
    /// Resolve an action token, failing with
    /// [`OptcheckError::UnknownAction`] when the catalog does not
    /// contain it.
    fn resolve(&self, token: &str) -> OptcheckResult<Action>;

    /// Apply one action to the environment's program representation.
    ///
    /// `Err` carries a transformation-specific detail string; the
    /// replay engine turns it into a replay abort.
    fn apply(&self, env: &mut Environment, action: &Action) -> Result<(), String>;
}

/// Outcome of one compiler-backend equivalence check.
///
/// These are expected results, not errors. Backend invocation failure
/// (could not run the toolchain at all) is the `Err` side of
/// [`CompilerBackend::build_and_compare`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOutcome {
    /// Built, ran, and matched the reference baseline
    Ok,
    /// The transformed representation did not build
    BuildFailure(String),
    /// The built artifact crashed or timed out
    ExecutionFailure(String),
    /// The built artifact's output differs from the baseline
    Mismatch(String),
}

/// Compiler toolchain collaborator: builds the transformed program and
/// compares its observable behavior against the unoptimized baseline
pub trait CompilerBackend: Send + Sync {
    /// Run one build/execute/compare cycle for the environment's
    /// current state. `Err(detail)` means the backend could not be
    /// invoked at all and the check is inconclusive.
    fn build_and_compare(&self, env: &Environment) -> Result<BackendOutcome, String>;
}

/// One live optimization environment instance.
///
/// Holds the benchmark a trajectory was replayed onto and the actions
/// applied so far. An instance must be exclusively owned by one
/// replay/validate sequence at a time; the `&mut` receivers enforce
/// this within safe code.
#[derive(Debug, Clone)]
pub struct Environment {
    benchmark: BenchmarkHandle,
    applied: Vec<Action>,
}

impl Environment {
    /// Create a fresh environment positioned at the given benchmark
    pub fn new(benchmark: BenchmarkHandle) -> Self {
        Self {
            benchmark,
            applied: Vec::new(),
        }
    }

    /// The benchmark this environment is positioned at
    pub fn benchmark(&self) -> &BenchmarkHandle {
        &self.benchmark
    }

    /// Actions applied since the last reset, in application order
    pub fn applied(&self) -> &[Action] {
        &self.applied
    }

    /// Action tokens applied since the last reset
    pub fn commandline(&self) -> Vec<String> {
        self.applied.iter().map(|a| a.token.clone()).collect()
    }

    /// Discard all applied actions and reposition at a benchmark
    pub fn reset(&mut self, benchmark: BenchmarkHandle) {
        self.benchmark = benchmark;
        self.applied.clear();
    }

    /// Record one successfully applied action
    pub(crate) fn push_applied(&mut self, action: Action) {
        self.applied.push(action);
    }
}

/// In-memory benchmark corpus backed by a URI allowlist.
///
/// An empty allowlist is permissive: every URI resolves. This is the
/// mode used when an external toolchain is the real authority on which
/// benchmarks exist.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    known: Vec<String>,
}

impl InMemoryCorpus {
    /// Corpus restricted to the given URIs; empty means permissive
    pub fn new(known: Vec<String>) -> Self {
        Self { known }
    }
}

impl BenchmarkCorpus for InMemoryCorpus {
    fn resolve(&self, uri: &str) -> OptcheckResult<BenchmarkHandle> {
        if self.known.is_empty() || self.known.iter().any(|k| k == uri) {
            Ok(BenchmarkHandle::new(uri))
        } else {
            Err(OptcheckError::unknown_benchmark(uri))
        }
    }
}

/// In-memory action catalog backed by a token allowlist.
///
/// Application only records the action on the environment; the actual
/// transformation is the compiler backend's concern. An empty allowlist
/// is permissive, like [`InMemoryCorpus`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryActionSpace {
    known: Vec<String>,
}

impl InMemoryActionSpace {
    /// Catalog restricted to the given tokens; empty means permissive
    pub fn new(known: Vec<String>) -> Self {
        Self { known }
    }
}

impl ActionSpace for InMemoryActionSpace {
    fn resolve(&self, token: &str) -> OptcheckResult<Action> {
        if self.known.is_empty() || self.known.iter().any(|k| k == token) {
            Ok(Action::new(token))
        } else {
            Err(OptcheckError::unknown_action(token))
        }
    }

    fn apply(&self, _env: &mut Environment, _action: &Action) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_corpus_resolves_anything() {
        let corpus = InMemoryCorpus::default();
        assert!(corpus.resolve("benchmark://anything").is_ok());
    }

    #[test]
    fn test_restricted_corpus_rejects_unknown() {
        let corpus = InMemoryCorpus::new(vec!["benchmark://cBench-v1/rijndael".to_string()]);
        assert!(corpus.resolve("benchmark://cBench-v1/rijndael").is_ok());
        let err = corpus.resolve("benchmark://cBench-v1/susan").unwrap_err();
        assert_eq!(
            err,
            OptcheckError::UnknownBenchmark("benchmark://cBench-v1/susan".to_string())
        );
    }

    #[test]
    fn test_restricted_action_space_rejects_unknown() {
        let actions = InMemoryActionSpace::new(vec!["-mem2reg".to_string()]);
        assert!(actions.resolve("-mem2reg").is_ok());
        let err = actions.resolve("-no-such-pass").unwrap_err();
        assert_eq!(err, OptcheckError::UnknownAction("-no-such-pass".to_string()));
    }

    #[test]
    fn test_environment_reset_clears_applied() {
        let mut env = Environment::new(BenchmarkHandle::new("demo/foo"));
        env.push_applied(Action::new("-gvn"));
        assert_eq!(env.commandline(), vec!["-gvn"]);

        env.reset(BenchmarkHandle::new("demo/bar"));
        assert!(env.applied().is_empty());
        assert_eq!(env.benchmark().uri, "demo/bar");
    }
}
