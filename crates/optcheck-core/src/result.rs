//! Validation results
//!
//! A validation outcome is data, not an error: "the validation failed"
//! is an expected first-class result that the flaky-check driver and
//! the registries reason about uniformly.

use serde::{Deserialize, Serialize};

/// Kind of a single validation failure, distinguishable for triage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailureKind {
    /// The transformed representation did not build
    BuildFailure,
    /// The built artifact crashed or timed out
    ExecutionFailure,
    /// The built artifact's output differs from the baseline
    OutputMismatch,
    /// The toolchain could not be invoked at all; inconclusive, not a pass
    BackendUnavailable,
}

impl std::fmt::Display for ValidationFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::BuildFailure => "build failure",
            Self::ExecutionFailure => "execution failure",
            Self::OutputMismatch => "output mismatch",
            Self::BackendUnavailable => "backend unavailable",
        };
        write!(f, "{}", name)
    }
}

/// One failed check with its diagnostic detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub kind: ValidationFailureKind,
    pub detail: String,
}

impl ValidationFailure {
    pub fn new(kind: ValidationFailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.detail)
        }
    }
}

/// Outcome of one (possibly repeated) validation of an environment state.
///
/// Immutable once returned. `okay()` is a pure function of the payload:
/// a result with no failures is a pass, anything else is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Benchmark the validated environment was positioned at
    pub benchmark: String,
    /// Action tokens applied to the validated environment
    pub commandline: Vec<String>,
    /// Failures observed, empty on a pass
    pub failures: Vec<ValidationFailure>,
    /// 1-based attempt at which this result was produced. Greater than
    /// one means earlier attempts passed, i.e. the failure is flaky.
    pub attempt: u32,
}

impl ValidationResult {
    /// Whether the validated state passed every check
    pub fn okay(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether every failure is inconclusive (backend never ran)
    pub fn inconclusive(&self) -> bool {
        !self.failures.is_empty()
            && self
                .failures
                .iter()
                .all(|f| f.kind == ValidationFailureKind::BackendUnavailable)
    }

    /// JSON form of the diagnostic payload
    pub fn json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Human-readable diagnostic text, one line
    pub fn to_diagnostic_text(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.okay() {
            write!(f, "Validation of {} succeeded", self.benchmark)
        } else {
            let failures: Vec<String> = self.failures.iter().map(|x| x.to_string()).collect();
            write!(
                f,
                "Validation of {} failed on attempt {}: {}",
                self.benchmark,
                self.attempt,
                failures.join("; ")
            )
        }
    }
}
