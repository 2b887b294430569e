//! Command-line compiler backend
//!
//! [`CommandBackend`] bridges to a real toolchain without this crate
//! knowing compiler internals: it spawns a configured validator
//! command, passing the benchmark URI followed by the applied action
//! tokens as arguments, and reads the outcome as a single JSON object
//! from the last non-empty line of stdout:
//!
//! ```text
//! {"outcome": "ok"}
//! {"outcome": "build_failure", "detail": "ld returned 1"}
//! {"outcome": "execution_failure", "detail": "timeout after 60s"}
//! {"outcome": "mismatch", "detail": "stdout differs at byte 112"}
//! ```
//!
//! A spawn failure, non-zero exit status, or unparseable output all map
//! to backend-unavailable: the command is expected to report even a
//! failed validation as a successful run with a failure outcome.

use crate::env::{BackendOutcome, CompilerBackend, Environment};
use serde::Deserialize;
use std::process::Command;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
enum WireOutcome {
    Ok,
    BuildFailure {
        #[serde(default)]
        detail: String,
    },
    ExecutionFailure {
        #[serde(default)]
        detail: String,
    },
    Mismatch {
        #[serde(default)]
        detail: String,
    },
}

impl From<WireOutcome> for BackendOutcome {
    fn from(wire: WireOutcome) -> Self {
        match wire {
            WireOutcome::Ok => BackendOutcome::Ok,
            WireOutcome::BuildFailure { detail } => BackendOutcome::BuildFailure(detail),
            WireOutcome::ExecutionFailure { detail } => BackendOutcome::ExecutionFailure(detail),
            WireOutcome::Mismatch { detail } => BackendOutcome::Mismatch(detail),
        }
    }
}

/// Compiler backend that shells out to an external validator command
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
}

impl CommandBackend {
    /// Backend invoking `program` with fixed leading `args`; the
    /// benchmark URI and action tokens are appended per call
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl CompilerBackend for CommandBackend {
    fn build_and_compare(&self, env: &Environment) -> Result<BackendOutcome, String> {
        debug!(program = %self.program, benchmark = %env.benchmark().uri, "invoking backend");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&env.benchmark().uri)
            .args(env.commandline())
            .output()
            .map_err(|e| format!("failed to spawn {}: {}", self.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| format!("{} produced no outcome", self.program))?;

        let wire: WireOutcome = serde_json::from_str(line)
            .map_err(|e| format!("unparseable outcome from {}: {}", self.program, e))?;
        Ok(wire.into())
    }
}
