//! Optcheck Core Library
//!
//! This crate implements the validation subsystem of a
//! compiler-optimization environment: replaying recorded optimization
//! trajectories and deciding whether the replayed transformation is
//! observably correct (semantics-preserving and reproducible).
//!
//! The pieces compose in one direction: trajectory [`registry`]
//! entries are decoded from their CSV form ([`record`]), the
//! [`replay`] engine reconstructs the environment state, and the
//! [`validate`] driver repeatedly invokes the compiler-backend
//! equivalence check to surface non-deterministic outcomes. The
//! [`harness`] compares each outcome against the registry's expected
//! disposition. Benchmark storage, the action catalog's transformation
//! semantics, and the compiler toolchain itself are collaborators
//! behind the traits in [`env`].

pub mod backend;
pub mod config;
pub mod env;
pub mod error;
pub mod harness;
pub mod record;
pub mod registry;
pub mod replay;
pub mod result;
pub mod validate;

// Re-export commonly used types
pub use backend::CommandBackend;
pub use config::{BackendConfig, Config, DEFAULT_CONFIG_FILE};
pub use env::{
    Action, ActionSpace, BackendOutcome, BenchmarkCorpus, BenchmarkHandle, CompilerBackend,
    Environment, InMemoryActionSpace, InMemoryCorpus,
};
pub use error::{OptcheckError, OptcheckResult};
pub use harness::{EntryOutcome, EntryReport, Harness, HarnessReport};
pub use record::TrajectoryRecord;
pub use registry::{Expectation, Registry, RegistryEntry, EXPECTED_FAIL, EXPECTED_PASS};
pub use replay::ReplayEngine;
pub use result::{ValidationFailure, ValidationFailureKind, ValidationResult};
pub use validate::{Validator, VALIDATION_FLAKINESS};
