//! Trajectory registries
//!
//! Two named sets of trajectory records guard the validator's oracle
//! behavior over time: "expected-pass" entries must always validate,
//! "expected-fail" entries are acknowledged defects that must keep
//! failing until the underlying issue is fixed and the registry is
//! updated. Both are static data, loaded once and never mutated.

use crate::error::OptcheckResult;
use crate::record::TrajectoryRecord;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Expected validation disposition of a registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The trajectory must validate successfully
    Pass,
    /// The trajectory is a known defect and must fail validation
    Fail,
}

/// One registry entry: a trajectory with its expected disposition
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub record: TrajectoryRecord,
    pub expectation: Expectation,
}

impl RegistryEntry {
    /// Identity string for reporting, `benchmark,commandline`
    pub fn id(&self) -> String {
        self.record.id()
    }
}

/// A named, immutable set of registry entries
#[derive(Debug, Clone)]
pub struct Registry {
    pub name: String,
    pub entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Parse a registry from CSV text, one record per line.
    ///
    /// Blank and whitespace-only lines are stripped before the decoder
    /// sees them.
    pub fn parse(
        name: impl Into<String>,
        expectation: Expectation,
        csv: &str,
    ) -> OptcheckResult<Self> {
        let entries = csv
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                TrajectoryRecord::from_csv(line).map(|record| RegistryEntry {
                    record,
                    expectation,
                })
            })
            .collect::<OptcheckResult<Vec<_>>>()?;

        Ok(Self {
            name: name.into(),
            entries,
        })
    }

    /// Load a registry from a CSV file; the registry is named after
    /// the file stem
    pub fn load_file(path: &Path, expectation: Expectation) -> OptcheckResult<Self> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let csv = std::fs::read_to_string(path)?;
        Self::parse(name, expectation, &csv)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Identities present in both registries. Must be empty: an entry
/// cannot be expected to both pass and fail.
pub fn overlapping_ids(a: &Registry, b: &Registry) -> Vec<String> {
    a.entries
        .iter()
        .filter(|entry| {
            b.entries
                .iter()
                .any(|other| other.record.benchmark == entry.record.benchmark
                    && other.record.commandline == entry.record.commandline)
        })
        .map(|entry| entry.id())
        .collect()
}

/// Trajectories that must keep validating successfully. Shrinking this
/// list hides regressions; grow it when a new fixed defect needs a
/// guard.
const EXPECTED_PASS_CSV: &str = "\
benchmark://cBench-v1/rijndael,,,opt -gvn -loop-unroll -instcombine -gvn -loop-unroll -instcombine input.bc -o output.bc
benchmark://cBench-v1/rijndael,,,opt -gvn -loop-unroll -mem2reg -loop-rotate -gvn -loop-unroll -mem2reg -loop-rotate input.bc -o output.bc
benchmark://cBench-v1/rijndael,,,opt -gvn-hoist input.bc -o output.bc
benchmark://cBench-v1/rijndael,,,opt -jump-threading -sink -partial-inliner -mem2reg -inline -jump-threading -sink -partial-inliner -mem2reg -inline input.bc -o output.bc
benchmark://cBench-v1/rijndael,,,opt -mem2reg -indvars -loop-unroll -simplifycfg -mem2reg -indvars -loop-unroll -simplifycfg input.bc -o output.bc
benchmark://cBench-v1/rijndael,,,opt -mem2reg -instcombine -early-cse-memssa -loop-unroll input.bc -o output.bc
benchmark://cBench-v1/rijndael,,,opt -reg2mem -licm -reg2mem -licm -reg2mem -licm input.bc -o output.bc
benchmark://cBench-v1/rijndael,,,opt -sroa -simplifycfg -partial-inliner input.bc -o output.bc
";

/// Trajectories known to currently fail validation. Empty right now;
/// entries land here when a defect is acknowledged but not yet fixed.
const EXPECTED_FAIL_CSV: &str = "";

/// Built-in expected-pass registry, loaded once at first use
pub static EXPECTED_PASS: Lazy<Registry> = Lazy::new(|| {
    Registry::parse("expected-pass", Expectation::Pass, EXPECTED_PASS_CSV)
        .expect("built-in expected-pass registry is well formed")
});

/// Built-in expected-fail registry, loaded once at first use
pub static EXPECTED_FAIL: Lazy<Registry> = Lazy::new(|| {
    Registry::parse("expected-fail", Expectation::Fail, EXPECTED_FAIL_CSV)
        .expect("built-in expected-fail registry is well formed")
});
