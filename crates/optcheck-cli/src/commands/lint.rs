//! `optcheck lint` - decode registries and check their invariants

use anyhow::bail;
use console::style;
use optcheck_core::registry::overlapping_ids;
use optcheck_core::{Expectation, Registry, TrajectoryRecord};
use std::path::PathBuf;

/// Decode all registries, verify the round-trip law and pass/fail
/// disjointness, and list every entry.
pub fn execute(expect_pass: Vec<PathBuf>, expect_fail: Vec<PathBuf>) -> anyhow::Result<()> {
    let registries = super::collect_registries(true, &expect_pass, &expect_fail)?;

    for registry in &registries {
        println!(
            "{} ({} entries)",
            style(&registry.name).bold(),
            registry.len()
        );
        for entry in &registry.entries {
            let encoded = entry.record.to_csv();
            let decoded = TrajectoryRecord::from_csv(&encoded)?;
            if decoded != entry.record {
                bail!("round-trip violation for {}", entry.id());
            }
            println!("  {}", entry.id());
        }
    }

    let (pass, fail): (Vec<&Registry>, Vec<&Registry>) = registries
        .iter()
        .partition(|r| r.entries.iter().all(|e| e.expectation == Expectation::Pass));
    for pass_registry in &pass {
        for fail_registry in &fail {
            let overlap = overlapping_ids(pass_registry, fail_registry);
            if !overlap.is_empty() {
                bail!(
                    "registries {} and {} overlap: {}",
                    pass_registry.name,
                    fail_registry.name,
                    overlap.join(", ")
                );
            }
        }
    }

    println!("{}", style("Registries are well formed.").green());
    Ok(())
}
