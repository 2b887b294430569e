//! CLI subcommand implementations

pub mod config;
pub mod lint;
pub mod run;

use anyhow::Context;
use optcheck_core::{Expectation, Registry, EXPECTED_FAIL, EXPECTED_PASS};
use std::path::PathBuf;

/// Assemble the registries for a command: the built-in sets (unless
/// skipped), then files named in the config, then files named on the
/// command line.
pub fn collect_registries(
    include_builtin: bool,
    expect_pass: &[PathBuf],
    expect_fail: &[PathBuf],
) -> anyhow::Result<Vec<Registry>> {
    let mut registries = Vec::new();
    if include_builtin {
        registries.push(EXPECTED_PASS.clone());
        registries.push(EXPECTED_FAIL.clone());
    }
    for (paths, expectation) in [
        (expect_pass, Expectation::Pass),
        (expect_fail, Expectation::Fail),
    ] {
        for path in paths {
            let registry = Registry::load_file(path, expectation)
                .with_context(|| format!("failed to load registry {}", path.display()))?;
            registries.push(registry);
        }
    }
    Ok(registries)
}
