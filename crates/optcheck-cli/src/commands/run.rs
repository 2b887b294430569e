//! `optcheck run` - replay and validate registry trajectories

use console::style;
use optcheck_core::{
    CommandBackend, Config, EntryOutcome, Harness, HarnessReport, InMemoryActionSpace,
    InMemoryCorpus, Registry,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub struct RunOptions {
    pub attempts: Option<u32>,
    pub expect_pass: Vec<PathBuf>,
    pub expect_fail: Vec<PathBuf>,
    pub no_builtin: bool,
    pub json: bool,
}

/// Run the oracle harness. Returns whether the report was clean.
pub fn execute(config: &Config, options: RunOptions) -> anyhow::Result<bool> {
    let mut expect_pass = config.expected_pass.clone();
    expect_pass.extend(options.expect_pass);
    let mut expect_fail = config.expected_fail.clone();
    expect_fail.extend(options.expect_fail);

    let registries =
        super::collect_registries(!options.no_builtin, &expect_pass, &expect_fail)?;
    let attempts = options.attempts.unwrap_or(config.attempts);
    info!(
        attempts,
        registries = registries.len(),
        backend = %config.backend.command,
        "starting harness run"
    );

    let harness = Harness::new(
        Arc::new(InMemoryCorpus::new(config.benchmarks.clone())),
        Arc::new(InMemoryActionSpace::new(config.actions.clone())),
        Arc::new(CommandBackend::new(
            config.backend.command.clone(),
            config.backend.args.clone(),
        )),
        attempts,
    );
    let report = harness.run(registries.iter().collect::<Vec<&Registry>>());

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(report.is_clean())
}

fn print_report(report: &HarnessReport) {
    for entry in &report.entries {
        let (label, detail) = match &entry.outcome {
            EntryOutcome::Passed => (style("PASS").green(), None),
            EntryOutcome::Regression { result } => {
                (style("REGRESSION").red().bold(), Some(result.to_string()))
            }
            EntryOutcome::KnownFailure { result } => {
                (style("KNOWN-FAIL").yellow(), Some(result.to_string()))
            }
            EntryOutcome::UnexpectedSuccess => (
                style("UNEXPECTED-SUCCESS").magenta().bold(),
                Some("known-bad trajectory validated; update the registry".to_string()),
            ),
            EntryOutcome::ReplayError { error } => {
                (style("REPLAY-ERROR").red().bold(), Some(error.clone()))
            }
        };
        println!("{:>18}  {}", label, entry.id);
        if let Some(detail) = detail {
            println!("{:>18}  {}", "", style(detail).dim());
        }
    }

    println!();
    println!(
        "{} passed, {} regressions, {} known failures, {} unexpected successes, {} replay errors",
        report.passed(),
        report.regressions(),
        report.known_failures(),
        report.unexpected_successes(),
        report.replay_errors(),
    );
    if report.is_clean() {
        println!("{}", style("Registries are clean.").green());
    } else {
        println!("{}", style("Registries are NOT clean.").red().bold());
    }
}
