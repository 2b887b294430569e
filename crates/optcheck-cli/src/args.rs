//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use optcheck_core::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "optcheck")]
#[command(about = "Trajectory validation harness for compiler-optimization environments")]
#[command(
    long_about = r#"optcheck - trajectory validation harness

Replays recorded optimization trajectories and checks, with repeated
validation to surface flakiness, that each transformation is still
semantics-preserving.

USAGE:
  optcheck run                   # Check the built-in registries
  optcheck run --attempts 3      # Fewer validation repetitions
  optcheck lint                  # Decode registries without validating
  optcheck config init           # Create a default optcheck.json

The external validator command is configured in optcheck.json; it is
invoked per check with the benchmark URI and action tokens and must
print a JSON outcome object on stdout."#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config_file: PathBuf,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay and validate registry trajectories against expectations
    Run {
        /// Validation attempts per entry (overrides the config file)
        #[arg(long)]
        attempts: Option<u32>,

        /// Extra expected-pass registry file (repeatable)
        #[arg(long = "expect-pass", value_name = "FILE")]
        expect_pass: Vec<PathBuf>,

        /// Extra expected-fail registry file (repeatable)
        #[arg(long = "expect-fail", value_name = "FILE")]
        expect_fail: Vec<PathBuf>,

        /// Skip the built-in registries
        #[arg(long)]
        no_builtin: bool,

        /// Print the report as JSON instead of styled text
        #[arg(long)]
        json: bool,
    },

    /// Decode registries and check their invariants without validating
    Lint {
        /// Extra expected-pass registry file (repeatable)
        #[arg(long = "expect-pass", value_name = "FILE")]
        expect_pass: Vec<PathBuf>,

        /// Extra expected-fail registry file (repeatable)
        #[arg(long = "expect-fail", value_name = "FILE")]
        expect_fail: Vec<PathBuf>,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Create a default configuration file
    Init,
    /// Show the effective configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args() {
        let cli = Cli::try_parse_from([
            "optcheck",
            "run",
            "--attempts",
            "3",
            "--expect-pass",
            "extra.csv",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                attempts,
                expect_pass,
                no_builtin,
                json,
                ..
            } => {
                assert_eq!(attempts, Some(3));
                assert_eq!(expect_pass, vec![PathBuf::from("extra.csv")]);
                assert!(!no_builtin);
                assert!(json);
            }
            _ => panic!("expected the run subcommand"),
        }
    }
}
