//! optcheck CLI
//!
//! Command-line front end for the trajectory validation harness:
//! replay recorded optimization trajectories, validate them against an
//! external toolchain command, and check the outcomes against the
//! expected-pass / expected-fail registries.

mod args;
mod commands;

use args::{Cli, Commands, ConfigAction};
use clap::Parser;
use optcheck_core::Config;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load_or_default(&cli.config_file)?;

    match cli.command {
        Commands::Run {
            attempts,
            expect_pass,
            expect_fail,
            no_builtin,
            json,
        } => {
            let clean = commands::run::execute(
                &config,
                commands::run::RunOptions {
                    attempts,
                    expect_pass,
                    expect_fail,
                    no_builtin,
                    json,
                },
            )?;
            if !clean {
                std::process::exit(1);
            }
        }
        Commands::Lint {
            expect_pass,
            expect_fail,
        } => commands::lint::execute(expect_pass, expect_fail)?,
        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config::init(&cli.config_file)?,
            ConfigAction::Show => commands::config::show(&config)?,
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
