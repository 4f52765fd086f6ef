//! Ocular CLI - screening-grade ocular health indicators from eye photos.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::analyze::{self, AnalyzeArgs};
use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Analyze(args)) => run_analyze(AnalyzeArgs::with_config(args, &config)),
        Some(Commands::Calibration(ref args)) => {
            match commands::calibration::run(args, &config) {
                Ok(()) => ExitCode::Success,
                Err(e) => {
                    eprintln!("error: {e:#}");
                    ExitCode::Error
                }
            }
        }
        None => {
            // Default behavior: analyze with flattened args
            if cli.analyze.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            run_analyze(AnalyzeArgs::with_config(cli.analyze, &config))
        }
    };

    exit_code.into()
}

fn run_analyze(args: AnalyzeArgs) -> ExitCode {
    match analyze::run(&args) {
        Ok(result) => {
            tracing::info!(
                "Finished: {} assessed, {} failed",
                result.assessed,
                result.failed
            );
            result.exit_code
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
