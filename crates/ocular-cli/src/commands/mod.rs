//! CLI command definitions and handlers.

pub mod analyze;
pub mod calibration;

use clap::{Parser, Subcommand};

/// Ocular - screening-grade eye health indicators from photos
#[derive(Parser)]
#[command(name = "ocular")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared analyze arguments (paths, calibration, output flags).
    #[command(flatten)]
    pub analyze: analyze::AnalyzeArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Assess fatigue, dry-eye and inflammation indicators
    Analyze(analyze::AnalyzeArgs),
    /// Print the effective calibration as TOML
    Calibration(calibration::CalibrationArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every image had an eye assessed.
    Success = 0,
    /// At least one image failed analysis.
    AnalysisFailed = 1,
    /// Runtime error.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
