//! Calibration command - print the effective health calibration.

use anyhow::{Context, Result};
use clap::Args;
use ocular_core::HealthCalibration;
use serde::Serialize;

use crate::config::AppConfig;

/// Arguments for the calibration command
#[derive(Args)]
pub struct CalibrationArgs {
    /// Ignore config files and print the built-in values
    #[arg(long)]
    pub defaults: bool,
}

/// TOML layout matching the `[calibration]` config section.
#[derive(Serialize)]
struct CalibrationFile {
    calibration: HealthCalibration,
}

/// Run the calibration command.
pub fn run(args: &CalibrationArgs, config: &AppConfig) -> Result<()> {
    println!("{}", render(args, config)?);
    Ok(())
}

fn render(args: &CalibrationArgs, config: &AppConfig) -> Result<String> {
    let calibration = if args.defaults {
        HealthCalibration::default()
    } else {
        config.calibration.apply(HealthCalibration::default())
    };
    calibration
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid calibration: {e}"))?;

    toml::to_string(&CalibrationFile { calibration }).context("Failed to serialize calibration")
}
