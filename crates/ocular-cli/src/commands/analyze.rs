//! Analyze command - assess ocular health indicators in images.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use ocular_adapters::{FsImageSource, SidecarLandmarkProvider};
use ocular_core::{
    AnalysisFailure, AnalysisReport, AnalyzerConfig, EyeAnalyzer, FailedStage, HealthCalibration,
    ImageSource, ProgressEvent, ProgressSink, RegionDetector, ResultOutput,
};
use tracing::{debug, info};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Parse and validate a calibration gain (finite, non-negative).
fn parse_gain(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not a non-negative number"))
    }
}

/// Shared arguments for image analysis.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Files or directories to analyze
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Directory holding `<stem>.landmarks.json` sidecars (default: next to each image)
    #[arg(long, value_name = "DIR")]
    pub landmarks_dir: Option<PathBuf>,

    /// Skip the landmark provider and rely on color-space detection only
    #[arg(long)]
    pub no_landmarks: bool,

    /// Fatigue points per unit of aperture below the open ratio
    #[arg(long, value_parser = parse_gain)]
    pub fatigue_gain: Option<f32>,

    /// Dry-eye points per unit of iris decentration
    #[arg(long, value_parser = parse_gain)]
    pub dry_eye_gain: Option<f32>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl AnalyzeArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        // CLI --no-landmarks wins over `[landmarks] enabled`
        if !args.no_landmarks {
            if let Some(enabled) = config.landmarks.enabled {
                args.no_landmarks = !enabled;
            }
        }
        if args.landmarks_dir.is_none() {
            args.landmarks_dir.clone_from(&config.landmarks.dir);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args.config = Some(config.clone());

        args
    }

    /// Effective calibration: CLI gains over config values over built-ins.
    #[must_use]
    pub fn calibration(&self) -> HealthCalibration {
        let mut calibration = self.config.as_ref().map_or_else(HealthCalibration::default, |c| {
            c.calibration.apply(HealthCalibration::default())
        });
        if let Some(gain) = self.fatigue_gain {
            calibration.fatigue_gain = gain;
        }
        if let Some(gain) = self.dry_eye_gain {
            calibration.dry_eye_gain = gain;
        }
        calibration
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Jsonl)
    }
}

/// Result of running the analyze command.
pub struct AnalyzeResult {
    /// Images with an eye assessment.
    pub assessed: usize,
    /// Images whose analysis failed, decode failures included.
    pub failed: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the analyze command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &AnalyzeArgs) -> Result<AnalyzeResult> {
    info!("Running analyze command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let output = JsonOutput::stdout();

    let mut analyzer = build_analyzer(args);
    let result = process_images(&source, &analyzer, &output, &progress_bar, args);
    analyzer.shutdown();

    result
}

/// Build the analyzer from merged args (CLI + config).
fn build_analyzer(args: &AnalyzeArgs) -> EyeAnalyzer {
    let regions = if args.no_landmarks {
        info!("Landmark provider disabled, using color-space detection only");
        RegionDetector::disabled()
    } else {
        if let Some(dir) = &args.landmarks_dir {
            debug!("Using landmarks directory: {}", dir.display());
        }
        RegionDetector::new(SidecarLandmarkProvider::loader(args.landmarks_dir.clone()))
    };

    let config = AnalyzerConfig {
        calibration: args.calibration(),
    };
    debug!("Calibration: {:?}", config.calibration);

    EyeAnalyzer::new(regions, config)
}

/// Analyze every image from `source`, reporting each outcome.
fn process_images(
    source: &dyn ImageSource,
    analyzer: &EyeAnalyzer,
    output: &JsonOutput,
    progress: &dyn ProgressSink,
    args: &AnalyzeArgs,
) -> Result<AnalyzeResult> {
    let total = source.count_hint();
    let mut assessed = 0usize;
    let mut failed = 0usize;
    let mut all_reports: Vec<AnalysisReport> = Vec::new();

    for (index, image_result) in source.images().enumerate() {
        let report = match image_result {
            Ok(image) => {
                progress.on_event(ProgressEvent::Started {
                    path: image.path.clone(),
                    index,
                    total,
                });
                AnalysisReport::from_outcome(image.path.clone(), analyzer.analyze(&image))
            }
            Err(e) => {
                progress.on_event(ProgressEvent::Started {
                    path: e.path.clone(),
                    index,
                    total,
                });
                AnalysisReport::from_outcome(
                    e.path,
                    Err(AnalysisFailure::new(FailedStage::Decode, e.message)),
                )
            }
        };

        if report.success {
            assessed += 1;
        } else {
            failed += 1;
        }

        progress.on_event(ProgressEvent::Completed {
            report: report.clone(),
        });

        match args.format() {
            OutputFormat::Jsonl => {
                output.write(&report)?;
            }
            OutputFormat::Json => {
                all_reports.push(report);
            }
        }
    }

    if matches!(args.format(), OutputFormat::Json) {
        output.write_array(&all_reports, args.pretty)?;
    }

    output.flush()?;

    progress.on_event(ProgressEvent::Finished { assessed, failed });

    let exit_code = if failed > 0 {
        ExitCode::AnalysisFailed
    } else {
        ExitCode::Success
    };

    Ok(AnalyzeResult {
        assessed,
        failed,
        exit_code,
    })
}
