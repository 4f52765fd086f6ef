//! Configuration file support for ocular.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/ocular/config.toml` (lowest priority)
//! - Project-local: `.ocular.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use ocular_core::HealthCalibration;
use serde::Deserialize;
use tracing::{debug, info};

/// File name of the project-local config.
pub const PROJECT_CONFIG: &str = ".ocular.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Landmark sidecar settings.
    pub landmarks: LandmarksConfig,
    /// Health heuristic constants.
    pub calibration: CalibrationConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Landmark provider configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct LandmarksConfig {
    /// Enable/disable the landmark provider.
    pub enabled: Option<bool>,
    /// Directory holding `<stem>.landmarks.json` sidecars.
    pub dir: Option<PathBuf>,
}

/// Calibration overrides. Unset fields keep the built-in value.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Aperture ratio at which fatigue starts to register.
    pub fatigue_open_ratio: Option<f32>,
    /// Fatigue gain.
    pub fatigue_gain: Option<f32>,
    /// Fatigue used without an eye candidate.
    pub fatigue_default: Option<f32>,
    /// Dry-eye gain.
    pub dry_eye_gain: Option<f32>,
    /// Dry-eye used without an eye candidate.
    pub dry_eye_default: Option<f32>,
}

impl CalibrationConfig {
    /// Applies the set fields on top of `base`.
    #[must_use]
    pub fn apply(&self, base: HealthCalibration) -> HealthCalibration {
        HealthCalibration {
            fatigue_open_ratio: self.fatigue_open_ratio.unwrap_or(base.fatigue_open_ratio),
            fatigue_gain: self.fatigue_gain.unwrap_or(base.fatigue_gain),
            fatigue_default: self.fatigue_default.unwrap_or(base.fatigue_default),
            dry_eye_gain: self.dry_eye_gain.unwrap_or(base.dry_eye_gain),
            dry_eye_default: self.dry_eye_default.unwrap_or(base.dry_eye_default),
        }
    }
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/ocular/config.toml`
    /// 2. Project-local: `.ocular.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings
    /// and dropped.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        for problem in config.sanitize() {
            eprintln!("warning: {problem}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    ///
    /// Returns one message per offending value.
    fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let calibration = &self.calibration;
        for (name, value) in [
            ("fatigue_open_ratio", calibration.fatigue_open_ratio),
            ("fatigue_gain", calibration.fatigue_gain),
            ("fatigue_default", calibration.fatigue_default),
            ("dry_eye_gain", calibration.dry_eye_gain),
            ("dry_eye_default", calibration.dry_eye_default),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    problems.push(format!(
                        "calibration.{name} must be a non-negative number, got {v}"
                    ));
                }
            }
        }
        for (name, value) in [
            ("fatigue_default", calibration.fatigue_default),
            ("dry_eye_default", calibration.dry_eye_default),
        ] {
            if let Some(v) = value {
                if v > 100.0 {
                    problems.push(format!("calibration.{name} must be 0-100, got {v}"));
                }
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                problems.push(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        problems
    }

    /// Drops invalid values so the built-in defaults apply, returning the
    /// validation messages.
    fn sanitize(&mut self) -> Vec<String> {
        let problems = self.validate();
        if problems.is_empty() {
            return problems;
        }

        let calibration = &mut self.calibration;
        for value in [
            &mut calibration.fatigue_open_ratio,
            &mut calibration.fatigue_gain,
            &mut calibration.dry_eye_gain,
        ] {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                *value = None;
            }
        }
        for value in [
            &mut calibration.fatigue_default,
            &mut calibration.dry_eye_default,
        ] {
            if value.is_some_and(|v| !(0.0..=100.0).contains(&v)) {
                *value = None;
            }
        }
        if self
            .output
            .format
            .as_deref()
            .is_some_and(|f| f != "json" && f != "jsonl")
        {
            self.output.format = None;
        }

        problems
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        self.landmarks.enabled = other.landmarks.enabled.or(self.landmarks.enabled);
        self.landmarks.dir = other.landmarks.dir.or_else(|| self.landmarks.dir.take());

        let calibration = &mut self.calibration;
        calibration.fatigue_open_ratio = other
            .calibration
            .fatigue_open_ratio
            .or(calibration.fatigue_open_ratio);
        calibration.fatigue_gain = other.calibration.fatigue_gain.or(calibration.fatigue_gain);
        calibration.fatigue_default = other
            .calibration
            .fatigue_default
            .or(calibration.fatigue_default);
        calibration.dry_eye_gain = other.calibration.dry_eye_gain.or(calibration.dry_eye_gain);
        calibration.dry_eye_default = other
            .calibration
            .dry_eye_default
            .or(calibration.dry_eye_default);

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ocular").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.ocular.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG))
        .find(|path| path.exists())
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
