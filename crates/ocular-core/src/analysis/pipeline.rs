//! End-to-end analysis of one image.
//!
//! [`EyeAnalyzer::analyze`] walks `Init -> Decoded -> Detected -> Scored ->
//! Done`, stopping with a tagged [`AnalysisFailure`] when no eye is found.
//! It never panics.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::classifier::measure_redness;
use super::color_space::ColorSpaceAnalysis;
use super::health::{self, HealthCalibration};
use super::region::RegionDetector;
use super::{confidence, fallback, panic_message};
use crate::domain::{
    AnalysisFailure, AnalysisOutcome, BoundingBox, Condition, ConditionResult, DetectionMethod,
    EyeAssessment, EyeCandidate, FailedStage, ImageInfo, Metrics,
};

/// Analyzer settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Health heuristic constants.
    pub calibration: HealthCalibration,
}

/// Progress of a single analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Nothing done yet.
    Init,
    /// Pixels are available.
    Decoded,
    /// Region detector and fallback have run.
    Detected,
    /// Confidence and health scores are computed.
    Scored,
    /// Result assembled.
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::Decoded => "decoded",
            Self::Detected => "detected",
            Self::Scored => "scored",
            Self::Done => "done",
        })
    }
}

/// Ocular health analyzer.
///
/// Holds no per-image state; one instance can serve concurrent analyses.
#[derive(Debug)]
pub struct EyeAnalyzer {
    regions: RegionDetector,
    config: AnalyzerConfig,
}

impl EyeAnalyzer {
    /// Creates an analyzer.
    #[must_use]
    pub const fn new(regions: RegionDetector, config: AnalyzerConfig) -> Self {
        Self { regions, config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// The landmark adapter.
    #[must_use]
    pub const fn region_detector(&self) -> &RegionDetector {
        &self.regions
    }

    /// Releases the landmark provider.
    pub fn shutdown(&mut self) {
        self.regions.shutdown();
    }

    /// Analyzes one decoded image.
    ///
    /// Faults inside the pipeline or the landmark provider are reported as
    /// [`FailedStage::Internal`].
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisFailure`] tagged with the stage that stopped the
    /// analysis.
    pub fn analyze(&self, image: &ImageInfo) -> AnalysisOutcome {
        let stage = Cell::new(PipelineStage::Init);
        match panic::catch_unwind(AssertUnwindSafe(|| self.run(image, &stage))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(path = %image.path, stage = %stage.get(), %message, "Analysis faulted");
                Err(
                    AnalysisFailure::new(FailedStage::Internal, "unexpected internal error")
                        .with_diagnostics(BTreeMap::from([
                            ("stage".to_string(), stage.get().to_string()),
                            ("panic".to_string(), message),
                        ])),
                )
            }
        }
    }

    fn run(&self, image: &ImageInfo, stage: &Cell<PipelineStage>) -> AnalysisOutcome {
        if image.is_empty() {
            return Err(AnalysisFailure::new(
                FailedStage::Decode,
                format!("image has no pixels ({}x{})", image.width, image.height),
            ));
        }
        let rgb = image.to_rgb8();
        advance(stage, PipelineStage::Decoded);

        let regions = self.regions.detect(image);
        let primary: Option<&EyeCandidate> = regions.as_ref().ok().and_then(|r| r.primary());
        let fallback = fallback::evaluate(&rgb, primary.map(EyeCandidate::bbox));
        advance(stage, PipelineStage::Detected);

        let detection_method = match (&regions, fallback.is_eye) {
            (Ok(_), true) => DetectionMethod::Hybrid,
            (Ok(_), false) => DetectionMethod::LandmarkOnly,
            (Err(_), true) => DetectionMethod::FallbackOnly,
            (Err(err), false) => {
                debug!(path = %image.path, %err, "No eye found");
                let mut diagnostics = fallback.diagnostics.clone();
                diagnostics.insert("region_detector".to_string(), err.to_string());
                diagnostics.insert(
                    "fallback_confidence".to_string(),
                    format!("{:.3}", fallback.confidence.overall()),
                );
                return Err(AnalysisFailure::new(
                    err.stage(),
                    format!("no eye detected: {err}"),
                )
                .with_diagnostics(diagnostics));
            }
        };

        let target =
            primary.map_or_else(|| BoundingBox::full(rgb.width(), rgb.height()), EyeCandidate::bbox);
        let redness = measure_redness(&ColorSpaceAnalysis::analyze(&rgb, target));
        let eye_confidence = confidence::score(primary, Some(&fallback), redness);
        let signals = health::assess(primary, redness, &self.config.calibration);
        advance(stage, PipelineStage::Scored);

        debug!(
            path = %image.path,
            method = ?detection_method,
            confidence = eye_confidence.overall(),
            fatigue_raw = signals.fatigue_raw,
            dry_eye_raw = signals.dry_eye_raw,
            redness_raw = signals.redness_raw,
            "Health signals"
        );

        let scores = signals.scores;
        let overall = eye_confidence.overall();
        let results = Condition::ALL
            .into_iter()
            .map(|condition| {
                let score = match condition {
                    Condition::Fatigue => scores.fatigue,
                    Condition::DryEye => scores.dry_eye,
                    Condition::Inflammation => scores.inflammation,
                };
                ConditionResult::new(condition, score, overall)
            })
            .collect();

        let assessment = EyeAssessment {
            results,
            detection_method,
            confidence: eye_confidence,
            metrics: Metrics {
                redness_raw: redness,
                fatigue_score: scores.fatigue,
                dry_eye_score: scores.dry_eye,
                inflammation_score: scores.inflammation,
            },
        };
        advance(stage, PipelineStage::Done);
        Ok(assessment)
    }
}

fn advance(stage: &Cell<PipelineStage>, next: PipelineStage) {
    debug!(from = %stage.get(), to = %next, "Pipeline stage");
    stage.set(next);
}
