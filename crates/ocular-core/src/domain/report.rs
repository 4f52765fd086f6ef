//! Analysis outcome and its serializable report form.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::{DetectionMethod, EyeConfidence};

/// Health indicator scores, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScores {
    /// Eye fatigue indicator.
    pub fatigue: u8,
    /// Dry-eye indicator.
    pub dry_eye: u8,
    /// Inflammation (redness) indicator.
    pub inflammation: u8,
}

/// User-facing risk tier of a mapped score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    /// Score <= 75.
    #[serde(rename = "Low/Natural")]
    Low,
    /// 75 < score <= 85.
    Moderate,
    /// Score > 85.
    High,
}

impl RiskLevel {
    /// Tier for a mapped score.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        if score > 85 {
            Self::High
        } else if score > 75 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low/Natural",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    /// Color tag for presentation.
    #[must_use]
    pub const fn color_tag(self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Moderate => "amber",
            Self::High => "red",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assessed ocular condition.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Eye strain / tiredness.
    Fatigue,
    /// Dry eye.
    DryEye,
    /// Scleral redness.
    Inflammation,
}

impl Condition {
    /// All assessed conditions, in report order.
    pub const ALL: [Self; 3] = [Self::Fatigue, Self::DryEye, Self::Inflammation];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fatigue => "Eye Fatigue",
            Self::DryEye => "Dry Eye",
            Self::Inflammation => "Eye Inflammation",
        }
    }

    /// Prevalence note.
    #[must_use]
    pub const fn prevalence(self) -> &'static str {
        match self {
            Self::Fatigue => "Common among adults who spend several hours a day on screens.",
            Self::DryEye => "Affects roughly 5-30% of adults, more often with age.",
            Self::Inflammation => "Redness is frequent and usually short-lived.",
        }
    }

    /// Typical symptoms.
    #[must_use]
    pub const fn symptoms(self) -> &'static [&'static str] {
        match self {
            Self::Fatigue => &["Heavy eyelids", "Blurred vision", "Headache", "Difficulty focusing"],
            Self::DryEye => &["Burning or stinging", "Gritty sensation", "Watery eyes", "Light sensitivity"],
            Self::Inflammation => &["Visible redness", "Itching", "Discharge", "Swelling"],
        }
    }

    /// Guidance text.
    #[must_use]
    pub const fn insight(self) -> &'static str {
        match self {
            Self::Fatigue => {
                "A narrowed eye opening can indicate tiredness. Regular breaks and sleep help."
            }
            Self::DryEye => {
                "Irregular iris position and tear-film changes can accompany dryness. Blink often and stay hydrated."
            }
            Self::Inflammation => {
                "Elevated scleral redness may reflect irritation. See an eye care professional if it persists."
            }
        }
    }
}

/// Risk assessment of one condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionResult {
    /// Condition display name.
    pub condition: &'static str,
    /// Mapped risk percentage (0-100).
    pub risk_percentage: u8,
    /// Risk tier label.
    pub label: RiskLevel,
    /// Presentation color tag.
    pub color_tag: &'static str,
    /// Eye-detection confidence the score rests on (0-1).
    pub confidence_score: f32,
    /// Prevalence note.
    pub prevalence: &'static str,
    /// Typical symptoms.
    pub common_symptoms: Vec<&'static str>,
    /// Guidance text.
    pub insights: &'static str,
}

impl ConditionResult {
    /// Builds the result for `condition` at `score`.
    #[must_use]
    pub fn new(condition: Condition, score: u8, confidence: f32) -> Self {
        let level = RiskLevel::from_score(score);
        Self {
            condition: condition.name(),
            risk_percentage: score,
            label: level,
            color_tag: level.color_tag(),
            confidence_score: confidence,
            prevalence: condition.prevalence(),
            common_symptoms: condition.symptoms().to_vec(),
            insights: condition.insight(),
        }
    }
}

/// Raw and mapped signal values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Scleral redness before band mapping.
    pub redness_raw: f32,
    /// Mapped fatigue score.
    pub fatigue_score: u8,
    /// Mapped dry-eye score.
    pub dry_eye_score: u8,
    /// Mapped inflammation score.
    pub inflammation_score: u8,
}

/// Successful assessment of an image containing an eye.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EyeAssessment {
    /// Per-condition results.
    pub results: Vec<ConditionResult>,
    /// How eye presence was established.
    pub detection_method: DetectionMethod,
    /// Fused detection confidence.
    pub confidence: EyeConfidence,
    /// Signal values.
    pub metrics: Metrics,
}

/// Pipeline stage at which an analysis stopped.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedStage {
    /// The image could not be decoded.
    Decode,
    /// The landmark capability could not be initialized.
    ModelInit,
    /// The landmark capability returned nothing usable.
    NoLandmarks,
    /// Face landmarks were found but no iris points.
    IrisMissing,
    /// Neither landmarks nor the fallback established an eye.
    GeometryValidation,
    /// Unexpected fault inside the pipeline.
    Internal,
}

impl FailedStage {
    /// Stable snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::ModelInit => "model_init",
            Self::NoLandmarks => "no_landmarks",
            Self::IrisMissing => "iris_missing",
            Self::GeometryValidation => "geometry_validation",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for FailedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged analysis failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} stage failed: {message}")]
pub struct AnalysisFailure {
    /// Stage that failed.
    pub stage: FailedStage,
    /// Human-readable reason.
    pub message: String,
    /// Diagnostic values collected up to the failure.
    pub diagnostics: BTreeMap<String, String>,
}

impl AnalysisFailure {
    /// Failure without diagnostics.
    #[must_use]
    pub fn new(stage: FailedStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            diagnostics: BTreeMap::new(),
        }
    }

    /// Attaches diagnostics.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: BTreeMap<String, String>) -> Self {
        self.diagnostics.extend(diagnostics);
        self
    }
}

/// Result of analyzing one image.
pub type AnalysisOutcome = Result<EyeAssessment, AnalysisFailure>;

/// Flat, serializable report of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Source image path.
    pub path: String,
    /// Whether the analysis completed.
    pub success: bool,
    /// Whether an eye was found.
    pub eye_detected: bool,
    /// Per-condition results (success only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ConditionResult>>,
    /// Detection method (success only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_method: Option<DetectionMethod>,
    /// Detection confidence (success only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<EyeConfidence>,
    /// Signal values (success only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    /// Failure reason (failure only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Failed stage (failure only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<FailedStage>,
    /// Diagnostics (failure only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<BTreeMap<String, String>>,
}

impl AnalysisReport {
    /// Flattens an outcome for output.
    #[must_use]
    pub fn from_outcome(path: impl Into<String>, outcome: AnalysisOutcome) -> Self {
        let path = path.into();
        match outcome {
            Ok(assessment) => Self {
                path,
                success: true,
                eye_detected: true,
                results: Some(assessment.results),
                detection_method: Some(assessment.detection_method),
                confidence: Some(assessment.confidence),
                metrics: Some(assessment.metrics),
                error_message: None,
                failed_stage: None,
                diagnostics: None,
            },
            Err(failure) => Self {
                path,
                success: false,
                eye_detected: false,
                results: None,
                detection_method: None,
                confidence: None,
                metrics: None,
                error_message: Some(failure.message),
                failed_stage: Some(failure.stage),
                diagnostics: Some(failure.diagnostics),
            },
        }
    }
}
