//! Core domain types for ocular analysis.

mod confidence;
mod eye;
mod image;
mod report;

pub use confidence::{
    ConfidenceBand, EvidenceSources, EyeConfidence, COLOR_WEIGHT, GEOMETRY_WEIGHT,
    LANDMARK_WEIGHT,
};
pub use eye::{BoundingBox, DetectionMethod, EyeCandidate, EyeSide, IrisLandmarks, Point};
pub use image::ImageInfo;
pub use report::{
    AnalysisFailure, AnalysisOutcome, AnalysisReport, Condition, ConditionResult, EyeAssessment,
    FailedStage, HealthScores, Metrics, RiskLevel,
};
