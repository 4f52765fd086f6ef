//! Ocular Core - Domain logic and the eye analysis pipeline
//!
//! This crate contains the core domain types, the port traits adapters plug
//! into, and the analysis pipeline: color-space analysis, sclera/iris
//! classification, geometry validation, the deterministic fallback engine,
//! landmark region detection, confidence fusion and health-score mapping.

pub mod analysis;
pub mod domain;
pub mod ports;

pub use analysis::{AnalyzerConfig, EyeAnalyzer, HealthCalibration, RegionDetector, RegionError};
pub use domain::{
    AnalysisFailure, AnalysisOutcome, AnalysisReport, DetectionMethod, EyeAssessment,
    EyeConfidence, FailedStage, ImageInfo,
};
pub use ports::{
    FaceLandmarks, ImageLoadError, ImageSource, Landmark, LandmarkProvider, ProgressEvent,
    ProgressSink, ResultOutput,
};
