//! Eye detection and health-indicator analysis.
//!
//! Leaf-first: [`color_space`] feeds [`classifier`] and [`geometry`], which the
//! [`fallback`] engine chains into a model-free verdict. [`region`] wraps the
//! landmark port, [`confidence`] fuses both sources, [`health`] maps signals to
//! scores and [`pipeline`] drives the whole analysis.

pub mod classifier;
pub mod color_space;
pub mod confidence;
pub mod fallback;
pub mod geometry;
pub mod health;
pub mod pipeline;
pub mod region;

use std::any::Any;

pub use color_space::{ColorSpaceAnalysis, PixelSample};
pub use fallback::FallbackOutcome;
pub use health::HealthCalibration;
pub use pipeline::{AnalyzerConfig, EyeAnalyzer, PipelineStage};
pub use region::{ProviderLoader, RegionDetection, RegionDetector, RegionError};

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
