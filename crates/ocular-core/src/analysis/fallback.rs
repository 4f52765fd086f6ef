//! Deterministic, model-free eye/not-eye decision.
//!
//! Chains color-space analysis, sclera/iris classification and geometry
//! validation over one region. Always produces a verdict with diagnostics,
//! even when a stage faults.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use image::RgbImage;
use tracing::{debug, warn};

use super::classifier::{self, IrisDetection, ScleraResult};
use super::color_space::ColorSpaceAnalysis;
use super::geometry::{self, GeometryResult};
use super::panic_message;
use crate::domain::{BoundingBox, EvidenceSources, EyeConfidence};

/// Minimum overall proxy confidence for an eye verdict.
pub const MIN_EYE_CONFIDENCE: f32 = 0.3;

/// Verdict of the fallback engine for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome {
    /// The region looks like an eye.
    pub is_eye: bool,
    /// Proxy confidence built from color and geometry evidence only.
    pub confidence: EyeConfidence,
    /// Sclera classification.
    pub sclera: ScleraResult,
    /// Iris classification.
    pub iris: IrisDetection,
    /// Geometry validation.
    pub geometry: GeometryResult,
    /// Human-readable measurements, present whatever the verdict.
    pub diagnostics: BTreeMap<String, String>,
}

impl FallbackOutcome {
    /// Proxy color score: twice the sclera coverage, capped at 1.
    #[must_use]
    pub fn color_score(&self) -> f32 {
        color_proxy(&self.sclera)
    }

    /// Proxy geometry score.
    #[must_use]
    pub fn geometry_score(&self) -> f32 {
        geometry_proxy(&self.geometry)
    }

    fn faulted(message: &str) -> Self {
        Self {
            is_eye: false,
            confidence: EyeConfidence::zero(format!(
                "Very low confidence (0%) in eye detection, fallback analysis failed: {message}"
            )),
            sclera: ScleraResult::default(),
            iris: IrisDetection::default(),
            geometry: GeometryResult::default(),
            diagnostics: BTreeMap::from([("error".to_string(), message.to_string())]),
        }
    }
}

fn color_proxy(sclera: &ScleraResult) -> f32 {
    (sclera.coverage * 2.0).clamp(0.0, 1.0)
}

fn geometry_proxy(geometry: &GeometryResult) -> f32 {
    match (geometry.valid, geometry.horizontally_symmetric) {
        (true, true) => 1.0,
        (true, false) => 0.6,
        (false, _) => 0.2,
    }
}

/// Runs the fallback over `target`, or the whole image when `None`.
///
/// Never panics: an internal fault yields a zero-confidence, not-an-eye
/// outcome carrying an `error` diagnostic.
#[must_use]
pub fn evaluate(image: &RgbImage, target: Option<BoundingBox>) -> FallbackOutcome {
    let region = target.unwrap_or_else(|| BoundingBox::full(image.width(), image.height()));
    guarded(|| evaluate_region(image, region))
}

/// Runs `run`, turning a panic into a faulted outcome.
fn guarded(run: impl FnOnce() -> FallbackOutcome) -> FallbackOutcome {
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(%message, "Fallback analysis faulted");
            FallbackOutcome::faulted(&message)
        }
    }
}

fn evaluate_region(image: &RgbImage, region: BoundingBox) -> FallbackOutcome {
    let analysis = ColorSpaceAnalysis::analyze(image, region);
    let sclera = classifier::detect_sclera(&analysis);
    let iris = classifier::detect_iris(&analysis);
    let geometry = geometry::validate(analysis.region(), &sclera, &iris);

    let sources = EvidenceSources {
        landmarks: false,
        color: sclera.detected || iris.detected,
        geometry: geometry.valid,
    };
    let confidence = EyeConfidence::new(
        iris.circularity,
        color_proxy(&sclera),
        geometry_proxy(&geometry),
        sources,
    );
    let is_eye = confidence.overall() >= MIN_EYE_CONFIDENCE && (sclera.detected || iris.detected);

    let diagnostics = BTreeMap::from([
        (
            "sclera_coverage_pct".to_string(),
            format!("{:.1}", sclera.coverage * 100.0),
        ),
        (
            "iris_circularity".to_string(),
            format!("{:.3}", iris.circularity),
        ),
        (
            "aspect_ratio".to_string(),
            format!("{:.3}", geometry.aspect_ratio),
        ),
        (
            "symmetric".to_string(),
            geometry.horizontally_symmetric.to_string(),
        ),
    ]);

    debug!(
        is_eye,
        overall = confidence.overall(),
        sclera_coverage = sclera.coverage,
        iris_circularity = iris.circularity,
        "Fallback verdict"
    );

    FallbackOutcome {
        is_eye,
        confidence,
        sclera,
        iris,
        geometry,
        diagnostics,
    }
}
