//! Anatomical plausibility checks on a candidate eye region.

#![allow(clippy::cast_precision_loss)]

use serde::Serialize;

use super::classifier::{IrisDetection, ScleraResult};
use crate::domain::BoundingBox;

/// Narrowest accepted width/height ratio.
pub const MIN_ASPECT_RATIO: f32 = 0.5;
/// Widest accepted width/height ratio.
pub const MAX_ASPECT_RATIO: f32 = 4.0;
/// Smallest gap ratio for a horizontally centred iris.
pub const MIN_SYMMETRY_RATIO: f32 = 0.3;

/// Outcome of geometry validation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GeometryResult {
    /// Region is plausible as an eye.
    pub valid: bool,
    /// Region width divided by height.
    pub aspect_ratio: f32,
    /// The iris sits roughly mid-way between the region's left and right edges.
    pub horizontally_symmetric: bool,
}

/// Returns `true` for aspect ratios in the accepted range.
#[must_use]
pub fn aspect_ratio_valid(aspect_ratio: f32) -> bool {
    (MIN_ASPECT_RATIO..=MAX_ASPECT_RATIO).contains(&aspect_ratio)
}

/// Validates a region given the classifier's verdicts for it.
///
/// A region with an implausible aspect ratio is still valid when both sclera
/// and iris were found in it.
#[must_use]
pub fn validate(region: BoundingBox, sclera: &ScleraResult, iris: &IrisDetection) -> GeometryResult {
    let aspect_ratio = region.aspect_ratio();
    let aspect_valid = aspect_ratio_valid(aspect_ratio);
    let horizontally_symmetric = iris.detected && is_symmetric(region, iris.center.x);

    GeometryResult {
        valid: aspect_valid || (sclera.detected && iris.detected),
        aspect_ratio,
        horizontally_symmetric,
    }
}

fn is_symmetric(region: BoundingBox, iris_x: f32) -> bool {
    let left_gap = iris_x - region.x as f32;
    let right_gap = (region.x + region.width) as f32 - iris_x;
    let (smaller, larger) = (left_gap.min(right_gap), left_gap.max(right_gap));
    larger > 0.0 && smaller / larger > MIN_SYMMETRY_RATIO
}
