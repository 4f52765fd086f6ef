//! Fuses landmark, color and geometry evidence into an [`EyeConfidence`].

#![allow(clippy::cast_precision_loss)]

use super::fallback::FallbackOutcome;
use super::geometry::aspect_ratio_valid;
use crate::domain::{EvidenceSources, EyeCandidate, EyeConfidence, Point};

/// Iris radius range (pixels) considered anatomically plausible.
pub const IRIS_RADIUS_RANGE: std::ops::RangeInclusive<f32> = 5.0..=100.0;
/// Contour length of a complete eyelid outline.
pub const FULL_CONTOUR_POINTS: usize = 16;
/// Redness range that suggests a real sclera when no color classification exists.
pub const PLAUSIBLE_REDNESS: std::ops::RangeInclusive<f32> = 5.0..=60.0;

/// Scores eye-detection confidence.
///
/// `candidate` is the primary landmark candidate, `fallback` the
/// deterministic verdict, `redness` the measured scleral redness.
#[must_use]
pub fn score(
    candidate: Option<&EyeCandidate>,
    fallback: Option<&FallbackOutcome>,
    redness: f32,
) -> EyeConfidence {
    let landmark = candidate.map_or(0.0, landmark_score);
    let color = color_score(fallback, redness);
    let geometry = geometry_score(candidate, fallback);

    let sources = EvidenceSources {
        landmarks: candidate.is_some(),
        color: fallback.is_some_and(|f| f.sclera.detected || f.iris.detected),
        geometry: candidate.is_some_and(contour_aspect_valid)
            || fallback.is_some_and(|f| f.geometry.valid),
    };

    EyeConfidence::new(landmark, color, geometry, sources)
}

fn landmark_score(candidate: &EyeCandidate) -> f32 {
    let iris = candidate.iris();
    let mut score = 0.0;

    if IRIS_RADIUS_RANGE.contains(&iris.radius()) {
        score += 0.4;
    }

    let mean = iris.radius();
    if mean > 0.0 {
        let max_deviation = iris
            .cardinal_distances()
            .iter()
            .map(|d| (d - mean).abs())
            .fold(0.0f32, f32::max);
        score += 0.3 * (1.0 - (max_deviation / mean).clamp(0.0, 1.0));
    }

    let completeness = (candidate.contour().len() as f32 / FULL_CONTOUR_POINTS as f32).min(1.0);
    score + 0.3 * completeness
}

fn color_score(fallback: Option<&FallbackOutcome>, redness: f32) -> f32 {
    match fallback {
        Some(f) => {
            let mut score = 0.0;
            if f.sclera.detected {
                score += 0.4;
            }
            if f.iris.detected {
                score += 0.3;
            }
            (score + 0.3 * f.color_score()).min(1.0)
        }
        None if PLAUSIBLE_REDNESS.contains(&redness) => 0.5,
        None => 0.2,
    }
}

fn geometry_score(candidate: Option<&EyeCandidate>, fallback: Option<&FallbackOutcome>) -> f32 {
    let fallback_valid = fallback.is_some_and(|f| f.geometry.valid);

    let Some(candidate) = candidate else {
        return fallback.map_or(0.0, FallbackOutcome::geometry_score);
    };

    let mut score = 0.0;
    if contour_aspect_valid(candidate) {
        score += 0.5;
    }
    score += 0.5 * contour_smoothness(candidate.contour());

    if fallback_valid {
        score += (1.0 - score) * 0.5;
    }
    score
}

/// The eyelid contour exists and encloses a plausible eye opening.
fn contour_aspect_valid(candidate: &EyeCandidate) -> bool {
    !candidate.contour().is_empty() && aspect_ratio_valid(candidate.bbox().aspect_ratio())
}

/// Mean turning-angle smoothness of a closed contour, `0.0..=1.0`.
///
/// Each vertex contributes `(cos θ + 1) / 2`, where `θ` is the angle between
/// its incoming and outgoing edges. Straight continuation scores 1, a full
/// reversal 0.
fn contour_smoothness(contour: &[Point]) -> f32 {
    let n = contour.len();
    if n < 3 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut counted = 0usize;
    for i in 0..n {
        let prev = contour[(i + n - 1) % n];
        let here = contour[i];
        let next = contour[(i + 1) % n];

        let (ax, ay) = (here.x - prev.x, here.y - prev.y);
        let (bx, by) = (next.x - here.x, next.y - here.y);
        let norm = ax.hypot(ay) * bx.hypot(by);
        if norm <= f32::EPSILON {
            continue;
        }
        let cos = ((ax * bx + ay * by) / norm).clamp(-1.0, 1.0);
        total += (cos + 1.0) / 2.0;
        counted += 1;
    }

    if counted == 0 {
        0.0
    } else {
        total / counted as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::{IrisDetection, ScleraResult};
    use crate::analysis::geometry::GeometryResult;
    use crate::domain::{EyeSide, IrisLandmarks};
    use std::collections::BTreeMap;

    fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32, n: usize) -> Vec<Point> {
        (0..n)
            .map(|k| {
                let t = std::f32::consts::TAU * k as f32 / n as f32;
                Point::new(cx + rx * t.cos(), cy + ry * t.sin())
            })
            .collect()
    }

    fn candidate(radius: f32, contour_points: usize) -> EyeCandidate {
        let c = Point::new(200.0, 150.0);
        let iris = IrisLandmarks::new(
            c,
            [
                Point::new(c.x + radius, c.y),
                Point::new(c.x, c.y - radius),
                Point::new(c.x - radius, c.y),
                Point::new(c.x, c.y + radius),
            ],
        );
        let contour = ellipse(c.x, c.y, 60.0, 30.0, contour_points);
        EyeCandidate::new(EyeSide::Right, iris, contour, 400, 300)
    }

    fn fallback(sclera: bool, iris: bool, coverage: f32, geometry_valid: bool) -> FallbackOutcome {
        FallbackOutcome {
            is_eye: sclera || iris,
            confidence: EyeConfidence::zero("test"),
            sclera: ScleraResult {
                detected: sclera,
                coverage,
                mean_lightness: 80.0,
            },
            iris: IrisDetection {
                detected: iris,
                ..IrisDetection::default()
            },
            geometry: GeometryResult {
                valid: geometry_valid,
                aspect_ratio: 2.0,
                horizontally_symmetric: true,
            },
            diagnostics: BTreeMap::new(),
        }
    }

    #[test]
    fn test_ideal_landmarks_score_full() {
        let score = landmark_score(&candidate(20.0, 16));
        assert!((score - 1.0).abs() < 1e-5, "score={score}");
    }

    #[test]
    fn test_landmark_radius_out_of_range() {
        let score = landmark_score(&candidate(120.0, 16));
        assert!((score - 0.6).abs() < 1e-5, "score={score}");
    }

    #[test]
    fn test_partial_contour_lowers_landmark_score() {
        let full = landmark_score(&candidate(20.0, 16));
        let half = landmark_score(&candidate(20.0, 8));
        assert!((full - half - 0.15).abs() < 1e-5);
    }

    #[test]
    fn test_color_from_fallback_flags() {
        let fb = fallback(true, true, 0.6, true);
        assert!((color_score(Some(&fb), 0.0) - 1.0).abs() < 1e-6);

        let fb = fallback(true, false, 0.25, true);
        assert!((color_score(Some(&fb), 0.0) - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_color_from_redness_without_fallback() {
        assert!((color_score(None, 30.0) - 0.5).abs() < f32::EPSILON);
        assert!((color_score(None, 2.0) - 0.2).abs() < f32::EPSILON);
        assert!((color_score(None, 80.0) - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_smooth_ellipse_contour() {
        let smooth = contour_smoothness(&ellipse(0.0, 0.0, 60.0, 30.0, 16));
        assert!(smooth > 0.9, "smooth={smooth}");

        let zigzag: Vec<Point> = (0..16)
            .map(|k| Point::new(k as f32 * 5.0, if k % 2 == 0 { 0.0 } else { 40.0 }))
            .collect();
        assert!(contour_smoothness(&zigzag) < smooth);
        assert!(contour_smoothness(&zigzag[..2]).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fallback_geometry_boosts_toward_one() {
        let c = candidate(20.0, 16);
        let alone = geometry_score(Some(&c), Some(&fallback(false, false, 0.0, false)));
        let boosted = geometry_score(Some(&c), Some(&fallback(false, false, 0.0, true)));
        assert!(boosted > alone);
        assert!(boosted <= 1.0);
        assert!((boosted - (alone + (1.0 - alone) * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_geometry_without_candidate_uses_fallback_proxy() {
        let fb = fallback(true, true, 0.5, true);
        assert!((geometry_score(None, Some(&fb)) - 1.0).abs() < f32::EPSILON);
        assert!(geometry_score(None, None).abs() < f32::EPSILON);
    }

    #[test]
    fn test_hybrid_evidence_is_high_confidence() {
        let c = candidate(20.0, 16);
        let fb = fallback(true, true, 0.6, true);
        let conf = score(Some(&c), Some(&fb), 20.0);
        let weighted = 0.40 * conf.landmark() + 0.35 * conf.color() + 0.25 * conf.geometry();
        assert!((conf.overall() - weighted).abs() < 1e-6);
        assert!(conf.overall() >= 0.8);
        assert!(conf.explanation().contains("High confidence"));
        assert!(conf.explanation().contains("landmarks, color analysis, geometry"));
    }

    #[test]
    fn test_missing_contour_earns_no_geometry() {
        let c = candidate(20.0, 0);
        assert!(c.contour().is_empty());
        assert!(geometry_score(Some(&c), None).abs() < f32::EPSILON);

        let conf = score(Some(&c), None, 0.0);
        assert!(conf.geometry().abs() < f32::EPSILON);
        assert!(conf.explanation().contains("landmarks"));
        assert!(!conf.explanation().contains("geometry"));
    }

    #[test]
    fn test_nothing_is_very_low() {
        let conf = score(None, None, 0.0);
        assert!((conf.overall() - 0.35 * 0.2).abs() < 1e-6);
        assert!(conf.explanation().contains("Very low confidence"));
        assert!(conf.explanation().contains("no corroborating evidence"));
    }
}
