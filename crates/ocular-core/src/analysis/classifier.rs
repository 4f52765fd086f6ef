//! Sclera, iris and redness classification over a color-space analysis.
//!
//! Thresholds are wide on purpose: dim lighting and visibly inflamed sclera
//! must still count as sclera.

#![allow(clippy::cast_precision_loss)]

use serde::Serialize;

use super::color_space::ColorSpaceAnalysis;
use crate::domain::Point;

/// Minimum lightness of a sclera-like pixel.
pub const SCLERA_MIN_LIGHTNESS: f32 = 40.0;
/// Maximum absolute green-red chroma of a sclera-like pixel.
pub const SCLERA_MAX_ABS_A: f32 = 30.0;
/// Fraction of sclera-like pixels needed for detection.
pub const SCLERA_MIN_COVERAGE: f32 = 0.10;

/// Maximum lightness of an iris candidate pixel.
pub const IRIS_MAX_LIGHTNESS: f32 = 75.0;
/// Fraction of iris candidates below which no iris is reported.
pub const IRIS_MIN_FRACTION: f32 = 0.03;
/// Fraction of iris candidates above which the region is just dark, not an iris.
pub const IRIS_MAX_FRACTION: f32 = 0.85;
/// Circularity an iris cluster must exceed.
pub const IRIS_MIN_CIRCULARITY: f32 = 0.4;

/// Scale from mean red chroma to the 0-100 redness scale.
pub const REDNESS_GAIN: f32 = 3.5;
/// Redness reported when no sclera pixel leans red.
pub const REDNESS_DEFAULT: f32 = 15.0;

/// Outcome of sclera detection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScleraResult {
    /// Enough sclera-like pixels were found.
    pub detected: bool,
    /// Fraction of the region classified sclera-like.
    pub coverage: f32,
    /// Mean lightness of the sclera-like pixels.
    pub mean_lightness: f32,
}

/// Outcome of iris detection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct IrisDetection {
    /// A sufficiently circular dark cluster was found.
    pub detected: bool,
    /// Centroid of the dark cluster, in image coordinates.
    pub center: Point,
    /// Mean distance of cluster pixels from the centroid.
    pub radius: f32,
    /// `1.0` for a perfect circle, `0.0` for no circular structure.
    pub circularity: f32,
}

fn is_sclera_like(l: f32, a: f32) -> bool {
    l > SCLERA_MIN_LIGHTNESS && a.abs() < SCLERA_MAX_ABS_A
}

/// Detects sclera-like (bright, low chroma) pixels.
#[must_use]
pub fn detect_sclera(analysis: &ColorSpaceAnalysis) -> ScleraResult {
    if analysis.is_empty() {
        return ScleraResult::default();
    }

    let (count, lightness_sum) = analysis
        .samples()
        .iter()
        .filter(|s| is_sclera_like(s.lab.l, s.lab.a))
        .fold((0usize, 0.0f32), |(n, sum), s| (n + 1, sum + s.lab.l));

    let coverage = count as f32 / analysis.len() as f32;
    let mean_lightness = if count == 0 {
        0.0
    } else {
        lightness_sum / count as f32
    };

    ScleraResult {
        detected: coverage >= SCLERA_MIN_COVERAGE,
        coverage,
        mean_lightness,
    }
}

/// Detects an iris-like (dark, roughly circular) pixel cluster.
#[must_use]
pub fn detect_iris(analysis: &ColorSpaceAnalysis) -> IrisDetection {
    let dark: Vec<Point> = analysis
        .samples()
        .iter()
        .filter(|s| s.lab.l < IRIS_MAX_LIGHTNESS)
        .map(|s| Point::new(s.x as f32, s.y as f32))
        .collect();

    if analysis.is_empty() || dark.is_empty() {
        return IrisDetection::default();
    }

    let fraction = dark.len() as f32 / analysis.len() as f32;
    if !(IRIS_MIN_FRACTION..=IRIS_MAX_FRACTION).contains(&fraction) {
        return IrisDetection::default();
    }

    let n = dark.len() as f32;
    let center = Point::new(
        dark.iter().map(|p| p.x).sum::<f32>() / n,
        dark.iter().map(|p| p.y).sum::<f32>() / n,
    );

    let distances: Vec<f32> = dark.iter().map(|p| p.distance(&center)).collect();
    let radius = distances.iter().sum::<f32>() / n;
    let variance = distances.iter().map(|d| (d - radius).powi(2)).sum::<f32>() / n;
    let std_dev = variance.sqrt();

    let circularity = if radius > 0.0 {
        1.0 - (std_dev / radius).clamp(0.0, 1.0)
    } else {
        0.0
    };

    IrisDetection {
        detected: circularity > IRIS_MIN_CIRCULARITY,
        center,
        radius,
        circularity,
    }
}

/// Measures scleral redness on a 0-100 scale.
///
/// Averages the red-leaning chroma of sclera-range pixels. Regions without
/// such pixels get [`REDNESS_DEFAULT`] rather than a false zero.
#[must_use]
pub fn measure_redness(analysis: &ColorSpaceAnalysis) -> f32 {
    let (count, a_sum) = analysis
        .samples()
        .iter()
        .filter(|s| s.lab.l > SCLERA_MIN_LIGHTNESS && s.lab.a > 0.0)
        .fold((0usize, 0.0f32), |(n, sum), s| (n + 1, sum + s.lab.a));

    if count == 0 {
        return REDNESS_DEFAULT;
    }

    (a_sum / count as f32 * REDNESS_GAIN).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoundingBox;
    use image::{Rgb, RgbImage};

    const SCLERA: Rgb<u8> = Rgb([236, 232, 228]);
    const IRIS: Rgb<u8> = Rgb([70, 45, 30]);

    fn eye_image(width: u32, height: u32, radius: f32) -> RgbImage {
        let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
        RgbImage::from_fn(width, height, |x, y| {
            let d = (x as f32 + 0.5 - cx).hypot(y as f32 + 0.5 - cy);
            if d <= radius {
                IRIS
            } else {
                SCLERA
            }
        })
    }

    #[test]
    fn test_white_region_is_sclera() {
        let img = RgbImage::from_pixel(20, 10, SCLERA);
        let result = detect_sclera(&ColorSpaceAnalysis::analyze_full(&img));
        assert!(result.detected);
        assert!((result.coverage - 1.0).abs() < 1e-6);
        assert!(result.mean_lightness > 90.0);
    }

    #[test]
    fn test_inflamed_sclera_still_detected() {
        // Pinkish sclera: a* around 15-20, well inside the 30 limit.
        let img = RgbImage::from_pixel(20, 10, Rgb([235, 190, 190]));
        let result = detect_sclera(&ColorSpaceAnalysis::analyze_full(&img));
        assert!(result.detected);
    }

    #[test]
    fn test_black_region_has_no_sclera() {
        let img = RgbImage::new(20, 10);
        let result = detect_sclera(&ColorSpaceAnalysis::analyze_full(&img));
        assert!(!result.detected);
        assert!(result.coverage.abs() < f32::EPSILON);
        assert!(result.mean_lightness.abs() < f32::EPSILON);
    }

    #[test]
    fn test_sclera_coverage_threshold() {
        // 1 of 10 columns white: exactly 10% coverage.
        let img = RgbImage::from_fn(10, 10, |x, _| if x == 0 { SCLERA } else { Rgb([0, 0, 0]) });
        let result = detect_sclera(&ColorSpaceAnalysis::analyze_full(&img));
        assert!((result.coverage - 0.1).abs() < 1e-6);
        assert!(result.detected);
    }

    #[test]
    fn test_dark_disc_is_circular_iris() {
        let img = eye_image(120, 60, 18.0);
        let iris = detect_iris(&ColorSpaceAnalysis::analyze_full(&img));
        assert!(iris.detected, "circularity={}", iris.circularity);
        assert!((iris.center.x - 59.5).abs() < 1.0, "cx={}", iris.center.x);
        assert!((iris.center.y - 29.5).abs() < 1.0, "cy={}", iris.center.y);
        // Mean distance within a filled disc is two thirds of its radius.
        assert!((iris.radius - 12.0).abs() < 1.0, "r={}", iris.radius);
        assert!(iris.circularity > 0.55);
    }

    #[test]
    fn test_too_few_dark_pixels() {
        let img = eye_image(200, 200, 3.0);
        let iris = detect_iris(&ColorSpaceAnalysis::analyze_full(&img));
        assert!(!iris.detected);
        assert!(iris.circularity.abs() < f32::EPSILON);
    }

    #[test]
    fn test_uniformly_dark_region_is_not_an_iris() {
        let img = RgbImage::new(40, 40);
        let iris = detect_iris(&ColorSpaceAnalysis::analyze_full(&img));
        assert!(!iris.detected);
    }

    #[test]
    fn test_dark_line_is_less_circular_than_disc() {
        let img = RgbImage::from_fn(100, 20, |_, y| if y == 10 { Rgb([10, 10, 10]) } else { SCLERA });
        let line = detect_iris(&ColorSpaceAnalysis::analyze_full(&img));
        let disc = detect_iris(&ColorSpaceAnalysis::analyze_full(&eye_image(120, 60, 18.0)));
        assert!(line.circularity < 0.5, "circularity={}", line.circularity);
        assert!(line.circularity < disc.circularity);
    }

    #[test]
    fn test_empty_analysis() {
        let img = RgbImage::new(10, 10);
        let analysis = ColorSpaceAnalysis::analyze(&img, BoundingBox::new(0, 0, 0, 0));
        assert!(!detect_iris(&analysis).detected);
        assert!(!detect_sclera(&analysis).detected);
        assert!((measure_redness(&analysis) - REDNESS_DEFAULT).abs() < f32::EPSILON);
    }

    #[test]
    fn test_redness_scales_red_chroma() {
        let neutral = RgbImage::from_pixel(10, 10, Rgb([240, 236, 234]));
        let red = RgbImage::from_pixel(10, 10, Rgb([230, 150, 150]));
        let neutral_redness = measure_redness(&ColorSpaceAnalysis::analyze_full(&neutral));
        let red_redness = measure_redness(&ColorSpaceAnalysis::analyze_full(&red));
        assert!(neutral_redness < 10.0, "neutral={neutral_redness}");
        assert!(red_redness > 70.0, "red={red_redness}");
        assert!(red_redness <= 100.0);
    }

    #[test]
    fn test_redness_default_without_bright_pixels() {
        let dark = RgbImage::from_pixel(10, 10, Rgb([40, 5, 5]));
        let redness = measure_redness(&ColorSpaceAnalysis::analyze_full(&dark));
        assert!((redness - REDNESS_DEFAULT).abs() < f32::EPSILON);
    }
}
