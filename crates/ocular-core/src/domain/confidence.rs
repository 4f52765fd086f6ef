//! Weighted trust score shared by the fallback engine and the confidence scorer.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Weight of the landmark sub-score.
pub const LANDMARK_WEIGHT: f32 = 0.40;
/// Weight of the color sub-score.
pub const COLOR_WEIGHT: f32 = 0.35;
/// Weight of the geometry sub-score.
pub const GEOMETRY_WEIGHT: f32 = 0.25;

/// Evidence sources that contributed to a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvidenceSources {
    /// Landmark detector evidence was present.
    pub landmarks: bool,
    /// Sclera or iris color evidence was present.
    pub color: bool,
    /// Geometry was independently validated.
    pub geometry: bool,
}

impl EvidenceSources {
    fn describe(self) -> String {
        let names: Vec<&str> = [
            (self.landmarks, "landmarks"),
            (self.color, "color analysis"),
            (self.geometry, "geometry"),
        ]
        .into_iter()
        .filter_map(|(present, name)| present.then_some(name))
        .collect();

        if names.is_empty() {
            "no corroborating evidence".to_string()
        } else {
            format!("based on {}", names.join(", "))
        }
    }
}

/// Qualitative band of an overall confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    /// Overall >= 0.8.
    High,
    /// Overall >= 0.5.
    Moderate,
    /// Overall >= 0.3.
    Low,
    /// Anything below 0.3.
    VeryLow,
}

impl ConfidenceBand {
    /// Band for an overall score.
    #[must_use]
    pub fn of(overall: f32) -> Self {
        if overall >= 0.8 {
            Self::High
        } else if overall >= 0.5 {
            Self::Moderate
        } else if overall >= 0.3 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "High confidence",
            Self::Moderate => "Moderate confidence",
            Self::Low => "Low confidence",
            Self::VeryLow => "Very low confidence",
        })
    }
}

/// Fused eye-presence confidence.
///
/// `overall` is always `0.40 * landmark + 0.35 * color + 0.25 * geometry`; the
/// fields are private so no instance can break that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EyeConfidence {
    overall: f32,
    landmark: f32,
    color: f32,
    geometry: f32,
    explanation: String,
}

impl EyeConfidence {
    /// Fuses three sub-scores (each clamped to `[0, 1]`).
    #[must_use]
    pub fn new(landmark: f32, color: f32, geometry: f32, sources: EvidenceSources) -> Self {
        let landmark = unit(landmark);
        let color = unit(color);
        let geometry = unit(geometry);
        let overall =
            LANDMARK_WEIGHT * landmark + COLOR_WEIGHT * color + GEOMETRY_WEIGHT * geometry;
        let explanation = format!(
            "{} ({:.0}%) in eye detection, {}",
            ConfidenceBand::of(overall),
            overall * 100.0,
            sources.describe()
        );
        Self {
            overall,
            landmark,
            color,
            geometry,
            explanation,
        }
    }

    /// All-zero confidence with a custom explanation.
    #[must_use]
    pub fn zero(explanation: impl Into<String>) -> Self {
        Self {
            overall: 0.0,
            landmark: 0.0,
            color: 0.0,
            geometry: 0.0,
            explanation: explanation.into(),
        }
    }

    /// Weighted overall score.
    #[must_use]
    pub const fn overall(&self) -> f32 {
        self.overall
    }

    /// Landmark sub-score.
    #[must_use]
    pub const fn landmark(&self) -> f32 {
        self.landmark
    }

    /// Color sub-score.
    #[must_use]
    pub const fn color(&self) -> f32 {
        self.color
    }

    /// Geometry sub-score.
    #[must_use]
    pub const fn geometry(&self) -> f32 {
        self.geometry
    }

    /// Human-readable explanation.
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Qualitative band of the overall score.
    #[must_use]
    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::of(self.overall)
    }

    /// Named sub-scores.
    #[must_use]
    pub fn breakdown(&self) -> BTreeMap<&'static str, f32> {
        BTreeMap::from([
            ("landmark", self.landmark),
            ("color", self.color),
            ("geometry", self.geometry),
        ])
    }
}

fn unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
