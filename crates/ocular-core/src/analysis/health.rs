//! Raw-signal to health-score mapping.
//!
//! The fatigue and dry-eye heuristics are empirical and exposed through
//! [`HealthCalibration`]. Every raw signal goes through the same
//! [`band_map`] so each indicator lands in the three user-facing tiers.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use serde::{Deserialize, Serialize};

use crate::domain::{EyeCandidate, HealthScores};

/// Tunable constants of the health heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCalibration {
    /// Aperture ratio (height/width) at which fatigue starts to register.
    pub fatigue_open_ratio: f32,
    /// Fatigue points per unit of aperture below `fatigue_open_ratio`.
    pub fatigue_gain: f32,
    /// Raw fatigue used when no eye candidate is available.
    pub fatigue_default: f32,
    /// Dry-eye points per unit of normalized iris decentration.
    pub dry_eye_gain: f32,
    /// Raw dry-eye value used when no eye candidate is available.
    pub dry_eye_default: f32,
}

impl Default for HealthCalibration {
    fn default() -> Self {
        Self {
            fatigue_open_ratio: 0.5,
            fatigue_gain: 200.0,
            fatigue_default: 50.0,
            dry_eye_gain: 150.0,
            dry_eye_default: 45.0,
        }
    }
}

impl HealthCalibration {
    /// Checks every value is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns the name of the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        [
            ("fatigue_open_ratio", self.fatigue_open_ratio),
            ("fatigue_gain", self.fatigue_gain),
            ("fatigue_default", self.fatigue_default),
            ("dry_eye_gain", self.dry_eye_gain),
            ("dry_eye_default", self.dry_eye_default),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite() || *v < 0.0)
        .map_or(Ok(()), |(name, v)| {
            Err(format!("{name} must be a non-negative number, got {v}"))
        })
    }
}

/// Raw fatigue from how narrow the eye opening is.
#[must_use]
pub fn fatigue_raw(candidate: Option<&EyeCandidate>, calibration: &HealthCalibration) -> f32 {
    candidate
        .and_then(EyeCandidate::aperture_ratio)
        .map_or(calibration.fatigue_default, |ratio| {
            ((calibration.fatigue_open_ratio - ratio) * calibration.fatigue_gain).clamp(0.0, 100.0)
        })
}

/// Raw dry-eye from horizontal iris decentration within the eye box.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn dry_eye_raw(candidate: Option<&EyeCandidate>, calibration: &HealthCalibration) -> f32 {
    let Some(candidate) = candidate.filter(|c| c.bbox().width > 0) else {
        return calibration.dry_eye_default;
    };
    let bbox = candidate.bbox();
    let deviation = (candidate.iris().center().x - bbox.center().x).abs() / bbox.width as f32;
    (deviation * calibration.dry_eye_gain).clamp(0.0, 100.0)
}

/// Maps a raw 0-100 signal onto the tiered score scale.
///
/// * `raw < 40` maps linearly onto `0..=74`.
/// * `40 <= raw < 70` maps onto `76..=85`.
/// * `raw >= 70` maps onto `86..=100`.
///
/// Non-finite input maps to 0.
#[must_use]
pub fn band_map(raw: f32) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    let raw = raw.clamp(0.0, 100.0);
    let mapped = if raw < 40.0 {
        (raw / 40.0 * 75.0).floor()
    } else if raw < 70.0 {
        (76.0 + (raw - 40.0) / 30.0 * 9.0).round()
    } else {
        (86.0 + (raw - 70.0) / 30.0 * 14.0).round().min(100.0)
    };
    mapped as u8
}

/// Raw signals and their mapped scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthSignals {
    /// Raw fatigue.
    pub fatigue_raw: f32,
    /// Raw dry-eye.
    pub dry_eye_raw: f32,
    /// Raw inflammation (scleral redness).
    pub redness_raw: f32,
    /// Band-mapped scores.
    pub scores: HealthScores,
}

/// Computes all three indicators for an analysis.
#[must_use]
pub fn assess(
    candidate: Option<&EyeCandidate>,
    redness: f32,
    calibration: &HealthCalibration,
) -> HealthSignals {
    let fatigue = fatigue_raw(candidate, calibration);
    let dry_eye = dry_eye_raw(candidate, calibration);
    HealthSignals {
        fatigue_raw: fatigue,
        dry_eye_raw: dry_eye,
        redness_raw: redness,
        scores: HealthScores {
            fatigue: band_map(fatigue),
            dry_eye: band_map(dry_eye),
            inflammation: band_map(redness),
        },
    }
}
