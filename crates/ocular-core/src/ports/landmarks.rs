//! Landmark capability port.
//!
//! The learned face/iris landmark model lives outside the core. It is consumed
//! through [`LandmarkProvider`], which returns normalized points in the
//! 478-point face-mesh layout described by [`mesh`].

use serde::{Deserialize, Serialize};

use crate::domain::ImageInfo;

/// One landmark in normalized image coordinates (`0.0..=1.0`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position as a fraction of image width.
    pub x: f32,
    /// Vertical position as a fraction of image height.
    pub y: f32,
    /// Relative depth, unused by the core.
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    /// Creates a landmark on the image plane.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Landmarks of one detected face.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceLandmarks {
    /// Points in face-mesh index order.
    pub points: Vec<Landmark>,
    /// Face presence score reported by the model. Never used for gating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// Face-mesh landmark indices used by the region detector.
pub mod mesh {
    /// Points in a mesh without iris refinement.
    pub const FACE_POINTS: usize = 468;
    /// Points in a mesh with iris refinement.
    pub const REFINED_POINTS: usize = 478;

    /// Right-eye iris: center followed by four cardinal points.
    pub const RIGHT_IRIS: [usize; 5] = [468, 469, 470, 471, 472];
    /// Left-eye iris: center followed by four cardinal points.
    pub const LEFT_IRIS: [usize; 5] = [473, 474, 475, 476, 477];

    /// Right-eye eyelid contour, lower lid then upper lid.
    pub const RIGHT_EYE_CONTOUR: [usize; 16] = [
        33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
    ];
    /// Left-eye eyelid contour, lower lid then upper lid.
    pub const LEFT_EYE_CONTOUR: [usize; 16] = [
        263, 249, 390, 373, 374, 380, 381, 382, 362, 398, 384, 385, 386, 387, 388, 466,
    ];
}

/// Port for the external landmark detector.
///
/// Implementations must tolerate concurrent `detect` calls; detection must not
/// mutate shared state.
pub trait LandmarkProvider: Send + Sync {
    /// Returns the name of this provider.
    fn name(&self) -> &'static str;

    /// Detects face landmarks in an image.
    ///
    /// Returns an empty vector when no face is found.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying detector fails.
    fn detect(&self, image: &ImageInfo) -> anyhow::Result<Vec<FaceLandmarks>>;
}
