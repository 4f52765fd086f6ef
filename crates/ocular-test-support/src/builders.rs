//! Synthetic eye images and face-mesh landmark builders for testing.

#![allow(clippy::cast_precision_loss)]

use image::{DynamicImage, Rgb, RgbImage};
use ocular_core::domain::ImageInfo;
use ocular_core::ports::{mesh, FaceLandmarks, Landmark};

/// Healthy sclera: bright, near-neutral.
pub const SCLERA: Rgb<u8> = Rgb([236, 232, 228]);
/// Visibly inflamed sclera (a* just above 30).
pub const INFLAMED_SCLERA: Rgb<u8> = Rgb([230, 150, 150]);
/// Brown iris.
pub const IRIS: Rgb<u8> = Rgb([70, 45, 30]);
/// Light skin surrounding the eye opening.
pub const SKIN: Rgb<u8> = Rgb([232, 196, 176]);

/// Builder for a synthetic frontal eye: an elliptical sclera opening with a
/// round iris, on a skin background.
///
/// Defaults for a `w` x `h` frame: opening centred, half-width `0.15 w`,
/// aperture ratio 0.5, iris radius `0.05 w`.
#[derive(Debug, Clone)]
pub struct SyntheticEyeBuilder {
    width: u32,
    height: u32,
    path: String,
    iris_radius: f32,
    iris_offset: f32,
    half_width: f32,
    aperture: f32,
    sclera: Rgb<u8>,
    iris: Rgb<u8>,
    skin: Rgb<u8>,
}

impl SyntheticEyeBuilder {
    /// Starts a builder for a `width` x `height` frame.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            path: "synthetic://eye".to_string(),
            iris_radius: width as f32 * 0.05,
            iris_offset: 0.0,
            half_width: width as f32 * 0.15,
            aperture: 0.5,
            sclera: SCLERA,
            iris: IRIS,
            skin: SKIN,
        }
    }

    /// Sets the image path reported by [`ImageInfo`].
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the iris radius in pixels.
    #[must_use]
    pub const fn iris_radius(mut self, radius: f32) -> Self {
        self.iris_radius = radius;
        self
    }

    /// Shifts the iris horizontally by `dx` pixels from the opening center.
    #[must_use]
    pub const fn iris_offset(mut self, dx: f32) -> Self {
        self.iris_offset = dx;
        self
    }

    /// Sets the eye opening height/width ratio.
    #[must_use]
    pub const fn aperture(mut self, ratio: f32) -> Self {
        self.aperture = ratio;
        self
    }

    /// Sets the sclera color.
    #[must_use]
    pub const fn sclera(mut self, color: Rgb<u8>) -> Self {
        self.sclera = color;
        self
    }

    /// Uses a visibly inflamed sclera.
    #[must_use]
    pub const fn inflamed(self) -> Self {
        self.sclera(INFLAMED_SCLERA)
    }

    /// Center of the eye opening.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Center of the iris.
    #[must_use]
    pub fn iris_center(&self) -> (f32, f32) {
        let (cx, cy) = self.center();
        (cx + self.iris_offset, cy)
    }

    /// Iris radius in pixels.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.iris_radius
    }

    /// Half-axes of the eye opening.
    #[must_use]
    pub fn opening_axes(&self) -> (f32, f32) {
        (self.half_width, self.half_width * self.aperture)
    }

    /// Frame dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Renders the eye as an RGB buffer.
    #[must_use]
    pub fn build_rgb(&self) -> RgbImage {
        let (cx, cy) = self.center();
        let (ix, iy) = self.iris_center();
        let (rx, ry) = self.opening_axes();
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            if (px - ix).hypot(py - iy) <= self.iris_radius {
                self.iris
            } else if ((px - cx) / rx).powi(2) + ((py - cy) / ry).powi(2) <= 1.0 {
                self.sclera
            } else {
                self.skin
            }
        })
    }

    /// Renders the eye as an [`ImageInfo`].
    #[must_use]
    pub fn build(&self) -> ImageInfo {
        ImageInfo::new(self.path.clone(), DynamicImage::ImageRgb8(self.build_rgb()))
    }

    /// A uniformly black frame.
    #[must_use]
    pub fn black(width: u32, height: u32) -> ImageInfo {
        Self::uniform(width, height, Rgb([0, 0, 0]))
    }

    /// A single-color frame.
    #[must_use]
    pub fn uniform(width: u32, height: u32, color: Rgb<u8>) -> ImageInfo {
        ImageInfo::new(
            "synthetic://uniform",
            DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, color)),
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct EyeShape {
    center: (f32, f32),
    opening: (f32, f32),
    iris_radius: f32,
    axes: (f32, f32),
}

/// Builder for 478-point normalized face-mesh landmark sets.
///
/// The right eye is placed explicitly; the left eye mirrors it across the
/// vertical center line unless set. Unused mesh points sit at the frame
/// center.
#[derive(Debug, Clone)]
pub struct FaceMeshBuilder {
    width: u32,
    height: u32,
    right: EyeShape,
    left: Option<EyeShape>,
    with_iris: bool,
    score: Option<f32>,
}

impl FaceMeshBuilder {
    /// Starts a mesh for a `width` x `height` frame with the right iris at
    /// the frame center.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let w = width as f32;
        Self {
            width,
            height,
            right: EyeShape {
                center: (w / 2.0, height as f32 / 2.0),
                opening: (w / 2.0, height as f32 / 2.0),
                iris_radius: w * 0.05,
                axes: (w * 0.15, w * 0.075),
            },
            left: None,
            with_iris: true,
            score: None,
        }
    }

    /// Mesh matching a [`SyntheticEyeBuilder`] eye.
    #[must_use]
    pub fn for_eye(eye: &SyntheticEyeBuilder) -> Self {
        let (width, height) = eye.dimensions();
        let mut builder = Self::new(width, height);
        builder.right = EyeShape {
            center: eye.iris_center(),
            opening: eye.center(),
            iris_radius: eye.radius(),
            axes: eye.opening_axes(),
        };
        builder
    }

    /// Places the right eye (pixels): iris center and radius, opening half-axes.
    #[must_use]
    pub const fn right_eye(mut self, cx: f32, cy: f32, iris_radius: f32, rx: f32, ry: f32) -> Self {
        self.right = EyeShape {
            center: (cx, cy),
            opening: (cx, cy),
            iris_radius,
            axes: (rx, ry),
        };
        self
    }

    /// Places the left eye explicitly.
    #[must_use]
    pub const fn left_eye(mut self, cx: f32, cy: f32, iris_radius: f32, rx: f32, ry: f32) -> Self {
        self.left = Some(EyeShape {
            center: (cx, cy),
            opening: (cx, cy),
            iris_radius,
            axes: (rx, ry),
        });
        self
    }

    /// Drops the ten iris points, leaving a 468-point mesh.
    #[must_use]
    pub const fn without_iris(mut self) -> Self {
        self.with_iris = false;
        self
    }

    /// Sets the face presence score.
    #[must_use]
    pub const fn score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    fn mirrored(&self) -> EyeShape {
        let w = self.width as f32;
        EyeShape {
            center: (w - self.right.center.0, self.right.center.1),
            opening: (w - self.right.opening.0, self.right.opening.1),
            ..self.right
        }
    }

    /// Builds the landmark set.
    #[must_use]
    pub fn build(&self) -> FaceLandmarks {
        let (w, h) = (self.width as f32, self.height as f32);
        let norm = |x: f32, y: f32| Landmark::new(x / w, y / h);
        let len = if self.with_iris {
            mesh::REFINED_POINTS
        } else {
            mesh::FACE_POINTS
        };
        let mut points = vec![Landmark::new(0.5, 0.5); len];

        let left = self.left.unwrap_or_else(|| self.mirrored());
        for (shape, iris, contour) in [
            (self.right, mesh::RIGHT_IRIS, mesh::RIGHT_EYE_CONTOUR),
            (left, mesh::LEFT_IRIS, mesh::LEFT_EYE_CONTOUR),
        ] {
            let (ox, oy) = shape.opening;
            let (rx, ry) = shape.axes;
            for (k, &i) in contour.iter().enumerate() {
                let t = std::f32::consts::TAU * k as f32 / contour.len() as f32;
                points[i] = norm(ox + rx * t.cos(), oy + ry * t.sin());
            }
            let (cx, cy) = shape.center;
            if self.with_iris {
                let r = shape.iris_radius;
                points[iris[0]] = norm(cx, cy);
                points[iris[1]] = norm(cx + r, cy);
                points[iris[2]] = norm(cx, cy - r);
                points[iris[3]] = norm(cx - r, cy);
                points[iris[4]] = norm(cx, cy + r);
            }
        }

        FaceLandmarks {
            points,
            score: self.score,
        }
    }

    /// Serializes the landmarks in sidecar format: `{"faces":[...]}`.
    #[must_use]
    pub fn to_sidecar_json(&self) -> String {
        let faces = serde_json::json!({ "faces": [self.build()] });
        faces.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_layout() {
        let eye = SyntheticEyeBuilder::new(400, 300);
        let img = eye.build_rgb();
        assert_eq!(img.dimensions(), (400, 300));
        assert_eq!(*img.get_pixel(200, 150), IRIS);
        assert_eq!(*img.get_pixel(250, 150), SCLERA);
        assert_eq!(*img.get_pixel(5, 5), SKIN);
        let (rx, ry) = eye.opening_axes();
        assert!((rx - 60.0).abs() < 1e-4);
        assert!((ry - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_inflamed_eye_uses_red_sclera() {
        let img = SyntheticEyeBuilder::new(400, 300).inflamed().build_rgb();
        assert_eq!(*img.get_pixel(250, 150), INFLAMED_SCLERA);
    }

    #[test]
    fn test_black_frame() {
        let info = SyntheticEyeBuilder::black(32, 16);
        assert_eq!((info.width, info.height), (32, 16));
        assert!(info.to_rgb8().pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_mesh_has_refined_points() {
        let face = FaceMeshBuilder::new(400, 300).build();
        assert_eq!(face.points.len(), mesh::REFINED_POINTS);
        let center = face.points[mesh::RIGHT_IRIS[0]];
        assert!((center.x - 0.5).abs() < 1e-6);
        assert!((center.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_mesh_without_iris() {
        let face = FaceMeshBuilder::new(400, 300).without_iris().build();
        assert_eq!(face.points.len(), mesh::FACE_POINTS);
    }

    #[test]
    fn test_left_eye_mirrors_right() {
        let face = FaceMeshBuilder::new(400, 300)
            .right_eye(100.0, 150.0, 20.0, 60.0, 30.0)
            .build();
        let left = face.points[mesh::LEFT_IRIS[0]];
        assert!((left.x - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_sidecar_json_shape() {
        let json = FaceMeshBuilder::new(100, 100).score(0.9).to_sidecar_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(value["faces"].as_array().map(Vec::len), Some(1));
        assert_eq!(
            value["faces"][0]["points"].as_array().map(Vec::len),
            Some(mesh::REFINED_POINTS)
        );
    }
}
