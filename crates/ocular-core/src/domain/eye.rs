//! Eye geometry: points, regions and landmark-derived eye candidates.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use serde::{Deserialize, Serialize};

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate in pixels.
    pub x: f32,
    /// Vertical coordinate in pixels.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BoundingBox {
    /// Creates a new bounding box.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The box covering a whole `width` x `height` image.
    #[must_use]
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Smallest box containing all `points`, clamped to the image.
    ///
    /// Returns `None` for an empty point set.
    #[must_use]
    pub fn enclosing(points: &[Point], image_width: u32, image_height: u32) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::from_extents(
            min_x,
            min_y,
            max_x,
            max_y,
            image_width,
            image_height,
        ))
    }

    /// Square box of half-size `half_extent` centred on `center`, clamped to the image.
    #[must_use]
    pub fn around(center: Point, half_extent: f32, image_width: u32, image_height: u32) -> Self {
        Self::from_extents(
            center.x - half_extent,
            center.y - half_extent,
            center.x + half_extent,
            center.y + half_extent,
            image_width,
            image_height,
        )
    }

    fn from_extents(
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let clamp = |v: f32, limit: u32| -> u32 {
            if v.is_finite() {
                v.clamp(0.0, limit as f32) as u32
            } else {
                0
            }
        };
        let x0 = clamp(min_x.floor(), image_width);
        let y0 = clamp(min_y.floor(), image_height);
        let x1 = clamp(max_x.ceil(), image_width).max(x0);
        let y1 = clamp(max_y.ceil(), image_height).max(y0);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Returns `true` when the box covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Width divided by height, `0.0` for a zero-height box.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Geometric center of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Intersection with a `width` x `height` image.
    #[must_use]
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self::new(
            x,
            y,
            self.width.min(width - x),
            self.height.min(height - y),
        )
    }
}

/// Which physical eye a candidate belongs to (subject's perspective).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeSide {
    /// Subject's left eye (appears on the image's right).
    Left,
    /// Subject's right eye (appears on the image's left).
    Right,
}

/// How eye presence was established.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Landmarks and the deterministic fallback agree.
    Hybrid,
    /// Only the landmark detector found an eye.
    LandmarkOnly,
    /// Only the deterministic fallback found an eye.
    FallbackOnly,
}

/// Five-point iris in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IrisLandmarks {
    center: Point,
    cardinal: [Point; 4],
    radius: f32,
}

impl IrisLandmarks {
    /// Builds an iris from its center and four cardinal boundary points.
    ///
    /// The radius is the mean distance of the cardinal points from the center.
    #[must_use]
    pub fn new(center: Point, cardinal: [Point; 4]) -> Self {
        let radius = cardinal.iter().map(|p| p.distance(&center)).sum::<f32>() / 4.0;
        Self {
            center,
            cardinal,
            radius,
        }
    }

    /// Iris center.
    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    /// Cardinal boundary points.
    #[must_use]
    pub const fn cardinal(&self) -> &[Point; 4] {
        &self.cardinal
    }

    /// Mean cardinal distance from the center.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Distances of the cardinal points from the center.
    #[must_use]
    pub fn cardinal_distances(&self) -> [f32; 4] {
        self.cardinal.map(|p| p.distance(&self.center))
    }
}

/// One physical eye located by the landmark detector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EyeCandidate {
    side: EyeSide,
    iris: IrisLandmarks,
    contour: Vec<Point>,
    bbox: BoundingBox,
}

impl EyeCandidate {
    /// Builds a candidate, deriving its bounding box from the eyelid contour.
    ///
    /// An empty contour falls back to the iris center +/- two radii.
    #[must_use]
    pub fn new(
        side: EyeSide,
        iris: IrisLandmarks,
        contour: Vec<Point>,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let bbox = BoundingBox::enclosing(&contour, image_width, image_height).unwrap_or_else(
            || BoundingBox::around(iris.center(), iris.radius() * 2.0, image_width, image_height),
        );
        Self {
            side,
            iris,
            contour,
            bbox,
        }
    }

    /// Which eye this is.
    #[must_use]
    pub const fn side(&self) -> EyeSide {
        self.side
    }

    /// Iris landmarks.
    #[must_use]
    pub const fn iris(&self) -> &IrisLandmarks {
        &self.iris
    }

    /// Ordered eyelid contour.
    #[must_use]
    pub fn contour(&self) -> &[Point] {
        &self.contour
    }

    /// Region enclosing the eye opening.
    #[must_use]
    pub const fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Bounding-box height divided by width, `None` for a zero-width box.
    #[must_use]
    pub fn aperture_ratio(&self) -> Option<f32> {
        (self.bbox.width > 0).then(|| self.bbox.height as f32 / self.bbox.width as f32)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn cardinal(center: Point, r: f32) -> [Point; 4] {
        [
            Point::new(center.x + r, center.y),
            Point::new(center.x, center.y - r),
            Point::new(center.x - r, center.y),
            Point::new(center.x, center.y + r),
        ]
    }

    #[test]
    fn test_iris_radius_is_mean_cardinal_distance() {
        let c = Point::new(50.0, 40.0);
        let iris = IrisLandmarks::new(
            c,
            [
                Point::new(60.0, 40.0),
                Point::new(50.0, 28.0),
                Point::new(40.0, 40.0),
                Point::new(50.0, 50.0),
            ],
        );
        assert!((iris.radius() - 10.5).abs() < 1e-5);
    }

    #[test]
    fn test_enclosing_box_clamps_to_image() {
        let points = [Point::new(-5.0, 2.2), Point::new(30.4, 9.0), Point::new(12.0, 80.0)];
        let bbox = BoundingBox::enclosing(&points, 25, 50).unwrap_or_default();
        assert_eq!(bbox, BoundingBox::new(0, 2, 25, 48));
    }

    #[test]
    fn test_enclosing_empty_is_none() {
        assert!(BoundingBox::enclosing(&[], 10, 10).is_none());
    }

    #[test]
    fn test_candidate_box_falls_back_to_iris_extent() {
        let iris = IrisLandmarks::new(Point::new(50.0, 50.0), cardinal(Point::new(50.0, 50.0), 10.0));
        let candidate = EyeCandidate::new(EyeSide::Left, iris, vec![], 200, 200);
        assert_eq!(candidate.bbox(), BoundingBox::new(30, 30, 40, 40));
    }

    #[test]
    fn test_candidate_serializes_geometry_only() {
        let center = Point::new(50.0, 50.0);
        let iris = IrisLandmarks::new(center, cardinal(center, 10.0));
        let candidate = EyeCandidate::new(EyeSide::Right, iris, vec![], 200, 200);
        let value = serde_json::to_value(&candidate).expect("candidate serializes");
        let mut keys: Vec<&str> = value
            .as_object()
            .expect("candidate is an object")
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, ["bbox", "contour", "iris", "side"]);
    }

    #[test]
    fn test_aperture_ratio() {
        let center = Point::new(50.0, 50.0);
        let iris = IrisLandmarks::new(center, cardinal(center, 10.0));
        let contour = vec![Point::new(20.0, 40.0), Point::new(80.0, 70.0)];
        let candidate = EyeCandidate::new(EyeSide::Right, iris, contour, 200, 200);
        let ratio = candidate.aperture_ratio().unwrap_or_default();
        assert!((ratio - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_aspect_ratio_zero_height() {
        assert!(BoundingBox::new(0, 0, 10, 0).aspect_ratio().abs() < f32::EPSILON);
    }

    #[test]
    fn test_clamp_to() {
        let bbox = BoundingBox::new(90, 5, 40, 10).clamp_to(100, 100);
        assert_eq!(bbox, BoundingBox::new(90, 5, 10, 10));
    }
}
