//! Per-pixel Lab and HSV conversion over a rectangular region.
//!
//! Lab goes sRGB -> linear RGB (piecewise inverse gamma, 0.04045 knee) ->
//! XYZ (D65 primaries) -> CIE Lab (D65 white, 0.008856 pivot). HSV uses the
//! standard max/min channel derivation. Both are computed by `palette`.

use image::RgbImage;
use palette::{FromColor, Hsv, Lab, Srgb};

use crate::domain::BoundingBox;

/// One pixel in both perceptual encodings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    /// Column in image coordinates.
    pub x: u32,
    /// Row in image coordinates.
    pub y: u32,
    /// CIE Lab (D65).
    pub lab: Lab,
    /// Hue/saturation/value.
    pub hsv: Hsv,
}

impl PixelSample {
    /// Converts one sRGB pixel.
    #[must_use]
    pub fn from_rgb(x: u32, y: u32, rgb: [u8; 3]) -> Self {
        let srgb: Srgb<f32> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_format();
        Self {
            x,
            y,
            lab: Lab::from_color(srgb.into_linear()),
            hsv: Hsv::from_color(srgb),
        }
    }

    /// Hue in degrees, `0.0..360.0`.
    #[must_use]
    pub fn hue_degrees(&self) -> f32 {
        self.hsv.hue.into_positive_degrees()
    }
}

/// Color samples of one region, in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSpaceAnalysis {
    samples: Vec<PixelSample>,
    region: BoundingBox,
}

impl ColorSpaceAnalysis {
    /// Analyzes `region` of `image`. The region is clipped to the image first;
    /// a zero-area region yields an empty analysis.
    #[must_use]
    pub fn analyze(image: &RgbImage, region: BoundingBox) -> Self {
        let region = region.clamp_to(image.width(), image.height());
        let capacity = usize::try_from(region.area()).unwrap_or(0);
        let mut samples = Vec::with_capacity(capacity);

        for y in region.y..region.y + region.height {
            for x in region.x..region.x + region.width {
                samples.push(PixelSample::from_rgb(x, y, image.get_pixel(x, y).0));
            }
        }

        Self { samples, region }
    }

    /// Analyzes the whole image.
    #[must_use]
    pub fn analyze_full(image: &RgbImage) -> Self {
        Self::analyze(image, BoundingBox::full(image.width(), image.height()))
    }

    /// Pixel samples.
    #[must_use]
    pub fn samples(&self) -> &[PixelSample] {
        &self.samples
    }

    /// The analyzed (clipped) region.
    #[must_use]
    pub const fn region(&self) -> BoundingBox {
        self.region
    }

    /// Region width.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.region.width
    }

    /// Region height.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.region.height
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` when no pixels were analyzed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_white_is_neutral_full_lightness() {
        let sample = PixelSample::from_rgb(0, 0, [255, 255, 255]);
        assert!((sample.lab.l - 100.0).abs() < 0.5, "L={}", sample.lab.l);
        assert!(sample.lab.a.abs() < 0.5, "a={}", sample.lab.a);
        assert!(sample.lab.b.abs() < 0.5, "b={}", sample.lab.b);
        assert!(sample.hsv.saturation.abs() < 1e-6);
        assert!((sample.hsv.value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_black_is_zero_lightness() {
        let sample = PixelSample::from_rgb(0, 0, [0, 0, 0]);
        assert!(sample.lab.l.abs() < 1e-3);
    }

    #[test]
    fn test_red_bias_has_positive_a() {
        let sample = PixelSample::from_rgb(0, 0, [220, 120, 120]);
        assert!(sample.lab.a > 10.0, "a={}", sample.lab.a);
        assert!(sample.hue_degrees() < 10.0 || sample.hue_degrees() > 350.0);
    }

    #[test]
    fn test_mid_gray_lightness() {
        // sRGB 119 is close to L* 50.
        let sample = PixelSample::from_rgb(0, 0, [119, 119, 119]);
        assert!((sample.lab.l - 50.0).abs() < 1.0, "L={}", sample.lab.l);
    }

    #[test]
    fn test_region_samples_in_row_major_order() {
        let img = RgbImage::from_pixel(10, 8, Rgb([10, 20, 30]));
        let analysis = ColorSpaceAnalysis::analyze(&img, BoundingBox::new(2, 3, 4, 2));
        assert_eq!(analysis.len(), 8);
        assert_eq!(analysis.width(), 4);
        assert_eq!(analysis.height(), 2);
        assert_eq!((analysis.samples()[0].x, analysis.samples()[0].y), (2, 3));
        assert_eq!((analysis.samples()[7].x, analysis.samples()[7].y), (5, 4));
    }

    #[test]
    fn test_zero_area_region_is_empty() {
        let img = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let analysis = ColorSpaceAnalysis::analyze(&img, BoundingBox::new(3, 3, 0, 5));
        assert!(analysis.is_empty());
    }

    #[test]
    fn test_region_outside_image_is_clipped() {
        let img = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let analysis = ColorSpaceAnalysis::analyze(&img, BoundingBox::new(8, 8, 10, 10));
        assert_eq!(analysis.len(), 4);

        let outside = ColorSpaceAnalysis::analyze(&img, BoundingBox::new(20, 20, 5, 5));
        assert!(outside.is_empty());
    }

    #[test]
    fn test_empty_image() {
        let img = RgbImage::new(0, 0);
        assert!(ColorSpaceAnalysis::analyze_full(&img).is_empty());
    }
}
