//! Chromakey to transparency.
//!
//! Pixels are classified by their RGB distance to the key color:
//!
//! - `distance < tolerance`: fully transparent (color channels kept)
//! - `tolerance <= distance < 3 * tolerance`: linear alpha ramp
//! - `distance >= 3 * tolerance`: alpha left untouched
//!
//! The ramp yields anti-aliased edges without a halo of key color.

use crate::color::{color_distance, Color};
use image::{DynamicImage, Rgba, RgbaImage};
use serde::Serialize;

/// Largest tolerance honored; anything above keys out every pixel anyway.
pub const MAX_TOLERANCE: f64 = 442.0;

/// Owned RGBA8 raster with bounds-checked pixel access.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pixels: RgbaImage,
}

impl PixelBuffer {
    /// Create a buffer filled with one pixel value.
    pub fn new(width: u32, height: u32, fill: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(fill)),
        }
    }

    /// Take ownership of a decoded image, upgrading it to RGBA.
    ///
    /// Sources without an alpha channel come out fully opaque.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        Self {
            pixels: img.into_rgba8(),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Pixel at (x, y), or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.in_bounds(x, y).then(|| self.pixels.get_pixel(x, y).0)
    }

    /// Overwrite the pixel at (x, y). Returns `false` when out of bounds.
    pub fn set(&mut self, x: u32, y: u32, value: [u8; 4]) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.pixels.put_pixel(x, y, Rgba(value));
        true
    }

    /// Hand the raster back to the codec.
    pub fn into_dynamic(self) -> DynamicImage {
        DynamicImage::ImageRgba8(self.pixels)
    }

    fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height()
    }
}

/// Key color plus the tolerance applied around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyingRequest {
    target: Color,
    tolerance: f64,
}

impl KeyingRequest {
    /// Build a request, clamping tolerance into `0..=MAX_TOLERANCE`.
    ///
    /// NaN and negative values become 0 (exact matches only).
    pub fn new(target: Color, tolerance: f64) -> Self {
        let tolerance = if tolerance.is_nan() {
            0.0
        } else {
            tolerance.clamp(0.0, MAX_TOLERANCE)
        };
        Self { target, tolerance }
    }

    /// Key color.
    pub fn target(&self) -> Color {
        self.target
    }

    /// Effective tolerance after clamping.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// Counters reported by [`apply_key`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyingStats {
    /// Pixels visited
    pub pixels_processed: u64,
    /// Pixels driven to alpha 0
    pub pixels_made_transparent: u64,
}

/// Alpha for a pixel at `distance` from the key, or `None` to keep its alpha.
///
/// With a tolerance of 0 the ramp is empty and only exact matches are keyed.
pub fn key_alpha(distance: f64, tolerance: f64) -> Option<u8> {
    if within_key(distance, tolerance) {
        return Some(0);
    }
    if tolerance > 0.0 && distance < tolerance * 3.0 {
        let ramp = 255.0 * (distance - tolerance) / (tolerance * 2.0);
        return Some(ramp.clamp(0.0, 255.0) as u8);
    }
    None
}

fn within_key(distance: f64, tolerance: f64) -> bool {
    distance < tolerance || (tolerance == 0.0 && distance == 0.0)
}

/// Key `request.target()` out of `buffer` in place.
pub fn apply_key(buffer: &mut PixelBuffer, request: &KeyingRequest) -> KeyingStats {
    let mut stats = KeyingStats::default();

    for pixel in buffer.pixels.pixels_mut() {
        let Rgba([r, g, b, _]) = *pixel;
        let distance = color_distance(Color::new(r, g, b), request.target);

        if within_key(distance, request.tolerance) {
            stats.pixels_made_transparent += 1;
        }
        if let Some(alpha) = key_alpha(distance, request.tolerance) {
            pixel.0[3] = alpha;
        }
        stats.pixels_processed += 1;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use proptest::prelude::*;

    fn chromakey_fixture() -> PixelBuffer {
        let mut buffer = PixelBuffer::new(100, 100, [0, 255, 0, 255]);
        for y in 30..70 {
            for x in 30..70 {
                buffer.set(x, y, [255, 0, 0, 255]);
            }
        }
        buffer
    }

    #[test]
    fn test_green_background_keyed() {
        let mut buffer = chromakey_fixture();
        let stats = apply_key(&mut buffer, &KeyingRequest::new(Color::GREEN, 70.0));

        assert_eq!(buffer.get(0, 0).unwrap()[3], 0);
        assert_eq!(buffer.get(50, 50).unwrap()[3], 255);
        assert_eq!(stats.pixels_processed, 10_000);
        assert_eq!(stats.pixels_made_transparent, 8_400);
    }

    #[test]
    fn test_transparent_pixels_keep_color() {
        let mut buffer = PixelBuffer::new(1, 1, [10, 240, 12, 255]);
        apply_key(&mut buffer, &KeyingRequest::new(Color::GREEN, 70.0));
        assert_eq!(buffer.get(0, 0), Some([10, 240, 12, 0]));
    }

    #[test]
    fn test_rgb_source_upgraded_to_opaque() {
        let rgb = RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]));
        let buffer = PixelBuffer::from_dynamic(DynamicImage::ImageRgb8(rgb));
        assert_eq!(buffer.get(1, 1), Some([1, 2, 3, 255]));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut buffer = PixelBuffer::new(2, 3, [0, 0, 0, 255]);
        assert!(buffer.get(2, 0).is_none());
        assert!(buffer.get(0, 3).is_none());
        assert!(!buffer.set(5, 5, [1, 1, 1, 1]));
        assert_eq!(buffer.pixel_count(), 6);
    }

    #[test]
    fn test_ramp_boundaries() {
        assert_eq!(key_alpha(69.9, 70.0), Some(0));
        assert_eq!(key_alpha(70.0, 70.0), Some(0));
        assert_eq!(key_alpha(140.0, 70.0), Some(127));
        assert_eq!(key_alpha(209.9, 70.0), Some(254));
        assert_eq!(key_alpha(210.0, 70.0), None);
    }

    #[test]
    fn test_ramp_start_not_counted_as_keyed() {
        // (0, 185, 0) sits at distance 70 from pure green: alpha 0 from the ramp
        let mut buffer = PixelBuffer::new(1, 1, [0, 185, 0, 255]);
        let stats = apply_key(&mut buffer, &KeyingRequest::new(Color::GREEN, 70.0));
        assert_eq!(buffer.get(0, 0).unwrap()[3], 0);
        assert_eq!(stats.pixels_made_transparent, 0);
    }

    #[test]
    fn test_opaque_zone_preserves_existing_alpha() {
        let mut buffer = PixelBuffer::new(1, 1, [255, 0, 0, 100]);
        apply_key(&mut buffer, &KeyingRequest::new(Color::GREEN, 70.0));
        assert_eq!(buffer.get(0, 0).unwrap()[3], 100);
    }

    #[test]
    fn test_zero_tolerance_exact_match_only() {
        let mut buffer = PixelBuffer::new(2, 1, [0, 255, 0, 255]);
        buffer.set(1, 0, [0, 254, 0, 255]);
        let stats = apply_key(&mut buffer, &KeyingRequest::new(Color::GREEN, 0.0));

        assert_eq!(buffer.get(0, 0).unwrap()[3], 0);
        assert_eq!(buffer.get(1, 0).unwrap()[3], 255);
        assert_eq!(stats.pixels_made_transparent, 1);
    }

    #[test]
    fn test_tolerance_clamped() {
        assert_eq!(KeyingRequest::new(Color::GREEN, -5.0).tolerance(), 0.0);
        assert_eq!(KeyingRequest::new(Color::GREEN, f64::NAN).tolerance(), 0.0);
        assert_eq!(KeyingRequest::new(Color::GREEN, 1e9).tolerance(), MAX_TOLERANCE);
    }

    #[test]
    fn test_huge_tolerance_keys_everything() {
        let mut buffer = PixelBuffer::new(1, 2, [0, 0, 0, 255]);
        buffer.set(0, 1, [255, 255, 255, 255]);
        let stats = apply_key(&mut buffer, &KeyingRequest::new(Color::BLACK, f64::INFINITY));
        assert_eq!(stats.pixels_made_transparent, 2);
    }

    proptest! {
        #[test]
        fn prop_exact_match_is_transparent(rgb in any::<[u8; 3]>(), tolerance in 0.001f64..MAX_TOLERANCE) {
            let [r, g, b] = rgb;
            let mut buffer = PixelBuffer::new(1, 1, [r, g, b, 255]);
            apply_key(&mut buffer, &KeyingRequest::new(Color::from(rgb), tolerance));
            prop_assert_eq!(buffer.get(0, 0).unwrap()[3], 0);
        }

        #[test]
        fn prop_ramp_monotonic(tolerance in 0.5f64..150.0, a in 0.0f64..1.0, b in 0.0f64..1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let span = tolerance * 2.0;
            let near = key_alpha(tolerance + lo * span, tolerance).unwrap_or(255);
            let far = key_alpha(tolerance + hi * span, tolerance).unwrap_or(255);
            prop_assert!(near <= far);
        }
    }
}
