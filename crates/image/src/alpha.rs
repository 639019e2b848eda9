//! Alpha channel utilities.

use crate::Color;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

/// Composite an image over a solid background, producing opaque RGB.
pub fn flatten_onto(img: &DynamicImage, background: Color) -> DynamicImage {
    let (width, height) = img.dimensions();
    let rgba_img = img.to_rgba8();
    let bg = background.rgb();

    let mut output = RgbImage::new(width, height);

    for (x, y, pixel) in rgba_img.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let a = u32::from(a);
        let blend = |fg: u8, bg: u8| {
            ((u32::from(fg) * a + u32::from(bg) * (255 - a) + 127) / 255) as u8
        };

        output.put_pixel(x, y, Rgb([blend(r, bg[0]), blend(g, bg[1]), blend(b, bg[2])]));
    }

    DynamicImage::ImageRgb8(output)
}

/// Check if an image has an alpha channel
pub fn has_alpha_channel(img: &DynamicImage) -> bool {
    img.color().has_alpha()
}

/// Whether any pixel is less than fully opaque.
///
/// Images without an alpha channel are never transparent.
pub fn has_transparent_pixels(img: &DynamicImage) -> bool {
    match img {
        DynamicImage::ImageLumaA8(buf) => buf.pixels().any(|p| p[1] < u8::MAX),
        DynamicImage::ImageRgba8(buf) => buf.pixels().any(|p| p[3] < u8::MAX),
        DynamicImage::ImageLumaA16(buf) => buf.pixels().any(|p| p[1] < u16::MAX),
        DynamicImage::ImageRgba16(buf) => buf.pixels().any(|p| p[3] < u16::MAX),
        DynamicImage::ImageRgba32F(buf) => buf.pixels().any(|p| p[3] < 1.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_flatten_white_background() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255])); // Opaque red
        img.put_pixel(0, 1, Rgba([0, 255, 0, 128])); // Semi-transparent green
        img.put_pixel(1, 0, Rgba([0, 0, 255, 0])); // Fully transparent blue
        img.put_pixel(1, 1, Rgba([255, 255, 0, 255])); // Opaque yellow

        let result = flatten_onto(&DynamicImage::ImageRgba8(img), Color::WHITE).to_rgb8();

        assert_eq!(result.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(result.get_pixel(0, 1), &Rgb([127, 255, 127]));
        assert_eq!(result.get_pixel(1, 0), &Rgb([255, 255, 255]));
        assert_eq!(result.get_pixel(1, 1), &Rgb([255, 255, 0]));
    }

    #[test]
    fn test_flatten_custom_background() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 0]));
        let result = flatten_onto(&DynamicImage::ImageRgba8(img), Color::new(1, 2, 3)).to_rgb8();
        assert_eq!(result.get_pixel(0, 0), &Rgb([1, 2, 3]));
    }

    #[test]
    fn test_has_alpha_channel() {
        let rgba_img = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));
        assert!(has_alpha_channel(&rgba_img));

        let rgb_img = DynamicImage::ImageRgb8(RgbImage::new(1, 1));
        assert!(!has_alpha_channel(&rgb_img));
    }

    #[test]
    fn test_transparent_pixels() {
        let opaque = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 255])));
        assert!(!has_transparent_pixels(&opaque));

        let mut partial = RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 255]));
        partial.put_pixel(2, 2, Rgba([1, 2, 3, 254]));
        assert!(has_transparent_pixels(&DynamicImage::ImageRgba8(partial)));

        assert!(!has_transparent_pixels(&DynamicImage::ImageRgb8(RgbImage::new(2, 2))));
    }
}
