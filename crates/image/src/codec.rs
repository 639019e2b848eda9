//! Decoding and encoding through the image crate.

use crate::{detect_format, ImageError, ImageFormat, Result};
use image::{ColorType, DynamicImage, ImageOutputFormat};
use std::borrow::Cow;
use std::io::Cursor;

/// A decoded image and the container format it came from.
#[derive(Debug, Clone)]
pub struct Decoded {
    /// Pixel data
    pub image: DynamicImage,
    /// Format sniffed from the input bytes, if recognised
    pub format: Option<ImageFormat>,
}

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Quality for lossy encoders (1-100)
    pub quality: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { quality: 95 }
    }
}

impl EncodeOptions {
    /// Options with the given quality, clamped to 1-100.
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

/// Decode image file bytes.
pub fn decode(data: &[u8]) -> Result<Decoded> {
    let format = detect_format(data).ok();
    let image = image::load_from_memory(data)?;
    Ok(Decoded { image, format })
}

/// Encode an image to bytes in `format`.
///
/// Alpha is dropped for formats that cannot store it; callers wanting a
/// composited result should flatten first (see [`crate::flatten_onto`]).
pub fn encode(img: &DynamicImage, format: ImageFormat, options: &EncodeOptions) -> Result<Vec<u8>> {
    let output_format = match format {
        ImageFormat::Jpeg => ImageOutputFormat::Jpeg(options.quality.clamp(1, 100)),
        ImageFormat::Png => ImageOutputFormat::Png,
        ImageFormat::Gif => ImageOutputFormat::Gif,
        ImageFormat::WebP => ImageOutputFormat::WebP,
        ImageFormat::Bmp => ImageOutputFormat::Bmp,
        _ => {
            return Err(ImageError::UnsupportedFormat(format!(
                "cannot encode {}",
                format.name()
            )))
        }
    };

    let mut buffer = Cursor::new(Vec::new());
    prepare_for(img, format).write_to(&mut buffer, output_format)?;
    Ok(buffer.into_inner())
}

/// Convert to a color type the target encoder accepts.
fn prepare_for(img: &DynamicImage, format: ImageFormat) -> Cow<'_, DynamicImage> {
    let color = img.color();
    let converted = match format {
        ImageFormat::Jpeg => match color {
            ColorType::L8 | ColorType::Rgb8 => None,
            _ => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
        },
        ImageFormat::Bmp => match color {
            ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => None,
            _ if color.has_alpha() => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
            _ => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
        },
        ImageFormat::Png => match color {
            ColorType::Rgb32F => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
            ColorType::Rgba32F => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
            _ => None,
        },
        ImageFormat::WebP => match color {
            ColorType::Rgb8 | ColorType::Rgba8 => None,
            _ if color.has_alpha() => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
            _ => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
        },
        _ => match color {
            ColorType::Rgba8 => None,
            _ => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
        },
    };

    converted.map_or(Cow::Borrowed(img), Cow::Owned)
}
