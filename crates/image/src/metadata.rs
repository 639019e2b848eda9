//! Image metadata extraction.

use crate::alpha::has_transparent_pixels;
use crate::detect::PNG_SIGNATURE;
use crate::{codec, ImageFormat, Result};
use image::{ColorType, DynamicImage};
use serde::{Deserialize, Serialize};

/// Image metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Detected container format
    pub format: Option<ImageFormat>,
    /// Pixel mode, e.g. `RGB`, `RGBA`, `P`
    pub mode: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Whether any pixel is less than fully opaque
    pub has_transparency: bool,
}

/// Decode `data` and describe it.
pub fn inspect(data: &[u8]) -> Result<ImageMetadata> {
    let decoded = codec::decode(data)?;
    let img = &decoded.image;

    let (palette, has_transparency) = match decoded.format {
        Some(ImageFormat::Png) => match scan_png(data) {
            Some(png) if png.color_type == PNG_INDEXED => (true, png.has_trns),
            _ => (false, has_transparent_pixels(img)),
        },
        Some(ImageFormat::Gif) => (true, has_transparent_pixels(img)),
        _ => (false, has_transparent_pixels(img)),
    };

    Ok(ImageMetadata {
        format: decoded.format,
        mode: color_mode(img, palette).to_string(),
        width: img.width(),
        height: img.height(),
        has_transparency,
    })
}

/// Short pixel-mode name for a decoded image.
pub fn color_mode(img: &DynamicImage, palette: bool) -> &'static str {
    if palette {
        return "P";
    }
    match img.color() {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGBF",
        ColorType::Rgba32F => "RGBAF",
        _ => "UNKNOWN",
    }
}

const PNG_INDEXED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PngHeader {
    color_type: u8,
    has_trns: bool,
}

/// Walk PNG chunks up to the first IDAT.
///
/// tRNS must precede IDAT, so nothing after it is needed.
fn scan_png(data: &[u8]) -> Option<PngHeader> {
    if !data.starts_with(&PNG_SIGNATURE) {
        return None;
    }

    let mut color_type = None;
    let mut has_trns = false;
    let mut offset = PNG_SIGNATURE.len();

    while offset + 8 <= data.len() {
        let length = u32::from_be_bytes(data[offset..offset + 4].try_into().ok()?) as usize;
        let chunk_type = &data[offset + 4..offset + 8];
        let body = offset + 8;

        match chunk_type {
            b"IHDR" => color_type = data.get(body + 9).copied(),
            b"tRNS" => has_trns = true,
            b"IDAT" | b"IEND" => break,
            _ => {}
        }

        // length + type + body + crc
        offset = body.checked_add(length)?.checked_add(4)?;
    }

    Some(PngHeader {
        color_type: color_type?,
        has_trns,
    })
}
