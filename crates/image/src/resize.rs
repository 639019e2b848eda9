//! Resize dimension planning and resampling filters.

use crate::{ImageError, Result};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Resampling filter names accepted by `resize_image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    /// Nearest neighbour
    Nearest,
    /// Linear (triangle) filter
    Bilinear,
    /// Cubic (Catmull-Rom) filter
    Bicubic,
    /// Lanczos with window 3
    Lanczos,
}

impl ResampleFilter {
    /// All filters, in documentation order.
    pub const ALL: [ResampleFilter; 4] = [
        ResampleFilter::Nearest,
        ResampleFilter::Bilinear,
        ResampleFilter::Bicubic,
        ResampleFilter::Lanczos,
    ];

    /// Lower-case name.
    pub fn name(&self) -> &'static str {
        match self {
            ResampleFilter::Nearest => "nearest",
            ResampleFilter::Bilinear => "bilinear",
            ResampleFilter::Bicubic => "bicubic",
            ResampleFilter::Lanczos => "lanczos",
        }
    }

    /// Kernel used by the image crate.
    pub fn filter_type(&self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
            ResampleFilter::Bicubic => FilterType::CatmullRom,
            ResampleFilter::Lanczos => FilterType::Lanczos3,
        }
    }
}

impl FromStr for ResampleFilter {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|filter| filter.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|f| f.name()).collect();
                ImageError::InvalidArgument(format!(
                    "Invalid resample filter '{}'. Use: {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// Requested output size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeRequest {
    /// Target width
    pub width: Option<u32>,
    /// Target height
    pub height: Option<u32>,
    /// Uniform scale factor
    pub scale: Option<f64>,
    /// Derive a missing dimension from the aspect ratio
    pub maintain_aspect: bool,
}

impl Default for ResizeRequest {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale: None,
            maintain_aspect: true,
        }
    }
}

/// Largest output accepted, in pixels (16384 x 16384).
pub const MAX_OUTPUT_PIXELS: u64 = 1 << 28;

/// Compute output dimensions for an image of `original` size.
///
/// Derived dimensions are truncated toward zero. Results with no pixels or
/// more than [`MAX_OUTPUT_PIXELS`] are rejected before anything is allocated.
///
/// # Example
/// ```
/// use imgtools_image::{target_dimensions, ResizeRequest};
///
/// let request = ResizeRequest { width: Some(100), ..Default::default() };
/// assert_eq!(target_dimensions((200, 100), &request).unwrap(), (100, 50));
/// ```
pub fn target_dimensions(original: (u32, u32), request: &ResizeRequest) -> Result<(u32, u32)> {
    let (orig_w, orig_h) = (f64::from(original.0), f64::from(original.1));
    let proportional = |base: f64, target: u32, reference: f64| base * (f64::from(target) / reference);

    let (width, height) = match (request.scale, request.width, request.height) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            return Err(ImageError::InvalidArgument(
                "Specify either scale or width/height, not both".into(),
            ))
        }
        (Some(scale), None, None) => {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ImageError::InvalidArgument(format!(
                    "Scale must be a positive number, got {scale}"
                )));
            }
            (orig_w * scale, orig_h * scale)
        }
        (None, Some(width), Some(height)) => (f64::from(width), f64::from(height)),
        (None, Some(width), None) if request.maintain_aspect => {
            (f64::from(width), proportional(orig_h, width, orig_w))
        }
        (None, Some(width), None) => (f64::from(width), orig_h),
        (None, None, Some(height)) if request.maintain_aspect => {
            (proportional(orig_w, height, orig_h), f64::from(height))
        }
        (None, None, Some(height)) => (orig_w, f64::from(height)),
        (None, None, None) => {
            return Err(ImageError::InvalidArgument(
                "Specify width, height, or scale".into(),
            ))
        }
    };

    let (width, height) = (width.trunc(), height.trunc());
    if width < 1.0 || height < 1.0 {
        return Err(ImageError::InvalidArgument(format!(
            "Resulting dimensions {width}x{height} must be at least 1x1"
        )));
    }
    if width * height > MAX_OUTPUT_PIXELS as f64 {
        return Err(ImageError::InvalidArgument(format!(
            "Resulting dimensions {width}x{height} exceed the limit of {MAX_OUTPUT_PIXELS} pixels"
        )));
    }

    // both sides are at most MAX_OUTPUT_PIXELS here, so the casts are exact
    Ok((width as u32, height as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(width: Option<u32>, height: Option<u32>, scale: Option<f64>) -> ResizeRequest {
        ResizeRequest {
            width,
            height,
            scale,
            maintain_aspect: true,
        }
    }

    #[test]
    fn test_width_keeps_aspect() {
        assert_eq!(target_dimensions((200, 100), &request(Some(100), None, None)).unwrap(), (100, 50));
    }

    #[test]
    fn test_height_keeps_aspect() {
        assert_eq!(target_dimensions((200, 100), &request(None, Some(25), None)).unwrap(), (50, 25));
    }

    #[test]
    fn test_derived_dimension_truncates() {
        // 333 * (100 / 200) = 166.5
        assert_eq!(target_dimensions((200, 333), &request(Some(100), None, None)).unwrap(), (100, 166));
    }

    #[test]
    fn test_without_aspect() {
        let req = ResizeRequest {
            width: Some(10),
            maintain_aspect: false,
            ..Default::default()
        };
        assert_eq!(target_dimensions((200, 100), &req).unwrap(), (10, 100));
    }

    #[test]
    fn test_explicit_both() {
        assert_eq!(target_dimensions((200, 100), &request(Some(7), Some(9), None)).unwrap(), (7, 9));
    }

    #[test]
    fn test_scale() {
        assert_eq!(target_dimensions((100, 100), &request(None, None, Some(2.0))).unwrap(), (200, 200));
        assert_eq!(target_dimensions((101, 51), &request(None, None, Some(0.5))).unwrap(), (50, 25));
    }

    #[test]
    fn test_invalid_requests() {
        for req in [
            request(None, None, None),
            request(Some(10), None, Some(1.0)),
            request(None, None, Some(0.0)),
            request(None, None, Some(-1.0)),
            request(None, None, Some(f64::NAN)),
            request(None, None, Some(0.001)),
            request(Some(1), None, None),
        ] {
            assert!(
                matches!(target_dimensions((200, 100), &req), Err(ImageError::InvalidArgument(_))),
                "{req:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_oversized_output_rejected() {
        let huge = request(Some(4_000_000_000), Some(4_000_000_000), None);
        let err = target_dimensions((10, 10), &huge).unwrap_err();
        assert!(err.to_string().contains("exceed the limit"));

        // would saturate a u32 cast
        let scaled = request(None, None, Some(1e12));
        assert!(matches!(target_dimensions((10, 10), &scaled), Err(ImageError::InvalidArgument(_))));

        let tall = request(Some(1), Some(u32::MAX), None);
        assert!(target_dimensions((10, 10), &tall).is_err());

        // derived side blows past the limit
        let thin = request(Some(100_000), None, None);
        assert!(target_dimensions((1, 10_000), &thin).is_err());
    }

    #[test]
    fn test_limit_is_inclusive() {
        let edge = request(Some(16_384), Some(16_384), None);
        assert_eq!(target_dimensions((10, 10), &edge).unwrap(), (16_384, 16_384));
        let over = request(Some(16_385), Some(16_384), None);
        assert!(target_dimensions((10, 10), &over).is_err());
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("lanczos".parse::<ResampleFilter>().unwrap(), ResampleFilter::Lanczos);
        assert_eq!("BiCubic".parse::<ResampleFilter>().unwrap(), ResampleFilter::Bicubic);
        let err = "box".parse::<ResampleFilter>().unwrap_err();
        assert!(err.to_string().contains("nearest, bilinear, bicubic, lanczos"));
    }
}
