use super::{require_absolute, require_input, Dimensions, ImageTools};
use crate::codec::{self, EncodeOptions};
use crate::resize::{target_dimensions, ResampleFilter, ResizeRequest};
use crate::{flatten_onto, has_alpha_channel, with_write_target, Color, ImageFormat, Response, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Arguments of `resize_image`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResizeParams {
    /// Image to resize
    pub input_path: PathBuf,
    /// Destination; its extension selects the format
    pub output_path: PathBuf,
    /// Target width in pixels
    pub width: Option<u32>,
    /// Target height in pixels
    pub height: Option<u32>,
    /// Uniform scale factor, exclusive with width/height
    pub scale: Option<f64>,
    /// Derive the missing dimension from the aspect ratio (default true)
    pub maintain_aspect: Option<bool>,
    /// nearest, bilinear, bicubic or lanczos (default lanczos)
    pub resample: Option<String>,
}

impl ResizeParams {
    /// Params with no size set yet.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            ..Default::default()
        }
    }
}

/// Result of `resize_image`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResizeReport {
    /// Written file
    pub output_path: PathBuf,
    /// Input size
    pub original_dimensions: Dimensions,
    /// Output size
    pub new_dimensions: Dimensions,
    /// Filter used
    pub resample: ResampleFilter,
    /// Output format
    pub format: ImageFormat,
}

impl ImageTools {
    /// Resize by explicit dimensions or a scale factor.
    ///
    /// The output format follows the output extension, falling back to the
    /// input's format.
    pub fn resize_image(&self, params: &ResizeParams) -> Response<ResizeReport> {
        Response::from_result("resize_image", self.run_resize(params))
    }

    fn run_resize(&self, params: &ResizeParams) -> Result<ResizeReport> {
        require_absolute(&params.input_path)?;
        require_absolute(&params.output_path)?;
        require_input(&params.input_path)?;

        let defaults = &self.config().resize;
        let filter: ResampleFilter = params.resample.as_deref().unwrap_or(&defaults.resample).parse()?;
        let request = ResizeRequest {
            width: params.width,
            height: params.height,
            scale: params.scale,
            maintain_aspect: params.maintain_aspect.unwrap_or(defaults.maintain_aspect),
        };

        let decoded = codec::decode(&fs::read(&params.input_path)?)?;
        let original = (decoded.image.width(), decoded.image.height());
        let (width, height) = target_dimensions(original, &request)?;

        let format = ImageFormat::from_extension(&params.output_path)
            .unwrap_or_else(|_| decoded.format.unwrap_or(ImageFormat::Png));

        let mut resized = decoded.image.resize_exact(width, height, filter.filter_type());
        if !format.supports_alpha() && has_alpha_channel(&resized) {
            resized = flatten_onto(&resized, Color::WHITE);
        }

        let options = EncodeOptions::with_quality(self.config().convert.quality);
        let encoded = codec::encode(&resized, format, &options)?;
        with_write_target(&params.input_path, &params.output_path, |target| {
            Ok(fs::write(target, &encoded)?)
        })?;

        tracing::info!(
            output = %params.output_path.display(),
            from = ?original,
            to = ?(width, height),
            filter = filter.name(),
            "image resized"
        );

        Ok(ResizeReport {
            output_path: params.output_path.clone(),
            original_dimensions: original.into(),
            new_dimensions: (width, height).into(),
            resample: filter,
            format,
        })
    }
}
