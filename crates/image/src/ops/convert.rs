use super::{require_absolute, require_input, ImageTools};
use crate::codec::{self, EncodeOptions};
use crate::{flatten_onto, has_alpha_channel, with_write_target, Color, ImageFormat, Response, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Arguments of `convert_format`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertParams {
    /// Image to convert
    pub input_path: PathBuf,
    /// Destination; its extension selects the format
    pub output_path: PathBuf,
    /// Quality for lossy formats, 1-100 (default 95)
    pub quality: Option<u8>,
}

impl ConvertParams {
    /// Params with the default quality.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            quality: None,
        }
    }
}

/// Result of `convert_format`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertReport {
    /// Written file
    pub output_path: PathBuf,
    /// Sniffed input format
    pub original_format: Option<ImageFormat>,
    /// Output format
    pub format: ImageFormat,
    /// Encoder quality, for lossy output only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    /// Output size in bytes
    pub file_size_bytes: u64,
}

impl ImageTools {
    /// Re-encode into the format named by the output extension.
    ///
    /// Transparent images headed for JPEG or BMP are composited onto white.
    pub fn convert_format(&self, params: &ConvertParams) -> Response<ConvertReport> {
        Response::from_result("convert_format", self.run_convert(params))
    }

    fn run_convert(&self, params: &ConvertParams) -> Result<ConvertReport> {
        require_absolute(&params.input_path)?;
        require_absolute(&params.output_path)?;
        require_input(&params.input_path)?;

        let format = ImageFormat::from_extension(&params.output_path)?;
        let options = EncodeOptions::with_quality(params.quality.unwrap_or(self.config().convert.quality));

        let decoded = codec::decode(&fs::read(&params.input_path)?)?;
        let image = if !format.supports_alpha() && has_alpha_channel(&decoded.image) {
            flatten_onto(&decoded.image, Color::WHITE)
        } else {
            decoded.image
        };

        let encoded = codec::encode(&image, format, &options)?;
        with_write_target(&params.input_path, &params.output_path, |target| {
            Ok(fs::write(target, &encoded)?)
        })?;

        tracing::info!(
            output = %params.output_path.display(),
            from = ?decoded.format,
            to = %format,
            bytes = encoded.len(),
            "image converted"
        );

        Ok(ConvertReport {
            output_path: params.output_path.clone(),
            original_format: decoded.format,
            format,
            quality: (format == ImageFormat::Jpeg).then_some(options.quality),
            file_size_bytes: encoded.len() as u64,
        })
    }
}
