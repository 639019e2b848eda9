use super::{require_absolute, require_input, Dimensions, ImageTools};
use crate::codec::{self, EncodeOptions};
use crate::keying::{apply_key, KeyingRequest, PixelBuffer};
use crate::{with_write_target, Color, ImageFormat, Response, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Arguments of `chromakey_to_transparent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChromakeyParams {
    /// Image to key
    pub input_path: PathBuf,
    /// Where to write the PNG result
    pub output_path: PathBuf,
    /// Hex color of the background (default `#00FF00`)
    pub key_color: Option<String>,
    /// Color distance treated as background (default 70)
    pub tolerance: Option<f64>,
}

impl ChromakeyParams {
    /// Params with default key color and tolerance.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            ..Default::default()
        }
    }

    /// Override the key color.
    pub fn key_color(mut self, key_color: impl Into<String>) -> Self {
        self.key_color = Some(key_color.into());
        self
    }

    /// Override the tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
}

/// Result of `chromakey_to_transparent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChromakeyReport {
    /// Written PNG
    pub output_path: PathBuf,
    /// Size of the keyed image
    pub dimensions: Dimensions,
    /// Normalized key color
    pub key_color: Color,
    /// Effective tolerance after clamping
    pub tolerance: f64,
    /// Pixels visited
    pub pixels_processed: u64,
    /// Pixels inside the tolerance
    pub pixels_made_transparent: u64,
}

impl ImageTools {
    /// Turn a solid background color into transparency, saving as PNG.
    pub fn chromakey_to_transparent(&self, params: &ChromakeyParams) -> Response<ChromakeyReport> {
        Response::from_result("chromakey_to_transparent", self.run_chromakey(params))
    }

    fn run_chromakey(&self, params: &ChromakeyParams) -> Result<ChromakeyReport> {
        require_absolute(&params.input_path)?;
        require_absolute(&params.output_path)?;
        require_input(&params.input_path)?;

        let defaults = &self.config().chromakey;
        let key_color = Color::from_hex(params.key_color.as_deref().unwrap_or(&defaults.key_color))?;
        let request = KeyingRequest::new(key_color, params.tolerance.unwrap_or(defaults.tolerance));

        let decoded = codec::decode(&fs::read(&params.input_path)?)?;
        let mut buffer = PixelBuffer::from_dynamic(decoded.image);
        let stats = apply_key(&mut buffer, &request);
        let dimensions = Dimensions::from(buffer.dimensions());

        let encoded = codec::encode(&buffer.into_dynamic(), ImageFormat::Png, &EncodeOptions::default())?;
        with_write_target(&params.input_path, &params.output_path, |target| {
            Ok(fs::write(target, &encoded)?)
        })?;

        tracing::info!(
            output = %params.output_path.display(),
            key_color = %key_color,
            tolerance = request.tolerance(),
            transparent = stats.pixels_made_transparent,
            total = stats.pixels_processed,
            "chromakey applied"
        );

        Ok(ChromakeyReport {
            output_path: params.output_path.clone(),
            dimensions,
            key_color,
            tolerance: request.tolerance(),
            pixels_processed: stats.pixels_processed,
            pixels_made_transparent: stats.pixels_made_transparent,
        })
    }
}
