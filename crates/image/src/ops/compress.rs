use super::{require_absolute, require_input, ImageTools};
use crate::compress::{CompressorOutcome, QualityRange};
use crate::{paths_equivalent, with_write_target, Response, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Arguments of `compress_png`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompressParams {
    /// PNG to compress
    pub input_path: PathBuf,
    /// Destination (default: overwrite the input)
    pub output_path: Option<PathBuf>,
    /// Target quality, 0-100 (default 80)
    pub quality: Option<u8>,
}

impl CompressParams {
    /// Compress `input_path` into `output_path`.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: Some(output_path.into()),
            quality: None,
        }
    }

    /// Compress `input_path` in place.
    pub fn in_place(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            ..Default::default()
        }
    }
}

/// Result of `compress_png`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressReport {
    /// Written file
    pub output_path: PathBuf,
    /// Whether the output differs in size from the input
    pub compressed: bool,
    /// Input size in bytes
    pub original_size: u64,
    /// Output size in bytes
    pub size_bytes: u64,
    /// Saved share of the input, one decimal
    pub reduction_percent: f64,
    /// Window passed to the compressor
    pub quality_range: QualityRange,
    /// Why the file was left as it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ImageTools {
    /// Lossy-compress a PNG with the external compressor.
    ///
    /// A missing compressor is not an error: the output is an unmodified
    /// copy and the report says why.
    pub fn compress_png(&self, params: &CompressParams) -> Response<CompressReport> {
        Response::from_result("compress_png", self.run_compress(params))
    }

    fn run_compress(&self, params: &CompressParams) -> Result<CompressReport> {
        let input = &params.input_path;
        require_absolute(input)?;
        if let Some(output) = &params.output_path {
            require_absolute(output)?;
        }
        require_input(input)?;

        let output = params.output_path.clone().unwrap_or_else(|| input.clone());
        let quality = QualityRange::from_quality(params.quality.unwrap_or(self.config().compress.quality));
        let original_size = fs::metadata(input)?.len();
        let compressor = self.compressor();

        if !compressor.is_available() {
            tracing::info!(compressor = compressor.name(), "compressor not installed, copying input");
            if !paths_equivalent(input, &output)? {
                with_write_target(input, &output, |target| {
                    fs::copy(input, target)?;
                    Ok(())
                })?;
            }
            return Ok(CompressReport {
                output_path: output,
                compressed: false,
                original_size,
                size_bytes: original_size,
                reduction_percent: 0.0,
                quality_range: quality,
                note: Some(format!("{} not installed", compressor.name())),
            });
        }

        let outcome = with_write_target(input, &output, |target| {
            fs::copy(input, target)?;
            compressor.compress(target, quality)
        })?;

        let size_bytes = fs::metadata(&output)?.len();
        let note = match &outcome {
            CompressorOutcome::Compressed => None,
            CompressorOutcome::QualityUnreachable => Some(format!(
                "quality {quality} not reachable, original retained"
            )),
            CompressorOutcome::Failed { exit_code, message } => Some(format!(
                "{} exited with code {exit_code}: {message}",
                compressor.name()
            )),
        };

        tracing::info!(
            output = %output.display(),
            original_size,
            size_bytes,
            ?outcome,
            "png compression finished"
        );

        Ok(CompressReport {
            output_path: output,
            compressed: size_bytes != original_size,
            original_size,
            size_bytes,
            reduction_percent: reduction_percent(original_size, size_bytes),
            quality_range: quality,
            note,
        })
    }
}

/// Size reduction in percent, rounded to one decimal place.
fn reduction_percent(original: u64, current: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    let reduction = (1.0 - current as f64 / original as f64) * 100.0;
    (reduction * 10.0).round() / 10.0
}
