use super::{require_absolute, require_input, ImageTools};
use crate::metadata::{inspect, ImageMetadata};
use crate::{Response, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Arguments of `get_image_metadata`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataParams {
    /// Image to inspect
    pub image_path: PathBuf,
}

impl MetadataParams {
    /// Inspect `image_path`.
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
        }
    }
}

/// Result of `get_image_metadata`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataReport {
    /// Inspected file
    pub path: PathBuf,
    /// Decoded properties
    #[serde(flatten)]
    pub metadata: ImageMetadata,
    /// File size in bytes
    pub file_size_bytes: u64,
}

impl ImageTools {
    /// Describe an image file without modifying it.
    pub fn get_image_metadata(&self, params: &MetadataParams) -> Response<MetadataReport> {
        Response::from_result("get_image_metadata", self.run_metadata(params))
    }

    fn run_metadata(&self, params: &MetadataParams) -> Result<MetadataReport> {
        require_absolute(&params.image_path)?;
        require_input(&params.image_path)?;

        let data = fs::read(&params.image_path)?;
        let metadata = inspect(&data)?;
        tracing::debug!(path = %params.image_path.display(), ?metadata, "image inspected");

        Ok(MetadataReport {
            path: params.image_path.clone(),
            metadata,
            file_size_bytes: data.len() as u64,
        })
    }
}
