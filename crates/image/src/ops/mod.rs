//! The image operations exposed as tools.
//!
//! Each operation validates its arguments, reads the whole input into memory,
//! produces the output bytes and only then touches the destination through
//! [`crate::with_write_target`]. Operations never fail by panicking: every
//! outcome is a [`Response`](crate::Response).

mod call;
mod chromakey;
mod compress;
mod convert;
mod metadata;
mod resize;

pub use call::{ToolCall, TOOL_NAMES};
pub use chromakey::{ChromakeyParams, ChromakeyReport};
pub use compress::{CompressParams, CompressReport};
pub use convert::{ConvertParams, ConvertReport};
pub use metadata::{MetadataParams, MetadataReport};
pub use resize::{ResizeParams, ResizeReport};

use crate::compress::{PngCompressor, Pngquant};
use crate::{ImageError, Result};
use imgtools_core::config::ConfigSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Entry point for the operations, carrying their defaults.
pub struct ImageTools {
    config: ConfigSchema,
    compressor: Box<dyn PngCompressor>,
}

impl ImageTools {
    /// Tools using `config` for omitted arguments and pngquant for compression.
    pub fn new(config: ConfigSchema) -> Self {
        let compressor = Box::new(Pngquant::from_config(&config.compress));
        Self { config, compressor }
    }

    /// Replace the PNG compressor.
    pub fn with_compressor(mut self, compressor: impl PngCompressor + 'static) -> Self {
        self.compressor = Box::new(compressor);
        self
    }

    /// Active defaults.
    pub fn config(&self) -> &ConfigSchema {
        &self.config
    }

    /// Active PNG compressor.
    pub fn compressor(&self) -> &dyn PngCompressor {
        self.compressor.as_ref()
    }
}

impl Default for ImageTools {
    fn default() -> Self {
        Self::new(ConfigSchema::default())
    }
}

impl fmt::Debug for ImageTools {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageTools")
            .field("config", &self.config)
            .field("compressor", &self.compressor.name())
            .finish()
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

fn require_absolute(path: &Path) -> Result<()> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(ImageError::RelativePath(path.to_path_buf()))
    }
}

fn require_input(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ImageError::NotFound(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_absolute() {
        assert!(require_absolute(Path::new("/tmp/in.png")).is_ok());
        assert!(matches!(
            require_absolute(Path::new("in.png")),
            Err(ImageError::RelativePath(_))
        ));
    }

    #[test]
    fn test_require_input() {
        assert!(matches!(
            require_input(Path::new("/nonexistent/image.png")),
            Err(ImageError::NotFound(_))
        ));
    }

    #[test]
    fn test_debug_names_compressor() {
        let debug = format!("{:?}", ImageTools::default());
        assert!(debug.contains("pngquant"));
    }
}
