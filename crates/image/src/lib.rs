//! Raster image tools.
//!
//! This crate provides:
//! - Chromakey to transparency with anti-aliased edges
//! - Safe in-place writes (stage, then atomically replace)
//! - Resizing, format conversion and metadata inspection
//! - PNG compression through an external optimizer
//! - A JSON tool-call dispatcher over all of the above
//!
//! # Example
//!
//! ```rust,no_run
//! use imgtools_image::{ChromakeyParams, ImageTools};
//!
//! let tools = ImageTools::default();
//! let response = tools.chromakey_to_transparent(
//!     &ChromakeyParams::new("/tmp/greenscreen.png", "/tmp/keyed.png").tolerance(50.0),
//! );
//! println!("{}", response.to_json());
//! ```

#![warn(missing_docs)]

mod alpha;
mod atomic;
pub mod codec;
mod color;
pub mod compress;
mod detect;
mod error;
pub mod keying;
mod metadata;
mod ops;
mod resize;
mod response;

pub use alpha::{flatten_onto, has_alpha_channel, has_transparent_pixels};
pub use atomic::{paths_equivalent, with_write_target, WriteTarget};
pub use color::{color_distance, Color};
pub use compress::{CompressorOutcome, PngCompressor, Pngquant, QualityRange};
pub use detect::{detect_format, writable_extensions, ImageFormat, WRITABLE};
pub use error::{ImageError, Result};
pub use keying::{apply_key, KeyingRequest, KeyingStats, PixelBuffer};
pub use metadata::{color_mode, inspect, ImageMetadata};
pub use ops::{
    ChromakeyParams, ChromakeyReport, CompressParams, CompressReport, ConvertParams, ConvertReport,
    Dimensions, ImageTools, MetadataParams, MetadataReport, ResizeParams, ResizeReport, ToolCall,
    TOOL_NAMES,
};
pub use resize::{target_dimensions, ResampleFilter, ResizeRequest, MAX_OUTPUT_PIXELS};
pub use response::{Failure, Response};
