//! Error types for the image crate.

use imgtools_core::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Errors that can occur during image operations.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Unknown image format
    #[error("Unknown image format")]
    UnknownFormat,

    /// Invalid image data
    #[error("Invalid image data: {0}")]
    InvalidData(String),

    /// Malformed hex color
    #[error("Invalid hex color: {0}")]
    InvalidColor(String),

    /// Path parameter that is not absolute
    #[error("Path must be absolute: {}", .0.display())]
    RelativePath(PathBuf),

    /// Input file that does not exist
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Output extension or format with no encoder
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Argument outside its accepted set (filter names, dimensions)
    #[error("{0}")]
    InvalidArgument(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Decode or encode failure reported by the codec
    #[error("Image processing error: {0}")]
    ProcessingError(#[from] image::ImageError),

    /// External helper failure
    #[error(transparent)]
    Process(#[from] imgtools_core::Error),
}

impl ImageError {
    /// Error code used in failure responses.
    pub fn code(&self) -> ErrorCode {
        match self {
            ImageError::UnknownFormat => ErrorCode::InvalidFormat,
            ImageError::InvalidData(_) => ErrorCode::DecodeFailed,
            ImageError::InvalidColor(_) => ErrorCode::InvalidColor,
            ImageError::RelativePath(_) => ErrorCode::InvalidPath,
            ImageError::NotFound(_) => ErrorCode::FileNotFound,
            ImageError::UnsupportedFormat(_) => ErrorCode::UnsupportedFormat,
            ImageError::InvalidArgument(_) => ErrorCode::InvalidInput,
            ImageError::IoError(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
                _ => ErrorCode::IoError,
            },
            ImageError::ProcessingError(e) => match e {
                image::ImageError::Decoding(_) => ErrorCode::DecodeFailed,
                image::ImageError::Encoding(_) => ErrorCode::EncodeFailed,
                image::ImageError::Unsupported(_) => ErrorCode::UnsupportedFormat,
                image::ImageError::IoError(_) => ErrorCode::IoError,
                _ => ErrorCode::CodecError,
            },
            ImageError::Process(e) => e.code,
        }
    }

    /// Whether the error stems from caller input rather than the environment.
    pub fn is_validation(&self) -> bool {
        self.code().is_validation()
    }
}
