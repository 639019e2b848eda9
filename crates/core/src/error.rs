//! Structured error handling with codes, context and recovery suggestions
//!
//! This module provides structured error types with:
//! - Error codes shared by every failure response (`E2001`, `E6003`, ...)
//! - Detailed error context
//! - Recovery suggestions
//! - Serializable error reports

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // General errors (1xxx)
    Internal = 1001,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,
    InvalidPath = 2003,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,

    // Process errors (5xxx)
    ProcessError = 5000,
    CommandNotFound = 5001,

    // Validation errors (6xxx)
    InvalidInput = 6001,
    InvalidFormat = 6002,
    InvalidColor = 6003,
    UnsupportedFormat = 6004,

    // Codec errors (9xxx)
    CodecError = 9000,
    DecodeFailed = 9001,
    EncodeFailed = 9002,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            5 => "Process",
            6 => "Validation",
            9 => "Codec",
            _ => "Unknown",
        }
    }

    /// Whether the code describes bad caller input rather than a runtime failure
    pub fn is_validation(&self) -> bool {
        self.code() / 1000 == 6 || matches!(self, ErrorCode::InvalidPath | ErrorCode::FileNotFound)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            error: self.message.clone(),
            code: self.code.to_string(),
            category: self.code.category(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    /// Configuration file could not be read
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Explicit configuration path does not exist
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create an .imgtools.toml file or use --config to specify a path")
    }

    /// External process could not be run
    pub fn process(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProcessError, message)
    }

    /// External program missing from PATH
    pub fn command_not_found(cmd: &str) -> Self {
        Self::new(
            ErrorCode::CommandNotFound,
            format!("Command not found: {}", cmd),
        )
        .with_suggestion(format!("Install {} and ensure it's in your PATH", cmd))
    }
}

/// Serializable error report, shaped like an operation failure document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Human-readable message
    pub error: String,
    /// Code such as `E3002`
    pub code: String,
    /// Code category
    pub category: &'static str,
    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Recovery suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Underlying cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Operation returned an error document
    pub const FAILURE: i32 = 1;
    /// Configuration could not be loaded
    pub const CONFIG_ERROR: i32 = 3;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach context to the error
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Attach a recovery suggestion to the error
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::InvalidColor.to_string(), "E6003");
        assert_eq!(ErrorCode::DecodeFailed.to_string(), "E9001");
        assert_eq!(ErrorCode::Internal.to_string(), "E1001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::CommandNotFound.category(), "Process");
        assert_eq!(ErrorCode::EncodeFailed.category(), "Codec");
    }

    #[test]
    fn test_validation_codes() {
        assert!(ErrorCode::InvalidPath.is_validation());
        assert!(ErrorCode::UnsupportedFormat.is_validation());
        assert!(!ErrorCode::IoError.is_validation());
        assert!(!ErrorCode::DecodeFailed.is_validation());
    }

    #[test]
    fn test_config_not_found_suggests_fix() {
        let err = Error::config_not_found("/etc/imgtools.toml");

        assert_eq!(err.code, ErrorCode::ConfigNotFound);
        assert!(err.message.contains("/etc/imgtools.toml"));
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_result_ext_attaches_context() {
        let result: Result<()> = Err(Error::config("unreadable"));
        let err = result
            .context("While loading imgtools.toml")
            .with_suggestion("Check file permissions")
            .unwrap_err();

        assert_eq!(err.context.as_deref(), Some("While loading imgtools.toml"));
        assert_eq!(err.suggestion.as_deref(), Some("Check file permissions"));
        assert!(err.to_string().contains("Context: While loading"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: Error = io.into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert!(err.source.is_some());
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::process("pngquant crashed")
            .with_context("While compressing output.png");

        let json = serde_json::to_value(err.to_report()).unwrap();

        assert_eq!(json["error"], "pngquant crashed");
        assert_eq!(json["code"], "E5000");
        assert_eq!(json["category"], "Process");
        assert_eq!(json["context"], "While compressing output.png");
        assert!(json.get("suggestion").is_none());
    }
}
