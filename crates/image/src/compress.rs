//! Lossy PNG compression through an external optimizer.

use crate::{ImageError, Result};
use imgtools_core::config::CompressConfig;
use imgtools_core::process::{run_command, which_command};
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Quality window handed to the compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityRange {
    /// Lowest acceptable quality
    pub min: u8,
    /// Target quality
    pub max: u8,
}

impl QualityRange {
    /// Window `[quality - 20, quality]`, floored at 0, with quality capped at 100.
    pub fn from_quality(quality: u8) -> Self {
        let max = quality.min(100);
        Self {
            min: max.saturating_sub(20),
            max,
        }
    }
}

impl fmt::Display for QualityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// What the compressor did to the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressorOutcome {
    /// File was rewritten
    Compressed,
    /// Quality window could not be met; file left as it was
    QualityUnreachable,
    /// Compressor failed; file left as it was
    Failed {
        /// Exit code reported by the process
        exit_code: i32,
        /// Diagnostic output
        message: String,
    },
}

/// A tool that compresses a PNG file in place.
pub trait PngCompressor: Send + Sync {
    /// Display name used in notes and logs.
    fn name(&self) -> &str;

    /// Whether the tool can be run at all.
    fn is_available(&self) -> bool;

    /// Compress `path` in place within `quality`.
    fn compress(&self, path: &Path, quality: QualityRange) -> Result<CompressorOutcome>;
}

/// pngquant, invoked as a child process.
#[derive(Debug, Clone)]
pub struct Pngquant {
    program: String,
    speed: u8,
}

/// Exit status pngquant uses when the quality window cannot be met.
const QUALITY_TOO_LOW: i32 = 99;

impl Pngquant {
    /// Use `program` (name on PATH or absolute path) at the given speed.
    pub fn new(program: impl Into<String>, speed: u8) -> Self {
        Self {
            program: program.into(),
            speed: speed.clamp(1, 11),
        }
    }

    /// Build from the `[compress]` config section.
    pub fn from_config(config: &CompressConfig) -> Self {
        Self::new(config.pngquant.clone(), config.speed)
    }

    /// Resolved binary location, if installed.
    pub fn binary(&self) -> Option<PathBuf> {
        which_command(&self.program)
    }

    fn args(&self, path: &Path, quality: QualityRange) -> Vec<OsString> {
        vec![
            "--quality".into(),
            quality.to_string().into(),
            "--speed".into(),
            self.speed.to_string().into(),
            "--strip".into(),
            "--force".into(),
            "--output".into(),
            path.into(),
            path.into(),
        ]
    }
}

impl Default for Pngquant {
    fn default() -> Self {
        Self::from_config(&CompressConfig::default())
    }
}

impl PngCompressor for Pngquant {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        self.binary().is_some()
    }

    fn compress(&self, path: &Path, quality: QualityRange) -> Result<CompressorOutcome> {
        let binary = self
            .binary()
            .ok_or_else(|| ImageError::Process(imgtools_core::Error::command_not_found(&self.program)))?;

        tracing::debug!(binary = %binary.display(), path = %path.display(), %quality, "running pngquant");
        let result = run_command(&binary, self.args(path, quality))?;

        Ok(match result.exit_code {
            0 => CompressorOutcome::Compressed,
            QUALITY_TOO_LOW => CompressorOutcome::QualityUnreachable,
            exit_code => CompressorOutcome::Failed {
                exit_code,
                message: result.combined_output().trim().to_string(),
            },
        })
    }
}
