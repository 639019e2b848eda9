//! Configuration schema definitions
//!
//! Operation defaults used when a request leaves an optional argument out.

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub chromakey: ChromakeyConfig,

    #[serde(default)]
    pub resize: ResizeConfig,

    #[serde(default)]
    pub convert: ConvertConfig,

    #[serde(default)]
    pub compress: CompressConfig,
}

/// Chromakey defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChromakeyConfig {
    /// Background color to key out, as a hex string
    #[serde(default = "default_key_color")]
    pub key_color: String,

    /// Color distance below which pixels become fully transparent
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for ChromakeyConfig {
    fn default() -> Self {
        Self {
            key_color: default_key_color(),
            tolerance: default_tolerance(),
        }
    }
}

fn default_key_color() -> String {
    "#00FF00".to_string()
}

fn default_tolerance() -> f64 {
    70.0
}

/// Resize defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeConfig {
    /// Resampling filter name (nearest, bilinear, bicubic, lanczos)
    #[serde(default = "default_resample")]
    pub resample: String,

    /// Derive the missing dimension from the aspect ratio
    #[serde(default = "default_true")]
    pub maintain_aspect: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            resample: default_resample(),
            maintain_aspect: true,
        }
    }
}

fn default_resample() -> String {
    "lanczos".to_string()
}

fn default_true() -> bool {
    true
}

/// Format conversion defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Encoder quality for lossy formats (1-100)
    #[serde(default = "default_convert_quality")]
    pub quality: u8,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            quality: default_convert_quality(),
        }
    }
}

fn default_convert_quality() -> u8 {
    95
}

/// PNG compression defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressConfig {
    /// Upper bound of the compressor's quality window (0-100)
    #[serde(default = "default_compress_quality")]
    pub quality: u8,

    /// Compressor binary, looked up on PATH unless absolute
    #[serde(default = "default_pngquant")]
    pub pngquant: String,

    /// Compressor speed/effort setting (1 = slowest, best)
    #[serde(default = "default_speed")]
    pub speed: u8,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            quality: default_compress_quality(),
            pngquant: default_pngquant(),
            speed: default_speed(),
        }
    }
}

fn default_compress_quality() -> u8 {
    80
}

fn default_pngquant() -> String {
    "pngquant".to_string()
}

fn default_speed() -> u8 {
    1
}
