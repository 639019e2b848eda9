//! Core utilities for the image tools
//!
//! This crate provides functionality shared by the image operations and the CLI:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery suggestions
//! - **Process execution**: Running external helpers and locating them on PATH
//! - **Configuration**: TOML-based operation defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use imgtools_core::{config::Config, process};
//!
//! let config = Config::load(None).expect("invalid configuration");
//! if !process::command_exists(&config.schema.compress.pngquant) {
//!     eprintln!("PNG compression will be skipped");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::process::{command_exists, run_command, CommandResult};
}
