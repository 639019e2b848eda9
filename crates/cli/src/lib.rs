//! Terminal output for the image tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Response rendering as JSON or text

#![warn(missing_docs)]

pub mod output;

pub use output::{format_size, render, OutputFormat, Status};
