//! Configuration loading and schema definitions
//!
//! Operation defaults read from an optional TOML file.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
