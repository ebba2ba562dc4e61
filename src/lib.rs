pub mod app;
pub mod cli;
pub mod config;
pub mod documents;
pub mod error;
pub mod evidence;
pub mod profile;
pub mod registry;
pub mod scan;
pub mod scoring;
pub mod test_utils;

pub use error::{LensError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
