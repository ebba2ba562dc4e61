//! Shared state for CLI command handlers.

use std::path::PathBuf;

use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::registry::Registry;

pub struct AppContext {
    pub config: Config,
    pub registry: Registry,
    /// Where the active registry came from (`None` for the built-in one).
    pub registry_path: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub robot_mode: bool,
}

impl AppContext {
    /// Resolve config layers and compile the registry.
    ///
    /// Registry problems surface here, before any document is read.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_root = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &project_root)?;

        let registry_path = cli.registry.clone().or_else(|| config.registry.path.clone());
        let registry = match &registry_path {
            Some(path) => Registry::from_toml_path(path)?,
            None => Registry::builtin()?,
        };
        debug!(
            registry = %registry_path.as_ref().map_or_else(|| "builtin".to_string(), |p| p.display().to_string()),
            fingerprint = %registry.fingerprint(),
            "registry ready"
        );

        let output_format = cli.output_format();
        Ok(Self {
            config,
            registry,
            registry_path,
            output_format,
            robot_mode: output_format.is_json(),
        })
    }
}
