//! Command implementations.

mod info;
mod run;
mod validate;

pub use info::run_info;
pub use run::run_pipeline;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::PipelineConfig;
use tracing::info;

/// Load `path`, or the built-in defaults when no file is given
pub(crate) fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            config_loader::ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => {
            info!("No configuration file given, using built-in defaults");
            Ok(PipelineConfig::default())
        }
    }
}
