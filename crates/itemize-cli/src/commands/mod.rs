//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod parse;

use std::path::{Path, PathBuf};

use tracing::debug;

use itemize_core::models::config::ItemizeConfig;

/// Configuration file used when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("itemize")
        .join("config.json")
}

/// Path selected by `--config`, or the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the configuration for a run.
///
/// An explicit path must exist; the default location is optional.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<ItemizeConfig> {
    if let Some(path) = explicit {
        let path = Path::new(path);
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(ItemizeConfig::from_file(path)?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(ItemizeConfig::from_file(&path)?)
    } else {
        Ok(ItemizeConfig::default())
    }
}
