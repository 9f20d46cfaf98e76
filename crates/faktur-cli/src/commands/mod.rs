//! CLI command implementations.

pub mod batch;
pub mod clean;
pub mod config;
pub mod report;

use std::path::{Path, PathBuf};

use faktur_core::FakturConfig;
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("faktur")
        .join("config.json")
}

/// Load the configuration given with `--config`, else the default file if
/// it exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FakturConfig> {
    if let Some(path) = config_path {
        return Ok(FakturConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        Ok(FakturConfig::from_file(&default_path)?)
    } else {
        Ok(FakturConfig::default())
    }
}
