//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;
pub mod recognizers;

use std::path::{Path, PathBuf};

use tracing::debug;

use atestado_core::AtestadoConfig;

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("atestado")
        .join("config.json")
}

/// Load the configuration given with `--config`, else the user file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AtestadoConfig> {
    if let Some(path) = config_path {
        let path = Path::new(path);
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(AtestadoConfig::from_file(path)?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        return Ok(AtestadoConfig::from_file(&default_path)?);
    }

    Ok(AtestadoConfig::default())
}
