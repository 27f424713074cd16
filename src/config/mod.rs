mod schema;

pub use schema::{Config, DataConfig, DisplayConfig, DEFAULT_PAGE_SIZE};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::records::SnapshotPaths;

/// Get the config directory path (~/.config/charity-desk/)
pub fn get_config_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".config").join("charity-desk"),
        None => PathBuf::from(".charity-desk"),
    }
}

/// Get the default config file path (~/.config/charity-desk/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/charity-desk/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path yields the default configuration.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Resolve snapshot locations. A data directory given on the command line
/// wins over everything; otherwise per-table config entries win over the
/// configured directory, which wins over the default data directory.
pub fn snapshot_paths(config: &Config, data_dir_override: Option<&Path>) -> SnapshotPaths {
    if let Some(dir) = data_dir_override {
        return SnapshotPaths::in_dir(dir);
    }

    let dir = config
        .data
        .dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(crate::records::get_data_dir);
    let defaults = SnapshotPaths::in_dir(&dir);

    SnapshotPaths {
        beneficiaries: config
            .data
            .beneficiaries
            .clone()
            .unwrap_or(defaults.beneficiaries),
        dependents: config.data.dependents.clone().unwrap_or(defaults.dependents),
        transactions: config
            .data
            .transactions
            .clone()
            .unwrap_or(defaults.transactions),
        aids: config.data.aids.clone().unwrap_or(defaults.aids),
        programs: config.data.programs.clone().unwrap_or(defaults.programs),
    }
}
