// src/config.rs
use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use toml;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite file holding the work log. Relative paths resolve against the working directory.
    pub database_path: PathBuf,
    /// Clear the terminal before each menu and page. Turn off when piping output.
    pub clear_screen: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: PathBuf::from("diary.db"),
            clear_screen: true,
        }
    }
}

fn get_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "Worklog", "worklog")
        .map(|proj_dirs| proj_dirs.config_dir().join("worklog_config.toml"))
}

fn save_default_config(config_path: &Path, config: &Config) -> Result<()> {
    info!("Attempting to save default config to {:?}", config_path);
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)
                .with_context(|| format!("Failed to create config directory {:?}", parent_dir))?;
            info!("Created config directory: {:?}", parent_dir);
        }
    }

    let toml_string =
        toml::to_string_pretty(config).context("Failed to serialize default config to TOML")?;
    fs::write(config_path, toml_string)
        .with_context(|| format!("Failed to write default config to {:?}", config_path))?;

    info!("Saved default configuration to {:?}", config_path);
    Ok(())
}

/// Reads and parses one config file. Missing keys take their defaults.
pub fn load_config_from(config_path: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file {:?}", config_path))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", config_path))?;
    info!("Configuration loaded from {:?}", config_path);
    Ok(config)
}

/// Loads the configuration.
///
/// An explicitly requested file must load. The per-user default file is
/// created when absent, and any problem with it falls back to defaults.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config> {
    if let Some(config_path) = explicit_path {
        return load_config_from(config_path);
    }

    let Some(config_path) = get_config_path() else {
        warn!("Could not determine config directory. Using default configuration.");
        return Ok(Config::default());
    };

    if !config_path.exists() {
        info!(
            "Config file not found at {:?}. Creating and using default configuration.",
            config_path
        );
        let default_config = Config::default();
        if let Err(e) = save_default_config(&config_path, &default_config) {
            warn!("Failed to save default configuration: {:#}", e);
        }
        return Ok(default_config);
    }

    match load_config_from(&config_path) {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!("{:#}. Using default configuration.", e);
            Ok(Config::default())
        }
    }
}
