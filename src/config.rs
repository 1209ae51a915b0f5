//! Marketplace configuration
//!
//! Settings are read from a RON file, with every field falling back to its
//! default when absent.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "marketplace.ron";

/// The four standard data files
pub const DEFAULT_DATA_FILES: [&str; 4] = ["armour.json", "food.json", "potions.json", "weapons.json"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Marketplace settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Directory holding the item JSON files
    pub data_dir: PathBuf,
    /// Multiplier applied by the price rescaling tool
    pub price_factor: f64,
    /// Files rewritten by the price rescaling tool
    pub files: Vec<String>,
    /// Upper bound of the max-price control
    pub max_price: f64,
    /// Step of the max-price control
    pub price_step: f64,
    /// Balance shown in the header
    pub starting_balance: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            price_factor: 0.1,
            files: DEFAULT_DATA_FILES.iter().map(|f| f.to_string()).collect(),
            max_price: 1_000_000.0,
            price_step: 1_000.0,
            starting_balance: 100_000.0,
        }
    }
}

impl MarketConfig {
    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `explicit` if given, otherwise from the first config file
    /// found locally or in the platform config directory, otherwise defaults.
    ///
    /// An explicit path that cannot be loaded is an error; a discovered file
    /// that cannot be loaded is logged and skipped.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        for path in Self::candidate_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return Ok(config);
                }
                Err(e) => log::warn!("Ignoring config: {}", e),
            }
        }

        Ok(Self::default())
    }

    /// Config locations, in lookup order
    pub fn candidate_paths() -> Vec<PathBuf> {
        use directories::ProjectDirs;

        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(proj_dirs) = ProjectDirs::from("com", "valheim-marketplace", "ValheimMarketplace") {
            paths.push(proj_dirs.config_dir().join("config.ron"));
        }
        paths
    }

    /// Full paths of the files the rescaling tool rewrites
    pub fn data_files(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| self.data_dir.join(f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marketplace.ron");
        fs::write(&path, "(price_factor: 0.5, data_dir: \"items\")").unwrap();

        let config = MarketConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.price_factor, 0.5);
        assert_eq!(config.data_dir, PathBuf::from("items"));
        assert_eq!(config.files.len(), 4);
        assert_eq!(config.max_price, 1_000_000.0);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MarketConfig::load(Some(dir.path().join("nope.ron").as_path()));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ron");
        fs::write(&path, "(price_factor: \"lots\")").unwrap();
        assert!(matches!(MarketConfig::load_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_data_files_joined_with_dir() {
        let config = MarketConfig::default();
        let files = config.data_files();
        assert_eq!(files[0], PathBuf::from("data").join("armour.json"));
        assert_eq!(files.len(), DEFAULT_DATA_FILES.len());
    }
}
