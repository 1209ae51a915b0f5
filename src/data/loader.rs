//! JSON data loader
//!
//! Loads the four item collections from the data directory. A file that is
//! missing or broken yields an empty collection so the browser still starts;
//! a single malformed record is skipped on its own.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::catalog::{ArmorItem, Catalog, FoodItem, PotionItem, WeaponItem};

pub const ARMOR_FILE: &str = "armour.json";
pub const FOOD_FILE: &str = "food.json";
pub const WEAPONS_FILE: &str = "weapons.json";
pub const POTIONS_FILE: &str = "potions.json";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("data file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The raw item collections, one per category
#[derive(Debug, Clone, Default)]
pub struct DataManager {
    pub armor: Vec<ArmorItem>,
    pub food: Vec<FoodItem>,
    pub weapons: Vec<WeaponItem>,
    pub potions: Vec<PotionItem>,
}

impl DataManager {
    /// Load every collection from `base_path`, logging and skipping failures
    pub fn load(base_path: &Path) -> Self {
        Self {
            armor: Self::load_or_empty(base_path, ARMOR_FILE),
            food: Self::load_or_empty(base_path, FOOD_FILE),
            weapons: Self::load_or_empty(base_path, WEAPONS_FILE),
            potions: Self::load_or_empty(base_path, POTIONS_FILE),
        }
    }

    fn load_or_empty<T: DeserializeOwned>(base_path: &Path, file_name: &str) -> Vec<T> {
        let path = base_path.join(file_name);
        match load_collection(&path) {
            Ok(items) => {
                log::info!("Loaded {} records from {}", items.len(), path.display());
                items
            }
            Err(DataError::NotFound(path)) => {
                log::warn!("Data file not found: {}", path.display());
                Vec::new()
            }
            Err(e) => {
                log::error!("{}", e);
                Vec::new()
            }
        }
    }

    /// Total record count across categories
    pub fn len(&self) -> usize {
        self.armor.len() + self.food.len() + self.weapons.len() + self.potions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize the collections into a catalog
    pub fn catalog(&self) -> Catalog {
        Catalog::new(&self.armor, &self.food, &self.weapons, &self.potions)
    }
}

/// Load one JSON array of records.
///
/// The file must be a JSON array; a record inside it that does not fit `T`
/// is logged and skipped, and the rest still load.
pub fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DataError> {
    if !path.exists() {
        return Err(DataError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Vec<Value> = serde_json::from_str(&content).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let items = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("Skipping record {} in {}: {}", index, path.display(), e);
                None
            }
        })
        .collect();
    Ok(items)
}
