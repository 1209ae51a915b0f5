//! Data loading
//!
//! This module loads the marketplace item collections from JSON files.

pub mod loader;

pub use loader::{DataManager, DataError, load_collection, ARMOR_FILE, FOOD_FILE, WEAPONS_FILE, POTIONS_FILE};
