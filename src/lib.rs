//! Valheim Marketplace - a terminal catalog browser
//!
//! Loads the server's armor, food, weapon and potion price lists, lets the
//! user search, filter and sort them, and ships a batch tool for rescaling
//! the prices in the data files.

pub mod catalog;
pub mod config;
pub mod data;
pub mod pricing;
pub mod ui;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogEntry, Category, ItemFilter, SortMode};
pub use config::MarketConfig;
pub use data::DataManager;
