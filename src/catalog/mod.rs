//! Catalog query engine

pub mod item;
pub mod lenient;
pub mod normalize;
pub mod query;
pub mod facets;

pub use item::{ArmorItem, FoodItem, WeaponItem, PotionItem, ItemRecord, CatalogEntry, Category, EntryId};
pub use normalize::{Catalog, normalize};
pub use query::{ItemFilter, Selection, PriceRange, SortMode, compare_names, sort_entries, query, DEFAULT_MAX_PRICE};
pub use facets::Facets;
