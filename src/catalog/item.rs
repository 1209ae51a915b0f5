//! Item definitions
//!
//! Typed item records for each marketplace category, plus the tagged
//! catalog entry the query engine works on.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::lenient;

/// Stable synthetic identity assigned at normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub usize);

/// Marketplace categories, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Armor,
    Food,
    Weapons,
    Potions,
}

impl Category {
    /// All categories in the order they appear in the catalog
    pub const ALL: [Category; 4] = [
        Category::Armor,
        Category::Food,
        Category::Weapons,
        Category::Potions,
    ];

    /// Display name, matching the category filter labels
    pub fn name(&self) -> &'static str {
        match self {
            Category::Armor => "Armor",
            Category::Food => "Food",
            Category::Weapons => "Weapons",
            Category::Potions => "Potions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Armor piece with quality-tiered pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Armor_Q1", default, deserialize_with = "lenient::number")]
    pub armor_q1: f64,
    #[serde(rename = "Armor_Q4", default, deserialize_with = "lenient::number")]
    pub armor_q4: f64,
    #[serde(rename = "InferredTier", default, skip_serializing_if = "Option::is_none")]
    pub inferred_tier: Option<u32>,
    #[serde(rename = "PriceCoins_Q1", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub price_q1: Option<f64>,
    #[serde(rename = "PriceCoins_Q2", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub price_q2: Option<f64>,
    #[serde(rename = "PriceCoins_Q3", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub price_q3: Option<f64>,
    #[serde(rename = "PriceCoins_Q4", default, deserialize_with = "lenient::number")]
    pub price_q4: f64,
    /// Generic price under the food/potion naming convention
    #[serde(rename = "PriceCoins", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub price_coins: Option<f64>,
    /// Flat price under the weapon naming convention
    #[serde(rename = "Price", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "Note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ArmorItem {
    /// Prices for every quality level that carries one, Q1 first
    pub fn quality_prices(&self) -> Vec<(u8, f64)> {
        let mut prices = Vec::with_capacity(4);
        if let Some(q1) = self.price_q1 {
            prices.push((1, q1));
        }
        if let Some(q2) = self.price_q2 {
            prices.push((2, q2));
        }
        if let Some(q3) = self.price_q3 {
            prices.push((3, q3));
        }
        prices.push((4, self.price_q4));
        prices
    }
}

/// Food with health/stamina/eitr stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Health", default, deserialize_with = "lenient::number")]
    pub health: f64,
    #[serde(rename = "Stamina", default, deserialize_with = "lenient::number")]
    pub stamina: f64,
    #[serde(rename = "Eitr", default, deserialize_with = "lenient::number")]
    pub eitr: f64,
    #[serde(rename = "TotalStats", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub total_stats: Option<f64>,
    #[serde(rename = "BiomeProgression", default, skip_serializing_if = "Option::is_none")]
    pub biome_progression: Option<u32>,
    #[serde(rename = "PriceCoins", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub price_coins: Option<f64>,
    #[serde(rename = "Price", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "set", default, skip_serializing_if = "Option::is_none")]
    pub set: Option<u32>,
    #[serde(rename = "Note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FoodItem {
    /// Total stats, falling back to the sum of the individual stats
    pub fn total_stats(&self) -> f64 {
        self.total_stats
            .unwrap_or(self.health + self.stamina + self.eitr)
    }
}

/// Weapon with per-type damage values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponItem {
    #[serde(rename = "Name")]
    pub name: String,
    /// Damage type -> string-encoded value, e.g. "Slash" -> "35"
    #[serde(rename = "Damage", default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<BTreeMap<String, String>>,
    #[serde(rename = "StaminaPrimary", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub stamina_primary: Option<f64>,
    #[serde(rename = "StaminaSecondary", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub stamina_secondary: Option<f64>,
    #[serde(rename = "Rarity", default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(rename = "PriceCoins", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub price_coins: Option<f64>,
    #[serde(rename = "Price", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "Knockback", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub knockback: Option<f64>,
    #[serde(rename = "Note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Potion or mead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotionItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PriceCoins", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub price_coins: Option<f64>,
    #[serde(rename = "Price", default, deserialize_with = "lenient::optional_number", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "set", default, skip_serializing_if = "Option::is_none")]
    pub set: Option<u32>,
    #[serde(rename = "Note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One record of any category
#[derive(Debug, Clone, PartialEq)]
pub enum ItemRecord {
    Armor(ArmorItem),
    Food(FoodItem),
    Weapon(WeaponItem),
    Potion(PotionItem),
}

impl ItemRecord {
    /// The category this record belongs to
    pub fn category(&self) -> Category {
        match self {
            ItemRecord::Armor(_) => Category::Armor,
            ItemRecord::Food(_) => Category::Food,
            ItemRecord::Weapon(_) => Category::Weapons,
            ItemRecord::Potion(_) => Category::Potions,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ItemRecord::Armor(a) => &a.name,
            ItemRecord::Food(f) => &f.name,
            ItemRecord::Weapon(w) => &w.name,
            ItemRecord::Potion(p) => &p.name,
        }
    }

    pub fn note(&self) -> Option<&str> {
        let note = match self {
            ItemRecord::Armor(a) => &a.note,
            ItemRecord::Food(f) => &f.note,
            ItemRecord::Weapon(w) => &w.note,
            ItemRecord::Potion(p) => &p.note,
        };
        note.as_deref().filter(|n| !n.is_empty())
    }

    /// Price used for comparison and range filtering.
    ///
    /// Precedence: first-quality price, then `PriceCoins`, then `Price`,
    /// then zero.
    pub fn effective_price(&self) -> f64 {
        match self {
            ItemRecord::Armor(a) => a.price_q1.or(a.price_coins).or(a.price).unwrap_or(0.0),
            ItemRecord::Food(f) => f.price_coins.or(f.price).unwrap_or(0.0),
            ItemRecord::Weapon(w) => w.price_coins.or(w.price).unwrap_or(0.0),
            ItemRecord::Potion(p) => p.price_coins.or(p.price).unwrap_or(0.0),
        }
    }

    /// Rarity label, only weapons carry one
    pub fn rarity(&self) -> Option<&String> {
        match self {
            ItemRecord::Weapon(w) => w.rarity.as_ref().filter(|r| !r.is_empty()),
            _ => None,
        }
    }

    /// Inferred tier, only armor carries one
    pub fn tier(&self) -> Option<u32> {
        match self {
            ItemRecord::Armor(a) => a.inferred_tier,
            _ => None,
        }
    }

    pub fn biome_progression(&self) -> Option<u32> {
        match self {
            ItemRecord::Food(f) => f.biome_progression,
            _ => None,
        }
    }

    pub fn set(&self) -> Option<u32> {
        match self {
            ItemRecord::Food(f) => f.set,
            ItemRecord::Potion(p) => p.set,
            _ => None,
        }
    }
}

/// An item record after category tagging; the query engine's unit of work
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub category: Category,
    pub record: ItemRecord,
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        self.record.name()
    }

    pub fn effective_price(&self) -> f64 {
        self.record.effective_price()
    }

    pub fn rarity(&self) -> Option<&String> {
        self.record.rarity()
    }

    pub fn tier(&self) -> Option<u32> {
        self.record.tier()
    }

    /// Whether the entry carries Q1-Q4 pricing
    pub fn has_quality_pricing(&self) -> bool {
        matches!(&self.record, ItemRecord::Armor(a) if a.price_q1.is_some())
    }
}
