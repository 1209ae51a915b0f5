//! Catalog normalization
//!
//! Merges the four per-category collections into one tagged sequence.

use super::item::{ArmorItem, CatalogEntry, Category, EntryId, FoodItem, ItemRecord, PotionItem, WeaponItem};

/// The full normalized catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from the four raw collections
    pub fn new(
        armor: &[ArmorItem],
        food: &[FoodItem],
        weapons: &[WeaponItem],
        potions: &[PotionItem],
    ) -> Self {
        Self {
            entries: normalize(armor, food, weapons, potions),
        }
    }

    /// All entries, in catalog order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Find an entry by its id
    pub fn get(&self, id: EntryId) -> Option<&CatalogEntry> {
        self.entries.get(id.0).filter(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries in a category
    pub fn count_in(&self, category: Category) -> usize {
        self.entries.iter().filter(|e| e.category == category).count()
    }
}

/// Tag and merge the collections in Armor, Food, Weapons, Potions order.
///
/// Ids are positions in the returned sequence.
pub fn normalize(
    armor: &[ArmorItem],
    food: &[FoodItem],
    weapons: &[WeaponItem],
    potions: &[PotionItem],
) -> Vec<CatalogEntry> {
    let records = armor
        .iter()
        .cloned()
        .map(ItemRecord::Armor)
        .chain(food.iter().cloned().map(ItemRecord::Food))
        .chain(weapons.iter().cloned().map(ItemRecord::Weapon))
        .chain(potions.iter().cloned().map(ItemRecord::Potion));

    records
        .enumerate()
        .map(|(index, record)| CatalogEntry {
            id: EntryId(index),
            category: record.category(),
            record,
        })
        .collect()
}
