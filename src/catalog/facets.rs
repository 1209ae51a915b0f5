//! Filter facets
//!
//! Distinct rarity and tier values present in the catalog, used to populate
//! the filter option lists.

use super::item::CatalogEntry;
use super::query::Selection;

/// Option lists for the rarity and tier filters, each starting with `All`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facets {
    /// Rarities in first-seen order
    pub rarities: Vec<Selection<String>>,
    /// Tiers in ascending order
    pub tiers: Vec<Selection<u32>>,
}

impl Facets {
    pub fn extract(entries: &[CatalogEntry]) -> Self {
        let mut rarities: Vec<Selection<String>> = vec![Selection::All];
        for rarity in entries.iter().filter_map(|e| e.rarity()) {
            let option = Selection::Only(rarity.clone());
            if !rarities.contains(&option) {
                rarities.push(option);
            }
        }

        let mut tiers: Vec<u32> = entries.iter().filter_map(|e| e.tier()).collect();
        tiers.sort_unstable();
        tiers.dedup();

        Self {
            rarities,
            tiers: std::iter::once(Selection::All)
                .chain(tiers.into_iter().map(Selection::Only))
                .collect(),
        }
    }

    /// The rarity option after `current`, wrapping back to `All`
    pub fn next_rarity(&self, current: &Selection<String>) -> Selection<String> {
        cycle(&self.rarities, current)
    }

    /// The tier option after `current`, wrapping back to `All`
    pub fn next_tier(&self, current: &Selection<u32>) -> Selection<u32> {
        cycle(&self.tiers, current)
    }
}

impl Default for Facets {
    fn default() -> Self {
        Self {
            rarities: vec![Selection::All],
            tiers: vec![Selection::All],
        }
    }
}

fn cycle<T: Clone + PartialEq>(options: &[Selection<T>], current: &Selection<T>) -> Selection<T> {
    let next = options
        .iter()
        .position(|o| o == current)
        .map(|i| (i + 1) % options.len())
        .unwrap_or(0);
    options.get(next).cloned().unwrap_or(Selection::All)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::normalize::tests::{make_armor, make_weapon, sample_catalog};
    use crate::catalog::Catalog;

    #[test]
    fn test_rarities_first_seen_order() {
        let facets = Facets::extract(sample_catalog().entries());
        assert_eq!(
            facets.rarities,
            vec![
                Selection::All,
                Selection::Only("Common".to_string()),
                Selection::Only("Legendary".to_string()),
                Selection::Only("Rare".to_string()),
            ]
        );
    }

    #[test]
    fn test_tiers_sorted_and_deduplicated() {
        let catalog = Catalog::new(
            &[make_armor("a", 5, 1.0), make_armor("b", 2, 1.0), make_armor("c", 5, 1.0)],
            &[],
            &[],
            &[],
        );
        let facets = Facets::extract(catalog.entries());
        assert_eq!(facets.tiers, vec![Selection::All, Selection::Only(2), Selection::Only(5)]);
    }

    #[test]
    fn test_blank_rarities_are_ignored() {
        let catalog = Catalog::new(
            &[],
            &[],
            &[make_weapon("Club", "", 10.0), make_weapon("Axe", "Common", 10.0), make_weapon("Bow", "Common", 1.0)],
            &[],
        );
        let facets = Facets::extract(catalog.entries());
        assert_eq!(facets.rarities, vec![Selection::All, Selection::Only("Common".to_string())]);
        assert_eq!(facets.tiers, vec![Selection::All]);
    }

    #[test]
    fn test_cycling_wraps_to_all() {
        let facets = Facets::extract(sample_catalog().entries());
        let mut rarity = Selection::All;
        for _ in 0..facets.rarities.len() {
            rarity = facets.next_rarity(&rarity);
        }
        assert_eq!(rarity, Selection::All);

        assert_eq!(facets.next_tier(&Selection::All), Selection::Only(2));
        assert_eq!(facets.next_tier(&Selection::Only(42)), Selection::All);
    }
}
