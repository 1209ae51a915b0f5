//! Catalog queries
//!
//! Filtering and sorting over the normalized catalog. Everything here is
//! pure: inputs are borrowed, results are new vectors.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::item::{CatalogEntry, Category};

/// Upper bound of the default price range
pub const DEFAULT_MAX_PRICE: f64 = 1_000_000.0;

/// A filter choice: everything, or one specific value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    /// `All` admits anything; `Only` admits an equal, present value
    pub fn admits(&self, value: Option<&T>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value == Some(wanted),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("All"),
            Selection::Only(value) => write!(f, "{}", value),
        }
    }
}

/// Inclusive price bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_MAX_PRICE)
    }
}

/// Filter configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemFilter {
    pub search_text: String,
    pub category: Selection<Category>,
    pub rarity: Selection<String>,
    pub tier: Selection<u32>,
    pub price_range: PriceRange,
}

impl ItemFilter {
    /// Check whether an entry passes every filter
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        let search = self.search_text.to_lowercase();
        self.matches_with_search(entry, &search)
    }

    fn matches_with_search(&self, entry: &CatalogEntry, lowered_search: &str) -> bool {
        entry.name().to_lowercase().contains(lowered_search)
            && self.category.admits(Some(&entry.category))
            && self.rarity.admits(entry.rarity())
            && self.tier.admits(entry.tier().as_ref())
            && self.price_range.contains(entry.effective_price())
    }

    /// Keep the matching entries, in input order
    pub fn apply<'a>(&self, entries: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
        let search = self.search_text.to_lowercase();
        entries
            .iter()
            .filter(|e| self.matches_with_search(e, &search))
            .collect()
    }

    /// Whether every field is at its match-all default
    pub fn is_default(&self) -> bool {
        *self == ItemFilter::default()
    }
}

/// Sort orders for the item list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    /// Name (A-Z)
    #[default]
    Name,
    /// Price (Low to High)
    PriceLow,
    /// Price (High to Low)
    PriceHigh,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::Name, SortMode::PriceLow, SortMode::PriceHigh];

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Name => "Name (A-Z)",
            SortMode::PriceLow => "Price (Low to High)",
            SortMode::PriceHigh => "Price (High to Low)",
        }
    }

    /// The mode after this one, wrapping around
    pub fn next(&self) -> SortMode {
        match self {
            SortMode::Name => SortMode::PriceLow,
            SortMode::PriceLow => SortMode::PriceHigh,
            SortMode::PriceHigh => SortMode::Name,
        }
    }
}

/// Compare names the way a locale collator would for plain text:
/// letters compare case-insensitively first, and only an otherwise equal
/// pair is ordered by case, lowercase first.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded.then_with(|| {
        for (ca, cb) in a.chars().zip(b.chars()) {
            if ca == cb {
                continue;
            }
            match (ca.is_lowercase(), cb.is_lowercase()) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => return ca.cmp(&cb),
            }
        }
        a.len().cmp(&b.len())
    })
}

/// Sorted copy of `entries`; ties keep their input order
pub fn sort_entries<'a>(entries: &[&'a CatalogEntry], mode: SortMode) -> Vec<&'a CatalogEntry> {
    let mut sorted = entries.to_vec();
    match mode {
        SortMode::Name => {
            sorted.sort_by(|a, b| compare_names(a.name(), b.name()));
        }
        SortMode::PriceLow => {
            sorted.sort_by(|a, b| a.effective_price().total_cmp(&b.effective_price()));
        }
        SortMode::PriceHigh => {
            sorted.sort_by(|a, b| b.effective_price().total_cmp(&a.effective_price()));
        }
    }
    sorted
}

/// Filter then sort: the list the browser displays
pub fn query<'a>(entries: &'a [CatalogEntry], filter: &ItemFilter, sort: SortMode) -> Vec<&'a CatalogEntry> {
    sort_entries(&filter.apply(entries), sort)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::normalize::tests::{make_food, make_potion, make_weapon, sample_catalog};
    use crate::catalog::Catalog;

    fn names(entries: &[&CatalogEntry]) -> Vec<String> {
        entries.iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn test_default_filter_returns_everything_in_order() {
        let catalog = sample_catalog();
        let filtered = ItemFilter::default().apply(catalog.entries());
        assert_eq!(filtered.len(), catalog.len());
        for (got, expected) in filtered.iter().zip(catalog.entries()) {
            assert_eq!(got.id, expected.id);
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = sample_catalog();
        let filter = ItemFilter {
            search_text: "O".to_string(),
            ..Default::default()
        };
        let first = filter.apply(catalog.entries());
        let second = filter.apply(catalog.entries());
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = sample_catalog();
        let filter = ItemFilter {
            search_text: "FROST".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&filter.apply(catalog.entries())), vec!["Frostner"]);
    }

    #[test]
    fn test_category_filter() {
        let catalog = sample_catalog();
        let filter = ItemFilter {
            category: Selection::Only(Category::Food),
            ..Default::default()
        };
        let filtered = filter.apply(catalog.entries());
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|e| e.category == Category::Food));
    }

    #[test]
    fn test_rarity_filter_excludes_entries_without_rarity() {
        let catalog = sample_catalog();
        let filter = ItemFilter {
            rarity: Selection::Only("Rare".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&filter.apply(catalog.entries())), vec!["Abyssal razor"]);
    }

    #[test]
    fn test_tier_filter_excludes_entries_without_tier() {
        let catalog = sample_catalog();
        let filter = ItemFilter {
            tier: Selection::Only(3),
            ..Default::default()
        };
        assert_eq!(names(&filter.apply(catalog.entries())), vec!["Bronze plate cuirass"]);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let catalog = sample_catalog();
        let filter = ItemFilter {
            price_range: PriceRange::new(100.0, 1200.0),
            ..Default::default()
        };
        assert_eq!(
            names(&filter.apply(catalog.entries())),
            vec!["Troll leather tunic", "Bronze plate cuirass", "Abyssal razor", "Minor healing mead"]
        );
    }

    #[test]
    fn test_zero_priced_entries_pass_default_range() {
        let mut potion = make_potion("Mystery brew", 0.0);
        potion.price_coins = None;
        let catalog = Catalog::new(&[], &[], &[], &[potion]);
        assert_eq!(ItemFilter::default().apply(catalog.entries()).len(), 1);
    }

    #[test]
    fn test_sort_by_name_ignores_case_first() {
        let catalog = Catalog::new(
            &[],
            &[make_food("bread", 1.0), make_food("Apple", 1.0), make_food("Bread", 1.0)],
            &[],
            &[],
        );
        let all = ItemFilter::default().apply(catalog.entries());
        assert_eq!(names(&sort_entries(&all, SortMode::Name)), vec!["Apple", "bread", "Bread"]);
    }

    #[test]
    fn test_non_ascii_letters_sort_by_code_point() {
        assert_eq!(compare_names("Jötunn bane", "Juniper"), Ordering::Greater);
        assert_eq!(compare_names("jötunn bane", "JÖTUNN BANE"), Ordering::Less);
    }

    #[test]
    fn test_price_sort_is_stable() {
        let catalog = Catalog::new(
            &[],
            &[make_food("Second", 50.0), make_food("Cheap", 10.0)],
            &[make_weapon("First", "Common", 50.0)],
            &[],
        );
        let all = ItemFilter::default().apply(catalog.entries());
        assert_eq!(names(&sort_entries(&all, SortMode::PriceLow)), vec!["Cheap", "Second", "First"]);
        assert_eq!(names(&sort_entries(&all, SortMode::PriceHigh)), vec!["Second", "First", "Cheap"]);
    }

    #[test]
    fn test_sort_does_not_touch_input() {
        let catalog = sample_catalog();
        let all = ItemFilter::default().apply(catalog.entries());
        let before = names(&all);
        let _ = sort_entries(&all, SortMode::PriceHigh);
        assert_eq!(names(&all), before);
    }

    #[test]
    fn test_query_combines_filter_and_sort() {
        let catalog = sample_catalog();
        let filter = ItemFilter {
            category: Selection::Only(Category::Weapons),
            ..Default::default()
        };
        assert_eq!(
            names(&query(catalog.entries(), &filter, SortMode::PriceHigh)),
            vec!["Frostner", "Abyssal razor", "Flint axe"]
        );
    }

    #[test]
    fn test_single_entry_match_agrees_with_apply() {
        let catalog = sample_catalog();
        let filter = ItemFilter {
            search_text: "mead".to_string(),
            category: Selection::Only(Category::Potions),
            ..Default::default()
        };
        assert!(!filter.is_default());
        assert!(ItemFilter::default().is_default());

        let matched: Vec<&CatalogEntry> = catalog.entries().iter().filter(|e| filter.matches(e)).collect();
        assert_eq!(matched, filter.apply(catalog.entries()));
        assert_eq!(names(&matched), vec!["Minor healing mead"]);
    }

    #[test]
    fn test_sort_mode_cycles() {
        let mut mode = SortMode::default();
        for _ in 0..SortMode::ALL.len() {
            mode = mode.next();
        }
        assert_eq!(mode, SortMode::Name);
    }
}
