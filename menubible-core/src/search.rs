use tracing::{debug, instrument};

use crate::item::MenuItem;
use crate::store::{ItemFilter, ItemStore};

pub const MAX_RESULTS: usize = 5;

/// Which fields a search term is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Name or description.
    #[default]
    Name,
    /// Sub-category or any type tag.
    Category,
    Allergen,
}

impl SearchMode {
    pub const ALL: [SearchMode; 3] = [SearchMode::Name, SearchMode::Category, SearchMode::Allergen];

    pub fn next(self) -> Self {
        match self {
            SearchMode::Name => SearchMode::Category,
            SearchMode::Category => SearchMode::Allergen,
            SearchMode::Allergen => SearchMode::Name,
        }
    }
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SearchMode::Name),
            "category" => Ok(SearchMode::Category),
            "allergen" | "allergens" => Ok(SearchMode::Allergen),
            _ => Err(format!("unknown search mode: {}", s)),
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Name => write!(f, "Name"),
            SearchMode::Category => write!(f, "Category"),
            SearchMode::Allergen => write!(f, "Allergen"),
        }
    }
}

fn contains(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase().contains(needle))
}

/// Case-insensitive substring match of `term` against the mode's fields.
pub fn matches(item: &MenuItem, term: &str, mode: SearchMode) -> bool {
    let needle = term.to_lowercase();
    match mode {
        SearchMode::Allergen => contains(item.allergens.as_deref(), &needle),
        SearchMode::Category => {
            contains(Some(item.sub_category.as_str()), &needle)
                || item.types.iter().any(|t| t.to_lowercase().contains(&needle))
        }
        SearchMode::Name => {
            contains(Some(item.name.as_str()), &needle) || contains(item.description.as_deref(), &needle)
        }
    }
}

/// First [`MAX_RESULTS`] items matching `term`, in input order.
pub fn filter_items(items: Vec<MenuItem>, term: &str, mode: SearchMode) -> Vec<MenuItem> {
    if term.is_empty() {
        return Vec::new();
    }
    items
        .into_iter()
        .filter(|item| matches(item, term, mode))
        .take(MAX_RESULTS)
        .collect()
}

/// Fetches the whole collection and filters it client-side.
///
/// Linear in the collection size on every call, which is fine for a single
/// restaurant menu.
#[instrument(skip(store))]
pub async fn search<S: ItemStore>(
    store: &S,
    term: &str,
    mode: SearchMode,
) -> Result<Vec<MenuItem>, S::Error> {
    if term.is_empty() {
        return Ok(Vec::new());
    }
    let items = store.list(&ItemFilter::All, None).await?;
    debug!(scanned = items.len(), "Filtering collection");
    Ok(filter_items(items, term, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemRecord;

    fn item(name: &str, sub: &str, types: &[&str], allergens: Option<&str>) -> MenuItem {
        ItemRecord {
            name: Some(name.to_string()),
            sub_category: Some(sub.to_string()),
            types: Some(types.iter().map(|t| t.to_string()).collect()),
            allergens: allergens.map(String::from),
            description: Some(format!("{name} description")),
            ..Default::default()
        }
        .into_item(name)
    }

    #[test]
    fn name_mode_checks_description() {
        let mut it = item("Tuna Tataki", "Bites", &[], None);
        it.description = Some("Seared with ponzu".to_string());
        assert!(matches(&it, "PONZU", SearchMode::Name));
        assert!(matches(&it, "tuna", SearchMode::Name));
        assert!(!matches(&it, "salmon", SearchMode::Name));
    }

    #[test]
    fn category_mode_checks_types() {
        let it = item("Barolo", "Wines", &["Red"], None);
        assert!(matches(&it, "win", SearchMode::Category));
        assert!(matches(&it, "red", SearchMode::Category));
        assert!(!matches(&it, "white", SearchMode::Category));
    }

    #[test]
    fn allergen_mode_ignores_missing_field() {
        let it = item("Water", "Soft-Drinks", &[], None);
        assert!(!matches(&it, "dairy", SearchMode::Allergen));
    }

    #[test]
    fn results_are_capped() {
        let items: Vec<MenuItem> = (0..8)
            .map(|i| item(&format!("Cake {i}"), "Desserts", &[], Some("Dairy, Egg")))
            .collect();
        let found = filter_items(items, "dairy", SearchMode::Allergen);
        assert_eq!(found.len(), MAX_RESULTS);
        assert_eq!(found[0].name, "Cake 0");
    }

    #[test]
    fn empty_term_finds_nothing() {
        let items = vec![item("Anything", "Bites", &[], None)];
        assert!(filter_items(items, "", SearchMode::Name).is_empty());
    }

    #[test]
    fn mode_parsing_and_cycle() {
        assert_eq!("allergen".parse::<SearchMode>(), Ok(SearchMode::Allergen));
        assert_eq!(SearchMode::Allergen.next(), SearchMode::Name);
    }
}
