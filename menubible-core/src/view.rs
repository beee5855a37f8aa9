//! What each screen shows, independent of how it is drawn.

use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::catalog;
use crate::icon::{Icon, allergen_icon};
use crate::item::MenuItem;
use crate::store::{ItemFilter, ItemStore};

/// Label of the chip that disables chip filtering.
pub const ALL_CHIP: &str = "All";

/// Most items a home row asks the store for.
pub const HOME_ROW_LIMIT: usize = 10;

/// How a price is rendered. Housepouring items never show the single price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceDisplay {
    Single(f64),
    GlassAndBottle { glass: f64, bottle: f64 },
}

impl PriceDisplay {
    pub fn for_item(item: &MenuItem) -> Self {
        if item.is_housepouring() {
            PriceDisplay::GlassAndBottle {
                glass: item.price_glass,
                bottle: item.price_bottle,
            }
        } else {
            PriceDisplay::Single(item.price)
        }
    }
}

impl std::fmt::Display for PriceDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceDisplay::Single(price) => write!(f, "{} AED", price),
            PriceDisplay::GlassAndBottle { glass, bottle } => {
                write!(f, "{} glass (150ml) / {} bottle", glass, bottle)
            }
        }
    }
}

/// Reorders carousel rows. Tests inject a deterministic one.
pub trait Shuffle {
    fn shuffle(&mut self, items: &mut [MenuItem]);
}

impl<F: FnMut(&mut [MenuItem])> Shuffle for F {
    fn shuffle(&mut self, items: &mut [MenuItem]) {
        self(items)
    }
}

/// Uniform shuffle from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomShuffle;

impl Shuffle for RandomShuffle {
    fn shuffle(&mut self, items: &mut [MenuItem]) {
        items.shuffle(&mut rand::rng());
    }
}

/// A carousel on the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeRowSpec {
    pub title: &'static str,
    pub sources: &'static [&'static str],
    /// Rows drawn from several categories have no single category link.
    pub link: Option<&'static str>,
}

impl HomeRowSpec {
    pub fn icon(&self) -> Icon {
        if self.link.is_some() {
            catalog::icon(self.title)
        } else {
            Icon::Sparkles
        }
    }

    pub fn description(&self) -> &'static str {
        catalog::description(self.title, None)
    }
}

pub const HOME_ROWS: &[HomeRowSpec] = &[
    HomeRowSpec {
        title: "Starters Collection",
        sources: &["Sushi", "Starters"],
        link: None,
    },
    HomeRowSpec {
        title: "Mains",
        sources: &["Mains"],
        link: Some("Mains"),
    },
    HomeRowSpec {
        title: "Liquid Art",
        sources: &["Cocktails", "Mocktails", "Wines"],
        link: None,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct HomeRow {
    pub spec: &'static HomeRowSpec,
    pub items: Vec<MenuItem>,
}

/// Loads every home row. Rows that come back empty are left out.
pub async fn load_home_rows<S, H>(store: &S, shuffle: &mut H) -> Result<Vec<HomeRow>, S::Error>
where
    S: ItemStore,
    H: Shuffle,
{
    let mut rows = Vec::with_capacity(HOME_ROWS.len());
    for spec in HOME_ROWS {
        let filter = match ItemFilter::sub_category_in(spec.sources.iter().copied()) {
            Ok(filter) => filter,
            Err(e) => {
                warn!(row = spec.title, "Skipping home row: {e}");
                continue;
            }
        };
        let mut items = store.list(&filter, Some(HOME_ROW_LIMIT)).await?;
        if items.is_empty() {
            debug!(row = spec.title, "Skipping empty home row");
            continue;
        }
        shuffle.shuffle(&mut items);
        rows.push(HomeRow { spec, items });
    }
    Ok(rows)
}

/// A category listing with its chip filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPage {
    pub category: String,
    pub items: Vec<MenuItem>,
    chip: Option<String>,
}

impl CategoryPage {
    pub fn new(category: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            category: category.into(),
            items,
            chip: None,
        }
    }

    pub async fn load<S: ItemStore>(store: &S, category: &str) -> Result<Self, S::Error> {
        let items = store.list(&ItemFilter::sub_category(category), None).await?;
        Ok(Self::new(category, items))
    }

    /// "All" followed by the category's type chips; empty when it has none.
    pub fn chips(&self) -> Vec<&'static str> {
        let chips = catalog::type_chips(&self.category);
        if chips.is_empty() {
            return Vec::new();
        }
        std::iter::once(ALL_CHIP).chain(chips.iter().copied()).collect()
    }

    pub fn selected_chip(&self) -> &str {
        self.chip.as_deref().unwrap_or(ALL_CHIP)
    }

    /// Selecting "All" or an unknown chip clears the filter.
    pub fn select_chip(&mut self, label: &str) {
        self.chip = catalog::type_chips(&self.category)
            .contains(&label)
            .then(|| label.to_string());
    }

    pub fn displayed(&self) -> Vec<&MenuItem> {
        match &self.chip {
            Some(chip) => self.items.iter().filter(|i| i.has_type(chip)).collect(),
            None => self.items.iter().collect(),
        }
    }

    pub fn description(&self) -> &'static str {
        catalog::description(&self.category, self.chip.as_deref())
    }

    pub fn background(&self) -> String {
        catalog::background(&self.category, self.chip.as_deref())
    }

    pub fn icon(&self) -> Icon {
        catalog::icon(&self.category)
    }

    pub fn title(&self) -> String {
        catalog::display_name(&self.category)
    }
}

/// An allergen tag ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllergenTag {
    pub label: String,
    pub icon: Icon,
}

/// The item detail screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetail {
    pub name: String,
    pub types: Vec<String>,
    pub price: PriceDisplay,
    pub body: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub notes: Option<String>,
    pub allergens: Vec<AllergenTag>,
    pub trivia: Vec<String>,
}

fn split_list(text: Option<&str>, separator: char) -> Vec<String> {
    text.map(|t| {
        t.split(separator)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

impl ItemDetail {
    /// Simple mode leaves out the notes and trivia.
    pub fn new(item: &MenuItem, simple: bool) -> Self {
        Self {
            name: item.name.clone(),
            types: item.types.clone(),
            price: PriceDisplay::for_item(item),
            body: item.body.map(|b| b.label().to_string()),
            image: item.image.url().map(String::from),
            description: item.description.clone(),
            ingredients: split_list(item.ingredients.as_deref(), ','),
            notes: if simple { None } else { item.method.clone() },
            allergens: split_list(item.allergens.as_deref(), ',')
                .into_iter()
                .map(|label| AllergenTag {
                    icon: allergen_icon(&label),
                    label,
                })
                .collect(),
            trivia: if simple {
                Vec::new()
            } else {
                split_list(item.trivia.as_deref(), '.')
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemRecord;

    fn wine(name: &str, types: &[&str]) -> MenuItem {
        ItemRecord {
            name: Some(name.to_string()),
            sub_category: Some("Wines".to_string()),
            types: Some(types.iter().map(|t| t.to_string()).collect()),
            price: Some(300.0),
            price_glass: Some(50.0),
            price_bottle: Some(220.0),
            ..Default::default()
        }
        .into_item(name)
    }

    #[test]
    fn housepouring_never_shows_single_price() {
        let item = wine("House White", &["Housepouring", "White"]);
        let price = PriceDisplay::for_item(&item);
        assert_eq!(price, PriceDisplay::GlassAndBottle { glass: 50.0, bottle: 220.0 });
        assert!(!price.to_string().contains("300"));
    }

    #[test]
    fn regular_item_shows_price() {
        let item = wine("Barolo", &["Red"]);
        assert_eq!(PriceDisplay::for_item(&item), PriceDisplay::Single(300.0));
        assert_eq!(PriceDisplay::for_item(&item).to_string(), "300 AED");
    }

    #[test]
    fn chip_filter_uses_types_and_legacy_type() {
        let legacy = ItemRecord {
            name: Some("Old Red".to_string()),
            sub_category: Some("Wines".to_string()),
            types: Some(vec!["Sparkling".to_string()]),
            legacy_type: Some("Red".to_string()),
            ..Default::default()
        }
        .into_item("old");
        let items = vec![wine("Barolo", &["Red"]), wine("Chablis", &["White"]), legacy];

        let mut page = CategoryPage::new("Wines", items);
        assert_eq!(page.displayed().len(), 3);

        page.select_chip("Red");
        let names: Vec<&str> = page.displayed().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Barolo", "Old Red"]);
        assert_eq!(page.selected_chip(), "Red");

        page.select_chip(ALL_CHIP);
        assert_eq!(page.displayed().len(), 3);
    }

    #[test]
    fn chips_start_with_all() {
        let page = CategoryPage::new("Beers", vec![]);
        assert_eq!(page.chips(), vec!["All", "Draught", "Bottles"]);
        assert!(CategoryPage::new("Kids", vec![]).chips().is_empty());
    }

    #[test]
    fn detail_splits_lists() {
        let item = ItemRecord {
            name: Some("Tempura".to_string()),
            ingredients: Some("prawn, flour ,  egg".to_string()),
            allergens: Some("Seafood, Gluten".to_string()),
            trivia: Some("Came from Portugal. Eaten hot.  ".to_string()),
            method: Some("Fry at 180C".to_string()),
            ..Default::default()
        }
        .into_item("t");

        let detail = ItemDetail::new(&item, false);
        assert_eq!(detail.ingredients, vec!["prawn", "flour", "egg"]);
        assert_eq!(detail.trivia, vec!["Came from Portugal", "Eaten hot"]);
        assert_eq!(detail.allergens[0].icon, Icon::Shell);
        assert_eq!(detail.allergens[1].label, "Gluten");
        assert_eq!(detail.notes.as_deref(), Some("Fry at 180C"));

        let simple = ItemDetail::new(&item, true);
        assert!(simple.notes.is_none());
        assert!(simple.trivia.is_empty());
        assert_eq!(simple.ingredients.len(), 3);
    }

    #[test]
    fn home_row_sources_build_bounded_filters() {
        for spec in HOME_ROWS {
            let filter = ItemFilter::sub_category_in(spec.sources.iter().copied());
            assert!(filter.is_ok(), "{} has an invalid source set", spec.title);
        }
    }
}
