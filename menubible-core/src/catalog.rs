//! Static menu taxonomy: sections, categories and their type chips.

use crate::icon::{Icon, category_icon};

/// Text shown when neither the chip nor the category has a description.
pub const FALLBACK_DESCRIPTION: &str = "Curated selection.";

/// Background used when no category-specific one exists.
pub const FALLBACK_BACKGROUND: &str = "https://imgur.com/UJpkv1U.png";

/// Top level of the navigation.
pub const SECTIONS: &[(&str, &[&str])] = &[
    (
        "Food",
        &["Soups", "Salads", "Sushi", "Bites", "Mains", "Kids", "Desserts"],
    ),
    (
        "Beverage",
        &[
            "Valentine",
            "Coffee & Tea",
            "Soft-Drinks",
            "Mocktails",
            "Cocktails",
            "Spirits",
            "Beers",
            "Wines",
        ],
    ),
    ("Misc", &["HACCP", "Floor-Plan", "FAQ"]),
];

/// Type chips offered per category. Categories without an entry have none.
pub const TYPE_CHIPS: &[(&str, &[&str])] = &[
    (
        "Mains",
        &["Seafoods", "Meat & Poultry", "Rice & Noodle", "Sharing", "Sides"],
    ),
    ("Salads", &["Starters", "Salads"]),
    ("Sushi", &["Maki", "Rolls", "Sashimi", "Nigiri", "Sharing"]),
    (
        "Wines",
        &["Housepouring", "Red", "White", "Rose", "Sparkling", "Champagne", "Sake"],
    ),
    (
        "Spirits",
        &[
            "Housepouring",
            "Gin",
            "Vodka",
            "Whisky",
            "Rum",
            "Tequila",
            "Shochu",
            "Liqueur",
        ],
    ),
    ("Cocktails", &["Signature", "Classics"]),
    ("Mocktails", &["Signature", "Classics"]),
    ("Beers", &["Draught", "Bottles"]),
    ("Coffee & Tea", &["Coffee", "Tea", "Shakes & Smoothies"]),
    ("Soft-Drinks", &["Water", "Sodas", "Juices"]),
];

pub const COMMON_ALLERGENS: &[&str] = &[
    "Dairy",
    "Gluten",
    "Tree Nuts",
    "Peanut",
    "Seafood",
    "Soybeans",
    "Egg",
    "Fish",
    "Sesame",
    "Mustard",
    "Celery",
    "Sulphites",
    "Lupine",
    "Molluscs",
    "Alcohol",
    "Pork",
    "Spicy",
    "Raw",
    "Vegan",
    "Vegetarian",
    "Sustainable",
];

/// The only category whose items carry a body.
pub const BODY_CATEGORY: &str = "Wines";

/// Categories that switch the whole app to the seasonal palette.
pub const SEASONAL_CATEGORIES: &[&str] = &["Valentine"];

const DESCRIPTIONS: &[(&str, &str)] = &[
    ("Soups", "Warm, comforting bowls rich with Asian aromatics and depth."),
    ("Bites", "Small plates with big personality. Perfect for sharing."),
    ("Salads", "A curated beginning. Light bites and vibrant greens."),
    ("Salads-Starters", "Small plates with big personality. Perfect for opening the palate."),
    ("Salads-Salads", "Crisp, organic greens meet bold Asian dressings. A fresh start."),
    ("Sushi", "Precision cuts, vinegared rice, and the ocean's finest catch."),
    ("Sushi-Maki", "Classic cylindrical rolls wrapped in crisp nori."),
    ("Sushi-Rolls", "Modern uramaki creations with bold flavors and textures."),
    ("Sushi-Sashimi", "Pure, distinct slices of fresh raw fish without rice."),
    ("Sushi-Nigiri", "Hand-pressed vinegared rice topped with premium seafood."),
    ("Sushi-Sharing", "Grand platters showcasing the chef's finest selection."),
    ("Mains", "The main event. Robust flavors bridging East and West."),
    ("Mains-Seafoods", "Fresh catches prepared with delicate Asian techniques."),
    ("Mains-Meat & Poultry", "Prime cuts, slow-cooked textures, and bold marinades."),
    ("Mains-Rice & Noodle", "The essential staples, elevated with wok-hei and premium ingredients."),
    ("Mains-Sharing", "Generous platters designed to bring people together."),
    ("Mains-Sides", "The perfect accompaniments to complete your meal."),
    ("Kids", "Gourmet favorites tailored for our younger guests."),
    ("Desserts", "The sweet finale. Indulgent textures and delicate sweetness."),
    ("Coffee & Tea", "Artisan roasted beans, rare tea blends, and creamy delights."),
    ("Coffee & Tea-Coffee", "Barista-crafted espresso, latte, and cold brew selections."),
    ("Coffee & Tea-Tea", "Premium loose-leaf teas and herbal infusions."),
    ("Coffee & Tea-Shakes & Smoothies", "Rich, creamy shakes and revitalizing fruit blends."),
    ("Soft-Drinks", "Refreshing mineral waters, premium sodas, and fresh juices."),
    ("Soft-Drinks-Water", "Still and sparkling waters from pristine sources."),
    ("Soft-Drinks-Sodas", "Classic fizzy favorites and premium mixers."),
    ("Soft-Drinks-Juices", "Freshly squeezed seasonal fruits."),
    ("Mocktails", "Alcohol-free artistry using fresh fruits and botanicals."),
    ("Mocktails-Signature", "Complex, alcohol-free creations unique to the house."),
    ("Mocktails-Classics", "Timeless refreshments, perfectly balanced."),
    ("Cocktails", "Liquid art. Shaken, stirred, and poured with passion."),
    ("Cocktails-Signature", "Exclusive creations you won't find anywhere else."),
    ("Cocktails-Classics", "The world's most revered recipes, perfected."),
    ("Spirits", "Distilled excellence. The foundation of great drinks."),
    ("Spirits-Housepouring", "Our reliable selection of premium standard spirits."),
    ("Spirits-Gin", "Botanical complexity, from London Dry to Japanese Craft."),
    ("Spirits-Vodka", "Pure, clean, and crisp spirits from around the globe."),
    ("Spirits-Whisky", "Aged perfection from Scotland, Japan, and the Americas."),
    ("Spirits-Rum", "The spirit of the tropics, from white to aged dark."),
    ("Spirits-Tequila", "Agave spirits from the heart of Mexico."),
    ("Spirits-Shochu", "Traditional Japanese distilled spirits."),
    ("Spirits-Liqueur", "Sweet, herbal, and complex modifiers."),
    ("Beers", "Refreshing brews to combat the desert heat."),
    ("Beers-Draught", "Perfectly poured taps, crisp and cold."),
    ("Beers-Bottles", "Curated craft and international favorites."),
    ("Wines", "A curated journey through the world's finest vineyards."),
    ("Wines-Housepouring", "Excellent wines by the glass for every occasion."),
    ("Wines-Red", "Bold, tannic, and complex reds to pair with our meats."),
    ("Wines-White", "Crisp and mineral-forward notes, perfect for seafood."),
    ("Wines-Rose", "Blush tones and summer fruits, perfect for sunset."),
    ("Wines-Sparkling", "Effervescent joy for toasts and celebrations."),
    ("Wines-Champagne", "The pinnacle of bubbles from the heart of France."),
    ("Wines-Sake", "Premium rice wines, the soul of Japan."),
    ("HACCP", "Food safety protocols and hygiene standards."),
    ("Floor-Plan", "Layouts and seating arrangements."),
    ("FAQ", "Operational details and common questions."),
];

const UNSPLASH: &str = "https://images.unsplash.com/photo-";
const UNSPLASH_PARAMS: &str = "?auto=format&fit=crop&q=80";

const BACKGROUNDS: &[(&str, &str)] = &[
    ("Salads", "1512621776951-a57141f2eefd"),
    ("Salads-Salads", "1512621776951-a57141f2eefd"),
    ("Salads-Starters", "1541544741938-0af808871cc0"),
    ("Sushi", "1579871494447-9811cf80d66c"),
    ("Sushi-Maki", "1553621042-f6e147245754"),
    ("Sushi-Rolls", "1559339352-11d035aa65de"),
    ("Sushi-Sashimi", "1534482421-64566f976cfa"),
    ("Sushi-Nigiri", "1617196019294-dc35f53eb31d"),
    ("Sushi-Sharing", "1633478062482-790e3b5dd810"),
    ("Mains", "1544025162-d76690b67f61"),
    ("Mains-Seafoods", "1519708227418-c8fd9a3a2750"),
    ("Mains-Meat & Poultry", "1600891964092-4316c288032e"),
    ("Mains-Rice & Noodle", "1552611052-33e04de081de"),
    ("Mains-Sharing", "1544025162-d76690b67f61"),
    ("Mains-Sides", "1534939561126-855b8675edd7"),
    ("Kids", "1621255562761-f44604928b52"),
    ("Desserts", "1563729784474-d77dbb933a9e"),
    ("Wines", "1506377247377-2a5b3b417ebb"),
    ("Wines-Red", "1510812431401-41d2bd2722f3"),
    ("Wines-White", "1585553616435-2dc0a54e271d"),
    ("Wines-Rose", "1559563362-c667ba5f5480"),
    ("Wines-Sparkling", "1598155523122-38423bb4d6c1"),
    ("Wines-Champagne", "1594146663246-886861114532"),
    ("Wines-Sake", "1572918664405-1815e45c4852"),
    ("Spirits", "1598155523122-38423bb4d6c1"),
    ("Spirits-Gin", "1514362545857-3bc16549766b"),
    ("Spirits-Vodka", "1608270586620-248524c67de9"),
    ("Spirits-Whisky", "1527281400683-1aabc8b45f51"),
    ("Spirits-Rum", "1614313511387-1436a4480ebb"),
    ("Spirits-Tequila", "1516535794938-6063878f08cc"),
    ("Spirits-Shochu", "1580552600207-2c9744c8c734"),
    ("Spirits-Liqueur", "1556679343-c7306c1976bc"),
    ("Cocktails", "1514362545857-3bc16549766b"),
    ("Mocktails", "1534353473418-4cfa6c56fd38"),
    ("Beers", "1535958636474-b021ee8876a3"),
    ("Coffee & Tea", "1447933601403-0c6688de566e"),
    ("Coffee & Tea-Shakes & Smoothies", "1577805947697-b9b2d5d39c96"),
    ("Soft-Drinks", "1622483767028-3f66f32aef97"),
    ("Misc", "1581091226825-a6a2a5aee158"),
    ("HACCP", "1581091226825-a6a2a5aee158"),
];

/// Soups point at a page rather than a photo id.
const SOUPS_BACKGROUND: &str =
    "https://unsplash.com/photos/a-bowl-of-soup-on-a-wooden-table-ZrtDZRfxwog";

fn lookup<'a>(table: &'a [(&str, &str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn chip_key(category: &str, chip: Option<&str>) -> Option<String> {
    chip.filter(|c| !c.is_empty())
        .map(|c| format!("{category}-{c}"))
}

pub fn sections() -> impl Iterator<Item = (&'static str, &'static [&'static str])> {
    SECTIONS.iter().copied()
}

/// Every category reachable from the navigation, in menu order.
pub fn categories() -> impl Iterator<Item = &'static str> {
    SECTIONS.iter().flat_map(|(_, cats)| cats.iter().copied())
}

pub fn is_known_category(name: &str) -> bool {
    categories().any(|c| c == name)
}

pub fn section_of(category: &str) -> Option<&'static str> {
    SECTIONS
        .iter()
        .find(|(_, cats)| cats.contains(&category))
        .map(|(section, _)| *section)
}

pub fn type_chips(category: &str) -> &'static [&'static str] {
    TYPE_CHIPS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, chips)| *chips)
        .unwrap_or(&[])
}

/// Description for a category, refined by the selected chip when one exists.
pub fn description(category: &str, chip: Option<&str>) -> &'static str {
    chip_key(category, chip)
        .and_then(|key| lookup(DESCRIPTIONS, &key))
        .or_else(|| lookup(DESCRIPTIONS, category))
        .unwrap_or(FALLBACK_DESCRIPTION)
}

pub fn background(category: &str, chip: Option<&str>) -> String {
    if let Some(id) = chip_key(category, chip).and_then(|key| lookup(BACKGROUNDS, &key)) {
        return format!("{UNSPLASH}{id}{UNSPLASH_PARAMS}");
    }
    if category == "Soups" {
        return SOUPS_BACKGROUND.to_string();
    }
    match lookup(BACKGROUNDS, category) {
        Some(id) => format!("{UNSPLASH}{id}{UNSPLASH_PARAMS}"),
        None => FALLBACK_BACKGROUND.to_string(),
    }
}

pub fn icon(category: &str) -> Icon {
    category_icon(category)
}

/// Navigation label: the first `-` becomes a space.
pub fn display_name(category: &str) -> String {
    category.replacen('-', " ", 1)
}

pub fn is_seasonal(category: &str) -> bool {
    SEASONAL_CATEGORIES.contains(&category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chips_per_category() {
        assert_eq!(type_chips("Beers"), &["Draught", "Bottles"]);
        assert!(type_chips("Kids").is_empty());
        assert!(type_chips("Nope").is_empty());
    }

    #[test]
    fn description_falls_back() {
        assert_eq!(
            description("Wines", Some("Red")),
            "Bold, tannic, and complex reds to pair with our meats."
        );
        // no chip-level text for Kids
        assert_eq!(
            description("Kids", Some("Anything")),
            "Gourmet favorites tailored for our younger guests."
        );
        assert_eq!(description("Valentine", None), FALLBACK_DESCRIPTION);
    }

    #[test]
    fn background_falls_back() {
        assert!(background("Wines", Some("Red")).contains("1510812431401-41d2bd2722f3"));
        assert!(background("Wines", Some("Housepouring")).contains("1506377247377-2a5b3b417ebb"));
        assert_eq!(background("Soups", None), SOUPS_BACKGROUND);
        assert_eq!(background("FAQ", None), FALLBACK_BACKGROUND);
    }

    #[test]
    fn navigation_lookups() {
        assert_eq!(section_of("Spirits"), Some("Beverage"));
        assert_eq!(section_of("Nope"), None);
        assert!(is_known_category("Floor-Plan"));
        assert_eq!(categories().count(), 18);
        assert_eq!(display_name("Soft-Drinks"), "Soft Drinks");
        assert_eq!(display_name("Floor-Plan"), "Floor Plan");
    }

    #[test]
    fn every_chip_category_is_navigable() {
        for (category, _) in TYPE_CHIPS {
            assert!(is_known_category(category), "{category} missing from sections");
        }
    }
}
