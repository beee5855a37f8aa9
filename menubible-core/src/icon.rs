//! Keyword-based icon lookup.
//!
//! Rules are checked top to bottom against the lowercased text and the first
//! match wins, so the order of each table is part of its behavior.

/// Icon tags the views know how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Soup,
    Leaf,
    Fish,
    Baby,
    Utensils,
    Cookie,
    Coffee,
    GlassWater,
    Citrus,
    Martini,
    Droplets,
    Beer,
    Wine,
    ShieldCheck,
    Map,
    CircleHelp,
    Sparkles,
    Milk,
    Wheat,
    Flame,
    Egg,
    Carrot,
    Flower,
    Beef,
    Flask,
    Recycle,
    Sprout,
    Tree,
    Shell,
    Warning,
}

impl Icon {
    /// Single-glyph rendering for terminals.
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Soup => "🍲",
            Icon::Leaf => "🌿",
            Icon::Fish => "🐟",
            Icon::Baby => "🧒",
            Icon::Utensils => "🍴",
            Icon::Cookie => "🍪",
            Icon::Coffee => "☕",
            Icon::GlassWater => "🥛",
            Icon::Citrus => "🍋",
            Icon::Martini => "🍸",
            Icon::Droplets => "💧",
            Icon::Beer => "🍺",
            Icon::Wine => "🍷",
            Icon::ShieldCheck => "🛡",
            Icon::Map => "🗺",
            Icon::CircleHelp => "❓",
            Icon::Sparkles => "✨",
            Icon::Milk => "🥛",
            Icon::Wheat => "🌾",
            Icon::Flame => "🔥",
            Icon::Egg => "🥚",
            Icon::Carrot => "🥕",
            Icon::Flower => "🌼",
            Icon::Beef => "🥩",
            Icon::Flask => "⚗",
            Icon::Recycle => "♻",
            Icon::Sprout => "🌱",
            Icon::Tree => "🌳",
            Icon::Shell => "🐚",
            Icon::Warning => "⚠",
        }
    }
}

/// One entry of an ordered rule table.
pub struct IconRule {
    /// Matches when any of these is a substring.
    pub any_of: &'static [&'static str],
    /// Blocks the match when any of these is a substring.
    pub none_of: &'static [&'static str],
    pub icon: Icon,
}

impl IconRule {
    const fn new(any_of: &'static [&'static str], icon: Icon) -> Self {
        Self {
            any_of,
            none_of: &[],
            icon,
        }
    }

    fn matches(&self, lower: &str) -> bool {
        self.any_of.iter().any(|k| lower.contains(k))
            && !self.none_of.iter().any(|k| lower.contains(k))
    }
}

pub const CATEGORY_RULES: &[IconRule] = &[
    IconRule::new(&["soup"], Icon::Soup),
    IconRule::new(&["salad", "veg"], Icon::Leaf),
    IconRule::new(&["sushi", "fish", "maki", "nigiri"], Icon::Fish),
    IconRule::new(&["bite", "kids", "starter"], Icon::Baby),
    IconRule::new(&["main", "sides"], Icon::Utensils),
    IconRule::new(&["dessert"], Icon::Cookie),
    IconRule::new(&["coffee", "tea"], Icon::Coffee),
    IconRule::new(&["soft", "water", "shake"], Icon::GlassWater),
    IconRule::new(&["mocktail"], Icon::Citrus),
    IconRule::new(&["cocktail"], Icon::Martini),
    IconRule::new(&["spirit", "vodka", "gin"], Icon::Droplets),
    IconRule::new(&["beer"], Icon::Beer),
    IconRule::new(&["wine"], Icon::Wine),
    IconRule::new(&["haccp", "safe"], Icon::ShieldCheck),
    IconRule::new(&["floor"], Icon::Map),
    IconRule::new(&["faq"], Icon::CircleHelp),
];

pub const ALLERGEN_RULES: &[IconRule] = &[
    IconRule::new(&["dairy", "milk"], Icon::Milk),
    IconRule::new(&["gluten", "wheat"], Icon::Wheat),
    IconRule::new(&["alcohol", "wine", "sulphites"], Icon::Wine),
    IconRule::new(&["spicy", "chili"], Icon::Flame),
    IconRule {
        any_of: &["veg"],
        none_of: &["raw"],
        icon: Icon::Leaf,
    },
    IconRule::new(&["egg"], Icon::Egg),
    IconRule::new(&["celery"], Icon::Carrot),
    IconRule::new(&["lupine"], Icon::Flower),
    IconRule::new(&["raw"], Icon::Beef),
    IconRule::new(&["mustard"], Icon::Flask),
    IconRule::new(&["sustainable"], Icon::Recycle),
    IconRule::new(&["soybeans"], Icon::Sprout),
    IconRule::new(&["tree nut", "nut", "peanut", "sesame"], Icon::Tree),
    IconRule::new(
        &["mollusc", "seafood", "prawn", "shrimp", "shellfish"],
        Icon::Shell,
    ),
    IconRule::new(&["fish"], Icon::Fish),
];

/// Evaluates `rules` in order; `fallback` when nothing matches.
pub fn first_match(rules: &[IconRule], text: &str, fallback: Icon) -> Icon {
    let lower = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.icon)
        .unwrap_or(fallback)
}

pub fn category_icon(name: &str) -> Icon {
    if name.is_empty() {
        return Icon::Sparkles;
    }
    first_match(CATEGORY_RULES, name, Icon::Sparkles)
}

pub fn allergen_icon(tag: &str) -> Icon {
    first_match(ALLERGEN_RULES, tag, Icon::Warning)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_icons() {
        assert_eq!(category_icon("Soups"), Icon::Soup);
        assert_eq!(category_icon("Wines"), Icon::Wine);
        assert_eq!(category_icon("Floor-Plan"), Icon::Map);
        assert_eq!(category_icon(""), Icon::Sparkles);
        assert_eq!(category_icon("Valentine"), Icon::Sparkles);
    }

    #[test]
    fn earlier_rule_wins() {
        assert_eq!(category_icon("Mocktails"), Icon::Citrus);
        assert_eq!(category_icon("Cocktails"), Icon::Martini);
        assert_eq!(category_icon("Soft-Drinks"), Icon::GlassWater);
        // tea is checked before gin
        assert_eq!(category_icon("Ginger Tea"), Icon::Coffee);
    }

    #[test]
    fn allergen_icons() {
        assert_eq!(allergen_icon("Dairy"), Icon::Milk);
        assert_eq!(allergen_icon(" Sulphites"), Icon::Wine);
        assert_eq!(allergen_icon("Peanut"), Icon::Tree);
        assert_eq!(allergen_icon("Molluscs"), Icon::Shell);
        assert_eq!(allergen_icon("Something else"), Icon::Warning);
    }

    #[test]
    fn veg_rule_excludes_raw() {
        assert_eq!(allergen_icon("Vegan"), Icon::Leaf);
        assert_eq!(allergen_icon("Raw veg"), Icon::Beef);
    }

    #[test]
    fn shellfish_wins_over_fish() {
        assert_eq!(allergen_icon("Shellfish"), Icon::Shell);
        assert_eq!(allergen_icon("Fish"), Icon::Fish);
    }
}
