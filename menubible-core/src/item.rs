use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque document id assigned by the store.
pub type ItemId = String;

/// Type chip that switches an item to glass/bottle pricing.
pub const HOUSEPOURING: &str = "Housepouring";

/// Value written to the legacy `type` field when no chip is selected.
pub const LEGACY_TYPE_FALLBACK: &str = "General";

/// Wine body scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Body {
    #[serde(rename = "Light Bodied")]
    Light,
    #[serde(rename = "Medium Bodied")]
    Medium,
    #[serde(rename = "Full Bodied")]
    Full,
}

impl Body {
    pub const ALL: [Body; 3] = [Body::Light, Body::Medium, Body::Full];

    pub fn label(self) -> &'static str {
        match self {
            Body::Light => "Light Bodied",
            Body::Medium => "Medium Bodied",
            Body::Full => "Full Bodied",
        }
    }

    /// Parses a stored label. Empty or unknown labels mean "no body".
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.label() == label.trim())
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A local file picked in the form, not uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub path: PathBuf,
}

impl PendingImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string())
    }
}

/// Image slot of an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageRef {
    #[default]
    None,
    /// Persisted public URL.
    Remote(String),
    /// Selected in the form, uploaded on submit.
    Pending(PendingImage),
}

impl ImageRef {
    /// Reads the stored string form; empty means no image.
    pub fn from_stored(url: Option<String>) -> Self {
        match url {
            Some(url) if !url.trim().is_empty() => ImageRef::Remote(url),
            _ => ImageRef::None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ImageRef::Remote(url) => Some(url),
            _ => None,
        }
    }
}

/// The two shapes `types` has been stored in over time.
///
/// Older records only carry a single `type` string. Normalization happens
/// once, when a record leaves the store layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredTypes {
    Tags(Vec<String>),
    Legacy(String),
    Missing,
}

impl StoredTypes {
    pub fn read(types: Option<Vec<String>>, legacy: Option<&str>) -> Self {
        match (types, legacy) {
            (Some(tags), _) => StoredTypes::Tags(tags),
            (None, Some(single)) if !single.is_empty() => StoredTypes::Legacy(single.to_string()),
            _ => StoredTypes::Missing,
        }
    }

    pub fn into_tags(self) -> Vec<String> {
        match self {
            StoredTypes::Tags(tags) => tags,
            StoredTypes::Legacy(single) => vec![single],
            StoredTypes::Missing => Vec::new(),
        }
    }
}

/// A document of the `menu-items` collection, exactly as stored.
///
/// Every field is optional because old records predate most of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub price_glass: Option<f64>,
    pub price_bottle: Option<f64>,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub method: Option<String>,
    pub trivia: Option<String>,
    pub allergens: Option<String>,
    pub sub_category: Option<String>,
    pub types: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub legacy_type: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ItemRecord {
    /// Builds the record written for a payload.
    pub fn from_payload(
        payload: &ItemPayload,
        created_at: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: Some(payload.name.clone()),
            price: Some(payload.price),
            price_glass: Some(payload.price_glass),
            price_bottle: Some(payload.price_bottle),
            description: Some(payload.description.clone()),
            ingredients: Some(payload.ingredients.clone()),
            method: Some(payload.method.clone()),
            trivia: Some(payload.trivia.clone()),
            allergens: Some(payload.allergens.clone()),
            sub_category: Some(payload.sub_category.clone()),
            types: Some(payload.types.clone()),
            legacy_type: Some(payload.legacy_type()),
            body: Some(payload.body.map(|b| b.label().to_string()).unwrap_or_default()),
            image: Some(payload.image.clone()),
            created_at,
            updated_at: Some(updated_at),
        }
    }

    /// Normalizes a stored record into the shape the views work with.
    pub fn into_item(self, id: impl Into<ItemId>) -> MenuItem {
        let types = StoredTypes::read(self.types, self.legacy_type.as_deref()).into_tags();

        MenuItem {
            id: id.into(),
            name: self.name.unwrap_or_default(),
            price: self.price.unwrap_or(0.0),
            price_glass: self.price_glass.unwrap_or(0.0),
            price_bottle: self.price_bottle.unwrap_or(0.0),
            description: non_empty(self.description),
            ingredients: non_empty(self.ingredients),
            method: non_empty(self.method),
            trivia: non_empty(self.trivia),
            allergens: non_empty(self.allergens),
            sub_category: self.sub_category.unwrap_or_default(),
            types,
            legacy_type: self.legacy_type.filter(|t| !t.is_empty()),
            body: self.body.as_deref().and_then(Body::from_label),
            image: ImageRef::from_stored(self.image),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A menu entry as presented to views.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    pub price_glass: f64,
    pub price_bottle: f64,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    /// Preparation notes.
    pub method: Option<String>,
    pub trivia: Option<String>,
    pub allergens: Option<String>,
    pub sub_category: String,
    /// Always a list, even for records that only stored `type`.
    pub types: Vec<String>,
    pub legacy_type: Option<String>,
    pub body: Option<Body>,
    pub image: ImageRef,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MenuItem {
    pub fn has_type(&self, label: &str) -> bool {
        self.types.iter().any(|t| t == label) || self.legacy_type.as_deref() == Some(label)
    }

    pub fn is_housepouring(&self) -> bool {
        self.has_type(HOUSEPOURING)
    }
}

/// Validated form output, written through the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPayload {
    pub name: String,
    pub price: f64,
    pub price_glass: f64,
    pub price_bottle: f64,
    pub description: String,
    pub ingredients: String,
    pub method: String,
    pub trivia: String,
    pub allergens: String,
    pub sub_category: String,
    pub types: Vec<String>,
    pub body: Option<Body>,
    /// Public URL, or empty for no image.
    pub image: String,
}

impl ItemPayload {
    /// Mirror of the first type for readers that predate `types`.
    pub fn legacy_type(&self) -> String {
        self.types
            .first()
            .cloned()
            .unwrap_or_else(|| LEGACY_TYPE_FALLBACK.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_type_becomes_single_tag() {
        let record = ItemRecord {
            name: Some("Merlot".to_string()),
            legacy_type: Some("Red".to_string()),
            ..Default::default()
        };

        let item = record.into_item("abc");
        assert_eq!(item.types, vec!["Red".to_string()]);
        assert!(item.has_type("Red"));
    }

    #[test]
    fn types_list_wins_over_legacy_type() {
        let record = ItemRecord {
            types: Some(vec!["White".to_string(), "Sparkling".to_string()]),
            legacy_type: Some("White".to_string()),
            ..Default::default()
        };

        let item = record.into_item("abc");
        assert_eq!(item.types, vec!["White".to_string(), "Sparkling".to_string()]);
    }

    #[test]
    fn missing_types_is_empty_list() {
        let item = ItemRecord::default().into_item("abc");
        assert!(item.types.is_empty());
        assert_eq!(item.legacy_type, None);
    }

    #[test]
    fn empty_strings_read_as_absent() {
        let record = ItemRecord {
            image: Some(String::new()),
            body: Some(String::new()),
            trivia: Some("  ".to_string()),
            ..Default::default()
        };

        let item = record.into_item("abc");
        assert_eq!(item.image, ImageRef::None);
        assert_eq!(item.body, None);
        assert_eq!(item.trivia, None);
    }

    #[test]
    fn body_labels() {
        assert_eq!(Body::from_label("Full Bodied"), Some(Body::Full));
        assert_eq!(Body::from_label("Chewy"), None);
        assert_eq!(Body::Medium.to_string(), "Medium Bodied");
    }

    #[test]
    fn payload_mirrors_first_type() {
        let mut payload = ItemPayload {
            name: "House Red".to_string(),
            price: 0.0,
            price_glass: 45.0,
            price_bottle: 180.0,
            description: String::new(),
            ingredients: String::new(),
            method: String::new(),
            trivia: String::new(),
            allergens: String::new(),
            sub_category: "Wines".to_string(),
            types: vec!["Housepouring".to_string(), "Red".to_string()],
            body: None,
            image: String::new(),
        };
        assert_eq!(payload.legacy_type(), "Housepouring");

        payload.types.clear();
        assert_eq!(payload.legacy_type(), "General");
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = ItemRecord {
            sub_category: Some("Wines".to_string()),
            legacy_type: Some("Red".to_string()),
            price_glass: Some(40.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["subCategory"], "Wines");
        assert_eq!(json["type"], "Red");
        assert_eq!(json["priceGlass"], 40.0);
    }
}
