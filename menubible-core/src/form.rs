use tracing::{info, instrument, warn};

use crate::admin::AdminCapability;
use crate::catalog::{self, BODY_CATEGORY};
use crate::error::{FormError, SubmitError};
use crate::item::{Body, HOUSEPOURING, ImageRef, ItemId, ItemPayload, MenuItem};
use crate::store::ItemStore;
use crate::upload::AssetUploader;

/// Whether a submit creates a new document or overwrites an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ItemId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(ItemId),
    Updated(ItemId),
}

impl SubmitOutcome {
    pub fn id(&self) -> &str {
        match self {
            SubmitOutcome::Created(id) | SubmitOutcome::Updated(id) => id,
        }
    }
}

/// Raw form state. Numbers stay text until validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub price: String,
    pub price_glass: String,
    pub price_bottle: String,
    pub description: String,
    pub ingredients: String,
    pub method: String,
    pub allergens: String,
    pub trivia: String,
    pub sub_category: String,
    pub types: Vec<String>,
    pub body: Option<Body>,
    pub image: ImageRef,
}

fn parse_number(field: &'static str, value: &str, missing: FormError) -> Result<f64, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(missing);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(FormError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}

impl ItemDraft {
    /// Empty draft for a new item in `category`.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            price_glass: String::new(),
            price_bottle: String::new(),
            description: String::new(),
            ingredients: String::new(),
            method: String::new(),
            allergens: String::new(),
            trivia: String::new(),
            sub_category: category.into(),
            types: Vec::new(),
            body: None,
            image: ImageRef::None,
        }
    }

    /// Draft pre-filled from an existing item.
    pub fn from_item(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price.to_string(),
            price_glass: item.price_glass.to_string(),
            price_bottle: item.price_bottle.to_string(),
            description: item.description.clone().unwrap_or_default(),
            ingredients: item.ingredients.clone().unwrap_or_default(),
            method: item.method.clone().unwrap_or_default(),
            allergens: item.allergens.clone().unwrap_or_default(),
            trivia: item.trivia.clone().unwrap_or_default(),
            sub_category: item.sub_category.clone(),
            types: item.types.clone(),
            body: item.body,
            image: item.image.clone(),
        }
    }

    /// Chips offered for this draft's category.
    pub fn available_types(&self) -> &'static [&'static str] {
        catalog::type_chips(&self.sub_category)
    }

    pub fn toggle_type(&mut self, label: &str) {
        if let Some(pos) = self.types.iter().position(|t| t == label) {
            self.types.remove(pos);
        } else {
            self.types.push(label.to_string());
        }
    }

    pub fn is_housepouring(&self) -> bool {
        self.types.iter().any(|t| t == HOUSEPOURING)
    }

    pub fn takes_body(&self) -> bool {
        self.sub_category == BODY_CATEGORY
    }

    /// Checks the draft and produces the payload to write.
    ///
    /// The image slot is left empty; [`submit`] fills it after the upload.
    pub fn validate(&self) -> Result<ItemPayload, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }

        let (price, price_glass, price_bottle) = if self.is_housepouring() {
            let glass = parse_number("Glass price", &self.price_glass, FormError::MissingGlassPrice)?;
            let bottle = parse_number("Bottle price", &self.price_bottle, FormError::MissingBottlePrice)?;
            (0.0, glass, bottle)
        } else {
            let price = parse_number("Price", &self.price, FormError::MissingPrice)?;
            (price, 0.0, 0.0)
        };

        Ok(ItemPayload {
            name: name.to_string(),
            price,
            price_glass,
            price_bottle,
            description: self.description.clone(),
            ingredients: self.ingredients.clone(),
            method: self.method.clone(),
            trivia: self.trivia.clone(),
            allergens: self.allergens.clone(),
            sub_category: self.sub_category.clone(),
            types: self.types.clone(),
            body: if self.takes_body() { self.body } else { None },
            image: self.image.url().unwrap_or_default().to_string(),
        })
    }
}

/// Validates, uploads a pending image, then writes through the store.
///
/// Validation failures return before anything leaves the process. A failed
/// upload is logged and the item is saved without an image.
#[instrument(skip_all, fields(mode = ?mode))]
pub async fn submit<S, U>(
    _admin: &AdminCapability,
    draft: &ItemDraft,
    mode: &FormMode,
    store: &S,
    uploader: &U,
) -> Result<SubmitOutcome, SubmitError<S::Error>>
where
    S: ItemStore,
    U: AssetUploader,
{
    let mut payload = draft.validate()?;

    if let ImageRef::Pending(pending) = &draft.image {
        payload.image = match uploader.upload(pending).await {
            Ok(url) => url,
            Err(e) => {
                warn!(file = %pending.file_name(), "Image upload failed, saving without image: {e}");
                String::new()
            }
        };
    }

    match mode {
        FormMode::Create => {
            let id = store.create(&payload).await.map_err(SubmitError::Store)?;
            info!(%id, "Item added");
            Ok(SubmitOutcome::Created(id))
        }
        FormMode::Edit(id) => {
            store.update(id, &payload).await.map_err(SubmitError::Store)?;
            info!(%id, "Item updated");
            Ok(SubmitOutcome::Updated(id.clone()))
        }
    }
}

/// Deletes an item. Missing ids succeed.
pub async fn delete<S: ItemStore>(_admin: &AdminCapability, store: &S, id: &str) -> Result<(), S::Error> {
    store.delete(id).await?;
    info!(%id, "Item deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::AdminGate;
    use crate::item::{ItemRecord, PendingImage};
    use crate::store::MemoryStore;
    use crate::upload::MemoryUploader;

    fn wine_draft() -> ItemDraft {
        let mut draft = ItemDraft::new("Wines");
        draft.name = "House Red".to_string();
        draft
    }

    #[test]
    fn name_is_required() {
        let mut draft = ItemDraft::new("Soups");
        draft.name = "   ".to_string();
        draft.price = "30".to_string();
        assert_eq!(draft.validate(), Err(FormError::MissingName));
    }

    #[test]
    fn price_is_required() {
        let draft = wine_draft();
        assert_eq!(draft.validate(), Err(FormError::MissingPrice));
    }

    #[test]
    fn housepouring_needs_glass_and_bottle() {
        let mut draft = wine_draft();
        draft.toggle_type("Housepouring");
        draft.price = "99".to_string();
        assert_eq!(draft.validate(), Err(FormError::MissingGlassPrice));

        draft.price_glass = "45".to_string();
        assert_eq!(draft.validate(), Err(FormError::MissingBottlePrice));

        draft.price_bottle = "180".to_string();
        let payload = draft.validate().unwrap();
        assert_eq!(payload.price, 0.0);
        assert_eq!(payload.price_glass, 45.0);
        assert_eq!(payload.price_bottle, 180.0);
    }

    #[test]
    fn plain_price_zeroes_glass_and_bottle() {
        let mut draft = wine_draft();
        draft.price = "120.5".to_string();
        draft.price_glass = "40".to_string();
        let payload = draft.validate().unwrap();
        assert_eq!(payload.price, 120.5);
        assert_eq!(payload.price_glass, 0.0);
    }

    #[test]
    fn negative_and_garbage_prices_rejected() {
        let mut draft = wine_draft();
        draft.price = "-3".to_string();
        assert!(matches!(draft.validate(), Err(FormError::InvalidNumber { field: "Price", .. })));
        draft.price = "ten".to_string();
        assert!(matches!(draft.validate(), Err(FormError::InvalidNumber { .. })));
    }

    #[test]
    fn toggle_type_adds_and_removes() {
        let mut draft = wine_draft();
        draft.toggle_type("Red");
        draft.toggle_type("Sparkling");
        draft.toggle_type("Red");
        assert_eq!(draft.types, vec!["Sparkling".to_string()]);
    }

    #[test]
    fn body_only_kept_for_wines() {
        let mut draft = ItemDraft::new("Beers");
        draft.name = "Lager".to_string();
        draft.price = "35".to_string();
        draft.body = Some(Body::Light);
        assert_eq!(draft.validate().unwrap().body, None);

        let mut wine = wine_draft();
        wine.price = "200".to_string();
        wine.body = Some(Body::Full);
        assert_eq!(wine.validate().unwrap().body, Some(Body::Full));
    }

    #[test]
    fn edit_draft_normalizes_legacy_type() {
        let item = ItemRecord {
            name: Some("Old Gin".to_string()),
            price: Some(60.0),
            sub_category: Some("Spirits".to_string()),
            legacy_type: Some("Gin".to_string()),
            image: Some("https://cdn/x.png".to_string()),
            ..Default::default()
        }
        .into_item("legacy-1");

        let draft = ItemDraft::from_item(&item);
        assert_eq!(draft.types, vec!["Gin".to_string()]);
        assert_eq!(draft.price, "60");
        assert_eq!(draft.price_glass, "0");

        let payload = draft.validate().unwrap();
        assert_eq!(payload.image, "https://cdn/x.png");
    }

    #[tokio::test]
    async fn zero_priced_items_stay_editable() {
        let store = MemoryStore::new();
        store.insert_record(
            "water",
            ItemRecord {
                name: Some("Tap Water".to_string()),
                price: Some(0.0),
                sub_category: Some("Soft-Drinks".to_string()),
                ..Default::default()
            },
        );
        store.insert_record(
            "tasting",
            ItemRecord {
                name: Some("Tasting Pour".to_string()),
                price: Some(0.0),
                price_glass: Some(0.0),
                price_bottle: Some(0.0),
                sub_category: Some("Wines".to_string()),
                types: Some(vec!["Housepouring".to_string()]),
                ..Default::default()
            },
        );
        let admin = AdminGate::new(["admin"]).unlock("admin").unwrap();
        let uploader = MemoryUploader::new("memory://images");

        for id in ["water", "tasting"] {
            let item = store.get(id).await.unwrap().unwrap();
            let mut draft = ItemDraft::from_item(&item);
            draft.description = "On the house".to_string();

            let mode = FormMode::Edit(id.to_string());
            let outcome = submit(&admin, &draft, &mode, &store, &uploader).await.unwrap();
            assert_eq!(outcome, SubmitOutcome::Updated(id.to_string()));

            let saved = store.get(id).await.unwrap().unwrap();
            assert_eq!(saved.description.as_deref(), Some("On the house"));
            assert_eq!(saved.price, 0.0);
        }
    }

    #[test]
    fn pending_image_is_not_a_url() {
        let mut draft = wine_draft();
        draft.price = "10".to_string();
        draft.image = ImageRef::Pending(PendingImage::new("/tmp/photo.jpg"));
        assert_eq!(draft.validate().unwrap().image, "");
    }
}
