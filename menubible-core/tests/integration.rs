//! End-to-end checks of the menu flows against the in-memory store.

use menubible_core::{
    AdminGate, CategoryPage, FormError, FormMode, ImageRef, ItemDetail, ItemDraft, ItemRecord,
    ItemStore, MemoryStore, MemoryUploader, PendingImage, PriceDisplay, SearchMode, Session,
    SubmitError, delete, load_home_rows, search, submit,
};

fn admin() -> menubible_core::AdminCapability {
    AdminGate::new(["admin", "800123"]).unlock("800123").unwrap()
}

fn draft(category: &str, name: &str, price: &str) -> ItemDraft {
    let mut draft = ItemDraft::new(category);
    draft.name = name.to_string();
    draft.price = price.to_string();
    draft
}

async fn seed(store: &MemoryStore, drafts: &[ItemDraft]) -> Vec<String> {
    let admin = admin();
    let uploader = MemoryUploader::new("https://cdn.test");
    let mut ids = Vec::new();
    for d in drafts {
        let outcome = submit(&admin, d, &FormMode::Create, store, &uploader).await.unwrap();
        ids.push(outcome.id().to_string());
    }
    ids
}

#[tokio::test]
async fn housepouring_lists_and_details_without_price() {
    let store = MemoryStore::new();
    let mut house = draft("Wines", "House Rose", "");
    house.toggle_type("Housepouring");
    house.toggle_type("Rose");
    house.price_glass = "42".to_string();
    house.price_bottle = "190".to_string();
    let ids = seed(&store, &[house, draft("Wines", "Sancerre", "310")]).await;

    let page = CategoryPage::load(&store, "Wines").await.unwrap();
    for item in page.displayed() {
        let price = PriceDisplay::for_item(item);
        if item.id == ids[0] {
            assert_eq!(price, PriceDisplay::GlassAndBottle { glass: 42.0, bottle: 190.0 });
        } else {
            assert_eq!(price, PriceDisplay::Single(310.0));
        }
    }

    let item = store.get(&ids[0]).await.unwrap().unwrap();
    assert_eq!(item.price, 0.0);
    let detail = ItemDetail::new(&item, false);
    assert!(matches!(detail.price, PriceDisplay::GlassAndBottle { .. }));
}

#[tokio::test]
async fn legacy_type_reads_as_single_tag() {
    let store = MemoryStore::new();
    store.insert_record(
        "legacy",
        ItemRecord {
            name: Some("Old Fashioned".to_string()),
            sub_category: Some("Cocktails".to_string()),
            legacy_type: Some("Classic".to_string()),
            price: Some(65.0),
            ..Default::default()
        },
    );

    let item = store.get("legacy").await.unwrap().unwrap();
    assert_eq!(item.types, vec!["Classic".to_string()]);
}

#[tokio::test]
async fn allergen_search_is_case_insensitive_and_capped() {
    let store = MemoryStore::new();
    let mut drafts: Vec<ItemDraft> = (0..7)
        .map(|i| {
            let mut d = draft("Desserts", &format!("Cake {i}"), "30");
            d.allergens = if i % 2 == 0 { "DAIRY, Egg" } else { "Nuts" }.to_string();
            d
        })
        .collect();
    for i in 0..3 {
        let mut d = draft("Mains", &format!("Gratin {i}"), "80");
        d.allergens = "Gluten, Dairy".to_string();
        drafts.push(d);
    }
    seed(&store, &drafts).await;

    let found = search(&store, "dairy", SearchMode::Allergen).await.unwrap();
    assert_eq!(found.len(), 5);
    assert!(
        found
            .iter()
            .all(|i| i.allergens.as_deref().unwrap().to_lowercase().contains("dairy"))
    );

    let none = search(&store, "sesame", SearchMode::Allergen).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn deleting_missing_id_is_ok() {
    let store = MemoryStore::new();
    assert!(delete(&admin(), &store, "does-not-exist").await.is_ok());

    let ids = seed(&store, &[draft("Soups", "Miso", "28")]).await;
    delete(&admin(), &store, &ids[0]).await.unwrap();
    delete(&admin(), &store, &ids[0]).await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn nameless_submit_never_reaches_store_or_uploader() {
    let store = MemoryStore::new();
    let uploader = MemoryUploader::new("https://cdn.test");
    let mut nameless = draft("Soups", "", "28");
    nameless.image = ImageRef::Pending(PendingImage::new("/tmp/soup.jpg"));

    let result = submit(&admin(), &nameless, &FormMode::Create, &store, &uploader).await;
    assert!(matches!(result, Err(SubmitError::Invalid(FormError::MissingName))));
    assert!(store.is_empty());
    assert!(uploader.uploads().is_empty());
}

#[tokio::test]
async fn chip_selection_matches_types_or_legacy_type() {
    let store = MemoryStore::new();
    let mut gin = draft("Spirits", "Hendrick's", "55");
    gin.toggle_type("Gin");
    let mut rum = draft("Spirits", "Diplomatico", "60");
    rum.toggle_type("Rum");
    seed(&store, &[gin, rum]).await;
    store.insert_record(
        "legacy-gin",
        ItemRecord {
            name: Some("Tanqueray".to_string()),
            sub_category: Some("Spirits".to_string()),
            legacy_type: Some("Gin".to_string()),
            price: Some(45.0),
            ..Default::default()
        },
    );

    let mut page = CategoryPage::load(&store, "Spirits").await.unwrap();
    page.select_chip("Gin");
    let mut names: Vec<&str> = page.displayed().iter().map(|i| i.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Hendrick's", "Tanqueray"]);
}

#[tokio::test]
async fn failed_upload_saves_without_image() {
    let store = MemoryStore::new();
    let uploader = MemoryUploader::failing();
    let mut d = draft("Bites", "Edamame", "22");
    d.image = ImageRef::Pending(PendingImage::new("/tmp/edamame.png"));

    let outcome = submit(&admin(), &d, &FormMode::Create, &store, &uploader).await.unwrap();
    assert_eq!(uploader.uploads().len(), 1);
    assert_eq!(store.record(outcome.id()).unwrap().image.as_deref(), Some(""));
    assert_eq!(store.get(outcome.id()).await.unwrap().unwrap().image, ImageRef::None);
}

#[tokio::test]
async fn edit_overwrites_and_uploads_new_image() {
    let store = MemoryStore::new();
    let uploader = MemoryUploader::new("https://cdn.test/menu");
    let ids = seed(&store, &[draft("Salads", "Caesar", "48")]).await;

    let item = store.get(&ids[0]).await.unwrap().unwrap();
    let mut edit = ItemDraft::from_item(&item);
    edit.price = "52".to_string();
    edit.image = ImageRef::Pending(PendingImage::new("/tmp/caesar.jpg"));
    submit(&admin(), &edit, &FormMode::Edit(ids[0].clone()), &store, &uploader)
        .await
        .unwrap();

    let item = store.get(&ids[0]).await.unwrap().unwrap();
    assert_eq!(item.price, 52.0);
    assert_eq!(item.image.url(), Some("https://cdn.test/menu/caesar.jpg"));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn home_rows_skip_empty_and_use_injected_shuffle() {
    let store = MemoryStore::new();
    seed(
        &store,
        &[
            draft("Sushi", "Nigiri", "40"),
            draft("Sushi", "Maki", "35"),
            draft("Cocktails", "Negroni", "60"),
        ],
    )
    .await;

    let mut reverse = |items: &mut [menubible_core::MenuItem]| items.reverse();
    let rows = load_home_rows(&store, &mut reverse).await.unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.spec.title).collect();
    assert_eq!(titles, vec!["Starters Collection", "Liquid Art"]);

    let names: Vec<&str> = rows[0].items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Maki", "Nigiri"]);
}

#[test]
fn session_gates_write_capability() {
    let gate = AdminGate::new(["admin"]);
    let mut session = Session::new();
    assert!(!session.login(&gate, "guest"));
    assert!(session.admin().is_none());
    assert!(session.login(&gate, "admin"));
    assert!(session.admin().is_some());
}
