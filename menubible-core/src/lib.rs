//! Domain model and screen logic for the restaurant menu bible.
//!
//! Core concepts:
//! - **MenuItem**: a dish or drink as the rest of the crate sees it, with legacy
//!   records already normalized
//! - **ItemStore**: async CRUD over the `menu-items` collection
//! - **AssetUploader**: turns a local image into a public URL
//! - **AdminCapability**: the token write operations require
//! - **Catalog**: the fixed category tree with its chips, copy and icons
//!
//! # Example
//!
//! ```
//! use menubible_core::{AdminGate, FormMode, ItemDraft, ItemStore, MemoryStore, MemoryUploader, submit};
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let store = MemoryStore::new();
//!     let uploader = MemoryUploader::new("https://cdn.example");
//!     let admin = AdminGate::new(["admin"]).unlock("admin").unwrap();
//!
//!     let mut draft = ItemDraft::new("Soups");
//!     draft.name = "Miso".to_string();
//!     draft.price = "28".to_string();
//!
//!     let outcome = submit(&admin, &draft, &FormMode::Create, &store, &uploader).await.unwrap();
//!     let item = store.get(outcome.id()).await.unwrap().unwrap();
//!     assert_eq!(item.price, 28.0);
//! });
//! ```

mod admin;
pub mod catalog;
mod error;
mod form;
pub mod icon;
mod item;
mod route;
mod search;
mod store;
pub mod theme;
mod upload;
pub mod view;

pub use admin::{AdminCapability, AdminGate, Session};
pub use error::{FilterError, FormError, MAX_IN_VALUES, SubmitError};
pub use form::{FormMode, ItemDraft, SubmitOutcome, delete, submit};
pub use icon::Icon;
pub use item::{
    Body, HOUSEPOURING, ImageRef, ItemId, ItemPayload, ItemRecord, LEGACY_TYPE_FALLBACK, MenuItem,
    PendingImage, StoredTypes,
};
pub use route::Route;
pub use search::{MAX_RESULTS, SearchMode, filter_items, search};
pub use store::{COLLECTION, ItemFilter, ItemStore, MemoryStore, SubCategorySet};
pub use theme::{Palette, Rgb, ThemeName, ThemeProvider};
pub use upload::{AssetUploader, MemoryUploader, RejectedUpload};
pub use view::{CategoryPage, HomeRow, ItemDetail, PriceDisplay, RandomShuffle, Shuffle, load_home_rows};
