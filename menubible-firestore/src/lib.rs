//! Remote backends for the menu bible.
//!
//! [`FirestoreStore`] implements [`menubible_core::ItemStore`] over the Cloud
//! Firestore REST API, and [`CloudinaryUploader`] implements
//! [`menubible_core::AssetUploader`] with unsigned preset uploads.
//!
//! # Example
//!
//! ```ignore
//! use menubible_core::{ItemFilter, ItemStore};
//! use menubible_firestore::FirestoreStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = FirestoreStore::new("eauzone-bible", None);
//!     let wines = store.list(&ItemFilter::sub_category("Wines"), None).await.unwrap();
//!     for wine in wines {
//!         println!("{}", wine.name);
//!     }
//! }
//! ```

mod client;
mod convert;
mod error;
mod upload;

pub use client::FirestoreStore;
pub use convert::{build_query, decode_document, encode_fields};
pub use error::{FirestoreError, UploadError};
pub use upload::CloudinaryUploader;
