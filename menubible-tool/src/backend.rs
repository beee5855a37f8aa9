use std::collections::BTreeMap;
use std::convert::Infallible;
use std::path::Path;

use menubible_core::{
    AdminGate, AssetUploader, ItemFilter, ItemId, ItemPayload, ItemRecord, ItemStore, MemoryStore,
    MemoryUploader, MenuItem, PendingImage, RejectedUpload, ThemeName,
};
use menubible_firestore::{CloudinaryUploader, FirestoreError, FirestoreStore, UploadError};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::config::Settings;
use crate::error::ToolError;

#[derive(Debug, Error)]
pub enum AnyStoreError {
    #[error("firestore error: {0}")]
    Firestore(#[from] FirestoreError),
}

impl From<Infallible> for AnyStoreError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

#[derive(Debug, Error)]
pub enum AnyUploadError {
    #[error("cloudinary error: {0}")]
    Cloudinary(#[from] UploadError),
    #[error(transparent)]
    Memory(#[from] RejectedUpload),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Firestore,
    Memory,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "firestore" => Ok(Backend::Firestore),
            "memory" | "offline" => Ok(Backend::Memory),
            _ => Err(format!("unknown backend: {}", s)),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Firestore => write!(f, "firestore"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

pub enum AnyStore {
    Firestore(FirestoreStore),
    Memory(MemoryStore),
}

impl AnyStore {
    /// Loads a JSON object of `{ id: record }` into a fresh memory store.
    pub fn memory_from_seed(path: impl AsRef<Path>) -> Result<Self, ToolError> {
        let content = std::fs::read_to_string(path)?;
        let records: BTreeMap<ItemId, ItemRecord> = serde_json::from_str(&content)?;
        let store = MemoryStore::new();
        for (id, record) in records {
            store.insert_record(id, record);
        }
        Ok(Self::Memory(store))
    }
}

impl ItemStore for AnyStore {
    type Error = AnyStoreError;

    async fn list(&self, filter: &ItemFilter, limit: Option<usize>) -> Result<Vec<MenuItem>, Self::Error> {
        match self {
            Self::Firestore(s) => Ok(s.list(filter, limit).await?),
            Self::Memory(s) => Ok(s.list(filter, limit).await?),
        }
    }

    async fn get(&self, id: &str) -> Result<Option<MenuItem>, Self::Error> {
        match self {
            Self::Firestore(s) => Ok(s.get(id).await?),
            Self::Memory(s) => Ok(s.get(id).await?),
        }
    }

    async fn create(&self, payload: &ItemPayload) -> Result<ItemId, Self::Error> {
        match self {
            Self::Firestore(s) => Ok(s.create(payload).await?),
            Self::Memory(s) => Ok(s.create(payload).await?),
        }
    }

    async fn update(&self, id: &str, payload: &ItemPayload) -> Result<(), Self::Error> {
        match self {
            Self::Firestore(s) => Ok(s.update(id, payload).await?),
            Self::Memory(s) => Ok(s.update(id, payload).await?),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), Self::Error> {
        match self {
            Self::Firestore(s) => Ok(s.delete(id).await?),
            Self::Memory(s) => Ok(s.delete(id).await?),
        }
    }
}

pub enum AnyUploader {
    Cloudinary(CloudinaryUploader),
    Memory(MemoryUploader),
}

impl AssetUploader for AnyUploader {
    type Error = AnyUploadError;

    async fn upload(&self, image: &PendingImage) -> Result<String, Self::Error> {
        match self {
            Self::Cloudinary(u) => Ok(u.upload(image).await?),
            Self::Memory(u) => Ok(u.upload(image).await?),
        }
    }
}

/// Everything a command needs: backends plus the session-independent settings.
pub struct AppContext {
    pub store: AnyStore,
    pub uploader: AnyUploader,
    pub gate: AdminGate,
    pub theme: ThemeName,
}

impl AppContext {
    pub fn open(settings: Settings) -> Result<Self, ToolError> {
        let (store, uploader) = match settings.backend {
            Backend::Firestore => {
                let project = settings.project_id.ok_or(ToolError::ProjectNotFound)?;
                info!(%project, "Using Firestore backend");
                let store = AnyStore::Firestore(FirestoreStore::new(project, settings.api_key));
                let uploader = AnyUploader::Cloudinary(CloudinaryUploader::new(
                    settings.cloud_name,
                    settings.upload_preset,
                ));
                (store, uploader)
            }
            Backend::Memory => {
                info!(seed = ?settings.seed, "Using in-memory backend");
                let store = match &settings.seed {
                    Some(path) => AnyStore::memory_from_seed(path)?,
                    None => AnyStore::Memory(MemoryStore::new()),
                };
                (store, AnyUploader::Memory(MemoryUploader::new("memory://images")))
            }
        };

        Ok(Self {
            store,
            uploader,
            gate: AdminGate::new(settings.passcodes),
            theme: settings.theme,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn backend_parsing() {
        assert_eq!("Firestore".parse::<Backend>(), Ok(Backend::Firestore));
        assert_eq!("offline".parse::<Backend>(), Ok(Backend::Memory));
        assert!("sqlite".parse::<Backend>().is_err());
    }

    #[tokio::test]
    async fn seed_file_loads_legacy_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"merlot": {{"name": "Merlot", "subCategory": "Wines", "type": "Red", "price": 240}}}}"#
        )
        .unwrap();

        let store = AnyStore::memory_from_seed(file.path()).unwrap();
        let item = store.get("merlot").await.unwrap().unwrap();
        assert_eq!(item.types, vec!["Red".to_string()]);
        assert_eq!(item.price, 240.0);
    }

    #[test]
    fn firestore_backend_needs_project() {
        let settings = Settings {
            project_id: None,
            ..Settings::default()
        };
        assert!(matches!(AppContext::open(settings), Err(ToolError::ProjectNotFound)));
    }
}
