use std::collections::BTreeMap;
use std::convert::Infallible;
use std::future::Future;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::error::{FilterError, MAX_IN_VALUES};
use crate::item::{ItemId, ItemPayload, ItemRecord, MenuItem};

/// Name of the document collection holding menu items.
pub const COLLECTION: &str = "menu-items";

/// Sub-categories of an `in` filter. Holds 1 to [`MAX_IN_VALUES`] names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCategorySet(Vec<String>);

impl SubCategorySet {
    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }
}

/// Server-side filters the store can evaluate on `subCategory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemFilter {
    All,
    SubCategory(String),
    /// Only built through [`ItemFilter::sub_category_in`].
    SubCategoryIn(SubCategorySet),
}

impl ItemFilter {
    pub fn sub_category(name: impl Into<String>) -> Self {
        ItemFilter::SubCategory(name.into())
    }

    pub fn sub_category_in<I, S>(values: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(FilterError::Empty);
        }
        if values.len() > MAX_IN_VALUES {
            return Err(FilterError::TooManyValues(values.len()));
        }
        Ok(ItemFilter::SubCategoryIn(SubCategorySet(values)))
    }

    pub fn matches(&self, sub_category: Option<&str>) -> bool {
        match self {
            ItemFilter::All => true,
            ItemFilter::SubCategory(name) => sub_category == Some(name.as_str()),
            ItemFilter::SubCategoryIn(set) => sub_category.is_some_and(|s| set.contains(s)),
        }
    }
}

/// Async CRUD access to the `menu-items` collection.
///
/// Implementations normalize stored records into [`MenuItem`]s before
/// returning them, so callers never see the legacy `type` shape.
/// Writes are last-writer-wins; there is no concurrency control.
pub trait ItemStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Unordered items matching `filter`, at most `limit` of them.
    fn list(
        &self,
        filter: &ItemFilter,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<Vec<MenuItem>, Self::Error>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = Result<Option<MenuItem>, Self::Error>> + Send;

    /// Stores a new item, stamping `createdAt`. Returns the assigned id.
    fn create(&self, payload: &ItemPayload) -> impl Future<Output = Result<ItemId, Self::Error>> + Send;

    /// Replaces the whole document, stamping `updatedAt`.
    fn update(
        &self,
        id: &str,
        payload: &ItemPayload,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Removes the document. Missing ids are not an error.
    fn delete(&self, id: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl<S: ItemStore> ItemStore for &S {
    type Error = S::Error;

    async fn list(&self, filter: &ItemFilter, limit: Option<usize>) -> Result<Vec<MenuItem>, Self::Error> {
        (*self).list(filter, limit).await
    }

    async fn get(&self, id: &str) -> Result<Option<MenuItem>, Self::Error> {
        (*self).get(id).await
    }

    async fn create(&self, payload: &ItemPayload) -> Result<ItemId, Self::Error> {
        (*self).create(payload).await
    }

    async fn update(&self, id: &str, payload: &ItemPayload) -> Result<(), Self::Error> {
        (*self).update(id, payload).await
    }

    async fn delete(&self, id: &str) -> Result<(), Self::Error> {
        (*self).delete(id).await
    }
}

/// An in-memory store keeping raw records.
///
/// Useful for testing and offline demos. Records can be seeded in their
/// stored shape to exercise the legacy read path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<ItemId, ItemRecord>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record as-is, bypassing timestamps.
    pub fn insert_record(&self, id: impl Into<ItemId>, record: ItemRecord) {
        self.records.write().unwrap().insert(id.into(), record);
    }

    pub fn record(&self, id: &str) -> Option<ItemRecord> {
        self.records.read().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn allocate_id(&self) -> ItemId {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("item-{:04}", n + 1)
    }
}

impl ItemStore for MemoryStore {
    type Error = Infallible;

    async fn list(&self, filter: &ItemFilter, limit: Option<usize>) -> Result<Vec<MenuItem>, Self::Error> {
        let records = self.records.read().unwrap();
        Ok(records
            .iter()
            .filter(|(_, r)| filter.matches(r.sub_category.as_deref()))
            .take(limit.unwrap_or(usize::MAX))
            .map(|(id, r)| r.clone().into_item(id.clone()))
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<MenuItem>, Self::Error> {
        let records = self.records.read().unwrap();
        Ok(records.get(id).map(|r| r.clone().into_item(id)))
    }

    async fn create(&self, payload: &ItemPayload) -> Result<ItemId, Self::Error> {
        let now = Utc::now();
        let mut records = self.records.write().unwrap();
        let mut id = self.allocate_id();
        while records.contains_key(&id) {
            id = self.allocate_id();
        }
        records.insert(id.clone(), ItemRecord::from_payload(payload, Some(now), now));
        Ok(id)
    }

    async fn update(&self, id: &str, payload: &ItemPayload) -> Result<(), Self::Error> {
        let mut records = self.records.write().unwrap();
        let created_at = records.get(id).and_then(|r| r.created_at);
        records.insert(
            id.to_string(),
            ItemRecord::from_payload(payload, created_at, Utc::now()),
        );
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), Self::Error> {
        self.records.write().unwrap().remove(id);
        Ok(())
    }
}
