use chrono::Utc;
use menubible_core::{COLLECTION, ItemFilter, ItemId, ItemPayload, ItemRecord, ItemStore, MenuItem};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::convert::{
    build_query, decode_document, document_id, encode_fields, parse_list_page, parse_query_response,
    update_mask,
};
use crate::error::FirestoreError;

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: usize = 100;

/// Item store backed by the Cloud Firestore REST API.
pub struct FirestoreStore {
    http: reqwest::Client,
    project_id: String,
    api_key: Option<String>,
    base_url: String,
}

/// Reads a response body, turning non-success statuses into [`FirestoreError::Api`].
async fn read_json(response: Response) -> Result<Value, FirestoreError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| {
                body.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| if text.is_empty() { "Unknown error".to_string() } else { text });
        return Err(FirestoreError::Api {
            status: status.as_u16(),
            message,
        });
    }

    if text.trim().is_empty() {
        return Ok(json!({}));
    }
    Ok(serde_json::from_str(&text)?)
}

impl FirestoreStore {
    /// Creates a store for the given project. The API key is optional.
    pub fn new(project_id: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_base_url(project_id, api_key, DEFAULT_BASE_URL)
    }

    /// Creates a store against a custom endpoint, such as the local emulator.
    pub fn with_base_url(
        project_id: impl Into<String>,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            project_id: project_id.into(),
            api_key,
            base_url: base_url.into(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url.trim_end_matches('/'),
            self.project_id
        )
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.documents_url(), COLLECTION)
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.api_key {
            Some(key) => builder.query(&[("key", key)]),
            None => builder,
        }
    }

    async fn list_all(&self, limit: Option<usize>) -> Result<Vec<MenuItem>, FirestoreError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let remaining = limit.map_or(PAGE_SIZE, |l| l.saturating_sub(items.len()));
            if remaining == 0 {
                break;
            }
            let mut builder = self
                .request(Method::GET, self.collection_url())
                .query(&[("pageSize", remaining.min(PAGE_SIZE).to_string())]);
            if let Some(token) = &page_token {
                builder = builder.query(&[("pageToken", token)]);
            }

            let body = read_json(builder.send().await?).await?;
            let (docs, next) = parse_list_page(&body);
            debug!(count = docs.len(), "Fetched page");
            items.extend(docs.into_iter().map(|(id, record)| record.into_item(id)));

            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        if let Some(limit) = limit {
            items.truncate(limit);
        }
        Ok(items)
    }

    async fn run_query(
        &self,
        filter: &ItemFilter,
        limit: Option<usize>,
    ) -> Result<Vec<MenuItem>, FirestoreError> {
        let body = build_query(filter, limit);
        let response = self
            .request(Method::POST, format!("{}:runQuery", self.documents_url()))
            .json(&body)
            .send()
            .await?;

        let docs = parse_query_response(&read_json(response).await?)?;
        Ok(docs.into_iter().map(|(id, record)| record.into_item(id)).collect())
    }
}

impl ItemStore for FirestoreStore {
    type Error = FirestoreError;

    #[instrument(skip(self), fields(project = %self.project_id))]
    async fn list(&self, filter: &ItemFilter, limit: Option<usize>) -> Result<Vec<MenuItem>, Self::Error> {
        let items = match filter {
            ItemFilter::All => self.list_all(limit).await?,
            _ => self.run_query(filter, limit).await?,
        };
        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    #[instrument(skip(self), fields(project = %self.project_id))]
    async fn get(&self, id: &str) -> Result<Option<MenuItem>, Self::Error> {
        let response = self.request(Method::GET, self.document_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Item not found");
            return Ok(None);
        }
        let (id, record) = decode_document(&read_json(response).await?)?;
        Ok(Some(record.into_item(id)))
    }

    #[instrument(skip(self, payload), fields(project = %self.project_id, name = %payload.name))]
    async fn create(&self, payload: &ItemPayload) -> Result<ItemId, Self::Error> {
        let now = Utc::now();
        let fields = encode_fields(&ItemRecord::from_payload(payload, Some(now), now))?;

        let response = self
            .request(Method::POST, self.collection_url())
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        let body = read_json(response).await?;
        let name = body
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| FirestoreError::Decode("created document has no name".to_string()))?;
        let id = document_id(name).to_string();
        debug!(%id, "Created document");
        Ok(id)
    }

    /// Overwrites every item field. `createdAt` is outside the update mask, so
    /// the stored creation time survives.
    #[instrument(skip(self, payload), fields(project = %self.project_id))]
    async fn update(&self, id: &str, payload: &ItemPayload) -> Result<(), Self::Error> {
        let fields = encode_fields(&ItemRecord::from_payload(payload, None, Utc::now()))?;
        let mask: Vec<(&str, String)> = update_mask(&fields)
            .into_iter()
            .map(|path| ("updateMask.fieldPaths", path))
            .collect();

        let response = self
            .request(Method::PATCH, self.document_url(id))
            .query(&mask)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        read_json(response).await?;
        debug!("Updated document");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.project_id))]
    async fn delete(&self, id: &str) -> Result<(), Self::Error> {
        let response = self.request(Method::DELETE, self.document_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Item already gone");
            return Ok(());
        }
        read_json(response).await?;
        debug!("Deleted document");
        Ok(())
    }
}
