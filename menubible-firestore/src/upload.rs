use menubible_core::{AssetUploader, PendingImage};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::UploadError;

const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Unsigned uploads to a Cloudinary upload preset.
pub struct CloudinaryUploader {
    http: reqwest::Client,
    cloud_name: String,
    upload_preset: String,
    base_url: String,
}

impl CloudinaryUploader {
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self::with_base_url(cloud_name, upload_preset, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        cloud_name: impl Into<String>,
        upload_preset: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
            base_url: base_url.into(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

impl AssetUploader for CloudinaryUploader {
    type Error = UploadError;

    #[instrument(skip(self, image), fields(file = %image.file_name()))]
    async fn upload(&self, image: &PendingImage) -> Result<String, Self::Error> {
        let bytes = tokio::fs::read(&image.path).await?;
        debug!(size = bytes.len(), "Uploading image");

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(image.file_name()))
            .text("upload_preset", self.upload_preset.clone());

        let response = self.http.post(self.upload_url()).multipart(form).send().await?;
        let status = response.status();
        let body: UploadResponse = response.json().await?;

        if !status.is_success() {
            return Err(UploadError::Api {
                status: status.as_u16(),
                message: body
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        let url = body.secure_url.ok_or(UploadError::MissingUrl)?;
        debug!(%url, "Upload complete");
        Ok(url)
    }
}
