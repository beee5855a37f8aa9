use std::future::Future;
use std::sync::Mutex;

use crate::item::PendingImage;

/// Sends a local image to the asset host and returns its public URL.
pub trait AssetUploader: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn upload(&self, image: &PendingImage) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

#[derive(Debug, thiserror::Error)]
#[error("upload rejected: {0}")]
pub struct RejectedUpload(pub String);

/// Uploader that never leaves the process.
///
/// Returns `{base}/{file name}` and remembers what it was asked to upload.
/// With `failing()` every upload errors, which is how tests cover the
/// degrade-to-no-image path.
#[derive(Debug, Default)]
pub struct MemoryUploader {
    base_url: String,
    fail: bool,
    uploads: Mutex<Vec<PendingImage>>,
}

impl MemoryUploader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            fail: false,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<PendingImage> {
        self.uploads.lock().unwrap().clone()
    }
}

impl AssetUploader for MemoryUploader {
    type Error = RejectedUpload;

    async fn upload(&self, image: &PendingImage) -> Result<String, Self::Error> {
        self.uploads.lock().unwrap().push(image.clone());
        if self.fail {
            return Err(RejectedUpload(image.file_name()));
        }
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), image.file_name()))
    }
}
