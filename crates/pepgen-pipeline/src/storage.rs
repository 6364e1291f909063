//! Object-storage client for generated images.
//!
//! Uploads PNG bytes under the configured bucket and derives the public URL
//! from the upload path. Pointable at a mock server in tests.

use std::time::Duration;

use reqwest::{Client, Url};
use thiserror::Error;

/// Connection settings for [`StorageClient`].
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub base_url: String,
    pub bucket: String,
    pub service_key: String,
}

impl StorageConfig {
    /// Derive storage settings from the loaded application config.
    #[must_use]
    pub fn from_app_config(config: &pepgen_core::AppConfig) -> Self {
        Self {
            base_url: config.storage_base_url.clone(),
            bucket: config.storage_bucket.clone(),
            service_key: config.storage_service_key.clone(),
        }
    }
}

/// Errors returned by the object-storage client.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid storage URL: {0}")]
    InvalidUrl(String),
}

/// Client for the object-storage HTTP API.
#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    base_url: Url,
    bucket: String,
    service_key: String,
}

impl StorageClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StorageError::InvalidUrl`] if the base
    /// URL does not parse.
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pepgen/0.1 (content-generation)")
            .build()?;

        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| StorageError::InvalidUrl(format!("'{}': {e}", config.base_url)))?;

        Ok(Self {
            client,
            base_url,
            bucket: config.bucket.clone(),
            service_key: config.service_key.clone(),
        })
    }

    /// Upload PNG bytes to `object_path` within the bucket and return the
    /// public URL.
    ///
    /// Uploads are upserts: re-running with the same path overwrites rather
    /// than failing, which keeps retried runs idempotent on storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Api`] on a non-2xx response or
    /// [`StorageError::Http`] on network failure. Callers treat any upload
    /// failure like a generation failure: the image is omitted.
    pub async fn upload_png(
        &self,
        object_path: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let upload_url = self
            .endpoint(&format!("object/{}/{}", self.bucket, object_path))?;

        let response = self
            .client
            .post(upload_url)
            .bearer_auth(&self.service_key)
            .header("content-type", "image/png")
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let public = self.endpoint(&format!("object/public/{}/{}", self.bucket, object_path))?;
        Ok(public.to_string())
    }

    fn endpoint(&self, path: &str) -> Result<Url, StorageError> {
        self.base_url
            .join(path)
            .map_err(|e| StorageError::InvalidUrl(format!("'{path}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_is_derived_from_bucket_and_path() {
        let client = StorageClient::new(&StorageConfig {
            base_url: "https://store.example.com/storage/v1".to_owned(),
            bucket: "article-images".to_owned(),
            service_key: "svc".to_owned(),
        })
        .expect("client should build");

        let url = client
            .endpoint("object/public/article-images/articles/a-1.png")
            .expect("endpoint");
        assert_eq!(
            url.as_str(),
            "https://store.example.com/storage/v1/object/public/article-images/articles/a-1.png"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = StorageClient::new(&StorageConfig {
            base_url: "not a url".to_owned(),
            bucket: "b".to_owned(),
            service_key: "k".to_owned(),
        });
        assert!(matches!(result, Err(StorageError::InvalidUrl(_))));
    }
}
