//! ImgBB image host client.
//!
//! Product and category images are not stored in the document store; they go
//! to ImgBB and only the hosted URL is persisted. The upload endpoint takes a
//! multipart form with the binary image and the API key as a query parameter,
//! and answers with either `{"success": true, "data": {"url": ...}}` or
//! `{"error": {"message": ...}}`.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ImgbbConfig;

/// Errors that can occur while uploading an image.
///
/// Any of these aborts the form submission that staged the file; nothing is
/// saved to the document store on upload failure.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The HTTP request itself failed.
    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The host answered but rejected the upload.
    #[error("image host rejected upload: {0}")]
    Rejected(String),

    /// The host reported success but returned an unusable URL.
    #[error("image host returned invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// An external host that accepts image bytes and returns a hosted URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload an image and return its hosted URL.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<Url, UploadError>;
}

/// ImgBB API client.
#[derive(Clone)]
pub struct ImgbbClient {
    inner: Arc<ImgbbClientInner>,
}

struct ImgbbClientInner {
    client: reqwest::Client,
    config: ImgbbConfig,
}

#[derive(Debug, Deserialize)]
struct ImgbbResponse {
    #[serde(default)]
    success: bool,
    data: Option<ImgbbData>,
    error: Option<ImgbbError>,
}

#[derive(Debug, Deserialize)]
struct ImgbbData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ImgbbError {
    message: String,
}

impl ImgbbClient {
    /// Create a new ImgBB client.
    #[must_use]
    pub fn new(config: ImgbbConfig) -> Self {
        Self {
            inner: Arc::new(ImgbbClientInner {
                client: reqwest::Client::new(),
                config,
            }),
        }
    }
}

#[async_trait]
impl ImageHost for ImgbbClient {
    #[instrument(skip(self, bytes), fields(file_name = %file_name, size = bytes.len()))]
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<Url, UploadError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .inner
            .client
            .post(&self.inner.config.upload_url)
            .query(&[("key", self.inner.config.api_key.expose_secret())])
            .multipart(form)
            .send()
            .await?;

        let body: ImgbbResponse = response.json().await?;

        if body.success {
            let raw = body
                .data
                .map(|d| d.url)
                .ok_or_else(|| UploadError::Rejected("success without url".to_owned()))?;
            let url = Url::parse(&raw)?;
            tracing::info!(url = %url, "image uploaded");
            Ok(url)
        } else {
            let message = body
                .error
                .map_or_else(|| "image upload failed".to_owned(), |e| e.message);
            tracing::error!(error = %message, "image upload rejected");
            Err(UploadError::Rejected(message))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_parses() {
        let body: ImgbbResponse = serde_json::from_str(
            r#"{"success": true, "data": {"url": "https://i.ibb.co/abc/x.jpg", "id": "abc"}}"#,
        )
        .unwrap();
        assert!(body.success);
        assert_eq!(body.data.unwrap().url, "https://i.ibb.co/abc/x.jpg");
    }

    #[test]
    fn test_error_response_parses() {
        let body: ImgbbResponse =
            serde_json::from_str(r#"{"error": {"message": "Invalid API key"}}"#).unwrap();
        assert!(!body.success);
        assert_eq!(body.error.unwrap().message, "Invalid API key");
    }

    #[test]
    fn test_upload_error_display() {
        let err = UploadError::Rejected("Invalid API key".to_owned());
        assert_eq!(
            err.to_string(),
            "image host rejected upload: Invalid API key"
        );
    }
}
