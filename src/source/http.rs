// src/source/http.rs

//! HTTP(S) image source with local asset support.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::source::ImageSource;

/// Loads remote candidates over HTTP and bundled assets from disk.
#[derive(Clone)]
pub struct HttpImageSource {
    client: Client,
    asset_root: PathBuf,
}

impl HttpImageSource {
    /// Create a source; non-URL candidates resolve against `asset_root`.
    pub fn new(client: Client, asset_root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            asset_root: asset_root.into(),
        }
    }

    async fn load_remote(&self, url: &str) -> Result<()> {
        let parsed = Url::parse(url)?;
        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http_status(url, status));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::image_load(
                url,
                format!("not an image (content type {content_type:?})"),
            ));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(AppError::image_load(url, "empty body"));
        }
        Ok(())
    }

    async fn load_local(&self, path: &str) -> Result<()> {
        let full = self
            .asset_root
            .join(path.strip_prefix("file://").unwrap_or(path));
        let meta = tokio::fs::metadata(&full).await?;
        if !meta.is_file() || meta.len() == 0 {
            return Err(AppError::image_load(path, "asset is not a readable file"));
        }
        Ok(())
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn load(&self, url: &str) -> Result<()> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.load_remote(url).await
        } else {
            self.load_local(url).await
        }
    }
}
