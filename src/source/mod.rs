//! Image sources the fallback loader draws candidates from.
//!
//! The loader only decides *which* URL to attempt; a source performs the
//! attempt and reports success or failure.

pub mod http;

use async_trait::async_trait;

use crate::error::Result;

pub use http::HttpImageSource;

/// Something that can attempt to load an image from a candidate URL.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Load the image at `url`. Any `Err` counts as a failed attempt.
    async fn load(&self, url: &str) -> Result<()>;
}
