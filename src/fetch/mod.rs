//! Content fetching: URL classification and text extraction.

pub mod html;
mod http;
mod kind;

use async_trait::async_trait;

use crate::domain::Content;
use crate::error::Result;

pub use http::{
    DEFAULT_MAX_CONTENT_CHARS, FetchConfig, HttpContentFetcher, RAW_GITHUB_BASE, normalize_url, youtube_summary,
};
pub use kind::UrlKind;

/// Turns a URL into text content.
///
/// An empty `Content` means nothing usable was found; transport failures
/// are errors.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Content>;
}
