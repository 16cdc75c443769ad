//! HTTP content fetcher.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use url::Url;

use super::ContentFetcher;
use super::html;
use super::kind::UrlKind;
use crate::domain::Content;
use crate::error::{Result, TweetsmithError};

pub const RAW_GITHUB_BASE: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_USER_AGENT: &str = concat!("tweetsmith/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 50_000;

const README_BRANCHES: [&str; 2] = ["main", "master"];
const README_FILES: [&str; 5] = ["README.md", "README.txt", "README", "Readme.md", "readme.md"];

/// Configuration for HttpContentFetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub max_content_chars: usize,
    /// Where raw README files are requested from
    pub raw_base_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            raw_base_url: RAW_GITHUB_BASE.to_string(),
        }
    }
}

/// Fetches and extracts text per `UrlKind`.
pub struct HttpContentFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpContentFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TweetsmithError::Fetch(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET a page body. An unreachable host, a non-2xx status or an unreadable
    /// body all mean there is no content to work from.
    async fn get_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TweetsmithError::ContentUnavailable(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TweetsmithError::ContentUnavailable(format!("GET {} returned {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| TweetsmithError::ContentUnavailable(format!("Failed to read body of {}: {}", url, e)))
    }

    async fn fetch_readme(&self, owner: &str, repo: &str) -> Result<String> {
        let base = self.config.raw_base_url.trim_end_matches('/');
        for branch in README_BRANCHES {
            for file in README_FILES {
                let raw_url = format!("{}/{}/{}/{}/{}", base, owner, repo, branch, file);
                match self.get_page(&raw_url).await {
                    Ok(text) => {
                        debug!("fetch: found README at {}", raw_url);
                        return Ok(text);
                    }
                    Err(e) => debug!("fetch: {}", e),
                }
            }
        }

        warn!("fetch: no README found for {}/{}", owner, repo);
        Ok(String::new())
    }

    async fn fetch_youtube(&self, url: &str) -> Result<String> {
        let page = self.get_page(url).await?;
        Ok(youtube_summary(&page))
    }

    async fn fetch_medium(&self, url: &str) -> Result<String> {
        let page = self.get_page(url).await?;
        Ok(html::extract_article_text(&page).unwrap_or_default())
    }
}

/// Parse a user-supplied URL, assuming https when no scheme is given.
pub fn normalize_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TweetsmithError::invalid_input("url is empty"));
    }
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| TweetsmithError::invalid_input(format!("invalid url '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TweetsmithError::invalid_input(format!("unsupported url scheme '{}'", other))),
    }
}

/// "Title: ..\n\nDescription: .." from a watch page's Open Graph tags.
pub fn youtube_summary(page: &str) -> String {
    let title = html::meta_content(page, "og:title");
    let description = html::meta_content(page, "og:description");
    if title.is_none() && description.is_none() {
        return String::new();
    }
    format!(
        "Title: {}\n\nDescription: {}",
        title.unwrap_or_default(),
        description.unwrap_or_default()
    )
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, url: &str) -> Result<Content> {
        let url = normalize_url(url)?;
        let url = url.as_str();

        let kind = UrlKind::classify(url);
        debug!("fetch: {} classified as {}", url, kind);

        let text = match &kind {
            UrlKind::YouTube => self.fetch_youtube(url).await?,
            UrlKind::Medium => self.fetch_medium(url).await?,
            UrlKind::GitHub { owner, repo } => self.fetch_readme(owner, repo).await?,
            UrlKind::Generic => html::extract_text(&self.get_page(url).await?),
        };

        let text = html::truncate_chars(text.trim(), self.config.max_content_chars);
        debug!("fetch: {} chars from {}", text.chars().count(), url);
        Ok(Content::new(url, text))
    }
}
