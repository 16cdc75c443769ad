//! URL classification for content fetching.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://)?(www\.)?(youtube|youtu|youtube-nocookie)\.(com|be)/(watch\?v=|embed/|v/|.+\?v=)?([^&=%\?]{11})",
    )
    .expect("YOUTUBE_URL regex should compile")
});

static MEDIUM_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://medium\.com/").expect("MEDIUM_URL regex should compile"));

static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://github\.com/([^/?#]+)/([^/?#]+)").expect("GITHUB_URL regex should compile")
});

/// What kind of page a URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlKind {
    YouTube,
    Medium,
    GitHub { owner: String, repo: String },
    Generic,
}

impl UrlKind {
    /// Classify a URL. Patterns are tried in order: YouTube, Medium, GitHub.
    pub fn classify(url: &str) -> Self {
        if YOUTUBE_URL.is_match(url) {
            return UrlKind::YouTube;
        }
        if MEDIUM_URL.is_match(url) {
            return UrlKind::Medium;
        }
        if let Some(caps) = GITHUB_URL.captures(url) {
            return UrlKind::GitHub {
                owner: caps[1].to_string(),
                repo: caps[2].trim_end_matches(".git").to_string(),
            };
        }
        UrlKind::Generic
    }
}

impl fmt::Display for UrlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlKind::YouTube => write!(f, "youtube"),
            UrlKind::Medium => write!(f, "medium"),
            UrlKind::GitHub { owner, repo } => write!(f, "github ({}/{})", owner, repo),
            UrlKind::Generic => write!(f, "web page"),
        }
    }
}
