//! ID generation utilities for Tweetsmith
//!
//! Example ids are derived from the example's content plus the time it was
//! recorded, so the same (input, output) pair recorded twice gets two ids.

use sha2::{Digest, Sha256};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Short hex digest of arbitrary text
///
/// Format: first 12 hex chars of SHA-256
pub fn short_digest(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(digest)[..12].to_string()
}

/// Generate an example ID
///
/// Format: `ex-{timestamp_ms}-{digest}`
/// Example: `ex-1738300800123-3f2a9c0d11b4`
pub fn generate_example_id(seed: &str) -> String {
    let timestamp = now_ms();
    format!("ex-{}-{}", timestamp, short_digest(&format!("{}:{}", timestamp, seed)))
}
