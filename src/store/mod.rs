//! Example store: few-shot retrieval and feedback persistence.
//!
//! Two backends share the `ExampleStore` trait:
//! - **LocalExampleStore**: one append-only JSONL file per dataset
//! - **LangSmithStore**: the hosted dataset search/create API
//!
//! `MemoryExampleStore` keeps everything in a Vec and is meant for tests and
//! dry runs.

mod langsmith;
mod local;
mod memory;
mod similarity;

use async_trait::async_trait;

use crate::domain::{Example, ExampleFields};
use crate::error::{Result, TweetsmithError};

pub use langsmith::{DEFAULT_API_KEY_ENV as LANGSMITH_API_KEY_ENV, DEFAULT_API_URL as LANGSMITH_API_URL, LangSmithStore};
pub use local::LocalExampleStore;
pub use memory::MemoryExampleStore;
pub use similarity::{jaccard, rank_similar, tokenize};

/// Retrieval and persistence of labeled (inputs, outputs) examples.
#[async_trait]
pub trait ExampleStore: Send + Sync {
    /// Up to `limit` examples most similar to `query_inputs`, best first.
    async fn find_similar(&self, dataset_id: &str, query_inputs: &ExampleFields, limit: usize) -> Result<Vec<Example>>;

    /// Append an example and return it as stored.
    async fn record_example(&self, dataset_id: &str, inputs: ExampleFields, outputs: ExampleFields) -> Result<Example>;
}

/// Reject empty dataset ids.
pub fn validate_dataset_id(dataset_id: &str) -> Result<&str> {
    let trimmed = dataset_id.trim();
    if trimmed.is_empty() {
        return Err(TweetsmithError::invalid_input("dataset id is empty"));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_dataset_id() {
        assert_eq!(validate_dataset_id(" tweets ").unwrap(), "tweets");
        assert!(validate_dataset_id("").unwrap_err().is_invalid_input());
        assert!(validate_dataset_id("   ").unwrap_err().is_invalid_input());
    }
}
