//! In-memory example store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{ExampleStore, rank_similar, validate_dataset_id};
use crate::domain::{Example, ExampleFields};
use crate::error::{Result, TweetsmithError};
use crate::id::{generate_example_id, now_ms};

#[derive(Debug, Default)]
pub struct MemoryExampleStore {
    datasets: RwLock<HashMap<String, Vec<Example>>>,
}

impl MemoryExampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a dataset with existing examples.
    pub fn with_examples(self, dataset_id: &str, examples: Vec<Example>) -> Self {
        if let Ok(mut datasets) = self.datasets.write() {
            datasets.entry(dataset_id.to_string()).or_default().extend(examples);
        }
        self
    }

    /// Every example in a dataset, in insertion order.
    pub fn examples(&self, dataset_id: &str) -> Vec<Example> {
        self.datasets
            .read()
            .map(|d| d.get(dataset_id).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ExampleStore for MemoryExampleStore {
    async fn find_similar(&self, dataset_id: &str, query_inputs: &ExampleFields, limit: usize) -> Result<Vec<Example>> {
        let dataset_id = validate_dataset_id(dataset_id)?;
        let datasets = self.datasets.read().map_err(|e| TweetsmithError::Store(e.to_string()))?;
        Ok(datasets
            .get(dataset_id)
            .map(|examples| rank_similar(examples, query_inputs, limit))
            .unwrap_or_default())
    }

    async fn record_example(&self, dataset_id: &str, inputs: ExampleFields, outputs: ExampleFields) -> Result<Example> {
        let dataset_id = validate_dataset_id(dataset_id)?;
        let example = Example {
            id: generate_example_id(&format!("{:?}{:?}", inputs, outputs)),
            inputs,
            outputs,
            created_at: now_ms(),
        };

        let mut datasets = self.datasets.write().map_err(|e| TweetsmithError::Store(e.to_string()))?;
        datasets.entry(dataset_id.to_string()).or_default().push(example.clone());
        Ok(example)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields;

    #[tokio::test]
    async fn test_record_then_find() {
        let store = MemoryExampleStore::new();
        let stored = store
            .record_example("tweets", fields([("content", "langgraph release")]), fields([("tweet", "out now!")]))
            .await
            .unwrap();
        assert!(stored.id.starts_with("ex-"));

        let found = store
            .find_similar("tweets", &fields([("content", "langgraph")]), 5)
            .await
            .unwrap();
        assert_eq!(found, vec![stored]);
        assert!(store.find_similar("other", &fields([]), 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_dataset_id() {
        let store = MemoryExampleStore::new();
        let err = store.find_similar("", &fields([]), 5).await.unwrap_err();
        assert!(err.is_invalid_input());
    }
}
