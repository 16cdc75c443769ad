//! JSONL-backed example store with an in-memory cache.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use log::{debug, warn};

use super::{ExampleStore, rank_similar, validate_dataset_id};
use crate::domain::{Example, ExampleFields};
use crate::error::{Result, TweetsmithError};
use crate::id::{generate_example_id, now_ms};

/// One `<dataset>.jsonl` file per dataset under `base_path`. Append-only.
pub struct LocalExampleStore {
    base_path: PathBuf,
    cache: RwLock<HashMap<String, Vec<Example>>>,
}

impl LocalExampleStore {
    /// Create a new LocalExampleStore at the given path.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn dataset_path(&self, dataset_id: &str) -> Result<PathBuf> {
        if !dataset_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            || dataset_id.starts_with('.')
        {
            return Err(TweetsmithError::invalid_input(format!(
                "dataset id '{}' is not a valid file name",
                dataset_id
            )));
        }
        Ok(self.base_path.join(format!("{}.jsonl", dataset_id)))
    }

    /// Load a dataset into cache if not already loaded.
    fn ensure_loaded(&self, dataset_id: &str) -> Result<()> {
        {
            let cache = self.cache.read().map_err(|e| TweetsmithError::Store(e.to_string()))?;
            if cache.contains_key(dataset_id) {
                return Ok(());
            }
        }

        let mut cache = self.cache.write().map_err(|e| TweetsmithError::Store(e.to_string()))?;
        if cache.contains_key(dataset_id) {
            return Ok(());
        }

        let path = self.dataset_path(dataset_id)?;
        let mut examples = Vec::new();
        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            for (lineno, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<Example>(&line) {
                    Ok(example) => examples.push(example),
                    Err(e) => warn!("store: skipping {}:{}: {}", path.display(), lineno + 1, e),
                }
            }
        }

        debug!("store: loaded {} examples for '{}'", examples.len(), dataset_id);
        cache.insert(dataset_id.to_string(), examples);
        Ok(())
    }

    fn append_to_file(&self, dataset_id: &str, example: &Example) -> Result<()> {
        let path = self.dataset_path(dataset_id)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", serde_json::to_string(example)?)?;
        Ok(())
    }
}

#[async_trait]
impl ExampleStore for LocalExampleStore {
    async fn find_similar(&self, dataset_id: &str, query_inputs: &ExampleFields, limit: usize) -> Result<Vec<Example>> {
        let dataset_id = validate_dataset_id(dataset_id)?;
        self.ensure_loaded(dataset_id)?;

        let cache = self.cache.read().map_err(|e| TweetsmithError::Store(e.to_string()))?;
        Ok(cache
            .get(dataset_id)
            .map(|examples| rank_similar(examples, query_inputs, limit))
            .unwrap_or_default())
    }

    async fn record_example(&self, dataset_id: &str, inputs: ExampleFields, outputs: ExampleFields) -> Result<Example> {
        let dataset_id = validate_dataset_id(dataset_id)?;
        self.ensure_loaded(dataset_id)?;

        let example = Example {
            id: generate_example_id(&format!("{:?}{:?}", inputs, outputs)),
            inputs,
            outputs,
            created_at: now_ms(),
        };

        // File first, then cache
        self.append_to_file(dataset_id, &example)?;
        let mut cache = self.cache.write().map_err(|e| TweetsmithError::Store(e.to_string()))?;
        cache.entry(dataset_id.to_string()).or_default().push(example.clone());

        debug!("store: recorded {} in '{}'", example.id, dataset_id);
        Ok(example)
    }
}
