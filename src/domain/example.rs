//! Stored (inputs, outputs) example pairs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field map for example inputs/outputs.
pub type ExampleFields = BTreeMap<String, String>;

/// Input key under which fetched content is stored.
pub const CONTENT_KEY: &str = "content";

/// Output key under which the approved tweet is stored.
pub const TWEET_KEY: &str = "tweet";

/// A labeled example owned by an example store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub id: String,
    pub inputs: ExampleFields,
    pub outputs: ExampleFields,
    #[serde(default)]
    pub created_at: i64,
}

impl Example {
    /// Build the feedback-path example: fetched content in, approved tweet out.
    pub fn content_to_tweet(id: impl Into<String>, content: &str, tweet: &str, created_at: i64) -> Self {
        Self {
            id: id.into(),
            inputs: fields([(CONTENT_KEY, content)]),
            outputs: fields([(TWEET_KEY, tweet)]),
            created_at,
        }
    }

    /// All input values joined with newlines, in key order.
    pub fn input_text(&self) -> String {
        self.inputs.values().cloned().collect::<Vec<_>>().join("\n")
    }

    /// All output values joined with newlines, in key order.
    pub fn output_text(&self) -> String {
        self.outputs.values().cloned().collect::<Vec<_>>().join("\n")
    }

    /// The content input if present, otherwise every input value.
    pub fn prompt_input(&self) -> String {
        self.inputs
            .get(CONTENT_KEY)
            .cloned()
            .unwrap_or_else(|| self.input_text())
    }

    /// The tweet output if present, otherwise every output value.
    pub fn prompt_output(&self) -> String {
        self.outputs
            .get(TWEET_KEY)
            .cloned()
            .unwrap_or_else(|| self.output_text())
    }
}

/// Build a field map from pairs.
pub fn fields<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> ExampleFields {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
