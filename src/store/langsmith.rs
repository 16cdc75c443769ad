//! LangSmith dataset client.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{ExampleStore, validate_dataset_id};
use crate::domain::{Example, ExampleFields};
use crate::error::{Result, TweetsmithError};
use crate::id::now_ms;

pub const DEFAULT_API_URL: &str = "https://api.smith.langchain.com/api/v1";
pub const DEFAULT_API_KEY_ENV: &str = "LANGSMITH_API_KEY";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    examples: Vec<RemoteExample>,
}

#[derive(Debug, Deserialize)]
struct RemoteExample {
    #[serde(default)]
    id: String,
    #[serde(default)]
    inputs: Map<String, Value>,
    #[serde(default)]
    outputs: Option<Map<String, Value>>,
    #[serde(default)]
    created_at: Option<String>,
}

impl RemoteExample {
    fn into_example(self) -> Example {
        let created_at = self
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_default();
        Example {
            id: self.id,
            inputs: flatten(self.inputs),
            outputs: flatten(self.outputs.unwrap_or_default()),
            created_at,
        }
    }
}

/// Non-string values are kept as their JSON text.
fn flatten(map: Map<String, Value>) -> ExampleFields {
    map.into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect()
}

fn parse_timestamp(raw: &str) -> Option<i64> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    // The API also emits naive UTC timestamps
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Remote example store backed by LangSmith datasets.
pub struct LangSmithStore {
    client: Client,
    api_url: String,
    api_key: String,
}

impl std::fmt::Debug for LangSmithStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LangSmithStore")
            .field("api_url", &self.api_url)
            .field("api_key", &"[redacted]")
            .finish()
    }
}

impl LangSmithStore {
    /// Read the API key from `api_key_env`.
    pub fn from_env(api_key_env: &str, api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = std::env::var(api_key_env)
            .map_err(|_| TweetsmithError::Store(format!("{} not set", api_key_env)))?;
        Self::with_api_key(api_key, api_url, timeout)
    }

    pub fn with_api_key(api_key: impl Into<String>, api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TweetsmithError::Store(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| TweetsmithError::Store(format!("POST {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TweetsmithError::Store(format!("LangSmith API error {}: {}", status, error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| TweetsmithError::Store(format!("Failed to parse LangSmith response: {}", e)))
    }
}

#[async_trait]
impl ExampleStore for LangSmithStore {
    async fn find_similar(&self, dataset_id: &str, query_inputs: &ExampleFields, limit: usize) -> Result<Vec<Example>> {
        let dataset_id = validate_dataset_id(dataset_id)?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let body = json!({ "inputs": query_inputs, "limit": limit, "debug": false });
        let value = self.post(&format!("/datasets/{}/search", dataset_id), &body).await?;
        let response: SearchResponse = serde_json::from_value(value)
            .map_err(|e| TweetsmithError::Store(format!("Unexpected search response: {}", e)))?;

        debug!("store: {} similar examples from '{}'", response.examples.len(), dataset_id);
        Ok(response
            .examples
            .into_iter()
            .take(limit)
            .map(RemoteExample::into_example)
            .collect())
    }

    async fn record_example(&self, dataset_id: &str, inputs: ExampleFields, outputs: ExampleFields) -> Result<Example> {
        let dataset_id = validate_dataset_id(dataset_id)?;
        let body = json!({ "dataset_id": dataset_id, "inputs": inputs, "outputs": outputs });
        let value = self.post("/examples", &body).await?;

        let id = value.get("id").and_then(Value::as_str).unwrap_or_default().to_string();
        let created_at = value
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
            .unwrap_or_else(now_ms);

        debug!("store: recorded {} in '{}'", id, dataset_id);
        Ok(Example {
            id,
            inputs,
            outputs,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> LangSmithStore {
        LangSmithStore::with_api_key("ls-key", server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_find_similar() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/datasets/ds-1/search"))
            .and(header("x-api-key", "ls-key"))
            .and(body_json(json!({
                "inputs": { "content": "LangGraph 1.0" },
                "limit": 2,
                "debug": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "examples": [
                    {
                        "id": "e1",
                        "inputs": { "content": "LangGraph 0.2" },
                        "outputs": { "tweet": "0.2 is out! 🚀" },
                        "created_at": "2024-06-01T12:00:00.000000"
                    },
                    {
                        "id": "e2",
                        "inputs": { "content": "Studio", "score": 3 },
                        "outputs": null
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let found = store(&server)
            .find_similar("ds-1", &fields([("content", "LangGraph 1.0")]), 2)
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].prompt_output(), "0.2 is out! 🚀");
        assert!(found[0].created_at > 0);
        assert_eq!(found[1].inputs.get("score").map(String::as_str), Some("3"));
        assert!(found[1].outputs.is_empty());
    }

    #[tokio::test]
    async fn test_record_example() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/examples"))
            .and(body_json(json!({
                "dataset_id": "ds-1",
                "inputs": { "content": "article" },
                "outputs": { "tweet": "edited tweet" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "new-id",
                "created_at": "2024-06-01T12:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let example = store(&server)
            .record_example("ds-1", fields([("content", "article")]), fields([("tweet", "edited tweet")]))
            .await
            .unwrap();
        assert_eq!(example.id, "new-id");
        assert_eq!(example.created_at, 1_717_243_200_000);
    }

    #[tokio::test]
    async fn test_error_status_is_store_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = store(&server)
            .find_similar("ds-1", &fields([("content", "x")]), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, TweetsmithError::Store(ref m) if m.contains("403")));
    }

    #[tokio::test]
    async fn test_no_request_for_bad_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = store(&server);
        assert!(store.find_similar(" ", &fields([]), 3).await.unwrap_err().is_invalid_input());
        assert!(store.find_similar("ds", &fields([]), 0).await.unwrap().is_empty());
    }

    #[test]
    fn test_debug_hides_key() {
        let store = LangSmithStore::with_api_key("secret", DEFAULT_API_URL, Duration::from_secs(1)).unwrap();
        assert!(!format!("{:?}", store).contains("secret"));
    }
}
