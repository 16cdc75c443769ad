//! Core LLM client trait and a scripted mock for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Result, TweetsmithError};
use crate::llm::types::{CompletionRequest, CompletionResponse};

/// Stateless LLM client - each call is independent
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Model identifier used when a request does not name one
    fn model(&self) -> &str;

    /// Whether the client has what it needs to make calls
    fn is_ready(&self) -> bool;
}

/// A canned reply for `MockLlmClient`.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Structured(Value),
    Fail(String),
}

impl MockReply {
    fn into_response(self) -> Result<CompletionResponse> {
        match self {
            MockReply::Text(text) => Ok(CompletionResponse::text(text)),
            MockReply::Structured(value) => Ok(CompletionResponse::structured(value)),
            MockReply::Fail(message) => Err(TweetsmithError::ModelCall(message)),
        }
    }
}

/// Mock client that replays queued replies and records every request.
///
/// Once the queue is drained the fallback reply is used; with no fallback the
/// call fails with `ModelCall`.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    replies: Mutex<VecDeque<MockReply>>,
    fallback: Option<MockReply>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text reply
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_reply(MockReply::Text(text.into()))
    }

    /// Queue a structured reply
    pub fn with_structured(self, value: Value) -> Self {
        self.with_reply(MockReply::Structured(value))
    }

    /// Queue a failure
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.with_reply(MockReply::Fail(message.into()))
    }

    /// Queue any reply
    pub fn with_reply(self, reply: MockReply) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
        self
    }

    /// Reply used after the queue runs dry
    pub fn with_fallback(mut self, reply: MockReply) -> Self {
        self.fallback = Some(reply);
        self
    }

    /// Every request seen so far, in call order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of calls made
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests
            .lock()
            .map_err(|e| TweetsmithError::ModelCall(e.to_string()))?
            .push(request);

        let next = self
            .replies
            .lock()
            .map_err(|e| TweetsmithError::ModelCall(e.to_string()))?
            .pop_front()
            .or_else(|| self.fallback.clone());

        match next {
            Some(reply) => reply.into_response(),
            None => Err(TweetsmithError::ModelCall("mock reply queue exhausted".to_string())),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        true
    }
}
