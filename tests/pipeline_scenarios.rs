//! End-to-end pipeline runs against a scripted model client.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tweetsmith::domain::{Content, Example, ExampleFields, LoopOutcome};
use tweetsmith::error::{Result, TweetsmithError};
use tweetsmith::fetch::ContentFetcher;
use tweetsmith::llm::{MockLlmClient, MockReply, Role};
use tweetsmith::pipeline::{PipelineBuilder, PipelineMode};
use tweetsmith::store::{ExampleStore, MemoryExampleStore};

const ARTICLE: &str = "LangGraph 1.0 ships a new persistence API";
const FACT: &str = "LangGraph 1.0 adds persistence API";

/// Returns the same text for every URL.
struct StaticFetcher {
    text: String,
    calls: AtomicU32,
}

impl StaticFetcher {
    fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Content> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Content::new(url, self.text.clone()))
    }
}

fn facts_reply() -> MockReply {
    MockReply::Structured(json!({ "status": "facts", "facts": [FACT] }))
}

fn miss() -> MockReply {
    MockReply::Structured(json!({ "matches_style": false, "feedback": "add an emoji" }))
}

fn matched() -> MockReply {
    MockReply::Structured(json!({ "matches_style": true }))
}

#[tokio::test]
async fn scenario_first_draft_matches() {
    let mock = Arc::new(
        MockLlmClient::new()
            .with_reply(facts_reply())
            .with_text("LangGraph 1.0 adds a persistence API! 💾")
            .with_reply(matched()),
    );
    let pipeline = PipelineBuilder::new(mock.clone(), StaticFetcher::new(ARTICLE))
        .mode(PipelineMode::FactBased)
        .build()
        .unwrap();

    let output = pipeline.run("https://blog.langchain.dev/langgraph-1-0").await.unwrap();

    assert_eq!(output.tweet, "LangGraph 1.0 adds a persistence API! 💾");
    assert_eq!(output.attempts, 1);
    assert_eq!(output.outcome, LoopOutcome::StyleMatched);
    assert_eq!(output.facts, Some(vec![FACT.to_string()]));
    assert_eq!(output.content, ARTICLE);
    // extract, compose, critique
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn scenario_critic_never_satisfied() {
    let mut mock = MockLlmClient::new()
        .with_reply(facts_reply())
        .with_text("draft 1");
    for n in 2..=5 {
        mock = mock.with_reply(miss()).with_text(format!("draft {}", n));
    }
    let mock = Arc::new(mock.with_reply(miss()));

    let pipeline = PipelineBuilder::new(mock.clone(), StaticFetcher::new(ARTICLE))
        .max_attempts(4)
        .build()
        .unwrap();
    let output = pipeline.run("https://blog.langchain.dev/x").await.unwrap();

    assert_eq!(output.outcome, LoopOutcome::AttemptLimitReached);
    assert_eq!(output.attempts, 5);
    assert_eq!(output.tweet, "draft 5");
    // extract + compose + 5 critiques + 4 revisions
    assert_eq!(mock.call_count(), 11);

    let revisions: Vec<_> = mock
        .requests()
        .into_iter()
        .filter(|r| r.output_schema.is_none())
        .filter(|r| r.last_user_message().is_some_and(|m| m.contains("What to change")))
        .collect();
    assert_eq!(revisions.len(), 4);
    assert!(revisions[0].last_user_message().unwrap().contains("What to change: add an emoji"));
    assert!(revisions[0].last_user_message().unwrap().contains("Tweet: draft 1"));
}

#[tokio::test]
async fn scenario_empty_content_never_reaches_the_model() {
    let mock = Arc::new(MockLlmClient::new().with_fallback(facts_reply()));
    let fetcher = StaticFetcher::new("   ");
    let pipeline = PipelineBuilder::new(mock.clone(), fetcher.clone()).build().unwrap();

    let err = pipeline.run("https://github.com/o/empty").await.unwrap_err();

    assert!(err.is_content_unavailable());
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn insufficient_information_stops_before_composing() {
    let mock = Arc::new(
        MockLlmClient::new()
            .with_structured(json!({ "status": "insufficient_information" }))
            .with_fallback(MockReply::Text("should not be used".into())),
    );
    let pipeline = PipelineBuilder::new(mock.clone(), StaticFetcher::new("Cookie banner"))
        .build()
        .unwrap();

    let err = pipeline.run("https://example.com").await.unwrap_err();
    assert!(err.is_invalid_input());
    assert!(err.to_string().contains("insufficient information"));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn raw_article_mode_skips_extraction() {
    let mock = Arc::new(MockLlmClient::new().with_text("Persistence in LangGraph 1.0! 🎉").with_reply(matched()));
    let pipeline = PipelineBuilder::new(mock.clone(), StaticFetcher::new(ARTICLE))
        .mode(PipelineMode::RawArticle)
        .build()
        .unwrap();

    let output = pipeline.run("https://blog.langchain.dev/x").await.unwrap();

    assert_eq!(output.facts, None);
    assert_eq!(output.outcome, LoopOutcome::StyleMatched);
    assert_eq!(mock.call_count(), 2);

    let compose = &mock.requests()[0];
    assert!(compose.output_schema.is_none());
    assert!(compose.last_user_message().unwrap().contains(&format!("- {}", ARTICLE)));
}

#[tokio::test]
async fn zero_attempt_ceiling_still_critiques_once() {
    let mock = Arc::new(
        MockLlmClient::new()
            .with_reply(facts_reply())
            .with_text("only draft")
            .with_reply(matched()),
    );
    let pipeline = PipelineBuilder::new(mock.clone(), StaticFetcher::new(ARTICLE))
        .max_attempts(0)
        .build()
        .unwrap();

    let output = pipeline.run("https://blog.langchain.dev/x").await.unwrap();
    assert_eq!(output.outcome, LoopOutcome::AttemptLimitReached);
    assert_eq!(output.attempts, 1);
    assert_eq!(output.tweet, "only draft");
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn retrieved_examples_become_few_shot_turns() {
    let store = Arc::new(MemoryExampleStore::new().with_examples(
        "tweets",
        vec![
            Example::content_to_tweet("ex-1", "LangGraph 0.2 ships persistence checkpointers", "Checkpointers! 🧠", 1),
            Example::content_to_tweet("ex-2", "a recipe for banana bread", "🍌", 2),
        ],
    ));
    let mock = Arc::new(
        MockLlmClient::new()
            .with_reply(facts_reply())
            .with_text("draft")
            .with_reply(matched()),
    );
    let pipeline = PipelineBuilder::new(mock.clone(), StaticFetcher::new(ARTICLE))
        .examples(store, "tweets", 1)
        .build()
        .unwrap();

    pipeline.run("https://blog.langchain.dev/x").await.unwrap();

    let compose = &mock.requests()[1];
    let roles: Vec<Role> = compose.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
    assert_eq!(compose.messages[0].content, "LangGraph 0.2 ships persistence checkpointers");
    assert_eq!(compose.messages[1].content, "Checkpointers! 🧠");
}

#[tokio::test]
async fn model_failure_aborts_without_a_tweet() {
    let mock = Arc::new(
        MockLlmClient::new()
            .with_reply(facts_reply())
            .with_text("draft 1")
            .with_reply(miss())
            .with_failure("overloaded"),
    );
    let pipeline = PipelineBuilder::new(mock.clone(), StaticFetcher::new(ARTICLE))
        .build()
        .unwrap();

    let err = pipeline.run("https://blog.langchain.dev/x").await.unwrap_err();
    assert!(matches!(err, TweetsmithError::ModelCall(ref m) if m.contains("overloaded")));
    assert_eq!(mock.call_count(), 4);
}

#[tokio::test]
async fn empty_dataset_id_rejected_at_build() {
    let mock = Arc::new(MockLlmClient::new());
    let result = PipelineBuilder::new(mock, StaticFetcher::new(ARTICLE))
        .examples(Arc::new(MemoryExampleStore::new()), "", 3)
        .build();
    assert!(result.is_err_and(|e| e.is_invalid_input()));
}

/// Fails every fetch at the transport level.
struct DownFetcher;

#[async_trait]
impl ContentFetcher for DownFetcher {
    async fn fetch(&self, url: &str) -> Result<Content> {
        Err(TweetsmithError::Fetch(format!("GET {} failed: connection refused", url)))
    }
}

/// Never answers in time.
struct SlowStore;

#[async_trait]
impl ExampleStore for SlowStore {
    async fn find_similar(&self, _dataset_id: &str, _query: &ExampleFields, _limit: usize) -> Result<Vec<Example>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }

    async fn record_example(&self, _dataset_id: &str, _inputs: ExampleFields, _outputs: ExampleFields) -> Result<Example> {
        Err(TweetsmithError::Store("read only".into()))
    }
}

#[tokio::test]
async fn fetch_failure_is_content_unavailable() {
    let mock = Arc::new(MockLlmClient::new());
    let pipeline = PipelineBuilder::new(mock.clone(), Arc::new(DownFetcher))
        .build()
        .unwrap();

    let err = pipeline.run("https://blog.langchain.dev/x").await.unwrap_err();
    assert!(err.is_content_unavailable());
    assert!(err.to_string().contains("connection refused"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn slow_example_store_times_out() {
    let mock = Arc::new(MockLlmClient::new().with_reply(facts_reply()));
    let pipeline = PipelineBuilder::new(mock.clone(), StaticFetcher::new(ARTICLE))
        .examples(Arc::new(SlowStore), "tweets", 3)
        .call_timeout(Duration::from_millis(20))
        .build()
        .unwrap();

    let err = pipeline.run("https://blog.langchain.dev/x").await.unwrap_err();
    assert!(err.is_model_call());
    assert!(err.to_string().contains("example store timed out"));
    // extraction ran, composing never did
    assert_eq!(mock.call_count(), 1);
}
