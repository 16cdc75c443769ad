//! LLM-as-judge style critic.
//!
//! The critic gives a binary verdict: the draft either sounds like the
//! persona or it does not, and a miss must come with actionable feedback.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::json;

use super::StyleCritic;
use crate::domain::{Critique, Draft};
use crate::error::{Result, TweetsmithError};
use crate::llm::{CompletionRequest, LlmClient, OutputSchema};
use crate::prompt::{Persona, PromptRenderer, templates};

const SCHEMA_NAME: &str = "style_verdict";

#[derive(Debug, Deserialize)]
struct Verdict {
    matches_style: bool,
    #[serde(default)]
    feedback: Option<String>,
}

fn verdict_schema(name: &str) -> OutputSchema {
    OutputSchema::new(
        SCHEMA_NAME,
        format!("Whether the tweet sounds like {}, with feedback when it does not.", name),
        json!({
            "type": "object",
            "properties": {
                "matches_style": {
                    "type": "boolean",
                    "description": format!("whether the tweet sounds like {}", name)
                },
                "feedback": {
                    "type": "string",
                    "description": "What to change so it does. Required when matches_style is false."
                }
            },
            "required": ["matches_style"]
        }),
    )
}

/// Judges drafts with a single structured model call.
pub struct LlmStyleCritic {
    client: Arc<dyn LlmClient>,
    renderer: Arc<PromptRenderer>,
    persona: Arc<Persona>,
}

impl LlmStyleCritic {
    pub fn new(client: Arc<dyn LlmClient>, renderer: Arc<PromptRenderer>, persona: Arc<Persona>) -> Self {
        Self {
            client,
            renderer,
            persona,
        }
    }

    fn build_request(&self, draft: &Draft, references: &[String]) -> Result<CompletionRequest> {
        let system = self.renderer.render_named(
            templates::REFERENCE_SYSTEM,
            &json!({ "name": self.persona.name, "references": references }),
        )?;
        let user = self.renderer.render_named(
            templates::CRITIQUE_USER,
            &json!({ "name": self.persona.name, "tweet": draft.text }),
        )?;

        Ok(CompletionRequest::new(system)
            .with_user_message(user)
            .with_output_schema(verdict_schema(&self.persona.name)))
    }
}

#[async_trait]
impl StyleCritic for LlmStyleCritic {
    async fn critique(&self, draft: &Draft, references: &[String]) -> Result<Critique> {
        if draft.text.trim().is_empty() {
            return Err(TweetsmithError::invalid_input("no draft to critique"));
        }

        let request = self.build_request(draft, references)?;
        let verdict: Verdict = self.client.complete(request).await?.parse_structured()?;

        if verdict.matches_style {
            debug!("critic: attempt {} matches style", draft.attempt);
            return Ok(Critique::matches());
        }

        match verdict.feedback.as_deref().map(str::trim) {
            Some(feedback) if !feedback.is_empty() => {
                debug!("critic: attempt {} needs revision: {}", draft.attempt, feedback);
                Ok(Critique::needs_revision(feedback))
            }
            _ => Err(TweetsmithError::ModelCall(
                "critic rejected the draft without feedback".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockLlmClient, MockReply};

    fn critic(mock: Arc<MockLlmClient>) -> LlmStyleCritic {
        LlmStyleCritic::new(mock, Arc::new(PromptRenderer::new()), Arc::new(Persona::default()))
    }

    fn references() -> Vec<String> {
        vec!["Opening up access for LangGraph Cloud!".to_string()]
    }

    #[tokio::test]
    async fn test_match() {
        let mock = Arc::new(MockLlmClient::new().with_structured(json!({ "matches_style": true })));
        let critique = critic(mock.clone())
            .critique(&Draft::first("LangGraph 1.0 is out! 🎉"), &references())
            .await
            .unwrap();

        assert!(critique.matches_style);
        assert_eq!(critique.feedback(), None);

        let request = &mock.requests()[0];
        assert!(request.system.contains("<example>\nOpening up access for LangGraph Cloud!\n</example>"));
        assert!(request.last_user_message().unwrap().contains("Tweet: LangGraph 1.0 is out! 🎉"));
    }

    #[tokio::test]
    async fn test_match_ignores_stray_feedback() {
        let mock = Arc::new(
            MockLlmClient::new().with_structured(json!({ "matches_style": true, "feedback": "nitpick" })),
        );
        let critique = critic(mock).critique(&Draft::first("x"), &references()).await.unwrap();
        assert_eq!(critique.feedback(), None);
    }

    #[tokio::test]
    async fn test_needs_revision() {
        let mock = Arc::new(
            MockLlmClient::new().with_structured(json!({ "matches_style": false, "feedback": " add an emoji " })),
        );
        let critique = critic(mock).critique(&Draft::first("x"), &references()).await.unwrap();
        assert!(!critique.matches_style);
        assert_eq!(critique.feedback(), Some("add an emoji"));
    }

    #[tokio::test]
    async fn test_miss_without_feedback_is_model_failure() {
        let mock = Arc::new(MockLlmClient::new().with_structured(json!({ "matches_style": false })));
        let err = critic(mock).critique(&Draft::first("x"), &references()).await.unwrap_err();
        assert!(err.is_model_call());
    }

    #[tokio::test]
    async fn test_idempotent_with_deterministic_model() {
        let mock = Arc::new(
            MockLlmClient::new().with_fallback(MockReply::Structured(json!({ "matches_style": false, "feedback": "shorter" }))),
        );
        let critic = critic(mock.clone());
        let draft = Draft::first("same draft");

        let first = critic.critique(&draft, &references()).await.unwrap();
        let second = critic.critique(&draft, &references()).await.unwrap();

        assert_eq!(first.matches_style, second.matches_style);
        assert_eq!(mock.requests()[0].messages, mock.requests()[1].messages);
        assert_eq!(mock.requests()[0].system, mock.requests()[1].system);
    }

    #[tokio::test]
    async fn test_empty_draft_rejected() {
        let mock = Arc::new(MockLlmClient::new());
        let err = critic(mock.clone()).critique(&Draft::first(""), &references()).await.unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(mock.call_count(), 0);
    }
}
