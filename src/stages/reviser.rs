//! Draft revision guided by critic feedback.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde_json::json;

use super::Reviser;
use crate::domain::Draft;
use crate::error::{Result, TweetsmithError};
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompt::{Persona, PromptRenderer, templates};

/// Revises drafts against the persona's reference tweets.
pub struct LlmReviser {
    client: Arc<dyn LlmClient>,
    renderer: Arc<PromptRenderer>,
    persona: Arc<Persona>,
}

impl LlmReviser {
    pub fn new(client: Arc<dyn LlmClient>, renderer: Arc<PromptRenderer>, persona: Arc<Persona>) -> Self {
        Self {
            client,
            renderer,
            persona,
        }
    }
}

#[async_trait]
impl Reviser for LlmReviser {
    async fn revise(&self, draft: &Draft, feedback: &str) -> Result<Draft> {
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(TweetsmithError::invalid_input("cannot revise without feedback"));
        }
        if draft.text.trim().is_empty() {
            return Err(TweetsmithError::invalid_input("no draft to revise"));
        }

        let system = self.renderer.render_named(
            templates::REFERENCE_SYSTEM,
            &json!({ "name": self.persona.name, "references": self.persona.reference_tweets }),
        )?;
        let user = self.renderer.render_named(
            templates::REVISE_USER,
            &json!({ "name": self.persona.name, "feedback": feedback, "tweet": draft.text }),
        )?;

        let request = CompletionRequest::new(system).with_user_message(user);
        let text = self.client.complete(request).await?.non_empty_text()?;

        let revised = draft.revised(text);
        debug!("reviser: produced attempt {}", revised.attempt);
        Ok(revised)
    }
}
