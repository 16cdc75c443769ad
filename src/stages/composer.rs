//! First-draft composition with optional few-shot conversation turns.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde_json::json;

use super::DraftComposer;
use crate::domain::{Draft, Example, FactSet};
use crate::error::{Result, TweetsmithError};
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompt::{Persona, PromptRenderer, templates};

/// Default soft length ceiling handed to the model
pub const DEFAULT_MAX_WORDS: u32 = 20;

/// Composes the first draft from facts.
pub struct LlmDraftComposer {
    client: Arc<dyn LlmClient>,
    renderer: Arc<PromptRenderer>,
    persona: Arc<Persona>,
    max_words: u32,
}

impl LlmDraftComposer {
    pub fn new(client: Arc<dyn LlmClient>, renderer: Arc<PromptRenderer>, persona: Arc<Persona>) -> Self {
        Self {
            client,
            renderer,
            persona,
            max_words: DEFAULT_MAX_WORDS,
        }
    }

    /// Length instruction only; the output is not checked against it.
    pub fn with_max_words(mut self, max_words: u32) -> Self {
        self.max_words = max_words;
        self
    }

    fn build_request(&self, facts: &[String], examples: &[Example]) -> Result<CompletionRequest> {
        let system = self.renderer.render_named(
            templates::COMPOSE_SYSTEM,
            &json!({
                "description": self.persona.description,
                "voice": self.persona.voice,
                "has_examples": !examples.is_empty(),
            }),
        )?;

        let mut request = CompletionRequest::new(system);
        for example in examples {
            request = request
                .with_user_message(example.prompt_input())
                .with_assistant_message(example.prompt_output());
        }

        let user = self.renderer.render_named(
            templates::COMPOSE_USER,
            &json!({ "facts": facts, "max_words": self.max_words }),
        )?;
        Ok(request.with_user_message(user))
    }
}

#[async_trait]
impl DraftComposer for LlmDraftComposer {
    async fn compose_draft(&self, facts: &FactSet, examples: &[Example]) -> Result<Draft> {
        let facts = match facts.facts() {
            Some(list) if !facts.is_empty() => list,
            _ => return Err(TweetsmithError::invalid_input("no facts to compose a draft from")),
        };

        debug!("composer: {} facts, {} examples", facts.len(), examples.len());
        let request = self.build_request(facts, examples)?;
        let text = self.client.complete(request).await?.non_empty_text()?;
        Ok(Draft::first(text))
    }
}
