//! Fact extraction with a two-shape structured answer.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::json;

use super::FactExtractor;
use crate::domain::{Content, FactSet};
use crate::error::{Result, TweetsmithError};
use crate::llm::{CompletionRequest, LlmClient, OutputSchema};
use crate::prompt::{Persona, PromptRenderer, templates};

const SCHEMA_NAME: &str = "report_facts";

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ExtractionStatus {
    Facts,
    InsufficientInformation,
}

#[derive(Debug, Deserialize)]
struct ExtractionAnswer {
    status: ExtractionStatus,
    #[serde(default)]
    facts: Vec<String>,
}

fn extraction_schema() -> OutputSchema {
    OutputSchema::new(
        SCHEMA_NAME,
        "Report the facts stated in the document, or that it does not contain enough information.",
        json!({
            "type": "object",
            "properties": {
                "status": {
                    "type": "string",
                    "enum": ["facts", "insufficient_information"],
                    "description": "`facts` when at least one fact was found, otherwise `insufficient_information`"
                },
                "facts": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "One self-contained factual statement per entry"
                }
            },
            "required": ["status"]
        }),
    )
}

/// Extracts facts with a single structured model call.
pub struct LlmFactExtractor {
    client: Arc<dyn LlmClient>,
    renderer: Arc<PromptRenderer>,
    persona: Arc<Persona>,
}

impl LlmFactExtractor {
    pub fn new(client: Arc<dyn LlmClient>, renderer: Arc<PromptRenderer>, persona: Arc<Persona>) -> Self {
        Self {
            client,
            renderer,
            persona,
        }
    }
}

#[async_trait]
impl FactExtractor for LlmFactExtractor {
    async fn extract_facts(&self, content: &Content) -> Result<FactSet> {
        if content.is_empty() {
            return Err(TweetsmithError::invalid_input("no content to extract facts from"));
        }

        let system = self
            .renderer
            .render_named(templates::EXTRACT_SYSTEM, &json!({ "description": self.persona.description }))?;
        let user = self
            .renderer
            .render_named(templates::EXTRACT_USER, &json!({ "content": content.text }))?;

        let request = CompletionRequest::new(system)
            .with_user_message(user)
            .with_output_schema(extraction_schema());

        let answer: ExtractionAnswer = self.client.complete(request).await?.parse_structured()?;

        // The model's choice of shape is authoritative
        match answer.status {
            ExtractionStatus::InsufficientInformation => {
                debug!("extractor: insufficient information for {}", content.source_url);
                Ok(FactSet::InsufficientInformation)
            }
            ExtractionStatus::Facts => {
                let facts: Vec<String> = answer
                    .facts
                    .into_iter()
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty())
                    .collect();
                if facts.is_empty() {
                    return Err(TweetsmithError::ModelCall(
                        "extractor reported facts but listed none".to_string(),
                    ));
                }
                debug!("extractor: {} facts from {}", facts.len(), content.source_url);
                Ok(FactSet::Facts(facts))
            }
        }
    }
}
