//! URL-to-tweet pipeline.
//!
//! Fetch → (extract facts) → retrieve examples → revision loop. The variant
//! is fixed when the pipeline is built.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::domain::{CONTENT_KEY, Content, Example, FactSet, LoopOutcome, fields};
use crate::error::{Result, TweetsmithError};
use crate::fetch::ContentFetcher;
use crate::llm::LlmClient;
use crate::prompt::{Persona, PromptRenderer};
use crate::runner::{DEFAULT_MAX_ATTEMPTS, LoopResult, RevisionLoop, RevisionLoopConfig, call_with_timeout};
use crate::stages::{
    DraftComposer, FactExtractor, LlmDraftComposer, LlmFactExtractor, LlmReviser, LlmStyleCritic, Reviser,
    StyleCritic,
};
use crate::store::ExampleStore;

pub const DEFAULT_EXAMPLE_LIMIT: usize = 5;

/// How content becomes the facts the composer works from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineMode {
    /// The whole article is handed to the composer as one fact
    RawArticle,
    /// Facts are extracted first
    #[default]
    FactBased,
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineMode::RawArticle => write!(f, "raw-article"),
            PipelineMode::FactBased => write!(f, "fact-based"),
        }
    }
}

impl FromStr for PipelineMode {
    type Err = TweetsmithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw-article" | "raw" | "article" => Ok(PipelineMode::RawArticle),
            "fact-based" | "facts" => Ok(PipelineMode::FactBased),
            other => Err(TweetsmithError::invalid_input(format!("unknown pipeline mode '{}'", other))),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineOutput {
    pub url: String,
    pub content: String,
    /// Extracted facts; `None` in raw-article mode
    pub facts: Option<Vec<String>>,
    pub tweet: String,
    pub outcome: LoopOutcome,
    pub attempts: u32,
}

struct ExampleSource {
    store: Arc<dyn ExampleStore>,
    dataset_id: String,
    limit: usize,
}

/// Builder for Pipeline.
///
/// Stages default to the LLM-backed implementations over the given client;
/// any of them can be replaced.
pub struct PipelineBuilder {
    client: Arc<dyn LlmClient>,
    fetcher: Arc<dyn ContentFetcher>,
    mode: PipelineMode,
    persona: Persona,
    renderer: Option<Arc<PromptRenderer>>,
    examples: Option<ExampleSource>,
    max_attempts: u32,
    max_words: u32,
    call_timeout: Option<Duration>,
    extractor: Option<Arc<dyn FactExtractor>>,
    composer: Option<Arc<dyn DraftComposer>>,
    critic: Option<Arc<dyn StyleCritic>>,
    reviser: Option<Arc<dyn Reviser>>,
}

impl PipelineBuilder {
    pub fn new(client: Arc<dyn LlmClient>, fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self {
            client,
            fetcher,
            mode: PipelineMode::default(),
            persona: Persona::default(),
            renderer: None,
            examples: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_words: crate::stages::DEFAULT_MAX_WORDS,
            call_timeout: None,
            extractor: None,
            composer: None,
            critic: None,
            reviser: None,
        }
    }

    pub fn mode(mut self, mode: PipelineMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    pub fn renderer(mut self, renderer: PromptRenderer) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Enable few-shot retrieval from `dataset_id`.
    pub fn examples(mut self, store: Arc<dyn ExampleStore>, dataset_id: impl Into<String>, limit: usize) -> Self {
        self.examples = Some(ExampleSource {
            store,
            dataset_id: dataset_id.into(),
            limit,
        });
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn max_words(mut self, max_words: u32) -> Self {
        self.max_words = max_words;
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn FactExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn composer(mut self, composer: Arc<dyn DraftComposer>) -> Self {
        self.composer = Some(composer);
        self
    }

    pub fn critic(mut self, critic: Arc<dyn StyleCritic>) -> Self {
        self.critic = Some(critic);
        self
    }

    pub fn reviser(mut self, reviser: Arc<dyn Reviser>) -> Self {
        self.reviser = Some(reviser);
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        if let Some(source) = &self.examples {
            crate::store::validate_dataset_id(&source.dataset_id)?;
        }

        let renderer = self.renderer.unwrap_or_else(|| Arc::new(PromptRenderer::new()));
        let persona = Arc::new(self.persona);
        let client = self.client;

        let extractor = self.extractor.unwrap_or_else(|| {
            Arc::new(LlmFactExtractor::new(client.clone(), renderer.clone(), persona.clone()))
        });
        let composer = self.composer.unwrap_or_else(|| {
            Arc::new(
                LlmDraftComposer::new(client.clone(), renderer.clone(), persona.clone()).with_max_words(self.max_words),
            )
        });
        let critic = self
            .critic
            .unwrap_or_else(|| Arc::new(LlmStyleCritic::new(client.clone(), renderer.clone(), persona.clone())));
        let reviser = self
            .reviser
            .unwrap_or_else(|| Arc::new(LlmReviser::new(client.clone(), renderer.clone(), persona.clone())));

        let revision_loop = RevisionLoop::new(composer, critic, reviser, persona.reference_tweets.clone())
            .with_config(RevisionLoopConfig {
                max_attempts: self.max_attempts,
                call_timeout: self.call_timeout,
            });

        Ok(Pipeline {
            mode: self.mode,
            fetcher: self.fetcher,
            extractor,
            examples: self.examples,
            revision_loop,
            call_timeout: self.call_timeout,
        })
    }
}

/// A configured URL-to-tweet pipeline.
pub struct Pipeline {
    mode: PipelineMode,
    fetcher: Arc<dyn ContentFetcher>,
    extractor: Arc<dyn FactExtractor>,
    examples: Option<ExampleSource>,
    revision_loop: RevisionLoop,
    call_timeout: Option<Duration>,
}

impl Pipeline {
    pub fn mode(&self) -> PipelineMode {
        self.mode
    }

    /// Fetch `url` and run the rest of the pipeline on its content.
    pub async fn run(&self, url: &str) -> Result<PipelineOutput> {
        info!("pipeline ({}): fetching {}", self.mode, url);
        let content = self.fetcher.fetch(url).await.map_err(|e| match e {
            TweetsmithError::Fetch(detail) => TweetsmithError::ContentUnavailable(detail),
            other => other,
        })?;
        self.run_content(content).await
    }

    /// Run on already-fetched content.
    pub async fn run_content(&self, content: Content) -> Result<PipelineOutput> {
        if content.is_empty() {
            return Err(TweetsmithError::ContentUnavailable(content.source_url));
        }

        let (facts, extracted) = match self.mode {
            PipelineMode::RawArticle => (FactSet::Facts(vec![content.text.clone()]), None),
            PipelineMode::FactBased => {
                let facts =
                    call_with_timeout("extractor", self.call_timeout, self.extractor.extract_facts(&content)).await?;
                let list = match facts.facts() {
                    Some(list) if !facts.is_empty() => list.to_vec(),
                    _ => return Err(TweetsmithError::invalid_input("insufficient information")),
                };
                (facts, Some(list))
            }
        };

        let examples = self.retrieve_examples(&content).await?;
        let LoopResult {
            draft,
            outcome,
            attempts,
            ..
        } = self.revision_loop.run(facts, &examples).await?;

        info!("pipeline: {} after {} attempt(s)", outcome, attempts);
        Ok(PipelineOutput {
            url: content.source_url,
            content: content.text,
            facts: extracted,
            tweet: draft.text,
            outcome,
            attempts,
        })
    }

    async fn retrieve_examples(&self, content: &Content) -> Result<Vec<Example>> {
        let Some(source) = &self.examples else {
            return Ok(Vec::new());
        };

        let query = fields([(CONTENT_KEY, content.text.as_str())]);
        let examples = call_with_timeout(
            "example store",
            self.call_timeout,
            source.store.find_similar(&source.dataset_id, &query, source.limit),
        )
        .await?;
        debug!("pipeline: retrieved {} examples from '{}'", examples.len(), source.dataset_id);
        Ok(examples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("raw-article".parse::<PipelineMode>().unwrap(), PipelineMode::RawArticle);
        assert_eq!("Fact-Based".parse::<PipelineMode>().unwrap(), PipelineMode::FactBased);
        assert!("graph".parse::<PipelineMode>().unwrap_err().is_invalid_input());
        assert_eq!(PipelineMode::RawArticle.to_string(), "raw-article");
        assert_eq!(PipelineMode::default(), PipelineMode::FactBased);
    }

    #[test]
    fn test_mode_serde() {
        let mode: PipelineMode = serde_yaml::from_str("raw-article").unwrap();
        assert_eq!(mode, PipelineMode::RawArticle);
    }
}
