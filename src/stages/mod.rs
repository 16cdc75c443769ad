//! Model-backed pipeline stages.
//!
//! Each stage is a trait so the revision loop can be driven by stubs in
//! tests; the `Llm*` implementations make exactly one model call per
//! invocation and never retry.

use async_trait::async_trait;

use crate::domain::{Content, Critique, Draft, Example, FactSet};
use crate::error::Result;

mod composer;
mod critic;
mod extractor;
mod reviser;

pub use composer::{DEFAULT_MAX_WORDS, LlmDraftComposer};
pub use critic::LlmStyleCritic;
pub use extractor::LlmFactExtractor;
pub use reviser::LlmReviser;

/// Turns content into facts, or reports that there are none.
#[async_trait]
pub trait FactExtractor: Send + Sync {
    /// Fails with `InvalidInput` on empty content.
    async fn extract_facts(&self, content: &Content) -> Result<FactSet>;
}

/// Writes the first draft.
#[async_trait]
pub trait DraftComposer: Send + Sync {
    /// Fails with `InvalidInput` on an empty fact set. `examples` may be empty.
    async fn compose_draft(&self, facts: &FactSet, examples: &[Example]) -> Result<Draft>;
}

/// Judges a draft against the persona.
#[async_trait]
pub trait StyleCritic: Send + Sync {
    async fn critique(&self, draft: &Draft, references: &[String]) -> Result<Critique>;
}

/// Rewrites a draft using critic feedback.
#[async_trait]
pub trait Reviser: Send + Sync {
    /// Fails with `InvalidInput` on empty feedback.
    async fn revise(&self, draft: &Draft, feedback: &str) -> Result<Draft>;
}
