//! Revision loop controller.
//!
//! Drives Composing → Critiquing → {Done, Revising}, Revising → Critiquing.
//! The critic is always consulted for the current draft; once `attempts`
//! exceeds `max_attempts` its verdict is ignored and the loop stops.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::domain::{Critique, Draft, Example, FactSet, LoopOutcome};
use crate::error::{Result, TweetsmithError};
use crate::stages::{DraftComposer, Reviser, StyleCritic};

/// Default attempt ceiling
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Controller state machine phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopPhase {
    Composing,
    Critiquing,
    Revising { feedback: String },
    Done(LoopOutcome),
}

impl fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopPhase::Composing => write!(f, "composing"),
            LoopPhase::Critiquing => write!(f, "critiquing"),
            LoopPhase::Revising { .. } => write!(f, "revising"),
            LoopPhase::Done(outcome) => write!(f, "done ({})", outcome),
        }
    }
}

/// Per-run state, owned by a single `run` call.
#[derive(Debug, Clone)]
pub struct LoopState {
    pub facts: FactSet,
    pub current_draft: Draft,
    pub last_critique: Option<Critique>,
    pub attempts: u32,
}

impl LoopState {
    fn new(facts: FactSet) -> Self {
        Self {
            facts,
            attempts: 1,
            current_draft: Draft::first(String::new()),
            last_critique: None,
        }
    }

    /// Install a revision. The controller owns the attempt counter; whatever
    /// number the reviser stamped on the draft is overwritten.
    fn replace_draft(&mut self, mut draft: Draft) {
        self.attempts += 1;
        if draft.attempt != self.attempts {
            warn!(
                "revision loop: reviser returned attempt {}, expected {}",
                draft.attempt, self.attempts
            );
            draft.attempt = self.attempts;
        }
        self.current_draft = draft;
    }
}

/// Configuration for the RevisionLoop.
#[derive(Debug, Clone)]
pub struct RevisionLoopConfig {
    /// Number of revisions allowed after the first draft
    pub max_attempts: u32,
    /// Upper bound on each stage call; expiry aborts the run
    pub call_timeout: Option<Duration>,
}

impl Default for RevisionLoopConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            call_timeout: None,
        }
    }
}

/// Terminal result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopResult {
    pub draft: Draft,
    pub outcome: LoopOutcome,
    pub attempts: u32,
    /// Number of critic calls issued
    pub critiques: u32,
    pub last_critique: Option<Critique>,
}

impl LoopResult {
    pub fn tweet(&self) -> &str {
        &self.draft.text
    }
}

/// Composes a draft and critiques/revises it until it matches or the
/// attempt ceiling is passed.
pub struct RevisionLoop {
    composer: Arc<dyn DraftComposer>,
    critic: Arc<dyn StyleCritic>,
    reviser: Arc<dyn Reviser>,
    references: Vec<String>,
    config: RevisionLoopConfig,
}

impl RevisionLoop {
    pub fn new(
        composer: Arc<dyn DraftComposer>,
        critic: Arc<dyn StyleCritic>,
        reviser: Arc<dyn Reviser>,
        references: Vec<String>,
    ) -> Self {
        Self {
            composer,
            critic,
            reviser,
            references,
            config: RevisionLoopConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RevisionLoopConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RevisionLoopConfig {
        &self.config
    }

    /// Run the loop to a terminal state. Any stage failure aborts the run.
    pub async fn run(&self, facts: FactSet, examples: &[Example]) -> Result<LoopResult> {
        info!(
            "revision loop: start (max_attempts={}, examples={})",
            self.config.max_attempts,
            examples.len()
        );

        let timeout = self.config.call_timeout;
        let mut state = LoopState::new(facts);
        let mut critiques = 0u32;
        let mut phase = LoopPhase::Composing;

        loop {
            phase = match phase {
                LoopPhase::Critiquing => {
                    let critique = call_with_timeout(
                        "critic",
                        timeout,
                        self.critic.critique(&state.current_draft, &self.references),
                    )
                    .await?;
                    critiques += 1;

                    let next = if state.attempts > self.config.max_attempts {
                        LoopPhase::Done(LoopOutcome::AttemptLimitReached)
                    } else if critique.matches_style {
                        LoopPhase::Done(LoopOutcome::StyleMatched)
                    } else {
                        match critique.feedback() {
                            Some(feedback) if !feedback.trim().is_empty() => LoopPhase::Revising {
                                feedback: feedback.to_string(),
                            },
                            _ => {
                                return Err(TweetsmithError::ModelCall(
                                    "critic rejected the draft without feedback".to_string(),
                                ));
                            }
                        }
                    };
                    state.last_critique = Some(critique);
                    self.advance(LoopPhase::Critiquing, next, &state)
                }
                LoopPhase::Revising { feedback } => {
                    let revised =
                        call_with_timeout("reviser", timeout, self.reviser.revise(&state.current_draft, &feedback))
                            .await?;
                    state.replace_draft(revised);
                    self.advance(LoopPhase::Revising { feedback }, LoopPhase::Critiquing, &state)
                }
                LoopPhase::Done(outcome) => {
                    info!(
                        "revision loop: {} after {} attempt(s), {} critique(s)",
                        outcome, state.attempts, critiques
                    );
                    return Ok(LoopResult {
                        draft: state.current_draft,
                        outcome,
                        attempts: state.attempts,
                        critiques,
                        last_critique: state.last_critique,
                    });
                }
                LoopPhase::Composing => {
                    let draft =
                        call_with_timeout("composer", timeout, self.composer.compose_draft(&state.facts, examples))
                            .await?;
                    state.current_draft = Draft { attempt: 1, ..draft };
                    self.advance(LoopPhase::Composing, LoopPhase::Critiquing, &state)
                }
            };
        }
    }

    fn advance(&self, from: LoopPhase, to: LoopPhase, state: &LoopState) -> LoopPhase {
        info!("revision loop: {} -> {} (attempt {})", from, to, state.attempts);
        to
    }
}

/// Await a stage call, failing with `ModelCall` if `limit` elapses first.
pub(crate) async fn call_with_timeout<T, F>(stage: &str, limit: Option<Duration>, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    debug!("calling {}", stage);
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| TweetsmithError::ModelCall(format!("{} timed out after {:?}", stage, limit)))?,
        None => call.await,
    }
}
