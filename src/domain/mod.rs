//! Domain types for Tweetsmith
//!
//! This module contains the values that flow through the pipeline:
//! - Content: fetched text for a URL
//! - FactSet: extracted facts, or the model's "not enough information" signal
//! - Draft: one attempt at the tweet, numbered from 1
//! - Critique: the style critic's verdict on a draft
//! - Example: a stored (inputs, outputs) pair for few-shot retrieval and feedback
//! - LoopOutcome: how a revision loop ended

pub mod content;
pub mod draft;
pub mod example;
pub mod outcome;

pub use content::Content;
pub use draft::{Critique, Draft, FactSet};
pub use example::{CONTENT_KEY, Example, ExampleFields, TWEET_KEY, fields};
pub use outcome::LoopOutcome;
