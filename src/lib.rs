//! Tweetsmith - turn links into tweets in a fixed voice
//!
//! A URL is fetched, reduced to facts, drafted into a tweet, and then run
//! through a critique/revise loop until the style critic is satisfied or
//! the attempt ceiling is passed.

pub mod domain;
pub mod error;
pub mod fetch;
pub mod id;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod review;
pub mod runner;
pub mod stages;
pub mod store;

pub use error::{Result, TweetsmithError};
