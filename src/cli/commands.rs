//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - generate: turn a URL into a tweet, optionally reviewing it
//! - fetch: show what content a URL yields
//! - feedback: record a content/tweet example directly

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tweetsmith::pipeline::PipelineMode;

/// Tweetsmith - draft tweets from links in a fixed voice
#[derive(Parser, Debug)]
#[command(name = "tweetsmith")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a URL and draft a tweet about it
    Generate {
        /// Article, README, or video URL
        url: String,

        /// Pipeline variant (raw-article, fact-based)
        #[arg(short, long)]
        mode: Option<PipelineMode>,

        /// Revisions allowed after the first draft
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Do not retrieve few-shot examples
        #[arg(long)]
        no_examples: bool,

        /// Review the tweet and record the result as an example
        #[arg(short, long)]
        review: bool,
    },

    /// Show the content extracted from a URL
    Fetch {
        /// URL to fetch
        url: String,
    },

    /// Record a content/tweet pair as an example
    Feedback {
        /// Source content, or @path to read it from a file
        #[arg(long)]
        content: String,

        /// The approved tweet
        #[arg(long)]
        tweet: String,
    },
}
