//! CLI module for tweetsmith - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
