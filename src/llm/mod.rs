//! LLM Client Layer - model API integration
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction
//! - AnthropicClient implementation
//! - MockLlmClient for scripted tests

pub mod anthropic;
pub mod client;
pub mod types;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::{LlmClient, MockLlmClient, MockReply};
pub use types::{CompletionRequest, CompletionResponse, Message, OutputSchema, Role, StopReason, Usage};
