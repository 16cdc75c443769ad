//! Prompt System - persona and template rendering
//!
//! This module provides the persona the stages write in and the Handlebars
//! templates each stage renders its messages from.

mod persona;
mod render;
pub mod templates;

pub use persona::Persona;
pub use render::PromptRenderer;
