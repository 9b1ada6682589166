//! Prompt system for the proofreader.
//!
//! This crate provides:
//! - Built-in proofreading prompts for report and inline-edit modes
//! - YAML prompt overrides from `.proofread/prompts/`
//! - Handlebars rendering of prompt variables and additional instructions
//! - Message assembly for one chunk

pub mod builder;
pub mod defaults;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::PromptSet;
pub use loader::{list_prompts, load_prompt};
pub use types::{ProofreadMode, PromptDefinition};
