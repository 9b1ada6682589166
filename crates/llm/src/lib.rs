//! LLM integration crate for the proofreader.
//!
//! This crate provides a provider-agnostic completion capability: given a list
//! of role-tagged messages and a temperature, return the response text or fail.
//!
//! # Providers
//! - **OpenAI**: chat completions API (default)
//! - **OpenRouter**: OpenAI-compatible gateway with its own model names
//! - **Ollama**: local LLM runtime
//!
//! # Example
//! ```no_run
//! use proofread_llm::{ChatMessage, LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new("llama3.2");
//! let request = LlmRequest::new(vec![ChatMessage::user("Hello, world!")]).with_temperature(0.2);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{ChatMessage, ClientSource, LlmClient, LlmRequest, LlmResponse, LlmUsage, Role};
pub use factory::{create_client, ClientFactory};
pub use providers::{OllamaClient, OpenAiClient};
pub use types::{ModelInfo, ProviderType};
