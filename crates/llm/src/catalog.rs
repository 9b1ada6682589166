//! Known models, their context windows and chunk ceilings.
//!
//! The ceilings are empirical: the largest chunk (in characters) that a model
//! proofreads reliably in one call. `auto` chunk sizing never exceeds them.

use crate::types::{ModelInfo, ProviderType};

/// Context window assumed for models missing from the catalog.
pub const DEFAULT_CONTEXT_WINDOW: u32 = 128_000;

/// Ceiling for models that match no rule in [`CHUNK_CEILING_RULES`].
pub const DEFAULT_CHUNK_CEILING: usize = 30_000;

/// `(name fragment, ceiling)` pairs, checked in order; first match wins.
pub const CHUNK_CEILING_RULES: &[(&str, usize)] = &[
    ("gemini-2.5", 80_000),
    ("gemini", 60_000),
    ("claude", 50_000),
    ("gpt-5", 70_000),
    ("gpt-4o", 40_000),
    ("gpt-4", 20_000),
];

/// A catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    /// Short model name used in configuration
    pub name: &'static str,

    /// Context window in tokens
    pub context_window: u32,

    /// Name on OpenRouter, if the model is routed there
    pub openrouter_name: Option<&'static str>,

    /// Whether the OpenAI API serves this model directly
    pub openai: bool,
}

const MODELS: &[ModelSpec] = &[
    ModelSpec {
        name: "gpt-5-mini",
        context_window: 400_000,
        openrouter_name: Some("openai/gpt-5-mini"),
        openai: true,
    },
    ModelSpec {
        name: "gpt-4o",
        context_window: 128_000,
        openrouter_name: Some("openai/gpt-4o"),
        openai: true,
    },
    ModelSpec {
        name: "gpt-4o-mini",
        context_window: 128_000,
        openrouter_name: Some("openai/gpt-4o-mini"),
        openai: true,
    },
    ModelSpec {
        name: "gpt-4",
        context_window: 8_192,
        openrouter_name: None,
        openai: true,
    },
    ModelSpec {
        name: "gpt-3.5-turbo",
        context_window: 16_385,
        openrouter_name: None,
        openai: true,
    },
    ModelSpec {
        name: "gemini-2.5-pro",
        context_window: 1_000_000,
        openrouter_name: Some("google/gemini-2.5-pro"),
        openai: false,
    },
    ModelSpec {
        name: "gemini-1.5-pro",
        context_window: 1_000_000,
        openrouter_name: Some("google/gemini-pro-1.5"),
        openai: false,
    },
    ModelSpec {
        name: "gemini-1.5-flash",
        context_window: 1_000_000,
        openrouter_name: Some("google/gemini-flash-1.5"),
        openai: false,
    },
    ModelSpec {
        name: "claude-3.5-sonnet",
        context_window: 200_000,
        openrouter_name: Some("anthropic/claude-3.5-sonnet"),
        openai: false,
    },
    ModelSpec {
        name: "claude-3-opus",
        context_window: 200_000,
        openrouter_name: Some("anthropic/claude-3-opus"),
        openai: false,
    },
    ModelSpec {
        name: "claude-3-haiku",
        context_window: 200_000,
        openrouter_name: Some("anthropic/claude-3-haiku"),
        openai: false,
    },
    ModelSpec {
        name: "llama-3.1-70b",
        context_window: 131_072,
        openrouter_name: Some("meta-llama/llama-3.1-70b-instruct"),
        openai: false,
    },
    ModelSpec {
        name: "mixtral-8x7b",
        context_window: 32_768,
        openrouter_name: Some("mistralai/mixtral-8x7b-instruct"),
        openai: false,
    },
];

/// Look up a model by its short name.
pub fn lookup(name: &str) -> Option<&'static ModelSpec> {
    MODELS.iter().find(|spec| spec.name == name)
}

/// Models available through a provider. Ollama models are whatever is pulled
/// locally, so the catalog lists none for it.
pub fn models_for(provider: ProviderType) -> Vec<&'static ModelSpec> {
    MODELS
        .iter()
        .filter(|spec| match provider {
            ProviderType::OpenAI => spec.openai,
            ProviderType::OpenRouter => spec.openrouter_name.is_some(),
            ProviderType::Ollama => false,
        })
        .collect()
}

/// All catalog entries.
pub fn all_models() -> &'static [ModelSpec] {
    MODELS
}

/// Resolve the name OpenRouter expects. Unknown names pass through unchanged
/// so fully-qualified ids like `vendor/model` keep working.
pub fn openrouter_name(name: &str) -> &str {
    lookup(name)
        .and_then(|spec| spec.openrouter_name)
        .unwrap_or(name)
}

/// Chunk ceiling in characters for a model name.
pub fn chunk_ceiling(model_name: &str) -> usize {
    CHUNK_CEILING_RULES
        .iter()
        .find(|(fragment, _)| model_name.contains(fragment))
        .map(|(_, ceiling)| *ceiling)
        .unwrap_or(DEFAULT_CHUNK_CEILING)
}

/// Build model metadata for a provider/model pair.
pub fn model_info(provider: ProviderType, model_name: &str) -> ModelInfo {
    let context_window = lookup(model_name)
        .map(|spec| spec.context_window)
        .unwrap_or(DEFAULT_CONTEXT_WINDOW);

    ModelInfo {
        name: model_name.to_string(),
        provider: provider.as_str().to_string(),
        context_window,
        max_chunk_chars: chunk_ceiling(model_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_ceiling_rule_order() {
        assert_eq!(chunk_ceiling("gemini-2.5-pro"), 80_000);
        assert_eq!(chunk_ceiling("gemini-1.5-flash"), 60_000);
        assert_eq!(chunk_ceiling("claude-3-haiku"), 50_000);
        assert_eq!(chunk_ceiling("gpt-5-mini"), 70_000);
        assert_eq!(chunk_ceiling("gpt-4o-mini"), 40_000);
        assert_eq!(chunk_ceiling("gpt-4"), 20_000);
        assert_eq!(chunk_ceiling("llama3.2"), DEFAULT_CHUNK_CEILING);
    }

    #[test]
    fn test_model_info_known() {
        let info = model_info(ProviderType::OpenAI, "gpt-5-mini");
        assert_eq!(info.name, "gpt-5-mini");
        assert_eq!(info.provider, "openai");
        assert_eq!(info.context_window, 400_000);
        assert_eq!(info.max_chunk_chars, 70_000);
    }

    #[test]
    fn test_model_info_unknown_falls_back() {
        let info = model_info(ProviderType::Ollama, "llama3.2");
        assert_eq!(info.context_window, DEFAULT_CONTEXT_WINDOW);
        assert_eq!(info.max_chunk_chars, DEFAULT_CHUNK_CEILING);
    }

    #[test]
    fn test_openrouter_name_mapping() {
        assert_eq!(openrouter_name("gemini-2.5-pro"), "google/gemini-2.5-pro");
        assert_eq!(openrouter_name("qwen/qwen-2.5-72b"), "qwen/qwen-2.5-72b");
    }

    #[test]
    fn test_models_for_provider() {
        let openai = models_for(ProviderType::OpenAI);
        assert!(openai.iter().any(|m| m.name == "gpt-4"));
        assert!(!openai.iter().any(|m| m.name == "gemini-2.5-pro"));

        let openrouter = models_for(ProviderType::OpenRouter);
        assert!(openrouter.iter().any(|m| m.name == "claude-3.5-sonnet"));
        assert!(!openrouter.iter().any(|m| m.name == "gpt-4"));

        assert!(models_for(ProviderType::Ollama).is_empty());
    }
}
