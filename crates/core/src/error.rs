//! Error types for the proofreader.
//!
//! A single enum covers every failure category: configuration, size budgets,
//! LLM providers, documents, prompts, I/O and serialization.

use thiserror::Error;

/// Unified error type for the proofreader.
///
/// All fallible functions return `Result<T, AppError>`. Configuration and
/// budget errors are raised before any LLM call is made; `Llm` errors are
/// normally recovered per chunk by the dispatch engine.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (invalid chunk size format, unknown provider, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chunk size budget outside the range the model can handle
    #[error("Chunk size rejected: {0}")]
    BudgetRejected(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Document reading and writing errors
    #[error("Document error: {0}")]
    Document(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Config("Invalid chunk format: 'bogus'".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid chunk format: 'bogus'"
        );

        let err = AppError::BudgetRejected("too small".to_string());
        assert!(err.to_string().starts_with("Chunk size rejected"));
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("a: [").unwrap_err();
        let err: AppError = yaml_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
