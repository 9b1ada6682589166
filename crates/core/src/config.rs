//! Configuration management for the proofreader.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Config files (.proofread/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win. The configuration is workspace-centric, with optional
//! state (config, prompt overrides) stored in `.proofread/`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers the factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 3] = ["openai", "openrouter", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .proofread/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider ("openai", "openrouter", "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Explicit API key (overrides provider-specific environment variables)
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Provider configurations from config.yaml
    pub llm: Option<LlmConfig>,

    /// Chunking and dispatch settings
    pub proofread: ProofreadSettings,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Environment variable holding the API key
    #[serde(rename = "apiKeyEnv", default)]
    pub api_key_env: Option<String>,

    /// Model to use when this provider is active
    #[serde(default)]
    pub model: Option<String>,

    /// Custom API base URL
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Chunking and dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProofreadSettings {
    /// Chunk size mode: "auto", "<N>w" or "<N>c". `None` uses the default budget.
    pub chunk_size: Option<String>,

    /// Dispatch chunks concurrently
    pub parallel: bool,

    /// Worker pool size for concurrent dispatch
    pub max_workers: usize,

    /// Directory for output artifacts
    pub save_dir: Option<PathBuf>,

    /// Model reply meaning "nothing to correct"
    pub sentinel: String,

    /// Optional cap on completion tokens per chunk
    pub max_output_tokens: Option<u32>,

    /// Overrides the per-model chunk ceiling used by `auto` sizing
    pub max_chunk_chars: Option<usize>,
}

impl Default for ProofreadSettings {
    fn default() -> Self {
        Self {
            chunk_size: None,
            parallel: true,
            max_workers: 3,
            save_dir: None,
            sentinel: "No issues were found.".to_string(),
            max_output_tokens: None,
            max_chunk_chars: None,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
    proofread: Option<ProofreadSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "openai".to_string(),
            model: "gpt-5-mini".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
            proofread: ProofreadSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML config file and environment variables.
    ///
    /// Environment variables:
    /// - `PROOFREAD_WORKSPACE`: Override workspace path
    /// - `PROOFREAD_CONFIG`: Path to config file
    /// - `PROOFREAD_PROVIDER`: LLM provider
    /// - `PROOFREAD_MODEL`: Model identifier
    /// - `PROOFREAD_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Like [`AppConfig::load`], but an explicit workspace or config file
    /// (from CLI flags) decides which config.yaml is read.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("PROOFREAD_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        if let Some(config_file) =
            config_file.or_else(|| std::env::var("PROOFREAD_CONFIG").ok().map(PathBuf::from))
        {
            config.config_file = Some(config_file);
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.proofread_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("PROOFREAD_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("PROOFREAD_MODEL") {
            config.model = model;
        }

        if let Ok(key) = std::env::var("PROOFREAD_API_KEY") {
            config.api_key = Some(key);
        }

        if config.log_level.is_none() {
            config.log_level = std::env::var("RUST_LOG").ok();
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(model) = llm
                .providers
                .get(&llm.active_provider)
                .and_then(|pc| pc.model.clone())
            {
                result.model = model;
            }

            result.llm = Some(llm);
        }

        if let Some(settings) = config_file.proofread {
            result.proofread = settings;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .proofread directory.
    pub fn proofread_dir(&self) -> PathBuf {
        self.workspace.join(".proofread")
    }

    /// Get the configuration for a provider, if config.yaml declares one.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Resolve the API base URL override for a provider.
    pub fn resolve_endpoint(&self, provider: &str) -> Option<String> {
        self.get_provider_config(provider)
            .and_then(|pc| pc.endpoint.clone())
    }

    /// Resolve the request timeout (seconds) for a provider.
    pub fn resolve_timeout(&self, provider: &str) -> Option<u64> {
        self.get_provider_config(provider).and_then(|pc| pc.timeout)
    }

    /// Resolve the API key for a provider.
    ///
    /// Order: explicit key, the provider's configured `apiKeyEnv`, then the
    /// provider's conventional variable. OpenRouter falls back to `OPENAI_API_KEY`.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        if let Some(env_var) = self
            .get_provider_config(provider)
            .and_then(|pc| pc.api_key_env.as_deref())
        {
            if let Ok(key) = std::env::var(env_var) {
                return Some(key);
            }
        }

        let candidates: &[&str] = match provider {
            "openai" => &["OPENAI_API_KEY"],
            "openrouter" => &["OPENROUTER_API_KEY", "OPENAI_API_KEY"],
            _ => &[],
        };

        candidates
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|k| !k.is_empty()))
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.as_str();

        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider != "ollama" && self.resolve_api_key(provider).is_none() {
            let hint = match provider {
                "openrouter" => "OPENROUTER_API_KEY or OPENAI_API_KEY",
                _ => "OPENAI_API_KEY",
            };
            return Err(AppError::Config(format!(
                "API key for provider '{}' not found. Please set {} (or PROOFREAD_API_KEY).",
                provider, hint
            )));
        }

        if self.proofread.max_workers == 0 {
            return Err(AppError::Config(
                "maxWorkers must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, "gpt-5-mini");
        assert!(config.proofread.parallel);
        assert_eq!(config.proofread.max_workers, 3);
        assert_eq!(config.proofread.sentinel, "No issues were found.");
        assert!(config.proofread.chunk_size.is_none());
    }

    #[test]
    fn test_proofread_dir() {
        let config = AppConfig::default();
        assert!(config.proofread_dir().ends_with(".proofread"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            None,
            Some("openrouter".to_string()),
            Some("gemini-2.5-pro".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "openrouter");
        assert_eq!(overridden.model, "gemini-2.5-pro");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_load_from_explicit_workspace() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(".proofread");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.yaml"), "proofread:\n  maxWorkers: 7\n").unwrap();

        let config = AppConfig::load_from(Some(temp_dir.path().to_path_buf()), None).unwrap();
        assert_eq!(config.workspace, temp_dir.path());
        assert_eq!(config.proofread.max_workers, 7);
    }

    #[test]
    fn test_load_from_missing_workspace() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nowhere");

        let result = AppConfig::load_from(Some(missing), None);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_merge_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
llm:
  activeProvider: ollama
  providers:
    ollama:
      endpoint: http://localhost:11434
      model: llama3.2
      timeout: 120
logging:
  level: debug
  color: false
proofread:
  chunkSize: 3000w
  maxWorkers: 5
  parallel: false
"#,
        )
        .unwrap();

        let merged = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(merged.provider, "ollama");
        assert_eq!(merged.model, "llama3.2");
        assert_eq!(merged.log_level.as_deref(), Some("debug"));
        assert!(merged.no_color);
        assert_eq!(merged.proofread.chunk_size.as_deref(), Some("3000w"));
        assert_eq!(merged.proofread.max_workers, 5);
        assert!(!merged.proofread.parallel);
        // Unspecified settings keep their defaults
        assert_eq!(merged.proofread.sentinel, "No issues were found.");
        assert_eq!(
            merged.resolve_endpoint("ollama").as_deref(),
            Some("http://localhost:11434")
        );
        assert_eq!(merged.resolve_timeout("ollama"), Some(120));
    }

    #[test]
    fn test_merge_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "llm: [unclosed").unwrap();

        let result = AppConfig::default().merge_yaml(&path);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = AppConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key("openai").as_deref(), Some("sk-test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_provider() {
        let config = AppConfig {
            provider: "unknown".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ollama_needs_no_key() {
        let config = AppConfig {
            provider: "ollama".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_workers() {
        let mut config = AppConfig {
            provider: "ollama".to_string(),
            ..Default::default()
        };
        config.proofread.max_workers = 0;
        assert!(config.validate().is_err());
    }
}
