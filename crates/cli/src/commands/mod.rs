//! Command handlers for the proofread CLI.
//!
//! `check` and `edit` share [`RunArgs`] and the proofreader construction below.

pub mod check;
pub mod edit;
pub mod models;
pub mod plan;

pub use check::CheckCommand;
pub use edit::EditCommand;
pub use models::ModelsCommand;
pub use plan::PlanCommand;

use clap::Args;
use proofread_core::{config::AppConfig, AppResult};
use proofread_llm::ClientFactory;
use proofread_pipeline::{ProgressReporter, ProofreadOptions, Proofreader};
use proofread_prompt::PromptSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Options shared by the commands that chunk a document.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Chunk size: "auto", "<N>w" (words) or "<N>c" (characters)
    #[arg(long)]
    pub chunk_size: Option<String>,

    /// Additional instructions passed to the model with every chunk
    #[arg(short, long)]
    pub instructions: Option<String>,

    /// Process chunks one at a time
    #[arg(long)]
    pub no_parallel: bool,

    /// Number of concurrent requests
    #[arg(long)]
    pub workers: Option<usize>,

    /// Directory for output files
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
}

impl RunArgs {
    /// Configuration settings with command-line flags applied on top.
    pub fn options(&self, config: &AppConfig) -> ProofreadOptions {
        let mut options = ProofreadOptions::from(&config.proofread);

        if let Some(ref chunk_size) = self.chunk_size {
            options.chunk_size = Some(chunk_size.trim().to_string());
        }
        if self.instructions.is_some() {
            options.additional_instructions = self.instructions.clone();
        }
        if self.no_parallel {
            options.parallel = false;
        }
        if let Some(workers) = self.workers {
            options.max_workers = workers;
        }
        if self.save_dir.is_some() {
            options.save_dir = self.save_dir.clone();
        }

        options
    }
}

/// Build a proofreader for the configured provider and workspace prompts.
pub fn build_proofreader(
    config: &AppConfig,
    args: &RunArgs,
    show_progress: bool,
) -> AppResult<Proofreader> {
    let factory = ClientFactory::from_config(config)?;
    tracing::debug!(
        provider = factory.provider(),
        model = factory.model(),
        "Client factory ready"
    );

    let prompts = PromptSet::load(&config.workspace, config.proofread.sentinel.clone())?;
    let proofreader = Proofreader::new(Arc::new(factory), prompts, args.options(config));

    Ok(if show_progress {
        proofreader.with_progress(stderr_progress())
    } else {
        proofreader
    })
}

/// Progress lines on stderr; stdout is kept for command output.
fn stderr_progress() -> ProgressReporter {
    ProgressReporter::new(Arc::new(|event| eprintln!("{}", event.format_simple())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_override_config() {
        let mut config = AppConfig::default();
        config.proofread.chunk_size = Some("auto".to_string());
        config.proofread.max_workers = 5;

        let args = RunArgs {
            chunk_size: Some(" 8000w ".to_string()),
            no_parallel: true,
            ..Default::default()
        };
        let options = args.options(&config);

        assert_eq!(options.chunk_size.as_deref(), Some("8000w"));
        assert!(!options.parallel);
        assert_eq!(options.max_workers, 5);
        assert!(options.additional_instructions.is_none());
    }

    #[test]
    fn test_run_args_keep_config_defaults() {
        let config = AppConfig::default();
        let options = RunArgs::default().options(&config);

        assert!(options.parallel);
        assert_eq!(options.max_workers, 3);
        assert!(options.chunk_size.is_none());
    }
}
