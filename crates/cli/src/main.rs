//! Proofread CLI
//!
//! Main entry point for the proofread command-line tool.
//! Proofreads .docx and .txt documents with an LLM, chunk by chunk.

mod commands;

use clap::{Parser, Subcommand};
use commands::{CheckCommand, EditCommand, ModelsCommand, PlanCommand};
use proofread_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Proofread documents with an LLM, preserving bold and italic formatting
#[derive(Parser, Debug)]
#[command(name = "proofread")]
#[command(about = "Proofread documents with an LLM", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "PROOFREAD_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "PROOFREAD_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (openai, openrouter, ollama)
    #[arg(short, long, global = true, env = "PROOFREAD_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "PROOFREAD_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List issues in a document (report mode)
    Check(CheckCommand),

    /// Write a corrected copy of a document (inline-edit mode)
    Edit(EditCommand),

    /// Show how a document would be chunked, without calling the LLM
    Plan(PlanCommand),

    /// List known models
    Models(ModelsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // The workspace and config flags decide which config.yaml is read
    let config = AppConfig::load_from(cli.workspace.clone(), cli.config.clone())?;

    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Proofread CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Check(_) => "check",
        Commands::Edit(_) => "edit",
        Commands::Plan(_) => "plan",
        Commands::Models(_) => "models",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Check(cmd) => cmd.execute(&config).await,
        Commands::Edit(cmd) => cmd.execute(&config).await,
        Commands::Plan(cmd) => cmd.execute(&config),
        Commands::Models(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
