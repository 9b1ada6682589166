//! Plan command handler.
//!
//! Shows the resolved chunk budget and the chunks a document would be split
//! into. Model metadata comes from the catalog, so no API key is needed.

use super::RunArgs;
use clap::Args;
use proofread_core::{config::AppConfig, AppError, AppResult};
use proofread_llm::{catalog, ModelInfo, ProviderType};
use proofread_pipeline::{
    chunk_paragraphs, read_paragraphs, BudgetPolicy, BudgetSource, Chunk, SizeBudget,
};
use std::path::PathBuf;

/// Show how a document would be chunked
#[derive(Args, Debug)]
pub struct PlanCommand {
    /// Document to plan (.docx, .txt, .md)
    pub file: PathBuf,

    /// Chunk size: "auto", "<N>w" (words) or "<N>c" (characters)
    #[arg(long)]
    pub chunk_size: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PlanCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing plan command");
        tracing::debug!("Plan options: {:?}", self);

        let options = RunArgs {
            chunk_size: self.chunk_size.clone(),
            ..Default::default()
        }
        .options(config);

        let model = catalog_model(config, options.max_chunk_chars)?;
        let budget = options
            .policy
            .resolve_budget(options.chunk_size.as_deref(), &model)?;
        let paragraphs = read_paragraphs(&self.file)?;
        let chunks = chunk_paragraphs(&paragraphs, budget.chars)?;

        if self.json {
            let output = serde_json::json!({
                "file": self.file,
                "model": model,
                "budget": {
                    "chars": budget.chars,
                    "source": source_label(&budget),
                    "optimal": budget.optimal,
                    "warning": budget.check.message(),
                },
                "paragraphs": paragraphs.len(),
                "chunks": chunks
                    .iter()
                    .map(|c| serde_json::json!({
                        "index": c.index,
                        "paragraphs": [c.paragraphs.start, c.paragraphs.end],
                        "chars": c.char_count(),
                    }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        self.print_plan(&model, &budget, paragraphs.len(), &chunks, &options.policy);
        Ok(())
    }

    fn print_plan(
        &self,
        model: &ModelInfo,
        budget: &SizeBudget,
        paragraph_count: usize,
        chunks: &[Chunk],
        policy: &BudgetPolicy,
    ) {
        println!("File: {}", self.file.display());
        println!(
            "Model: {} ({}), context window {} tokens, ceiling {}c",
            model.name, model.provider, model.context_window, model.max_chunk_chars
        );
        println!(
            "Chunk size: {}c ({}), optimal {}c",
            budget.chars,
            source_label(budget),
            budget.optimal
        );
        if let Some(message) = budget.check.message() {
            println!("Warning: {}", message);
        }

        println!("\n{} paragraphs in {} chunks:", paragraph_count, chunks.len());
        for chunk in chunks {
            println!(
                "  {:>3}. paragraphs {}-{}, {} chars",
                chunk.index + 1,
                chunk.paragraphs.start + 1,
                chunk.paragraphs.end,
                chunk.char_count()
            );
        }

        println!("\nRecommended chunk sizes:");
        for rec in policy.recommendations(model) {
            println!("  {:<13} {:<8} {}", rec.name, rec.value, rec.description);
        }
    }
}

/// Catalog metadata for the configured provider and model.
fn catalog_model(config: &AppConfig, ceiling: Option<usize>) -> AppResult<ModelInfo> {
    let provider = ProviderType::parse(&config.provider).ok_or_else(|| {
        AppError::Config(format!("Unknown provider: {}", config.provider))
    })?;

    let info = catalog::model_info(provider, &config.model);
    Ok(match ceiling {
        Some(ceiling) => info.with_max_chunk_chars(ceiling),
        None => info,
    })
}

fn source_label(budget: &SizeBudget) -> String {
    match budget.source {
        BudgetSource::Default => "default".to_string(),
        BudgetSource::Auto => "auto".to_string(),
        BudgetSource::Explicit(mode) => mode.to_string(),
    }
}
