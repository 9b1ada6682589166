//! Models command handler.

use clap::Args;
use proofread_core::{config::AppConfig, AppError, AppResult};
use proofread_llm::{catalog, ProviderType};
use proofread_pipeline::BudgetPolicy;

/// List known models
#[derive(Args, Debug)]
pub struct ModelsCommand {
    /// Only models served by this provider (openai, openrouter)
    #[arg(value_name = "PROVIDER")]
    pub only: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ModelsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing models command");

        let specs = match self.only {
            Some(ref name) => {
                let provider = ProviderType::parse(name)
                    .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", name)))?;
                catalog::models_for(provider)
            }
            None => catalog::all_models().iter().collect(),
        };

        let policy = BudgetPolicy::default();
        let rows: Vec<_> = specs
            .iter()
            .map(|spec| {
                let info = catalog::model_info(ProviderType::OpenAI, spec.name);
                (spec, policy.optimal_chars(&info))
            })
            .collect();

        if self.json {
            let output: Vec<_> = rows
                .iter()
                .map(|(spec, optimal)| {
                    serde_json::json!({
                        "name": spec.name,
                        "contextWindow": spec.context_window,
                        "openrouterName": spec.openrouter_name,
                        "openai": spec.openai,
                        "autoChunkChars": optimal,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        if rows.is_empty() {
            println!("No catalog models for this provider; any locally pulled model works.");
            return Ok(());
        }

        println!("{:<20} {:>10} {:>10}  OPENROUTER", "MODEL", "CONTEXT", "AUTO");
        for (spec, optimal) in &rows {
            let marker = if spec.name == config.model { "*" } else { " " };
            println!(
                "{}{:<19} {:>10} {:>9}c  {}",
                marker,
                spec.name,
                spec.context_window,
                optimal,
                spec.openrouter_name.unwrap_or("-")
            );
        }

        Ok(())
    }
}
