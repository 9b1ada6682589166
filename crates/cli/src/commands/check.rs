//! Check command handler.
//!
//! Report mode: prints the issues found to stdout and saves them to a
//! `results_*.txt` file unless `--no-save` is given.

use super::{build_proofreader, RunArgs};
use clap::Args;
use proofread_core::{config::AppConfig, AppResult};
use proofread_pipeline::ChunkOutcome;
use std::path::PathBuf;

/// List issues in a document
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Document to proofread (.docx, .txt, .md)
    pub file: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,

    /// Do not save the report to a file
    #[arg(long)]
    pub no_save: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing check command");
        tracing::debug!("Check options: {:?}", self);

        let proofreader = build_proofreader(config, &self.run, !self.json)?;
        let outcome = proofreader.report_file(&self.file, !self.no_save).await?;

        if self.json {
            let failures: Vec<_> = outcome
                .results
                .iter()
                .filter_map(|r| match &r.outcome {
                    ChunkOutcome::Failure(cause) => Some(serde_json::json!({
                        "chunk": r.index + 1,
                        "cause": cause,
                    })),
                    ChunkOutcome::Success(_) => None,
                })
                .collect();

            let output = serde_json::json!({
                "file": self.file,
                "provider": config.provider,
                "model": config.model,
                "chunks": outcome.results.len(),
                "failedChunks": failures,
                "report": outcome.report,
                "savedTo": outcome.saved_to,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        if outcome.report.trim().is_empty() {
            println!("{}", config.proofread.sentinel);
        } else {
            println!("{}", outcome.report.trim());
        }

        if outcome.failed_chunks() > 0 {
            eprintln!(
                "Warning: {} of {} chunks failed; their errors are included in the report",
                outcome.failed_chunks(),
                outcome.results.len()
            );
        }
        if let Some(ref saved) = outcome.saved_to {
            eprintln!("Report saved to {}", saved.display());
        }

        Ok(())
    }
}
