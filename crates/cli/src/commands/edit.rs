//! Edit command handler.
//!
//! Inline-edit mode: writes `{stem}_corrected_{timestamp}.{ext}` next to the
//! source (or into `--save-dir`) and prints its path.

use super::{build_proofreader, RunArgs};
use clap::Args;
use proofread_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Write a corrected copy of a document
#[derive(Args, Debug)]
pub struct EditCommand {
    /// Document to proofread (.docx, .txt, .md)
    pub file: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl EditCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing edit command");
        tracing::debug!("Edit options: {:?}", self);

        let proofreader = build_proofreader(config, &self.run, !self.json)?;
        let outcome = proofreader.edit_file(&self.file).await?;

        if self.json {
            let output = serde_json::json!({
                "file": self.file,
                "correctedFile": outcome.saved_to,
                "paragraphs": outcome.paragraphs.len(),
                "chunks": outcome.results.len(),
                "failedChunks": outcome.failed_chunks(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        if outcome.failed_chunks() > 0 {
            eprintln!(
                "Warning: {} of {} chunks failed and were left unchanged",
                outcome.failed_chunks(),
                outcome.results.len()
            );
        }
        if let Some(ref saved) = outcome.saved_to {
            println!("{}", saved.display());
        }

        Ok(())
    }
}
