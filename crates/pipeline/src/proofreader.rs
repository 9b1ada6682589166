//! The end-to-end proofreading pipeline.
//!
//! `plan` sizes and chunks a document without calling the LLM. `report` and
//! `edit` plan, dispatch and aggregate. Every configuration or budget error is
//! raised while planning, before the first completion request.

use crate::aggregate::{aggregate_report, reassemble, resolve_outputs};
use crate::budget::{BudgetPolicy, SizeBudget};
use crate::chunker::{chunk_paragraphs, Chunk};
use crate::codec::Paragraph;
use crate::dispatch::{ChunkResult, DispatchEngine, DispatchOptions};
use crate::document::{read_paragraphs, write_paragraphs};
use crate::export::{corrected_path, ensure_parent, save_report, timestamp};
use crate::progress::ProgressReporter;
use proofread_core::{AppResult, ProofreadSettings};
use proofread_llm::{ClientSource, ModelInfo};
use proofread_prompt::{PromptSet, ProofreadMode};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Run settings.
#[derive(Debug, Clone)]
pub struct ProofreadOptions {
    /// "auto", "<N>w" or "<N>c"; `None` uses the policy default
    pub chunk_size: Option<String>,
    pub parallel: bool,
    pub max_workers: usize,
    pub additional_instructions: Option<String>,
    pub save_dir: Option<PathBuf>,
    pub max_output_tokens: Option<u32>,

    /// Replaces the model's chunk ceiling
    pub max_chunk_chars: Option<usize>,
    pub policy: BudgetPolicy,
}

impl Default for ProofreadOptions {
    fn default() -> Self {
        Self::from(&ProofreadSettings::default())
    }
}

impl From<&ProofreadSettings> for ProofreadOptions {
    fn from(settings: &ProofreadSettings) -> Self {
        Self {
            chunk_size: settings.chunk_size.clone(),
            parallel: settings.parallel,
            max_workers: settings.max_workers,
            additional_instructions: None,
            save_dir: settings.save_dir.clone(),
            max_output_tokens: settings.max_output_tokens,
            max_chunk_chars: settings.max_chunk_chars,
            policy: BudgetPolicy::default(),
        }
    }
}

/// How a document will be split, computed without any LLM call.
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    pub model: ModelInfo,
    pub budget: SizeBudget,
    pub chunks: Vec<Chunk>,
}

/// Result of report mode.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub report: String,
    pub results: Vec<ChunkResult>,
    pub saved_to: Option<PathBuf>,
}

/// Result of inline-edit mode.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub paragraphs: Vec<Paragraph>,
    pub results: Vec<ChunkResult>,
    pub saved_to: Option<PathBuf>,
}

fn failed_count(results: &[ChunkResult]) -> usize {
    results.iter().filter(|r| !r.is_success()).count()
}

impl ReportOutcome {
    pub fn failed_chunks(&self) -> usize {
        failed_count(&self.results)
    }
}

impl EditOutcome {
    pub fn failed_chunks(&self) -> usize {
        failed_count(&self.results)
    }
}

pub struct Proofreader {
    source: Arc<dyn ClientSource>,
    prompts: PromptSet,
    options: ProofreadOptions,
    progress: ProgressReporter,
}

impl Proofreader {
    pub fn new(source: Arc<dyn ClientSource>, prompts: PromptSet, options: ProofreadOptions) -> Self {
        Self {
            source,
            prompts,
            options,
            progress: ProgressReporter::noop(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn options(&self) -> &ProofreadOptions {
        &self.options
    }

    /// Model metadata, with the configured ceiling override applied.
    ///
    /// Building a client here also surfaces provider configuration errors
    /// before anything is dispatched.
    pub fn model_info(&self) -> AppResult<ModelInfo> {
        let client = self.source.create_client()?;
        let info = client.model_info();
        Ok(match self.options.max_chunk_chars {
            Some(ceiling) => info.with_max_chunk_chars(ceiling),
            None => info,
        })
    }

    /// Resolve the budget and chunk the document.
    pub fn plan(&self, paragraphs: &[Paragraph]) -> AppResult<ChunkPlan> {
        let model = self.model_info()?;
        let budget = self
            .options
            .policy
            .resolve_budget(self.options.chunk_size.as_deref(), &model)?;
        let chunks = chunk_paragraphs(paragraphs, budget.chars)?;

        tracing::info!(
            model = %model.name,
            budget_chars = budget.chars,
            paragraphs = paragraphs.len(),
            chunks = chunks.len(),
            "Planned document"
        );
        self.progress.planned(chunks.len(), budget.chars);

        Ok(ChunkPlan {
            model,
            budget,
            chunks,
        })
    }

    fn engine(&self, mode: ProofreadMode) -> DispatchEngine {
        let options = DispatchOptions::new(mode)
            .with_parallel(self.options.parallel)
            .with_max_workers(self.options.max_workers)
            .with_instructions(self.options.additional_instructions.clone())
            .with_max_output_tokens(self.options.max_output_tokens);

        DispatchEngine::new(self.prompts.clone(), options).with_progress(self.progress.clone())
    }

    /// Report mode: a list of issues, empty when nothing needs fixing.
    pub async fn report(&self, paragraphs: &[Paragraph]) -> AppResult<ReportOutcome> {
        let plan = self.plan(paragraphs)?;
        let results = self
            .engine(ProofreadMode::Report)
            .dispatch(&plan.chunks, self.source.clone())
            .await;

        let outputs = resolve_outputs(&results, &plan.chunks, ProofreadMode::Report);
        let report = aggregate_report(&outputs);

        tracing::info!(
            chunks = results.len(),
            failed = failed_count(&results),
            "Report complete"
        );

        Ok(ReportOutcome {
            report,
            results,
            saved_to: None,
        })
    }

    /// Inline-edit mode: corrected paragraphs with formatting and styles kept.
    pub async fn edit(&self, paragraphs: &[Paragraph]) -> AppResult<EditOutcome> {
        let plan = self.plan(paragraphs)?;
        let results = self
            .engine(ProofreadMode::InlineEdit)
            .dispatch(&plan.chunks, self.source.clone())
            .await;

        let corrected = resolve_outputs(&results, &plan.chunks, ProofreadMode::InlineEdit);
        let rebuilt = reassemble(paragraphs, &plan.chunks, &corrected);

        tracing::info!(
            chunks = results.len(),
            failed = failed_count(&results),
            paragraphs = rebuilt.len(),
            "Edit complete"
        );

        Ok(EditOutcome {
            paragraphs: rebuilt,
            results,
            saved_to: None,
        })
    }

    /// Proofread a file in report mode, optionally saving the report.
    pub async fn report_file(&self, path: &Path, save: bool) -> AppResult<ReportOutcome> {
        let paragraphs = read_paragraphs(path)?;
        let mut outcome = self.report(&paragraphs).await?;

        if save {
            let saved = save_report(path, self.options.save_dir.as_deref(), &outcome.report)?;
            self.progress.saved(&saved.display().to_string());
            outcome.saved_to = Some(saved);
        }
        Ok(outcome)
    }

    /// Proofread a file in inline-edit mode and write the corrected copy.
    pub async fn edit_file(&self, path: &Path) -> AppResult<EditOutcome> {
        let paragraphs = read_paragraphs(path)?;
        let mut outcome = self.edit(&paragraphs).await?;

        let target = corrected_path(path, self.options.save_dir.as_deref(), &timestamp());
        ensure_parent(&target)?;
        write_paragraphs(path, &target, &outcome.paragraphs)?;
        tracing::info!("Saved corrected document to {:?}", target);
        self.progress.saved(&target.display().to_string());

        outcome.saved_to = Some(target);
        Ok(outcome)
    }
}
