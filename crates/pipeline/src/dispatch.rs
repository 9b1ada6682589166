//! Dispatch engine: sends chunks to the LLM sequentially or on a bounded
//! worker pool, returning one result per chunk in chunk order.

use crate::chunker::Chunk;
use crate::progress::ProgressReporter;
use proofread_core::{AppError, AppResult};
use proofread_llm::{ClientSource, LlmClient, LlmRequest};
use proofread_prompt::{PromptSet, ProofreadMode};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// What happened to one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    Success(String),
    Failure(String),
}

/// The outcome for the chunk at `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkResult {
    pub index: usize,
    pub outcome: ChunkOutcome,
}

impl ChunkResult {
    pub fn success(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            outcome: ChunkOutcome::Success(text.into()),
        }
    }

    pub fn failure(index: usize, cause: impl Into<String>) -> Self {
        Self {
            index,
            outcome: ChunkOutcome::Failure(cause.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ChunkOutcome::Success(_))
    }

    /// Text to use downstream. Failures fall back to an error line in report
    /// mode and to the untouched chunk in inline-edit mode.
    pub fn resolve(&self, mode: ProofreadMode, original: &Chunk) -> String {
        match &self.outcome {
            ChunkOutcome::Success(text) => text.clone(),
            ChunkOutcome::Failure(cause) => match mode {
                ProofreadMode::Report => {
                    format!("Error processing chunk {}: {}", self.index + 1, cause)
                }
                ProofreadMode::InlineEdit => original.text.clone(),
            },
        }
    }
}

/// Dispatch settings.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub mode: ProofreadMode,

    /// Use the worker pool when there is more than one chunk
    pub parallel: bool,

    /// Worker pool size
    pub max_workers: usize,

    /// Extra user guidance sent with every chunk
    pub additional_instructions: Option<String>,

    /// Completion length limit forwarded to the provider
    pub max_output_tokens: Option<u32>,
}

impl DispatchOptions {
    pub fn new(mode: ProofreadMode) -> Self {
        Self {
            mode,
            parallel: true,
            max_workers: 3,
            additional_instructions: None,
            max_output_tokens: None,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.additional_instructions = instructions;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Sends chunks to the LLM and collects per-chunk outcomes.
pub struct DispatchEngine {
    prompts: Arc<PromptSet>,
    options: Arc<DispatchOptions>,
    progress: ProgressReporter,
}

impl DispatchEngine {
    pub fn new(prompts: PromptSet, options: DispatchOptions) -> Self {
        Self {
            prompts: Arc::new(prompts),
            options: Arc::new(options),
            progress: ProgressReporter::noop(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Process every chunk. `result[i]` always belongs to `chunks[i]`, and a
    /// failing chunk never affects its siblings.
    pub async fn dispatch(
        &self,
        chunks: &[Chunk],
        source: Arc<dyn ClientSource>,
    ) -> Vec<ChunkResult> {
        if chunks.len() <= 1 || !self.options.parallel {
            self.dispatch_sequential(chunks, source.as_ref()).await
        } else {
            self.dispatch_concurrent(chunks, source).await
        }
    }

    async fn dispatch_sequential(
        &self,
        chunks: &[Chunk],
        source: &dyn ClientSource,
    ) -> Vec<ChunkResult> {
        tracing::info!(chunks = chunks.len(), mode = self.options.mode.as_str(), "Dispatching sequentially");

        let client = match source.create_client() {
            Ok(client) => client,
            Err(e) => {
                let cause = e.to_string();
                tracing::error!(error = %cause, "Failed to create LLM client");
                return chunks
                    .iter()
                    .map(|chunk| ChunkResult::failure(chunk.index, cause.clone()))
                    .collect();
            }
        };

        let total = chunks.len();
        let mut results = Vec::with_capacity(total);
        for (i, chunk) in chunks.iter().enumerate() {
            self.progress.chunk_started(i, total, chunk.index);
            let result = process_chunk(
                client.as_ref(),
                &self.prompts,
                &self.options,
                &chunk.text,
            )
            .await;
            let outcome = self.record(result, i + 1, total, chunk.index);
            results.push(ChunkResult {
                index: chunk.index,
                outcome,
            });
        }
        results
    }

    async fn dispatch_concurrent(
        &self,
        chunks: &[Chunk],
        source: Arc<dyn ClientSource>,
    ) -> Vec<ChunkResult> {
        let total = chunks.len();
        let workers = self.options.max_workers.clamp(1, total);
        tracing::info!(
            chunks = total,
            workers,
            mode = self.options.mode.as_str(),
            "Dispatching on worker pool"
        );

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();
        let mut slot_of = HashMap::with_capacity(total);

        for (slot, chunk) in chunks.iter().enumerate() {
            let semaphore = semaphore.clone();
            let source = source.clone();
            let prompts = self.prompts.clone();
            let options = self.options.clone();
            let progress = self.progress.clone();
            let text = chunk.text.clone();
            let index = chunk.index;

            let handle = tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::Other(format!("Worker pool closed: {}", e)))?;
                progress.chunk_started(slot, total, index);

                // Each task owns its client
                let client = source.create_client()?;
                process_chunk(client.as_ref(), &prompts, &options, &text).await
            });
            slot_of.insert(handle.id(), slot);
        }

        let mut slots: Vec<Option<ChunkOutcome>> = (0..total).map(|_| None).collect();
        let mut completed = 0;

        while let Some(joined) = tasks.join_next_with_id().await {
            completed += 1;
            let (id, result) = match joined {
                Ok((id, result)) => (id, result),
                Err(join_error) => (
                    join_error.id(),
                    Err(AppError::Other(format!("Chunk task crashed: {}", join_error))),
                ),
            };

            let Some(&slot) = slot_of.get(&id) else {
                tracing::error!(task = %id, "Finished task has no chunk slot");
                continue;
            };
            slots[slot] = Some(self.record(result, completed, total, chunks[slot].index));
        }

        slots
            .into_iter()
            .zip(chunks)
            .map(|(outcome, chunk)| ChunkResult {
                index: chunk.index,
                outcome: outcome.unwrap_or_else(|| {
                    ChunkOutcome::Failure("Chunk task produced no result".to_string())
                }),
            })
            .collect()
    }

    /// Log and report a chunk's outcome.
    fn record(
        &self,
        result: AppResult<String>,
        completed: usize,
        total: usize,
        index: usize,
    ) -> ChunkOutcome {
        match result {
            Ok(text) => {
                tracing::info!(chunk = index + 1, total, "Chunk completed");
                self.progress.chunk_completed(completed, total, index);
                ChunkOutcome::Success(text)
            }
            Err(e) => {
                let cause = e.to_string();
                tracing::warn!(chunk = index + 1, total, error = %cause, "Chunk failed");
                self.progress.chunk_failed(completed, total, index, &cause);
                ChunkOutcome::Failure(cause)
            }
        }
    }
}

/// One chunk, one completion.
async fn process_chunk(
    client: &dyn LlmClient,
    prompts: &PromptSet,
    options: &DispatchOptions,
    chunk_text: &str,
) -> AppResult<String> {
    let messages = prompts.build_messages(
        options.mode,
        chunk_text,
        options.additional_instructions.as_deref(),
    )?;

    let mut request = LlmRequest::new(messages).with_temperature(options.mode.temperature());
    if let Some(max_tokens) = options.max_output_tokens {
        request = request.with_max_tokens(max_tokens);
    }

    let response = client.complete(&request).await?;
    tracing::debug!(
        model = %response.model,
        total_tokens = response.usage.total_tokens,
        "Chunk completion received"
    );

    Ok(normalize(options.mode, prompts.sentinel(), response.content))
}

/// In report mode the "no issues" sentinel becomes an empty result.
fn normalize(mode: ProofreadMode, sentinel: &str, text: String) -> String {
    if mode == ProofreadMode::Report && text.trim() == sentinel.trim() {
        String::new()
    } else {
        text
    }
}
