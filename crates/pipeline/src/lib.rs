//! Document proofreading pipeline.
//!
//! Reads a document as formatted paragraphs, encodes formatting as inline
//! tags, splits the text into size-bounded chunks, sends the chunks to an LLM
//! (sequentially or on a bounded worker pool) and either aggregates a report
//! or rebuilds a corrected document with formatting and paragraph styles kept.

pub mod aggregate;
pub mod budget;
pub mod chunker;
pub mod codec;
pub mod dispatch;
pub mod document;
pub mod export;
pub mod progress;
pub mod proofreader;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use budget::{BudgetCheck, BudgetPolicy, BudgetSource, Recommendation, SizeBudget, SizingMode};
pub use chunker::{chunk_paragraphs, Chunk};
pub use codec::{decode, encode_paragraph, Paragraph, Run, PARAGRAPH_SEPARATOR};
pub use dispatch::{ChunkOutcome, ChunkResult, DispatchEngine, DispatchOptions};
pub use document::{read_paragraphs, write_paragraphs, DocumentFormat};
pub use progress::{ProgressCallback, ProgressEvent, ProgressReporter};
pub use proofreader::{ChunkPlan, EditOutcome, ProofreadOptions, Proofreader, ReportOutcome};
