//! Paragraph-aligned chunking of encoded documents.

use crate::codec::{encode_paragraph, Paragraph, PARAGRAPH_SEPARATOR};
use proofread_core::{AppError, AppResult};
use std::ops::Range;

/// A contiguous slice of the encoded document sent to the LLM as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based position in the chunk sequence.
    pub index: usize,

    /// Encoded paragraphs, each followed by the separator.
    pub text: String,

    /// Source paragraphs covered by this chunk.
    pub paragraphs: Range<usize>,
}

impl Chunk {
    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Chunk a document's paragraphs under a character budget.
pub fn chunk_paragraphs(paragraphs: &[Paragraph], budget_chars: usize) -> AppResult<Vec<Chunk>> {
    let encoded: Vec<String> = paragraphs.iter().map(encode_paragraph).collect();
    chunk_encoded(&encoded, budget_chars)
}

/// Chunk already-encoded paragraphs.
///
/// Paragraphs are appended whole; once the buffer exceeds the budget it is
/// flushed. A paragraph longer than the budget therefore becomes one oversized
/// chunk, and chunk boundaries only ever fall on separators.
pub fn chunk_encoded(encoded: &[String], budget_chars: usize) -> AppResult<Vec<Chunk>> {
    if budget_chars == 0 {
        return Err(AppError::Config(
            "Chunk budget must be a positive number of characters".to_string(),
        ));
    }

    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_chars = 0usize;
    let mut first_paragraph = 0usize;

    for (i, paragraph) in encoded.iter().enumerate() {
        buffer.push_str(paragraph);
        buffer.push_str(PARAGRAPH_SEPARATOR);
        buffer_chars += paragraph.chars().count() + PARAGRAPH_SEPARATOR.len();

        if buffer_chars > budget_chars {
            chunks.push(Chunk {
                index: chunks.len(),
                text: std::mem::take(&mut buffer),
                paragraphs: first_paragraph..i + 1,
            });
            buffer_chars = 0;
            first_paragraph = i + 1;
        }
    }

    if !buffer.is_empty() {
        chunks.push(Chunk {
            index: chunks.len(),
            text: buffer,
            paragraphs: first_paragraph..encoded.len(),
        });
    }

    tracing::debug!(
        paragraphs = encoded.len(),
        chunks = chunks.len(),
        budget_chars,
        "Chunked document"
    );

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_document, Run};

    fn paragraphs(texts: &[&str]) -> Vec<Paragraph> {
        texts
            .iter()
            .map(|t| Paragraph::new(vec![Run::plain(*t)]))
            .collect()
    }

    #[test]
    fn test_single_chunk_when_under_budget() {
        let doc = paragraphs(&["One.", "Two.", "Three."]);
        let chunks = chunk_paragraphs(&doc, 1000).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "One.  \nTwo.  \nThree.  \n");
        assert_eq!(chunks[0].paragraphs, 0..3);
    }

    #[test]
    fn test_flush_after_exceeding_budget() {
        // Each encoded paragraph is 10 chars including the separator
        let doc = paragraphs(&["aaaaaaa", "bbbbbbb", "ccccccc"]);
        let chunks = chunk_paragraphs(&doc, 15).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "aaaaaaa  \nbbbbbbb  \n");
        assert_eq!(chunks[0].paragraphs, 0..2);
        assert_eq!(chunks[1].text, "ccccccc  \n");
        assert_eq!(chunks[1].paragraphs, 2..3);
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn test_oversized_paragraph_is_its_own_chunk() {
        let long = "x".repeat(50);
        let doc = paragraphs(&["short", &long, "tail"]);
        let chunks = chunk_paragraphs(&doc, 20).unwrap();

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.contains(&long));
        assert!(chunks[0].char_count() > 20);
        assert_eq!(chunks[1].text, "tail  \n");
    }

    #[test]
    fn test_concatenation_reproduces_document() {
        let doc = vec![
            Paragraph::new(vec![Run::bold("Title")]),
            Paragraph::default(),
            Paragraph::new(vec![Run::plain("Body "), Run::italic("text"), Run::plain(".")]),
            Paragraph::new(vec![Run::bold_italic("End")]),
        ];
        let chunks = chunk_paragraphs(&doc, 12).unwrap();
        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();

        assert!(chunks.len() > 1);
        assert_eq!(joined, encode_document(&doc));
    }

    #[test]
    fn test_budget_counts_characters_not_bytes() {
        // 4 chars + separator = 7 chars, but 11 bytes
        let doc = paragraphs(&["éééé", "éééé"]);
        let chunks = chunk_paragraphs(&doc, 8).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_empty_document() {
        assert!(chunk_paragraphs(&[], 100).unwrap().is_empty());
    }

    #[test]
    fn test_zero_budget_is_config_error() {
        let doc = paragraphs(&["a"]);
        assert!(matches!(chunk_paragraphs(&doc, 0), Err(AppError::Config(_))));
    }
}
