//! Turning per-chunk results back into a report or a document.

use crate::chunker::Chunk;
use crate::codec::{decode_paragraph, Paragraph, PARAGRAPH_SEPARATOR};
use crate::dispatch::ChunkResult;
use proofread_prompt::ProofreadMode;

/// Resolve every result to its final text, applying the mode's fallback.
pub fn resolve_outputs(results: &[ChunkResult], chunks: &[Chunk], mode: ProofreadMode) -> Vec<String> {
    results
        .iter()
        .zip(chunks)
        .map(|(result, chunk)| result.resolve(mode, chunk))
        .collect()
}

/// Join report fragments in chunk order with single spaces.
pub fn aggregate_report(outputs: &[String]) -> String {
    outputs.join(" ")
}

/// Rebuild paragraphs from corrected chunks.
///
/// Corrected chunks are split on the paragraph separator. Every non-blank
/// line takes the next unused original paragraph's style hint. Lines beyond the original count become unstyled paragraphs.
/// The consumed position only moves forward, so a line dropped or added by the
/// model shifts later styles rather than failing.
pub fn reassemble(
    original: &[Paragraph],
    original_chunks: &[Chunk],
    corrected: &[String],
) -> Vec<Paragraph> {
    if original_chunks.len() != corrected.len() {
        tracing::warn!(
            original = original_chunks.len(),
            corrected = corrected.len(),
            "Chunk count mismatch during reassembly"
        );
    }

    let mut next = 0usize;
    let mut rebuilt = Vec::with_capacity(original.len());

    for (chunk, text) in original_chunks.iter().zip(corrected) {
        let mut lines = 0usize;
        for line in text.split(PARAGRAPH_SEPARATOR) {
            if line.trim().is_empty() {
                continue;
            }
            lines += 1;

            let style = original.get(next).and_then(|p| p.style.as_deref());
            rebuilt.push(decode_paragraph(line, style));
            next += 1;
        }

        let non_blank = original
            .get(chunk.paragraphs.clone())
            .unwrap_or_default()
            .iter()
            .filter(|p| !p.plain_text().trim().is_empty())
            .count();
        if lines != non_blank {
            tracing::warn!(
                chunk = chunk.index + 1,
                expected_lines = non_blank,
                corrected_lines = lines,
                "Corrected chunk changed the number of paragraphs"
            );
        }
    }

    if next > original.len() {
        tracing::warn!(
            original = original.len(),
            rebuilt = next,
            "Corrected text has more paragraphs than the source"
        );
    }

    rebuilt
}
