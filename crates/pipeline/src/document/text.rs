//! Plain-text documents: one paragraph per line, no formatting.

use super::{DocumentBuilder, DocumentReader, DocumentWriter};
use crate::codec::{Paragraph, Run};
use proofread_core::{AppError, AppResult};
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct TextReader;

impl DocumentReader for TextReader {
    fn read_paragraphs(&self, path: &Path) -> AppResult<Vec<Paragraph>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::Document(format!("Failed to read {:?}: {}", path, e)))?;

        Ok(contents
            .lines()
            .map(|line| {
                if line.is_empty() {
                    Paragraph::default()
                } else {
                    Paragraph::new(vec![Run::plain(line)])
                }
            })
            .collect())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextWriter;

impl DocumentWriter for TextWriter {
    fn new_document_from(&self, _source: &Path) -> AppResult<Box<dyn DocumentBuilder>> {
        Ok(Box::new(TextBuilder::default()))
    }
}

#[derive(Debug, Default)]
pub struct TextBuilder {
    lines: Vec<String>,
}

impl DocumentBuilder for TextBuilder {
    fn add_paragraph(&mut self, _style: Option<&str>, runs: &[Run]) {
        self.lines.push(runs.iter().map(|r| r.text.as_str()).collect());
    }

    fn save(self: Box<Self>, path: &Path) -> AppResult<()> {
        let mut contents = self.lines.join("\n");
        contents.push('\n');
        std::fs::write(path, contents)
            .map_err(|e| AppError::Document(format!("Failed to write {:?}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_lines_as_paragraphs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "First line\n\nThird line\n").unwrap();

        let paragraphs = TextReader.read_paragraphs(&path).unwrap();
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0].runs, vec![Run::plain("First line")]);
        assert!(paragraphs[1].runs.is_empty());
    }

    #[test]
    fn test_write_flattens_formatting() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        let mut builder = TextWriter.new_document_from(&path).unwrap();
        builder.add_paragraph(Some("Heading1"), &[Run::bold("Title")]);
        builder.add_paragraph(None, &[Run::plain("Body "), Run::italic("text")]);
        builder.save(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Title\nBody text\n");
    }

    #[test]
    fn test_missing_file_is_document_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            TextReader.read_paragraphs(&temp_dir.path().join("missing.txt")),
            Err(AppError::Document(_))
        ));
    }
}
