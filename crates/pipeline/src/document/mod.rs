//! Document formats.
//!
//! A [`DocumentReader`] turns a file into paragraphs. A [`DocumentWriter`]
//! starts a new document based on a source file (keeping its styles and
//! packaging) and a [`DocumentBuilder`] fills it and saves it elsewhere. The
//! source file is never modified.

pub mod docx;
pub mod text;

pub use docx::{DocxReader, DocxWriter};
pub use text::{TextReader, TextWriter};

use crate::codec::{Paragraph, Run};
use proofread_core::{AppError, AppResult};
use std::path::Path;

pub trait DocumentReader: Send + Sync {
    fn read_paragraphs(&self, path: &Path) -> AppResult<Vec<Paragraph>>;
}

pub trait DocumentWriter: Send + Sync {
    /// Start an empty document that inherits everything but the body
    /// paragraphs from `source`.
    fn new_document_from(&self, source: &Path) -> AppResult<Box<dyn DocumentBuilder>>;
}

pub trait DocumentBuilder {
    fn add_paragraph(&mut self, style: Option<&str>, runs: &[Run]);
    fn save(self: Box<Self>, path: &Path) -> AppResult<()>;
}

/// Supported file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Docx,
    Text,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("docx") => Ok(Self::Docx),
            Some("txt") | Some("md") => Ok(Self::Text),
            _ => Err(AppError::Document(format!(
                "Unsupported document format: {:?}. Supported: .docx, .txt, .md",
                path
            ))),
        }
    }

    pub fn reader(&self) -> Box<dyn DocumentReader> {
        match self {
            Self::Docx => Box::new(DocxReader),
            Self::Text => Box::new(TextReader),
        }
    }

    pub fn writer(&self) -> Box<dyn DocumentWriter> {
        match self {
            Self::Docx => Box::new(DocxWriter),
            Self::Text => Box::new(TextWriter),
        }
    }
}

/// Read a document of any supported format.
pub fn read_paragraphs(path: &Path) -> AppResult<Vec<Paragraph>> {
    if !path.exists() {
        return Err(AppError::Document(format!("File not found: {:?}", path)));
    }
    DocumentFormat::from_path(path)?.reader().read_paragraphs(path)
}

/// Write `paragraphs` to `target` as a new document based on `source`.
pub fn write_paragraphs(source: &Path, target: &Path, paragraphs: &[Paragraph]) -> AppResult<()> {
    let mut builder = DocumentFormat::from_path(source)?
        .writer()
        .new_document_from(source)?;
    for paragraph in paragraphs {
        builder.add_paragraph(paragraph.style.as_deref(), &paragraph.runs);
    }
    builder.save(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.DOCX")).unwrap(), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_path(Path::new("a.txt")).unwrap(), DocumentFormat::Text);
        assert!(DocumentFormat::from_path(Path::new("a.pdf")).is_err());
        assert!(DocumentFormat::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_read_missing_file() {
        match read_paragraphs(Path::new("/definitely/not/here.docx")) {
            Err(AppError::Document(msg)) => assert!(msg.contains("not found")),
            other => panic!("expected document error, got {:?}", other),
        }
    }

    #[test]
    fn test_write_paragraphs_text() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("in.txt");
        let target = temp_dir.path().join("out.txt");
        std::fs::write(&source, "helo\n").unwrap();

        let paragraphs = vec![Paragraph::new(vec![Run::plain("hello")])];
        write_paragraphs(&source, &target, &paragraphs).unwrap();

        assert_eq!(read_paragraphs(&target).unwrap(), paragraphs);
        assert_eq!(std::fs::read_to_string(&source).unwrap(), "helo\n");
    }
}
