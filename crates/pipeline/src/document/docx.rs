//! Word `.docx` documents.
//!
//! Only `word/document.xml` is interpreted. Body-level paragraphs are read as
//! runs with bold/italic flags and a paragraph style id; tables and other body
//! elements are skipped when reading and kept in place when writing. Every
//! other part of the package (styles, numbering, media, ...) is copied to the
//! output unchanged.
//!
//! Only runs whose nearest paragraph is the body paragraph are read, so text
//! boxes, alternate-content fallbacks and the old formatting recorded by
//! tracked changes never leak into it. Rewritten paragraphs are rebuilt from
//! their runs; inline objects such as drawings are not carried over.

use super::{DocumentBuilder, DocumentReader, DocumentWriter};
use crate::codec::{Paragraph, Run};
use proofread_core::{AppError, AppResult};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{Read, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const DOCUMENT_PART: &str = "word/document.xml";

fn zip_error(path: &Path, err: zip::result::ZipError) -> AppError {
    AppError::Document(format!("Invalid .docx package {:?}: {}", path, err))
}

fn read_document_xml(path: &Path) -> AppResult<String> {
    let file = File::open(path)
        .map_err(|e| AppError::Document(format!("Failed to open {:?}: {}", path, e)))?;
    let mut archive = ZipArchive::new(file).map_err(|e| zip_error(path, e))?;
    let mut entry = archive.by_name(DOCUMENT_PART).map_err(|e| zip_error(path, e))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| AppError::Document(format!("Failed to read {} in {:?}: {}", DOCUMENT_PART, path, e)))?;
    Ok(xml)
}

/// Where things are in `document.xml`.
#[derive(Debug, Default)]
struct BodyLayout {
    paragraphs: Vec<Paragraph>,

    /// Byte spans of body-level `<w:p>` elements
    spans: Vec<Range<usize>>,

    /// Content between `<w:body>` and `</w:body>`
    body: Range<usize>,

    /// Start of the body-level `<w:sectPr>`, which must stay last
    sect_pr: Option<usize>,
}

#[derive(Debug)]
struct OpenParagraph {
    start: usize,
    depth: usize,
    style: Option<String>,
    runs: Vec<Run>,
}

impl OpenParagraph {
    /// Adjacent runs with equal formatting are merged.
    fn push_run(&mut self, run: Run) {
        if run.text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.bold == run.bold && last.italic == run.italic => {
                last.text.push_str(&run.text)
            }
            _ => self.runs.push(run),
        }
    }
}

/// Content that never belongs to the paragraph around it: text box bodies,
/// legacy fallbacks of alternate content and the previous formatting kept by
/// tracked changes.
const SKIPPED: [&[u8]; 4] = [b"w:txbxContent", b"mc:Fallback", b"w:rPrChange", b"w:pPrChange"];

fn xml_error(err: impl std::fmt::Display) -> AppError {
    AppError::Document(format!("Malformed {}: {}", DOCUMENT_PART, err))
}

/// `<w:b/>` is on; `w:val` of 0/false/off/none turns it off.
fn toggle_value(element: &BytesStart) -> AppResult<bool> {
    match element.try_get_attribute("w:val").map_err(xml_error)? {
        Some(attr) => {
            let value = attr.unescape_value().map_err(xml_error)?;
            Ok(!matches!(value.as_ref(), "0" | "false" | "off" | "none"))
        }
        None => Ok(true),
    }
}

#[derive(Debug)]
struct OpenRun {
    run: Run,
    depth: usize,
}

/// Walks the XML events of `document.xml` with the stack of open elements.
/// Depths are stack lengths at the point an element opens.
#[derive(Debug, Default)]
struct BodyScanner {
    layout: BodyLayout,
    stack: Vec<Vec<u8>>,
    body_start: Option<usize>,
    body_end: Option<usize>,

    /// Depth of the body's children
    body_depth: Option<usize>,

    /// Inside a skipped element opened at this depth
    skip_from: Option<usize>,
    paragraph: Option<OpenParagraph>,
    run: Option<OpenRun>,
    in_text: bool,
}

impl BodyScanner {
    fn parent_is(&self, name: &[u8]) -> bool {
        self.stack.last().is_some_and(|parent| parent.as_slice() == name)
    }

    /// True when the open body paragraph is the nearest `w:p` ancestor.
    fn in_body_paragraph(&self) -> bool {
        let Some(paragraph) = &self.paragraph else {
            return false;
        };
        !self
            .stack
            .get(paragraph.depth + 1..)
            .unwrap_or_default()
            .iter()
            .any(|name| name.as_slice() == b"w:p")
    }

    fn open(&mut self, element: &BytesStart, span: Range<usize>, empty: bool) -> AppResult<()> {
        if self.skip_from.is_some() {
            return Ok(());
        }

        let depth = self.stack.len();
        let qname = element.name();
        let name = qname.as_ref();

        if name == b"w:body" && !empty && self.body_start.is_none() {
            self.body_start = Some(span.end);
            self.body_depth = Some(depth + 1);
            return Ok(());
        }
        let Some(body_depth) = self.body_depth else {
            return Ok(());
        };
        if self.body_end.is_some() {
            return Ok(());
        }

        if SKIPPED.iter().any(|skipped| *skipped == name) {
            if !empty {
                self.skip_from = Some(depth);
            }
            return Ok(());
        }

        match name {
            b"w:p" if depth == body_depth => {
                if empty {
                    self.layout.paragraphs.push(Paragraph::default());
                    self.layout.spans.push(span);
                } else {
                    self.paragraph = Some(OpenParagraph {
                        start: span.start,
                        depth,
                        style: None,
                        runs: Vec::new(),
                    });
                }
            }
            b"w:sectPr" if depth == body_depth => self.layout.sect_pr = Some(span.start),
            b"w:pStyle" if self.parent_is(b"w:pPr") => {
                let Some(attr) = element.try_get_attribute("w:val").map_err(xml_error)? else {
                    return Ok(());
                };
                let style = attr.unescape_value().map_err(xml_error)?.into_owned();
                if let Some(open) = self.paragraph.as_mut().filter(|p| depth == p.depth + 2) {
                    open.style = Some(style);
                }
            }
            b"w:r" if !empty && self.run.is_none() && self.in_body_paragraph() => {
                self.run = Some(OpenRun {
                    run: Run::plain(""),
                    depth,
                });
            }
            b"w:b" | b"w:i" if self.parent_is(b"w:rPr") => {
                let on = toggle_value(element)?;
                if let Some(open) = self.run.as_mut().filter(|r| depth == r.depth + 2) {
                    if name == b"w:b" {
                        open.run.bold = on;
                    } else {
                        open.run.italic = on;
                    }
                }
            }
            b"w:t" if !empty => {
                self.in_text = self.run.as_ref().is_some_and(|r| depth == r.depth + 1);
            }
            b"w:tab" | b"w:br" | b"w:cr" => {
                if let Some(open) = self.run.as_mut().filter(|r| depth == r.depth + 1) {
                    open.run.text.push(if name == b"w:tab" { '\t' } else { '\n' });
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8], span: Range<usize>) {
        self.stack.pop();
        let depth = self.stack.len();

        if let Some(skip_from) = self.skip_from {
            if depth <= skip_from {
                self.skip_from = None;
            }
            return;
        }

        match name {
            b"w:body" if self.body_depth == Some(depth + 1) => self.body_end = Some(span.start),
            b"w:t" => self.in_text = false,
            b"w:r" if self.run.as_ref().is_some_and(|r| r.depth == depth) => {
                if let (Some(done), Some(open)) = (self.run.take(), self.paragraph.as_mut()) {
                    open.push_run(done.run);
                }
            }
            b"w:p" if self.paragraph.as_ref().is_some_and(|p| p.depth == depth) => {
                if let Some(open) = self.paragraph.take() {
                    self.layout.paragraphs.push(Paragraph {
                        runs: open.runs,
                        style: open.style,
                    });
                    self.layout.spans.push(open.start..span.end);
                }
                self.run = None;
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &BytesText) -> AppResult<()> {
        if !self.in_text || self.skip_from.is_some() {
            return Ok(());
        }
        if let Some(open) = self.run.as_mut() {
            open.run.text.push_str(&text.unescape().map_err(xml_error)?);
        }
        Ok(())
    }

    fn finish(mut self) -> AppResult<BodyLayout> {
        match (self.body_start, self.body_end) {
            (Some(start), Some(end)) if start <= end => {
                self.layout.body = start..end;
                Ok(self.layout)
            }
            _ => Err(AppError::Document(format!(
                "{} has no <w:body> element",
                DOCUMENT_PART
            ))),
        }
    }
}

/// Byte span of the tag that ends at `end`.
fn tag_span(xml: &str, end: usize) -> Range<usize> {
    let start = xml.get(..end).and_then(|head| head.rfind('<')).unwrap_or(end);
    start..end
}

fn scan_body(xml: &str) -> AppResult<BodyLayout> {
    let mut reader = Reader::from_str(xml);
    let mut scanner = BodyScanner::default();

    loop {
        let event = reader.read_event().map_err(xml_error)?;
        let end = reader.buffer_position() as usize;

        match event {
            Event::Start(element) => {
                scanner.open(&element, tag_span(xml, end), false)?;
                scanner.stack.push(element.name().as_ref().to_vec());
            }
            Event::Empty(element) => scanner.open(&element, tag_span(xml, end), true)?,
            Event::End(element) => scanner.close(element.name().as_ref(), tag_span(xml, end)),
            Event::Text(text) => scanner.text(&text)?,
            Event::Eof => break,
            _ => {}
        }
    }

    scanner.finish()
}

fn push_text(xml: &mut String, segment: &mut String) {
    if !segment.is_empty() {
        xml.push_str(r#"<w:t xml:space="preserve">"#);
        xml.push_str(&escape(segment.as_str()));
        xml.push_str("</w:t>");
        segment.clear();
    }
}

fn paragraph_xml(style: Option<&str>, runs: &[Run]) -> String {
    let mut xml = String::from("<w:p>");
    if let Some(style) = style {
        xml.push_str(&format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, escape(style)));
    }

    for run in runs {
        xml.push_str("<w:r>");
        if run.bold || run.italic {
            xml.push_str("<w:rPr>");
            if run.bold {
                xml.push_str("<w:b/>");
            }
            if run.italic {
                xml.push_str("<w:i/>");
            }
            xml.push_str("</w:rPr>");
        }

        let mut segment = String::new();
        for c in run.text.chars() {
            match c {
                '\t' => {
                    push_text(&mut xml, &mut segment);
                    xml.push_str("<w:tab/>");
                }
                '\n' => {
                    push_text(&mut xml, &mut segment);
                    xml.push_str("<w:br/>");
                }
                '\r' => {}
                c => segment.push(c),
            }
        }
        push_text(&mut xml, &mut segment);
        xml.push_str("</w:r>");
    }

    xml.push_str("</w:p>");
    xml
}

/// Reads `.docx` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxReader;

impl DocumentReader for DocxReader {
    fn read_paragraphs(&self, path: &Path) -> AppResult<Vec<Paragraph>> {
        let xml = read_document_xml(path)?;
        let layout = scan_body(&xml)?;
        tracing::debug!(paragraphs = layout.paragraphs.len(), "Read {:?}", path);
        Ok(layout.paragraphs)
    }
}

/// Writes `.docx` files based on a source package.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxWriter;

impl DocumentWriter for DocxWriter {
    fn new_document_from(&self, source: &Path) -> AppResult<Box<dyn DocumentBuilder>> {
        let document_xml = read_document_xml(source)?;
        let layout = scan_body(&document_xml)?;
        Ok(Box::new(DocxBuilder {
            source: source.to_path_buf(),
            document_xml,
            layout,
            new_paragraphs: String::new(),
        }))
    }
}

/// A copy of the source package whose body paragraphs are being replaced.
pub struct DocxBuilder {
    source: PathBuf,
    document_xml: String,
    layout: BodyLayout,
    new_paragraphs: String,
}

impl DocxBuilder {
    /// The source `document.xml` without its body-level paragraphs, with the
    /// new paragraphs placed before the section properties.
    fn render(&self) -> String {
        let xml = &self.document_xml;
        let insert_at = self.layout.sect_pr.unwrap_or(self.layout.body.end);

        let mut out = String::with_capacity(xml.len() + self.new_paragraphs.len());
        let mut cursor = 0;
        let mut inserted = false;

        for span in &self.layout.spans {
            if !inserted && insert_at <= span.start {
                let at = insert_at.max(cursor);
                out.push_str(&xml[cursor..at]);
                out.push_str(&self.new_paragraphs);
                cursor = at;
                inserted = true;
            }
            out.push_str(&xml[cursor..span.start]);
            cursor = span.end;
        }

        if !inserted {
            let at = insert_at.max(cursor);
            out.push_str(&xml[cursor..at]);
            out.push_str(&self.new_paragraphs);
            cursor = at;
        }
        out.push_str(&xml[cursor..]);
        out
    }
}

impl DocumentBuilder for DocxBuilder {
    fn add_paragraph(&mut self, style: Option<&str>, runs: &[Run]) {
        self.new_paragraphs.push_str(&paragraph_xml(style, runs));
    }

    fn save(self: Box<Self>, path: &Path) -> AppResult<()> {
        if path == self.source {
            return Err(AppError::Document(format!(
                "Refusing to overwrite the source document {:?}",
                path
            )));
        }

        let document_xml = self.render();
        let write_error = |e: zip::result::ZipError| zip_error(path, e);

        let mut archive = ZipArchive::new(File::open(&self.source)?)
            .map_err(|e| zip_error(&self.source, e))?;
        let mut zip = ZipWriter::new(File::create(path)?);
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i).map_err(|e| zip_error(&self.source, e))?;
            if entry.name() == DOCUMENT_PART {
                drop(entry);
                zip.start_file(DOCUMENT_PART, options).map_err(write_error)?;
                zip.write_all(document_xml.as_bytes())?;
            } else {
                zip.raw_copy_file(entry).map_err(write_error)?;
            }
        }

        zip.finish().map_err(write_error)?;
        tracing::debug!("Wrote {:?} from {:?}", path, self.source);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_document, PARAGRAPH_SEPARATOR};
    use tempfile::TempDir;

    const BODY: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
        r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:t>Chapter One</w:t></w:r></w:p>"#,
        r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> and </w:t></w:r>"#,
        r#"<w:r><w:rPr><w:i/></w:rPr><w:t>World</w:t></w:r><w:r><w:rPr><w:i w:val="true"/></w:rPr><w:t>!</w:t></w:r></w:p>"#,
        r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>In a table</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        r#"<w:p/>"#,
        r#"<w:p><w:r><w:rPr><w:b w:val="0"/><w:bCs/></w:rPr><w:t>Fish &amp; chips&#x21;</w:t><w:tab/><w:t>x</w:t></w:r></w:p>"#,
        r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#,
        r#"</w:body></w:document>"#,
    );

    fn write_docx(dir: &Path, name: &str, document_xml: &str) -> PathBuf {
        let path = dir.join(name);
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(b"<Types/>").unwrap();
        zip.start_file(DOCUMENT_PART, options).unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.start_file("word/styles.xml", options).unwrap();
        zip.write_all(b"<w:styles/>").unwrap();
        zip.finish().unwrap();
        path
    }

    fn read_part(path: &Path, part: &str) -> String {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut entry = archive.by_name(part).unwrap();
        let mut out = String::new();
        entry.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_read_paragraphs() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_docx(temp_dir.path(), "story.docx", BODY);

        let paragraphs = DocxReader.read_paragraphs(&path).unwrap();
        assert_eq!(paragraphs.len(), 4);

        // Paragraph-mark formatting in pPr does not leak into runs
        assert_eq!(paragraphs[0].style.as_deref(), Some("Heading1"));
        assert_eq!(paragraphs[0].runs, vec![Run::plain("Chapter One")]);

        assert_eq!(
            paragraphs[1].runs,
            vec![Run::bold("Hello"), Run::plain(" and "), Run::italic("World!")]
        );
        assert_eq!(paragraphs[2], Paragraph::default());
        assert_eq!(paragraphs[3].runs, vec![Run::plain("Fish & chips!\tx")]);
    }

    #[test]
    fn test_write_replaces_paragraphs_and_keeps_other_parts() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_docx(temp_dir.path(), "story.docx", BODY);
        let target = temp_dir.path().join("story_corrected.docx");

        let mut builder = DocxWriter.new_document_from(&source).unwrap();
        builder.add_paragraph(Some("Heading1"), &[Run::plain("Chapter 1")]);
        builder.add_paragraph(None, &[Run::bold("Hi"), Run::plain(" <there> & "), Run::bold_italic("you")]);
        builder.add_paragraph(None, &[Run::plain("line\nbreak\ttab")]);
        builder.save(&target).unwrap();

        let paragraphs = DocxReader.read_paragraphs(&target).unwrap();
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0].style.as_deref(), Some("Heading1"));
        assert_eq!(
            paragraphs[1].runs,
            vec![Run::bold("Hi"), Run::plain(" <there> & "), Run::bold_italic("you")]
        );
        assert_eq!(paragraphs[2].runs, vec![Run::plain("line\nbreak\ttab")]);

        let xml = read_part(&target, DOCUMENT_PART);
        assert!(xml.contains("In a table"));
        assert!(!xml.contains("Chapter One"));
        assert!(xml.find("Chapter 1").unwrap() < xml.find("<w:sectPr>").unwrap());
        assert!(xml.ends_with("</w:sectPr></w:body></w:document>"));
        assert_eq!(read_part(&target, "word/styles.xml"), "<w:styles/>");

        // Source untouched
        assert_eq!(read_part(&source, DOCUMENT_PART), BODY);
    }

    #[test]
    fn test_refuses_to_overwrite_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_docx(temp_dir.path(), "story.docx", BODY);

        let builder = DocxWriter.new_document_from(&source).unwrap();
        assert!(matches!(builder.save(&source), Err(AppError::Document(_))));
    }

    #[test]
    fn test_missing_body_is_document_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_docx(temp_dir.path(), "empty.docx", "<w:document/>");
        assert!(matches!(
            DocxReader.read_paragraphs(&path),
            Err(AppError::Document(_))
        ));
    }

    #[test]
    fn test_not_a_zip_is_document_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fake.docx");
        std::fs::write(&path, "plain text").unwrap();
        assert!(matches!(
            DocxReader.read_paragraphs(&path),
            Err(AppError::Document(_))
        ));
    }

    fn document(body: &str) -> String {
        format!(
            concat!(
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
                r#"xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006">"#,
                r#"<w:body>{}<w:sectPr/></w:body></w:document>"#
            ),
            body
        )
    }

    fn read_body(body: &str) -> Vec<Paragraph> {
        let temp_dir = TempDir::new().unwrap();
        let path = write_docx(temp_dir.path(), "body.docx", &document(body));
        DocxReader.read_paragraphs(&path).unwrap()
    }

    #[test]
    fn test_text_box_inside_run_keeps_body_text() {
        let paragraphs = read_body(concat!(
            r#"<w:p><w:r><w:t xml:space="preserve">Before </w:t><w:drawing><wp:inline><a:graphic><a:graphicData>"#,
            r#"<wps:wsp><wps:txbx><w:txbxContent><w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Box</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></wps:txbx></wps:wsp></a:graphicData></a:graphic></wp:inline></w:drawing>"#,
            r#"<w:t>after.</w:t></w:r></w:p>"#,
        ));

        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].runs, vec![Run::plain("Before after.")]);
    }

    #[test]
    fn test_alternate_content_is_read_once() {
        let paragraphs = read_body(concat!(
            r#"<w:p><w:r><w:t xml:space="preserve">Intro </w:t></w:r><w:r><mc:AlternateContent>"#,
            r#"<mc:Choice Requires="wps"><w:drawing><w:txbxContent><w:p><w:r><w:t>Shape</w:t></w:r></w:p></w:txbxContent></w:drawing></mc:Choice>"#,
            r#"<mc:Fallback><w:pict><w:txbxContent><w:p><w:r><w:t>Shape</w:t></w:r></w:p></w:txbxContent></w:pict></mc:Fallback>"#,
            r#"</mc:AlternateContent></w:r><w:r><w:t>text.</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Next</w:t></w:r></w:p>"#,
        ));

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].plain_text(), "Intro text.");
        assert_eq!(paragraphs[1].plain_text(), "Next");
    }

    #[test]
    fn test_tracked_formatting_changes_are_ignored() {
        let paragraphs = read_body(concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="Quote"/><w:pPrChange w:id="1" w:author="Ed">"#,
            r#"<w:pPr><w:pStyle w:val="Heading1"/></w:pPr></w:pPrChange></w:pPr>"#,
            r#"<w:r><w:rPr><w:rPrChange w:id="2" w:author="Ed"><w:rPr><w:b/></w:rPr></w:rPrChange></w:rPr>"#,
            r#"<w:t>Now plain</w:t></w:r>"#,
            r#"<w:r><w:rPr><w:i/><w:rPrChange w:id="3" w:author="Ed"><w:rPr/></w:rPrChange></w:rPr>"#,
            r#"<w:t xml:space="preserve"> and italic</w:t></w:r></w:p>"#,
        ));

        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].style.as_deref(), Some("Quote"));
        assert_eq!(
            paragraphs[0].runs,
            vec![Run::plain("Now plain"), Run::italic(" and italic")]
        );
    }

    #[test]
    fn test_line_break_after_spaces_stays_one_paragraph() {
        let paragraphs = read_body(concat!(
            r#"<w:p><w:r><w:t xml:space="preserve">Line one  </w:t><w:br/><w:t>Line two</w:t></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:pStyle w:val="Quote"/></w:pPr><w:r><w:t>Second</w:t></w:r></w:p>"#,
        ));
        assert_eq!(paragraphs[0].runs, vec![Run::plain("Line one  \nLine two")]);

        let encoded = encode_document(&paragraphs);
        assert_eq!(encoded.matches(PARAGRAPH_SEPARATOR).count(), paragraphs.len());
    }

    #[test]
    fn test_malformed_xml_is_document_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_docx(
            temp_dir.path(),
            "broken.docx",
            "<w:document><w:body><w:p></w:body></w:document>",
        );
        assert!(matches!(
            DocxReader.read_paragraphs(&path),
            Err(AppError::Document(_))
        ));
    }
}
