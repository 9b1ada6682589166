//! Formatting codec: styled runs ↔ tagged text.
//!
//! Bold and italic are carried through the LLM as inline tags (`<b>`, `<i>`,
//! `<b><i>`). Paragraphs are joined with [`PARAGRAPH_SEPARATOR`], which never
//! appears inside a tag, so splitting on it can never corrupt one.

use serde::{Deserialize, Serialize};

/// Terminates every encoded paragraph: two spaces and a newline.
pub const PARAGRAPH_SEPARATOR: &str = "  \n";

/// A span of text with uniform formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Run {
    pub fn new(text: impl Into<String>, bold: bool, italic: bool) -> Self {
        Self {
            text: text.into(),
            bold,
            italic,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, false, false)
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text, true, false)
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self::new(text, false, true)
    }

    pub fn bold_italic(text: impl Into<String>) -> Self {
        Self::new(text, true, true)
    }

    /// The run's formatting as one of the four encodable states.
    pub fn style(&self) -> RunStyle {
        RunStyle::from_flags(self.bold, self.italic)
    }
}

/// A paragraph: ordered runs plus an optional style hint from the source
/// document (e.g. a word-processor paragraph style id).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Self { runs, style: None }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Text without formatting.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// The four formatting states a run can be encoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStyle {
    Plain,
    Bold,
    Italic,
    BoldItalic,
}

impl RunStyle {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => Self::Plain,
            (true, false) => Self::Bold,
            (false, true) => Self::Italic,
            (true, true) => Self::BoldItalic,
        }
    }

    fn open_tag(&self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Bold => "<b>",
            Self::Italic => "<i>",
            Self::BoldItalic => "<b><i>",
        }
    }

    fn close_tag(&self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Bold => "</b>",
            Self::Italic => "</i>",
            Self::BoldItalic => "</i></b>",
        }
    }
}

/// A recognised tag literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    OpenBoldItalic,
    OpenBold,
    OpenItalic,
    CloseBoldItalic,
    CloseBold,
    CloseItalic,
}

/// Longer literals first so `<b><i>` is never read as `<b>` followed by `<i>`.
const TAG_LITERALS: [(&str, Tag); 7] = [
    ("<b><i>", Tag::OpenBoldItalic),
    ("</b></i>", Tag::CloseBoldItalic),
    ("</i></b>", Tag::CloseBoldItalic),
    ("<b>", Tag::OpenBold),
    ("<i>", Tag::OpenItalic),
    ("</b>", Tag::CloseBold),
    ("</i>", Tag::CloseItalic),
];

impl Tag {
    /// Match a tag literal at the start of `s`, returning it with its byte length.
    fn match_prefix(s: &str) -> Option<(Tag, usize)> {
        TAG_LITERALS
            .iter()
            .find(|(literal, _)| s.starts_with(literal))
            .map(|(literal, tag)| (*tag, literal.len()))
    }

    /// Transition table. Applied regardless of the current state, so stray or
    /// out-of-order closing tags are harmless.
    pub fn apply(self, state: FormatState) -> FormatState {
        match self {
            Tag::OpenBoldItalic => FormatState::new(true, true),
            Tag::OpenBold => FormatState::new(true, state.italic),
            Tag::OpenItalic => FormatState::new(state.bold, true),
            Tag::CloseBoldItalic => FormatState::new(false, false),
            Tag::CloseBold => FormatState::new(false, state.italic),
            Tag::CloseItalic => FormatState::new(state.bold, false),
        }
    }
}

/// Decoder state: which styles are active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatState {
    pub bold: bool,
    pub italic: bool,
}

impl FormatState {
    pub fn new(bold: bool, italic: bool) -> Self {
        Self { bold, italic }
    }
}

/// A lexical unit of tagged text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Tag(Tag),
    Text(&'a str),
}

/// Split tagged text into tags and the literal text between them.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = input[pos..].find('<') {
        let at = pos + offset;
        match Tag::match_prefix(&input[at..]) {
            Some((tag, len)) => {
                if text_start < at {
                    tokens.push(Token::Text(&input[text_start..at]));
                }
                tokens.push(Token::Tag(tag));
                pos = at + len;
                text_start = pos;
            }
            // '<' is one byte, so the next position is a char boundary
            None => pos = at + 1,
        }
    }

    if text_start < input.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }

    tokens
}

/// Encode one run with the minimal tags for its style.
pub fn encode_run(run: &Run) -> String {
    let style = run.style();
    format!("{}{}{}", style.open_tag(), run.text, style.close_tag())
}

/// Encode a paragraph's runs (without the separator).
///
/// Line breaks inside a paragraph keep at most one space before them, so
/// the encoded paragraph never contains [`PARAGRAPH_SEPARATOR`].
pub fn encode_paragraph(paragraph: &Paragraph) -> String {
    let mut encoded: String = paragraph.runs.iter().map(encode_run).collect();
    while encoded.contains(PARAGRAPH_SEPARATOR) {
        encoded = encoded.replace(PARAGRAPH_SEPARATOR, " \n");
    }
    encoded
}

/// Encode a whole document: every paragraph followed by the separator.
pub fn encode_document(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .map(|p| encode_paragraph(p) + PARAGRAPH_SEPARATOR)
        .collect()
}

/// Decode tagged text into runs. Whitespace-only segments produce no run.
pub fn decode(tagged: &str) -> Vec<Run> {
    let mut state = FormatState::default();
    let mut runs = Vec::new();

    for token in tokenize(tagged) {
        match token {
            Token::Tag(tag) => state = tag.apply(state),
            Token::Text(text) if text.trim().is_empty() => {}
            Token::Text(text) => runs.push(Run::new(text, state.bold, state.italic)),
        }
    }

    runs
}

/// Decode one line of tagged text into a paragraph with the given style hint.
pub fn decode_paragraph(line: &str, style: Option<&str>) -> Paragraph {
    Paragraph {
        runs: decode(line),
        style: style.map(str::to_string),
    }
}
