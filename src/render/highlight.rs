//! Syntax highlighting via syntect, using the extended two-face grammars.

use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::debug;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(two_face::syntax::extra_newlines);

static THEME: LazyLock<Theme> = LazyLock::new(|| {
    let mut themes = ThemeSet::load_defaults();
    themes
        .themes
        .remove("base16-ocean.dark")
        .unwrap_or_default()
});

const LINE_ENDINGS: &[char] = &['\n', '\r'];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Language {
    Json,
    Xml,
    Html,
    Http,
    PlainText,
    /// Found by first-line detection, holds the syntect syntax name
    Detected(String),
}

impl Language {
    pub fn name(&self) -> &str {
        match self {
            Language::Json => "JSON",
            Language::Xml => "XML",
            Language::Html => "HTML",
            Language::Http => "HTTP",
            Language::PlainText => "Plain Text",
            Language::Detected(name) => name,
        }
    }
}

fn syntax_for(language: &Language) -> &'static SyntaxReference {
    let set: &'static SyntaxSet = &SYNTAX_SET;
    let found = match language {
        Language::Json => set.find_syntax_by_extension("json"),
        Language::Xml => set.find_syntax_by_extension("xml"),
        Language::Html => set.find_syntax_by_extension("html"),
        Language::Http => set
            .find_syntax_by_name("HTTP Request and Response")
            .or_else(|| set.find_syntax_by_extension("http")),
        Language::PlainText => None,
        Language::Detected(name) => set.find_syntax_by_name(name),
    };
    found.unwrap_or_else(|| set.find_syntax_plain_text())
}

/// A run of text sharing one style
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    /// RGB foreground, `None` keeps the terminal default
    pub fg: Option<(u8, u8, u8)>,
    pub bold: bool,
}

impl StyledSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        StyledSpan {
            text: text.into(),
            fg: None,
            bold: false,
        }
    }
}

pub type StyledLine = Vec<StyledSpan>;

/// Highlighted text, keeping the source alongside the styled lines
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Highlighted {
    pub language: Option<Language>,
    pub text: String,
    pub lines: Vec<StyledLine>,
}

pub fn highlight(language: Language, text: &str) -> Highlighted {
    let syntax = syntax_for(&language);
    let mut highlighter = HighlightLines::new(syntax, &THEME);
    let mut lines = Vec::new();

    for line in LinesWithEndings::from(text) {
        match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => lines.push(
                ranges
                    .into_iter()
                    .map(|(style, piece)| StyledSpan {
                        text: piece.trim_end_matches(LINE_ENDINGS).to_string(),
                        fg: Some((style.foreground.r, style.foreground.g, style.foreground.b)),
                        bold: style.font_style.contains(FontStyle::BOLD),
                    })
                    .filter(|span| !span.text.is_empty())
                    .collect(),
            ),
            Err(e) => {
                debug!(error = %e, language = language.name(), "highlighting failed");
                lines.push(vec![StyledSpan::plain(line.trim_end_matches(LINE_ENDINGS))]);
            }
        }
    }

    Highlighted {
        language: Some(language),
        text: text.to_string(),
        lines,
    }
}

/// Best-effort guess of the language of an untyped body
pub fn detect_language(text: &str) -> Language {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Language::PlainText;
    }

    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(text).is_ok()
    {
        return Language::Json;
    }

    if trimmed.starts_with('<') {
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("<!doctype html") || lower.contains("<html") {
            return Language::Html;
        }
        return Language::Xml;
    }

    if let Some(syntax) = SYNTAX_SET.find_syntax_by_first_line(trimmed) {
        return Language::Detected(syntax.name.clone());
    }

    Language::PlainText
}

/// Highlight with an auto-detected language
pub fn highlight_auto(text: &str) -> Highlighted {
    highlight(detect_language(text), text)
}
