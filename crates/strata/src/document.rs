//! Highlighting whole documents.
//!
//! [`highlight_document`] is the usual entry point for callers that have the
//! complete text up front. It drives one [`HighlightSession`] over the
//! document's lines and falls back to escaped raw text for any line the
//! session could not highlight, so the output always has one entry per line.

use crate::detect::DelimiterMatch;
use crate::engine::LexerEngine;
use crate::language::Language;
use crate::markup::html_escape;
use crate::session::HighlightSession;

/// Configuration for document highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    /// Documents with more lines than this are rendered as plain escaped
    /// text. `None` disables the limit.
    pub max_lines: Option<usize>,

    /// How `<script>`/`<style>` delimiters are matched.
    pub delimiter_match: DelimiterMatch,

    /// Whether to detect embedded languages. `None` enables detection for
    /// languages that support it (see [`Language::supports_embedded`]).
    pub embedded_languages: Option<bool>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            max_lines: Some(20_000),
            delimiter_match: DelimiterMatch::default(),
            embedded_languages: None,
        }
    }
}

impl HighlightConfig {
    /// Whether embedded-language detection applies to a document of
    /// `language`.
    pub fn embedded_languages_for(&self, language: Language) -> bool {
        self.embedded_languages
            .unwrap_or_else(|| language.supports_embedded())
    }
}

/// One rendered line of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// HTML for the line. Always safe to insert into a document.
    pub markup: String,
    /// False when the line fell back to escaped raw text.
    pub highlighted: bool,
}

impl RenderedLine {
    fn plain(text: &str) -> Self {
        Self {
            markup: html_escape(text),
            highlighted: false,
        }
    }
}

/// Highlight `source` as `language`, one line at a time.
pub fn highlight_document<E: LexerEngine>(
    engine: E,
    language: Language,
    source: &str,
    config: &HighlightConfig,
) -> Vec<RenderedLine> {
    if let Some(max_lines) = config.max_lines {
        let line_count = source.lines().count();
        if line_count > max_lines {
            tracing::debug!(
                %language,
                line_count,
                max_lines,
                "document too long, skipping highlighting"
            );
            return source.lines().map(RenderedLine::plain).collect();
        }
    }

    let embedded = config.embedded_languages_for(language);
    let mut session = HighlightSession::new(engine, language, embedded)
        .with_delimiter_match(config.delimiter_match);
    render_lines(&mut session, source.lines())
}

/// Feed `lines` to an existing session in order.
pub fn render_lines<'a, E, I>(session: &mut HighlightSession<E>, lines: I) -> Vec<RenderedLine>
where
    E: LexerEngine,
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(|line| match session.parse_chunk(line) {
            Some(markup) => RenderedLine {
                markup,
                highlighted: true,
            },
            None => RenderedLine::plain(line),
        })
        .collect()
}
