//! Highlighting both sides of a diff.
//!
//! A diff shows two revisions of a document. Each revision is its own
//! document with its own continuation state: a block comment opened on a
//! removed line must not leak into the added lines that replace it. A
//! [`DiffSession`] therefore owns one [`HighlightSession`] per side and
//! routes each diff line to the side(s) it belongs to.

use crate::engine::LexerEngine;
use crate::language::Language;
use crate::session::HighlightSession;

/// One line of a unified diff, without its `+`/`-`/` ` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLine<'a> {
    /// Present in both revisions.
    Context(&'a str),
    /// Present only in the old revision.
    Removed(&'a str),
    /// Present only in the new revision.
    Added(&'a str),
}

impl<'a> DiffLine<'a> {
    /// Parse a unified diff body line by its marker character. Lines without
    /// a marker are treated as context.
    pub fn from_unified(line: &'a str) -> Self {
        if let Some(text) = line.strip_prefix('-') {
            DiffLine::Removed(text)
        } else if let Some(text) = line.strip_prefix('+') {
            DiffLine::Added(text)
        } else {
            DiffLine::Context(line.strip_prefix(' ').unwrap_or(line))
        }
    }

    /// The line's text.
    pub fn text(&self) -> &'a str {
        match *self {
            DiffLine::Context(text) | DiffLine::Removed(text) | DiffLine::Added(text) => text,
        }
    }
}

/// Markup produced for one diff line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffMarkup {
    /// Markup from the old side, if the line was fed to it and highlighted.
    pub old: Option<String>,
    /// Markup from the new side, if the line was fed to it and highlighted.
    pub new: Option<String>,
}

/// A pair of sessions, one per diff side.
pub struct DiffSession<E: LexerEngine> {
    old: HighlightSession<E>,
    new: HighlightSession<E>,
}

impl<E: LexerEngine + Clone> DiffSession<E> {
    /// Create a diff session where both revisions are in `language`.
    pub fn new(engine: E, language: Language, embedded_languages_enabled: bool) -> Self {
        Self {
            old: HighlightSession::new(engine.clone(), language, embedded_languages_enabled),
            new: HighlightSession::new(engine, language, embedded_languages_enabled),
        }
    }
}

impl<E: LexerEngine> DiffSession<E> {
    /// Build a diff session from two independently configured sessions, e.g.
    /// when a file was renamed and changed language.
    pub fn from_sessions(old: HighlightSession<E>, new: HighlightSession<E>) -> Self {
        Self { old, new }
    }

    /// The old revision's session.
    pub fn old(&self) -> &HighlightSession<E> {
        &self.old
    }

    /// The new revision's session.
    pub fn new_side(&self) -> &HighlightSession<E> {
        &self.new
    }

    /// Highlight the next diff line.
    pub fn parse_line(&mut self, line: DiffLine<'_>) -> DiffMarkup {
        match line {
            DiffLine::Context(text) => DiffMarkup {
                old: self.old.parse_chunk(text),
                new: self.new.parse_chunk(text),
            },
            DiffLine::Removed(text) => DiffMarkup {
                old: self.old.parse_chunk(text),
                new: None,
            },
            DiffLine::Added(text) => DiffMarkup {
                old: None,
                new: self.new.parse_chunk(text),
            },
        }
    }

    /// Reset both sides, e.g. at the start of a new hunk.
    pub fn reset(&mut self) {
        self.old.reset();
        self.new.reset();
    }
}
