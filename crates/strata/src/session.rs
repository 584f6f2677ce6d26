//! Per-document highlighting session.
//!
//! A [`HighlightSession`] is created for each document being displayed and
//! is fed that document's chunks (usually lines) in order. It remembers two
//! things between calls:
//!
//! - the engine's continuation state, so constructs that span chunks (block
//!   comments, multi-line strings) resume correctly on the next chunk;
//! - which grammar is active, so `<script>` and `<style>` regions of an HTML
//!   document are highlighted as JavaScript and CSS.
//!
//! # Example
//!
//! ```rust,ignore
//! use strata::{HighlightSession, Language, SyntectEngine};
//!
//! let engine = SyntectEngine::new();
//! let mut session = HighlightSession::new(&engine, Language::Html, true);
//!
//! for line in source.lines() {
//!     match session.parse_chunk(line) {
//!         Some(markup) => out.push(markup),
//!         None => out.push(strata::html_escape(line)),
//!     }
//! }
//! ```

use std::fmt;

use crate::detect::{self, DelimiterMatch, Mode};
use crate::engine::{EngineAdapter, Highlighted, LexerEngine};
use crate::language::{EmbeddedLanguage, Language};

/// The state of a session's grammar selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionMode {
    /// The initial language is unset; nothing is highlighted.
    Disabled,
    /// Highlighting with the document's own grammar.
    Outer,
    /// Highlighting an embedded region with its grammar.
    Embedded(EmbeddedLanguage),
}

/// Incremental highlighter for one document.
///
/// Not meant to be shared: one owner calls [`parse_chunk`](Self::parse_chunk)
/// with the document's chunks in order. Skipping, reordering or replaying
/// chunks produces wrong (but never panicking) output because the
/// continuation state is chained from one call to the next.
pub struct HighlightSession<E: LexerEngine> {
    adapter: EngineAdapter<E>,
    initial_language: Language,
    embedded_languages_enabled: bool,
    delimiter_match: DelimiterMatch,
    mode: Mode,
    state: Option<E::State>,
}

impl<E: LexerEngine> HighlightSession<E> {
    /// Create a session for a document whose base grammar is
    /// `initial_language`.
    ///
    /// `embedded_languages_enabled` turns on `<script>`/`<style>` detection.
    pub fn new(engine: E, initial_language: Language, embedded_languages_enabled: bool) -> Self {
        Self {
            adapter: EngineAdapter::new(engine),
            initial_language,
            embedded_languages_enabled,
            delimiter_match: DelimiterMatch::default(),
            mode: Mode::Outer,
            state: None,
        }
    }

    /// Create a session with embedded-language detection enabled when the
    /// language supports it.
    pub fn for_language(engine: E, language: Language) -> Self {
        Self::new(engine, language, language.supports_embedded())
    }

    /// Set how `<script>`/`<style>` delimiters are matched.
    pub fn with_delimiter_match(mut self, delimiter_match: DelimiterMatch) -> Self {
        self.delimiter_match = delimiter_match;
        self
    }

    /// The document's base grammar.
    pub fn initial_language(&self) -> Language {
        self.initial_language
    }

    /// The grammar the next chunk will be highlighted with, before any
    /// delimiter in that chunk is taken into account.
    pub fn current_language(&self) -> Language {
        match self.mode {
            Mode::Outer => self.initial_language,
            Mode::Embedded(embedded) => embedded.language(),
        }
    }

    /// Whether embedded-language detection applies to this document.
    pub fn embedded_languages_enabled(&self) -> bool {
        self.embedded_languages_enabled
    }

    /// Where the session currently is in its state machine.
    pub fn mode(&self) -> SessionMode {
        if self.initial_language.is_unset() {
            return SessionMode::Disabled;
        }
        match self.mode {
            Mode::Outer => SessionMode::Outer,
            Mode::Embedded(embedded) => SessionMode::Embedded(embedded),
        }
    }

    /// The engine state the next chunk resumes from. `None` at the start of a
    /// grammar.
    pub fn continuation_state(&self) -> Option<&E::State> {
        self.state.as_ref()
    }

    /// Go back to the start of the document: outer grammar, no pending
    /// construct.
    pub fn reset(&mut self) {
        self.mode = Mode::Outer;
        self.state = None;
    }

    /// Highlight the next chunk of the document.
    ///
    /// Returns `None` when the session is disabled or the engine failed on
    /// this chunk; the caller should render the chunk's raw text instead.
    /// A failed chunk leaves the continuation state untouched.
    pub fn parse_chunk(&mut self, text: &str) -> Option<String> {
        if self.initial_language.is_unset() {
            return None;
        }

        // A closing tag is highlighted by the outer grammar
        if detect::exit(
            self.embedded_languages_enabled,
            self.mode,
            text,
            self.delimiter_match,
        ) {
            self.switch_to(Mode::Outer);
        }

        let language = self.current_language();
        let markup = match self.adapter.invoke(language, text, self.state.as_ref()) {
            Ok(Highlighted { markup, state }) => {
                self.state = Some(state);
                Some(markup)
            }
            Err(err) => {
                tracing::debug!(
                    %language,
                    error = %err,
                    "keeping continuation state after engine failure"
                );
                None
            }
        };

        // An opening tag is highlighted by the outer grammar too; only the
        // following chunks use the embedded one
        if let Some(embedded) = detect::enter(
            self.embedded_languages_enabled,
            self.mode,
            text,
            self.delimiter_match,
        ) {
            self.switch_to(Mode::Embedded(embedded));
        }

        markup
    }

    fn switch_to(&mut self, mode: Mode) {
        let from = self.current_language();
        self.mode = mode;
        self.state = None;
        tracing::trace!(%from, to = %self.current_language(), "switched grammar");
    }
}

impl<E: LexerEngine> fmt::Debug for HighlightSession<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlightSession")
            .field("initial_language", &self.initial_language)
            .field("current_language", &self.current_language())
            .field(
                "embedded_languages_enabled",
                &self.embedded_languages_enabled,
            )
            .field("delimiter_match", &self.delimiter_match)
            .field("has_state", &self.state.is_some())
            .finish()
    }
}
