//! Incremental, language-switching syntax highlighting.
//!
//! Strata highlights a document piece by piece, typically one call per
//! displayed line, on top of any tokenizer that can resume from a
//! continuation state. It takes care of the two things a stateless
//! per-call engine cannot:
//!
//! - carrying the engine's state from one chunk to the next, so constructs
//!   such as block comments that span lines are classified correctly;
//! - switching grammars inside HTML documents, so `<script>` regions are
//!   highlighted as JavaScript and `<style>` regions as CSS.
//!
//! # Architecture
//!
//! - [`LexerEngine`]: the tokenizer. Given a language, a chunk and an
//!   optional continuation state it returns markup and a new state.
//! - [`EngineAdapter`]: calls the engine and turns its errors and panics into
//!   [`EngineError`] values.
//! - [`detect`]: pure functions recognising `<script>`/`<style>` delimiters.
//! - [`HighlightSession`]: one per document; owns the continuation state and
//!   the active grammar.
//!
//! Engine failures never escape a session. A chunk the engine could not
//! highlight yields `None` and the caller renders the raw text instead;
//! [`highlight_document`] does this for you.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use strata::{HighlightConfig, Language, SyntectEngine, highlight_document};
//!
//! let engine = SyntectEngine::new();
//! let lines = highlight_document(&engine, Language::Html, source, &HighlightConfig::default());
//! for line in lines {
//!     println!("{}", line.markup);
//! }
//! ```
//!
//! # Features
//!
//! - **`syntect`**: enables [`SyntectEngine`], an engine backed by syntect's
//!   bundled TextMate grammars.

pub mod detect;
pub mod diff;
pub mod document;
pub mod engine;
pub mod language;
pub mod markup;
pub mod session;

#[cfg(feature = "syntect")]
pub mod syntect;

#[cfg(test)]
mod test_support;

pub use detect::{DelimiterMatch, Mode};
pub use diff::{DiffLine, DiffMarkup, DiffSession};
pub use document::{HighlightConfig, RenderedLine, highlight_document, render_lines};
pub use engine::{EngineAdapter, EngineError, Highlighted, LexerEngine};
pub use language::{EmbeddedLanguage, Language, UnknownLanguage};
pub use markup::{MarkupFormat, html_escape};
pub use session::{HighlightSession, SessionMode};

#[cfg(feature = "syntect")]
pub use crate::syntect::{SyntectEngine, SyntectEngineError, SyntectState};
