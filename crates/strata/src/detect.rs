//! Embedded-language detection.
//!
//! Pure functions deciding, from the text of a single chunk, whether an HTML
//! document is entering a `<script>`/`<style>` region or leaving one. They
//! hold no state; the session owns the current [`Mode`] and passes it in.
//!
//! Only the start of a chunk is inspected. A chunk boundary that falls in the
//! middle of a tag will therefore miss the transition; callers that feed one
//! line per chunk get the expected behavior for conventionally formatted
//! markup.

use crate::language::EmbeddedLanguage;

/// Which grammar region of a document the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// The document's own grammar.
    #[default]
    Outer,
    /// Inside an embedded region.
    Embedded(EmbeddedLanguage),
}

/// How a delimiter is matched against the start of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DelimiterMatch {
    /// The chunk must begin with the delimiter.
    #[default]
    Prefix,
    /// Leading whitespace is skipped before testing for the delimiter, so
    /// indented tags are recognised.
    IgnoreLeadingWhitespace,
}

impl DelimiterMatch {
    fn starts_with(self, text: &str, delimiter: &str) -> bool {
        match self {
            DelimiterMatch::Prefix => text.starts_with(delimiter),
            DelimiterMatch::IgnoreLeadingWhitespace => text.trim_start().starts_with(delimiter),
        }
    }
}

/// The outcome of running both checks against one chunk in a single mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    /// Embedded language to switch into after the chunk is highlighted.
    pub enter: Option<EmbeddedLanguage>,
    /// Whether to switch back to the outer language before the chunk is
    /// highlighted.
    pub exit: bool,
}

/// Returns true if `text` closes the embedded region `mode` is in.
pub fn exit(enabled: bool, mode: Mode, text: &str, matching: DelimiterMatch) -> bool {
    match mode {
        Mode::Embedded(embedded) if enabled => matching.starts_with(text, embedded.closing()),
        _ => false,
    }
}

/// Returns the embedded language `text` opens, if it opens one and does not
/// also close it within the same chunk.
pub fn enter(
    enabled: bool,
    mode: Mode,
    text: &str,
    matching: DelimiterMatch,
) -> Option<EmbeddedLanguage> {
    if !enabled || mode != Mode::Outer {
        return None;
    }

    EmbeddedLanguage::ALL.into_iter().find(|embedded| {
        matching.starts_with(text, embedded.opening()) && !text.contains(embedded.closing())
    })
}

/// Runs both checks against the same input mode.
///
/// This is a convenience for inspecting a chunk in isolation. A
/// [`HighlightSession`](crate::HighlightSession) does not use it: it calls
/// [`exit`] before highlighting the chunk and [`enter`] afterwards, against
/// the mode the exit check left behind.
pub fn detect(enabled: bool, mode: Mode, text: &str, matching: DelimiterMatch) -> Transition {
    Transition {
        enter: enter(enabled, mode, text, matching),
        exit: exit(enabled, mode, text, matching),
    }
}
