//! A [`LexerEngine`] backed by syntect's TextMate grammars.
//!
//! TextMate grammars are line oriented: syntect's [`ParseState`] is exactly
//! "where the tokenizer was" at the end of a line, which makes it a natural
//! continuation state for [`HighlightSession`](crate::HighlightSession).
//!
//! # Example
//!
//! ```rust,ignore
//! use strata::{HighlightSession, Language, MarkupFormat, SyntectEngine};
//!
//! let engine = SyntectEngine::with_format(MarkupFormat::InlineStyles("InspiredGitHub".into()))?;
//! let mut session = HighlightSession::new(&engine, Language::Html, true);
//! let html = session.parse_chunk("<p>hello</p>");
//! ```

use ::syntect::highlighting::{HighlightIterator, HighlightState, Highlighter, Theme, ThemeSet};
use ::syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use ::syntect::parsing::{ParseState, ScopeStack, ScopeStackOp, SyntaxReference, SyntaxSet};
use thiserror::Error;

use crate::engine::{EngineError, Highlighted, LexerEngine};
use crate::language::Language;
use crate::markup::{MarkupFormat, html_escape, scope_classes};

/// Error when configuring a [`SyntectEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntectEngineError {
    /// The theme named by [`MarkupFormat::InlineStyles`] is not one of
    /// syntect's bundled themes.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
}

/// Continuation state produced by [`SyntectEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntectState {
    language: Language,
    parse: ParseState,
    carry: Carry,
}

impl SyntectState {
    /// The language this state was produced for.
    pub fn language(&self) -> Language {
        self.language
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Carry {
    /// Scopes still open at the end of the chunk.
    Classed(ScopeStack),
    /// Theme resolution state at the end of the chunk.
    Styled(HighlightState),
}

/// Highlights chunks with syntect's default syntax set.
#[derive(Debug)]
pub struct SyntectEngine {
    syntaxes: SyntaxSet,
    format: MarkupFormat,
    theme: Option<Theme>,
}

impl Default for SyntectEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectEngine {
    /// Create an engine emitting class-based spans.
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            format: MarkupFormat::ClassNames,
            theme: None,
        }
    }

    /// Create an engine emitting the given markup format.
    pub fn with_format(format: MarkupFormat) -> Result<Self, SyntectEngineError> {
        let theme = match &format {
            MarkupFormat::InlineStyles(name) => {
                let mut themes = ThemeSet::load_defaults();
                let theme = themes
                    .themes
                    .remove(name)
                    .ok_or_else(|| SyntectEngineError::UnknownTheme(name.clone()))?;
                Some(theme)
            }
            MarkupFormat::ClassNames | MarkupFormat::ClassNamesWithPrefix(_) => None,
        };

        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            format,
            theme,
        })
    }

    /// Names of the themes usable with [`MarkupFormat::InlineStyles`].
    pub fn theme_names() -> Vec<String> {
        ThemeSet::load_defaults().themes.into_keys().collect()
    }

    /// The markup format this engine emits.
    pub fn format(&self) -> &MarkupFormat {
        &self.format
    }

    fn syntax(&self, language: Language) -> Option<&SyntaxReference> {
        self.syntaxes.find_syntax_by_token(language.syntax_token()?)
    }

    fn class_prefix(&self) -> Option<&str> {
        match &self.format {
            MarkupFormat::ClassNamesWithPrefix(prefix) => Some(prefix.as_str()),
            _ => None,
        }
    }

    fn highlight_classed(
        &self,
        language: Language,
        body: &str,
        mut parse: ParseState,
        mut scopes: ScopeStack,
    ) -> Result<Highlighted<SyntectState>, EngineError> {
        let line = format!("{body}\n");
        let ops = parse
            .parse_line(&line, &self.syntaxes)
            .map_err(|err| EngineError::failed(language, err))?;

        let prefix = self.class_prefix();
        let mut markup = String::with_capacity(body.len() * 2);

        for scope in scopes.as_slice() {
            open_span(&mut markup, &scope.build_string(), prefix);
        }

        let mut pos = 0;
        for (offset, op) in &ops {
            let offset = (*offset).min(body.len());
            if offset > pos {
                markup.push_str(&html_escape(&body[pos..offset]));
                pos = offset;
            }
            apply_op(&mut markup, &mut scopes, op, prefix)
                .map_err(|err| EngineError::failed(language, err))?;
        }
        if pos < body.len() {
            markup.push_str(&html_escape(&body[pos..]));
        }

        for _ in 0..scopes.len() {
            markup.push_str("</span>");
        }

        Ok(Highlighted {
            markup,
            state: SyntectState {
                language,
                parse,
                carry: Carry::Classed(scopes),
            },
        })
    }

    fn highlight_styled(
        &self,
        language: Language,
        body: &str,
        theme: &Theme,
        mut parse: ParseState,
        highlight: Option<HighlightState>,
    ) -> Result<Highlighted<SyntectState>, EngineError> {
        let highlighter = Highlighter::new(theme);
        let mut highlight =
            highlight.unwrap_or_else(|| HighlightState::new(&highlighter, ScopeStack::new()));

        let line = format!("{body}\n");
        let ops = parse
            .parse_line(&line, &self.syntaxes)
            .map_err(|err| EngineError::failed(language, err))?;

        let regions: Vec<_> = HighlightIterator::new(&mut highlight, &ops, &line, &highlighter)
            .map(|(style, text)| (style, text.trim_end_matches('\n')))
            .filter(|(_, text)| !text.is_empty())
            .collect();
        let markup = styled_line_to_highlighted_html(&regions, IncludeBackground::No)
            .map_err(|err| EngineError::failed(language, err))?;

        Ok(Highlighted {
            markup,
            state: SyntectState {
                language,
                parse,
                carry: Carry::Styled(highlight),
            },
        })
    }
}

impl LexerEngine for SyntectEngine {
    type State = SyntectState;

    fn highlight(
        &self,
        language: Language,
        text: &str,
        state: Option<&SyntectState>,
    ) -> Result<Highlighted<SyntectState>, EngineError> {
        let syntax = self
            .syntax(language)
            .ok_or(EngineError::UnsupportedLanguage(language))?;

        let state = match state {
            Some(state) if state.language != language => {
                tracing::debug!(
                    %language,
                    state_language = %state.language,
                    "discarding continuation state from another language"
                );
                None
            }
            other => other,
        };

        // The session hands us one line at a time
        let body = text.trim_end_matches(['\r', '\n']);
        let parse = state.map_or_else(|| ParseState::new(syntax), |state| state.parse.clone());

        match &self.theme {
            Some(theme) => {
                let highlight = state.and_then(|state| match &state.carry {
                    Carry::Styled(highlight) => Some(highlight.clone()),
                    Carry::Classed(_) => None,
                });
                self.highlight_styled(language, body, theme, parse, highlight)
            }
            None => {
                let scopes = state
                    .and_then(|state| match &state.carry {
                        Carry::Classed(scopes) => Some(scopes.clone()),
                        Carry::Styled(_) => None,
                    })
                    .unwrap_or_default();
                self.highlight_classed(language, body, parse, scopes)
            }
        }
    }
}

fn open_span(markup: &mut String, scope: &str, prefix: Option<&str>) {
    markup.push_str("<span class=\"");
    markup.push_str(&scope_classes(scope, prefix));
    markup.push_str("\">");
}

/// Apply one scope operation, closing and opening spans so the markup tracks
/// the scope stack.
fn apply_op(
    markup: &mut String,
    scopes: &mut ScopeStack,
    op: &ScopeStackOp,
    prefix: Option<&str>,
) -> Result<(), ::syntect::parsing::ScopeError> {
    let before = scopes.as_slice().to_vec();
    scopes.apply(op)?;
    let after = scopes.as_slice();

    let common = before
        .iter()
        .zip(after)
        .take_while(|(a, b)| a == b)
        .count();
    for _ in common..before.len() {
        markup.push_str("</span>");
    }
    for scope in &after[common..] {
        open_span(markup, &scope.build_string(), prefix);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::HighlightSession;

    #[test]
    fn test_classed_javascript() {
        let engine = SyntectEngine::new();
        let result = engine
            .highlight(Language::JavaScript, "var x = 1;", None)
            .unwrap();

        assert!(result.markup.starts_with(r#"<span class="source js">"#));
        assert!(result.markup.ends_with("</span>"));
        assert_eq!(
            result.markup.matches("<span").count(),
            result.markup.matches("</span>").count()
        );
        assert_eq!(result.state.language(), Language::JavaScript);
    }

    #[test]
    fn test_markup_is_escaped() {
        let engine = SyntectEngine::new();
        let result = engine
            .highlight(Language::JavaScript, r#"if (a < b && c > "d") {}"#, None)
            .unwrap();

        assert!(result.markup.contains("&lt;"));
        assert!(result.markup.contains("&amp;&amp;"));
        assert!(!result.markup.contains(" < "));
    }

    #[test]
    fn test_block_comment_continues() {
        let engine = SyntectEngine::new();
        let first = engine
            .highlight(Language::JavaScript, "/* open", None)
            .unwrap();
        let second = engine
            .highlight(Language::JavaScript, "still */ var y;", Some(&first.state))
            .unwrap();
        assert!(second.markup.contains("comment block"));

        let fresh = engine
            .highlight(Language::JavaScript, "still */ var y;", None)
            .unwrap();
        assert!(!fresh.markup.contains("comment block"));
    }

    #[test]
    fn test_line_comment_does_not_leak() {
        let engine = SyntectEngine::new();
        let first = engine
            .highlight(Language::JavaScript, "// note", None)
            .unwrap();
        assert!(first.markup.contains("comment"));

        let second = engine
            .highlight(Language::JavaScript, "var y;", Some(&first.state))
            .unwrap();
        assert!(!second.markup.contains("comment"));
    }

    fn inline_engine() -> SyntectEngine {
        let format = MarkupFormat::InlineStyles("InspiredGitHub".into());
        SyntectEngine::with_format(format).unwrap()
    }

    fn leading_tag(markup: &str) -> &str {
        markup.split_inclusive('>').next().unwrap_or_default()
    }

    #[test]
    fn test_class_prefix() {
        let format = MarkupFormat::ClassNamesWithPrefix("hl-".into());
        let engine = SyntectEngine::with_format(format).unwrap();
        let result = engine
            .highlight(Language::Css, "a { color: red; }", None)
            .unwrap();
        let expected = r#"<span class="hl-source hl-css">"#;
        assert!(result.markup.starts_with(expected));
    }

    #[test]
    fn test_inline_styles() {
        let engine = inline_engine();
        let result = engine.highlight(Language::Rust, "fn main() {}", None).unwrap();
        assert!(result.markup.contains("style=\""));
        assert!(!result.markup.contains("class="));
        assert!(!result.markup.contains('\n'));
    }

    #[test]
    fn test_inline_styles_block_comment_continues() {
        let engine = inline_engine();
        let js = Language::JavaScript;

        let open = engine.highlight(js, "/* open", None).unwrap();
        let middle = engine.highlight(js, "middle", Some(&open.state)).unwrap();
        let comment_style = leading_tag(&middle.markup);
        assert!(comment_style.starts_with("<span style="));

        let close = engine
            .highlight(js, "still */ var y;", Some(&middle.state))
            .unwrap();
        assert_eq!(leading_tag(&close.markup), comment_style);

        let fresh = engine.highlight(js, "still */ var y;", None).unwrap();
        assert_ne!(leading_tag(&fresh.markup), comment_style);
    }

    #[test]
    fn test_unknown_theme() {
        let format = MarkupFormat::InlineStyles("no-such-theme".into());
        let err = SyntectEngine::with_format(format).unwrap_err();
        assert_eq!(
            err,
            SyntectEngineError::UnknownTheme("no-such-theme".into())
        );

        let themes = SyntectEngine::theme_names();
        assert!(themes.contains(&"InspiredGitHub".to_string()));
    }

    #[test]
    fn test_unset_is_unsupported() {
        let engine = SyntectEngine::new();
        let err = engine.highlight(Language::Unset, "x", None).unwrap_err();
        assert_eq!(err, EngineError::UnsupportedLanguage(Language::Unset));
    }

    #[test]
    fn test_state_from_other_language_is_discarded() {
        let engine = SyntectEngine::new();
        let css = engine.highlight(Language::Css, "/* open", None).unwrap();
        let js = engine
            .highlight(Language::JavaScript, "var y;", Some(&css.state))
            .unwrap();
        assert!(!js.markup.contains("comment"));
        assert_eq!(js.state.language(), Language::JavaScript);
    }

    #[test]
    fn test_session_switches_grammar() {
        let engine = SyntectEngine::new();
        let mut session = HighlightSession::new(&engine, Language::Html, true);

        let opening = session.parse_chunk("<script>").unwrap();
        assert!(opening.contains("text html"));

        let body = session.parse_chunk("var x = 1;").unwrap();
        assert!(body.starts_with(r#"<span class="source js">"#));

        let closing = session.parse_chunk("</script>").unwrap();
        assert!(closing.contains("text html"));
        assert_eq!(session.current_language(), Language::Html);
    }

    #[test]
    fn test_html_document_with_style() {
        let source = indoc::indoc! {"
            <html>
            <style>
            /* theme
               colors */
            p { color: red; }
            </style>
            </html>
        "};

        let engine = SyntectEngine::new();
        let lines = crate::highlight_document(
            &engine,
            Language::Html,
            source,
            &crate::HighlightConfig::default(),
        );

        assert_eq!(lines.len(), 7);
        assert!(lines.iter().all(|line| line.highlighted));
        assert!(lines[3].markup.contains("comment block css"));
        assert!(lines[4].markup.starts_with(r#"<span class="source css">"#));
        assert!(!lines[4].markup.contains("comment"));
        assert!(lines[5].markup.contains("text html"));
    }
}
