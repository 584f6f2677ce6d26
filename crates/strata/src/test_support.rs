//! A scripted engine for unit tests.

use std::cell::{Ref, RefCell};

use crate::engine::{EngineError, Highlighted, LexerEngine};
use crate::language::Language;
use crate::markup::html_escape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MockState {
    pub language: Language,
    pub in_comment: bool,
    pub chunks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call {
    pub language: Language,
    pub text: String,
    pub state: Option<MockState>,
}

/// Wraps each chunk in one span classed by language, or `comment` when the
/// chunk starts inside a `/* */` comment.
///
/// Chunks containing `boom` fail and chunks containing `panic!` panic.
#[derive(Debug, Default)]
pub(crate) struct MockEngine {
    calls: RefCell<Vec<Call>>,
}

impl MockEngine {
    pub fn calls(&self) -> Ref<'_, Vec<Call>> {
        self.calls.borrow()
    }
}

impl LexerEngine for MockEngine {
    type State = MockState;

    fn highlight(
        &self,
        language: Language,
        text: &str,
        state: Option<&MockState>,
    ) -> Result<Highlighted<MockState>, EngineError> {
        self.calls.borrow_mut().push(Call {
            language,
            text: text.to_string(),
            state: state.cloned(),
        });

        if text.contains("boom") {
            return Err(EngineError::failed(language, "scripted failure"));
        }
        if text.contains("panic!") {
            panic!("scripted panic");
        }

        let started_in_comment = state.is_some_and(|s| s.in_comment);
        let in_comment = if started_in_comment {
            !text.contains("*/")
        } else {
            text.find("/*")
                .is_some_and(|start| !text[start..].contains("*/"))
        };
        let class = if started_in_comment {
            "comment"
        } else {
            language.name()
        };

        Ok(Highlighted {
            markup: format!("<span class=\"{class}\">{}</span>", html_escape(text)),
            state: MockState {
                language,
                in_comment,
                chunks: state.map_or(0, |s| s.chunks) + 1,
            },
        })
    }
}
