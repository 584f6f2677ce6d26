//! The boundary to the external tokenizer.
//!
//! A [`LexerEngine`] turns `(language, text, continuation state)` into markup
//! and a new continuation state. Engines are stateless per call: everything
//! they need to resume a construct that spans chunks travels in the state
//! value, which the engine only ever borrows.
//!
//! [`EngineAdapter`] wraps an engine and isolates its failures. Errors and
//! panics raised by the engine are logged and converted into
//! [`EngineError`], so the session driving it never unwinds and never sees a
//! partially computed state.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;

use crate::language::Language;

/// The result of highlighting one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted<S> {
    /// HTML markup for the chunk.
    pub markup: String,
    /// State to hand back to the engine with the next chunk.
    pub state: S,
}

/// Errors produced at the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine has no grammar for this language.
    #[error("no grammar available for language {0}")]
    UnsupportedLanguage(Language),

    /// The engine failed to tokenize the chunk.
    #[error("failed to highlight {language} chunk: {message}")]
    Failed { language: Language, message: String },

    /// The engine panicked while tokenizing the chunk.
    #[error("engine panicked: {0}")]
    Panicked(String),
}

impl EngineError {
    /// Build a [`EngineError::Failed`] from any displayable engine error.
    pub fn failed(language: Language, err: impl std::fmt::Display) -> Self {
        EngineError::Failed {
            language,
            message: err.to_string(),
        }
    }
}

/// A tokenizer that highlights one chunk at a time.
///
/// # Implementation Notes
///
/// `state` is `None` at the start of a grammar. Implementations must not
/// assume the state was produced for the same language they are asked to
/// highlight; callers guarantee it, but a defensive engine starts fresh
/// when it isn't.
pub trait LexerEngine {
    /// Opaque continuation state carried between chunks.
    type State: Clone;

    /// Highlight `text` as `language`, resuming from `state`.
    fn highlight(
        &self,
        language: Language,
        text: &str,
        state: Option<&Self::State>,
    ) -> Result<Highlighted<Self::State>, EngineError>;
}

impl<E: LexerEngine + ?Sized> LexerEngine for &E {
    type State = E::State;

    fn highlight(
        &self,
        language: Language,
        text: &str,
        state: Option<&Self::State>,
    ) -> Result<Highlighted<Self::State>, EngineError> {
        (**self).highlight(language, text, state)
    }
}

impl<E: LexerEngine + ?Sized> LexerEngine for Arc<E> {
    type State = E::State;

    fn highlight(
        &self,
        language: Language,
        text: &str,
        state: Option<&Self::State>,
    ) -> Result<Highlighted<Self::State>, EngineError> {
        (**self).highlight(language, text, state)
    }
}

/// Forwards calls to a [`LexerEngine`] and contains its failures.
#[derive(Debug, Clone)]
pub struct EngineAdapter<E> {
    engine: E,
}

impl<E: LexerEngine> EngineAdapter<E> {
    /// Wrap an engine.
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Get a reference to the wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Highlight a chunk, converting any engine panic into
    /// [`EngineError::Panicked`]. Failures are logged here.
    pub fn invoke(
        &self,
        language: Language,
        text: &str,
        state: Option<&E::State>,
    ) -> Result<Highlighted<E::State>, EngineError> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.engine.highlight(language, text, state)
        }))
        .unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            Err(EngineError::Panicked(message))
        });

        if let Err(err) = &result {
            tracing::warn!(%language, error = %err, "highlighting engine failed");
        }

        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
