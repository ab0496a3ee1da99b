use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
///
/// Malformed completion-service output is deliberately NOT represented here:
/// it degrades to empty/default structured data inside the sanitizer and never
/// surfaces as an error (see `llm_client::sanitize`).
#[derive(Debug, Error)]
pub enum AppError {
    /// No candidate information supplied at all. Fatal, not retried.
    #[error("Input error: {0}")]
    Input(String),

    /// A caller broke the turn protocol (closing a stale turn, asking while a
    /// turn is open). Fatal — the session log's invariants are at stake.
    #[error("Protocol violation: {0}")]
    Protocol(String),

    /// Completion-service failure, propagated unmodified. The core does not
    /// retry beyond what the client itself does.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
