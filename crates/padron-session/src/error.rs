//! Session-level errors
//!
//! Rejected operations leave the session state untouched; the caller can
//! retry or take another path. Persistence failures never appear here,
//! they are traced at the save site.

use padron_ai::AiError;
use padron_flow::{FlowError, StepId};
use padron_ledger::FileId;
use padron_locale::LocaleError;

/// Errors from session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Navigation rejected by the flow engine
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// Continuing requires the outstanding documents or explicit confirmation
    #[error("documents outstanding: {missing:?}")]
    DocumentsOutstanding {
        /// Requirement names not yet fully validated
        missing: Vec<String>,
    },

    /// The current info block has no auto-advance target
    #[error("step {0} has no continuation")]
    NoContinuation(StepId),

    /// The current step is not a question
    #[error("step {0} takes no answer")]
    NotAQuestion(StepId),

    /// The current step is not an info block
    #[error("step {0} is not an info block")]
    NotAnInfoBlock(StepId),

    /// No file with that id under that requirement
    #[error("no file {id} under {requirement:?}")]
    UnknownFile {
        /// Requirement name
        requirement: String,
        /// File id
        id: FileId,
    },

    /// Summarizer failed
    #[error(transparent)]
    Ai(#[from] AiError),

    /// Locale bundle could not be loaded (default language included)
    #[error(transparent)]
    Locale(#[from] LocaleError),
}
