//! Persistence errors
//!
//! Non-fatal at the session layer: save failures are traced, not
//! propagated to the caller mutating state.

use std::path::PathBuf;

/// Progress store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// User id contains characters unsafe for a file name
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    /// Filesystem failure
    #[error("io error at {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored snapshot could not be decoded
    #[error("snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
