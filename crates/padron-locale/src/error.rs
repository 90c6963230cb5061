//! Locale loading errors
//!
//! A failing non-default language falls back to the default with a warning;
//! only a failing default language is fatal (a configuration error).

use std::path::PathBuf;

/// Locale bundle loading errors
#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    /// Bundle file missing or unreadable
    #[error("cannot read {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Catalog or flow file is not valid JSON
    #[error("parse error in {path}: {source}")]
    Parse {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Flow graph failed validation
    #[error("invalid flow graph for {lang}: {source}")]
    Flow {
        /// Language being loaded
        lang: String,
        /// Underlying error
        #[source]
        source: padron_flow::FlowError,
    },
}
