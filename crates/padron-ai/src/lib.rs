//! Padron AI - external collaborators for document processing
//!
//! The wizard never inspects documents itself; it delegates to the services
//! behind the trait seams in [`contract`]:
//! - [`DocumentValidator`] judges a file against a document-type label and
//!   extracts entities; it is infallible by contract, synthesizing failures
//!   into invalid outcomes
//! - [`ProcedureSummarizer`] compiles address and people from everything
//!   extracted along the way
//! - [`TextExtractor`] converts non-image files to plain text
//!
//! [`GeminiClient`] is the production implementation of the first two.

#![warn(unreachable_pub)]

// Core modules
pub mod contract;
pub mod error;
pub mod extract;
pub mod gemini;

// Re-exports for convenience
pub use contract::{
    DocumentValidator, ProcedureSummarizer, ProcedureSummary, TextExtractor, ValidationOutcome,
};
pub use error::AiError;
pub use extract::HttpTextExtractor;
pub use gemini::{AiConfig, GeminiClient};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the AI collaborators
    pub use crate::{
        AiConfig, AiError, DocumentValidator, GeminiClient, ProcedureSummarizer, ProcedureSummary,
        TextExtractor, ValidationOutcome,
    };
}
