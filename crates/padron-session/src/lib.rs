//! Padron Session - the wizard orchestrator
//!
//! Ties the flow engine, the document ledger, the AI collaborators and the
//! progress store into one session value per user:
//! - Navigation (answer, continue, back, summary jump) with the
//!   documents-outstanding confirmation rule
//! - File attachment and validation with stable-id completions
//! - Person registry kept consistent with the ledger
//! - Best-effort snapshot persistence after every mutation
//! - Locale switching that relabels the same path
//!
//! Collaborators are injected at construction; tests drive the session with
//! mocks.

#![warn(unreachable_pub)]

// Core modules
pub mod error;
pub mod session;

// Re-exports for convenience
pub use error::SessionError;
pub use session::{SessionConfig, WizardSession};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a wizard session
    pub use crate::{SessionConfig, SessionError, WizardSession};
}
