//! Padron Ledger - uploaded documents and derived people
//!
//! Tracks what has been provided for each required document and what came
//! out of validating it:
//! - Per-requirement file lists with stable per-file ids
//! - Atomic application of async validation results, stale ones discarded
//! - Person registry derived from identity-bearing documents, kept
//!   consistent on removals
//!
//! Independent of the flow graph: satisfaction checks take the requirement
//! names the caller accumulated along its path.

#![warn(unreachable_pub)]

// Core modules
pub mod entry;
pub mod identity;
pub mod ledger;
pub mod person;

// Re-exports for convenience
pub use entry::{ExtractedField, FileId, UploadedFileEntry, ValidationStatus};
pub use ledger::{ApplyOutcome, DocumentLedger, NewUpload, ValidationUpdate};
pub use person::{Person, PersonRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the document ledger
    pub use crate::{
        ApplyOutcome, DocumentLedger, ExtractedField, FileId, NewUpload, Person, PersonRegistry,
        UploadedFileEntry, ValidationStatus, ValidationUpdate,
    };
}
