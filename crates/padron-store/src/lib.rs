//! Padron Store - session snapshot persistence
//!
//! Resuming a half-finished registration is a first-class feature: every
//! mutation at the session layer ends in a full-state save here.
//! - [`SessionSnapshot`] is the complete resumable state (no raw bytes)
//! - [`ProgressStore`] is the trait seam the session depends on
//! - [`JsonFileStore`] and [`MemoryStore`] are the shipped implementations

#![warn(unreachable_pub)]

// Core modules
pub mod error;
pub mod snapshot;
pub mod store;

// Re-exports for convenience
pub use error::StoreError;
pub use snapshot::SessionSnapshot;
pub use store::{JsonFileStore, MemoryStore, ProgressStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with snapshot persistence
    pub use crate::{JsonFileStore, MemoryStore, ProgressStore, SessionSnapshot, StoreError};
}
