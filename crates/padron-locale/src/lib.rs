//! Padron Locale - localized catalogs and flow graphs
//!
//! The questionnaire ships one flow graph and one message catalog per
//! language under `data/`. [`LocaleLoader`] pairs them into a
//! [`LocaleBundle`], validating the graph at load time, and falls back to
//! the default language when a requested one is unavailable.

#![warn(unreachable_pub)]

// Core modules
pub mod catalog;
pub mod error;
pub mod loader;

// Re-exports for convenience
pub use catalog::MessageCatalog;
pub use error::LocaleError;
pub use loader::{LocaleBundle, LocaleLoader};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with locale bundles
    pub use crate::{LocaleBundle, LocaleError, LocaleLoader, MessageCatalog};
}
