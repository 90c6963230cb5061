//! Padron Flow - questionnaire graph and navigation
//!
//! The flow engine for the padrón wizard:
//! - Parses the static flow-data JSON into a strongly typed graph
//! - Rejects dangling step references at load time, not navigation time
//! - Navigates forward/back deterministically with a history stack
//! - Accumulates the document requirements presented along the taken path
//! - Renders a localized breadcrumb trail
//!
//! # Example
//!
//! ```rust,ignore
//! use padron_flow::{FlowCursor, FlowGraph, StepId, required_documents};
//!
//! let graph = FlowGraph::from_json(&flow_json)?;
//! let mut cursor = FlowCursor::new(&graph);
//! cursor.advance(StepId::from("q2_alta_type"), &graph)?;
//!
//! let owed = required_documents(cursor.history(), cursor.current(), &graph);
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod breadcrumb;
pub mod cursor;
pub mod error;
pub mod graph;
pub mod requirements;

// Re-exports for convenience
pub use breadcrumb::{breadcrumb_trail, Breadcrumb, HOME_CRUMB_ID};
pub use cursor::FlowCursor;
pub use error::FlowError;
pub use graph::{
    DocumentRequirement, FlowGraph, Step, StepId, StepKind, StepOption, FINAL_REVIEW_STEP,
    SUMMARY_STEP,
};
pub use requirements::required_documents;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the flow engine
    pub use crate::{
        breadcrumb_trail, required_documents, Breadcrumb, DocumentRequirement, FlowCursor,
        FlowError, FlowGraph, Step, StepId, StepKind, StepOption,
    };
}
