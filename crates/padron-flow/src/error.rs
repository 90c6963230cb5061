//! Error types for flow graph loading and navigation
//!
//! Graph structure problems (duplicates, dangling references) are load-time
//! errors; navigation errors reject the transition and leave the cursor
//! untouched.

use crate::graph::StepId;

/// Flow graph and navigation errors
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Graph contains no steps
    #[error("flow graph contains no steps")]
    EmptyGraph,

    /// Two steps share an id
    #[error("duplicate step id: {0}")]
    DuplicateStep(StepId),

    /// A transition points at a step that does not exist
    #[error("dangling reference from {from} to {to}")]
    DanglingReference {
        /// Step holding the reference
        from: StepId,
        /// Missing target id
        to: StepId,
    },

    /// Question step with no options to choose from
    #[error("question step {0} has no options")]
    EmptyQuestion(StepId),

    /// Requested transition target is not in the graph
    #[error("unknown step: {0}")]
    UnknownStep(StepId),

    /// Retreat requested with an empty history
    #[error("cursor is at the root step")]
    AtRoot,

    /// Jump to summary from a step other than the final review
    #[error("cannot jump to summary from {from}")]
    IllegalJump {
        /// Step the cursor was on
        from: StepId,
    },

    /// Option index out of range for the current question
    #[error("question {step} has no option {index}")]
    NoSuchOption {
        /// Question step id
        step: StepId,
        /// Requested option index
        index: usize,
    },

    /// Flow graph JSON could not be parsed
    #[error("flow graph parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
