//! Cursor over the flow graph
//!
//! Holds the current step and the ordered history of previously visited
//! steps (a stack: push on advance, pop on retreat). Given the same call
//! sequence the cursor is fully deterministic; rejected transitions leave
//! the state untouched.

use crate::error::FlowError;
use crate::graph::{FlowGraph, StepId, FINAL_REVIEW_STEP, SUMMARY_STEP};
use serde::{Deserialize, Serialize};

/// Navigation cursor: current step plus visited-step history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowCursor {
    current: StepId,
    history: Vec<StepId>,
}

impl FlowCursor {
    /// Cursor positioned at the graph root with empty history
    #[must_use]
    pub fn new(graph: &FlowGraph) -> Self {
        Self {
            current: graph.root().clone(),
            history: Vec::new(),
        }
    }

    /// Rebuild a cursor from persisted parts, checking graph membership
    ///
    /// Every id must resolve against the given graph; a snapshot taken
    /// against a newer graph revision fails here and the caller decides the
    /// fallback.
    pub fn from_parts(
        current: StepId,
        history: Vec<StepId>,
        graph: &FlowGraph,
    ) -> Result<Self, FlowError> {
        if !graph.contains(&current) {
            return Err(FlowError::UnknownStep(current));
        }
        if let Some(missing) = history.iter().find(|id| !graph.contains(id)) {
            return Err(FlowError::UnknownStep(missing.clone()));
        }
        Ok(Self { current, history })
    }

    /// Current step id
    #[inline]
    #[must_use]
    pub fn current(&self) -> &StepId {
        &self.current
    }

    /// Previously visited steps, oldest first
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[StepId] {
        &self.history
    }

    /// Whether the cursor has nowhere to retreat to
    #[inline]
    #[must_use]
    pub fn at_root(&self) -> bool {
        self.history.is_empty()
    }

    /// Move forward to `next`, pushing the current step onto the history
    ///
    /// Only existence is checked here; offering legal transitions is the
    /// caller's job (the options of the current step, or its auto-advance).
    pub fn advance(&mut self, next: StepId, graph: &FlowGraph) -> Result<(), FlowError> {
        if !graph.contains(&next) {
            return Err(FlowError::UnknownStep(next));
        }
        tracing::debug!(from = %self.current, to = %next, "cursor advance");
        self.history.push(std::mem::replace(&mut self.current, next));
        Ok(())
    }

    /// Step back to the previously visited step
    ///
    /// Returns the step that was left. Fails with [`FlowError::AtRoot`] when
    /// the history is empty.
    pub fn retreat(&mut self) -> Result<StepId, FlowError> {
        let previous = self.history.pop().ok_or(FlowError::AtRoot)?;
        tracing::debug!(from = %self.current, to = %previous, "cursor retreat");
        Ok(std::mem::replace(&mut self.current, previous))
    }

    /// Jump from the final review step to the summary pseudo-step
    pub fn jump_to_summary(&mut self, graph: &FlowGraph) -> Result<(), FlowError> {
        if self.current.as_str() != FINAL_REVIEW_STEP {
            return Err(FlowError::IllegalJump {
                from: self.current.clone(),
            });
        }
        self.advance(StepId::from(SUMMARY_STEP), graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_graph;
    use pretty_assertions::assert_eq;

    #[test]
    fn advance_then_retreat_restores_prior_state() {
        let graph = test_graph::sample();
        let mut cursor = FlowCursor::new(&graph);
        let before = cursor.clone();

        cursor.advance(StepId::from("q2"), &graph).unwrap();
        assert_eq!(cursor.current().as_str(), "q2");
        assert_eq!(cursor.history(), &[StepId::from("q1")]);

        let left = cursor.retreat().unwrap();
        assert_eq!(left.as_str(), "q2");
        assert_eq!(cursor, before);
        assert!(cursor.at_root());
    }

    #[test]
    fn rejected_advance_keeps_state() {
        let graph = test_graph::sample();
        let mut cursor = FlowCursor::new(&graph);
        let before = cursor.clone();

        let err = cursor.advance(StepId::from("nowhere"), &graph).unwrap_err();
        assert!(matches!(err, FlowError::UnknownStep(_)));
        assert_eq!(cursor, before);
    }

    #[test]
    fn retreat_at_root_fails_silently_recoverable() {
        let graph = test_graph::sample();
        let mut cursor = FlowCursor::new(&graph);

        assert!(matches!(cursor.retreat(), Err(FlowError::AtRoot)));
        assert_eq!(cursor.current(), graph.root());
    }

    #[test]
    fn deep_path_retreats_in_reverse_order() {
        let graph = test_graph::sample();
        let mut cursor = FlowCursor::new(&graph);
        cursor.advance(StepId::from("q2"), &graph).unwrap();
        cursor.advance(StepId::from("docs_owner"), &graph).unwrap();
        cursor
            .advance(StepId::from(FINAL_REVIEW_STEP), &graph)
            .unwrap();

        cursor.retreat().unwrap();
        assert_eq!(cursor.current().as_str(), "docs_owner");
        cursor.retreat().unwrap();
        assert_eq!(cursor.current().as_str(), "q2");
        cursor.retreat().unwrap();
        assert_eq!(cursor.current().as_str(), "q1");
        assert!(cursor.at_root());
    }

    #[test]
    fn jump_to_summary_only_from_final_review() {
        let graph = test_graph::sample();
        let mut cursor = FlowCursor::new(&graph);

        assert!(matches!(
            cursor.jump_to_summary(&graph),
            Err(FlowError::IllegalJump { .. })
        ));

        cursor.advance(StepId::from("q2"), &graph).unwrap();
        cursor.advance(StepId::from("docs_owner"), &graph).unwrap();
        cursor
            .advance(StepId::from(FINAL_REVIEW_STEP), &graph)
            .unwrap();
        cursor.jump_to_summary(&graph).unwrap();
        assert_eq!(cursor.current().as_str(), SUMMARY_STEP);
    }

    #[test]
    fn from_parts_validates_membership() {
        let graph = test_graph::sample();

        let ok = FlowCursor::from_parts(
            StepId::from("q2"),
            vec![StepId::from("q1")],
            &graph,
        );
        assert!(ok.is_ok());

        let bad = FlowCursor::from_parts(StepId::from("gone"), vec![], &graph);
        assert!(matches!(bad, Err(FlowError::UnknownStep(_))));

        let bad_history =
            FlowCursor::from_parts(StepId::from("q1"), vec![StepId::from("gone")], &graph);
        assert!(matches!(bad_history, Err(FlowError::UnknownStep(_))));
    }
}
