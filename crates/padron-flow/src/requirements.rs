//! Requirement accumulation over the taken path
//!
//! The set of documents the user owes is the union of everything the visited
//! info blocks asked for, in first-seen order. Later steps never redefine a
//! requirement introduced earlier on the same path; steps that fell off the
//! path (after re-answering a question) simply stop contributing.

use crate::graph::{DocumentRequirement, FlowGraph, StepId};
use indexmap::IndexMap;

/// All document requirements presented along `history` plus `current`
///
/// Pure function: scans the visited steps in visitation order followed by
/// the current step, deduplicating by requirement name and keeping the first
/// occurrence. Calling it twice without intervening navigation yields
/// identical output.
#[must_use]
pub fn required_documents(
    history: &[StepId],
    current: &StepId,
    graph: &FlowGraph,
) -> Vec<DocumentRequirement> {
    let mut seen: IndexMap<&str, &DocumentRequirement> = IndexMap::new();

    for id in history.iter().chain(std::iter::once(current)) {
        let Some(step) = graph.step(id) else { continue };
        for requirement in step.documents() {
            seen.entry(requirement.name.as_str()).or_insert(requirement);
        }
    }

    seen.into_values().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_graph;
    use pretty_assertions::assert_eq;

    fn names(reqs: &[DocumentRequirement]) -> Vec<&str> {
        reqs.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn empty_path_on_question_step_has_no_requirements() {
        let graph = test_graph::sample();
        let reqs = required_documents(&[], &StepId::from("q1"), &graph);
        assert!(reqs.is_empty());
    }

    #[test]
    fn collects_current_step_documents() {
        let graph = test_graph::sample();
        let history = [StepId::from("q1"), StepId::from("q2")];
        let reqs = required_documents(&history, &StepId::from("docs_owner"), &graph);
        assert_eq!(
            names(&reqs),
            vec!["Documento de identidad", "Titulo de propiedad"]
        );
    }

    #[test]
    fn union_across_path_dedups_by_name_keeping_first() {
        let graph = test_graph::sample();
        // Visited both branches (user went back and re-answered): the shared
        // identity requirement appears once, owner docs first.
        let history = [
            StepId::from("q1"),
            StepId::from("q2"),
            StepId::from("docs_owner"),
            StepId::from("q2"),
            StepId::from("docs_tenant"),
        ];
        let reqs = required_documents(&history, &StepId::from("final_document_review"), &graph);
        assert_eq!(
            names(&reqs),
            vec![
                "Documento de identidad",
                "Titulo de propiedad",
                "Contrato de alquiler"
            ]
        );
    }

    #[test]
    fn idempotent_and_order_stable() {
        let graph = test_graph::sample();
        let history = [StepId::from("q1"), StepId::from("q2")];
        let current = StepId::from("docs_tenant");

        let first = required_documents(&history, &current, &graph);
        let second = required_documents(&history, &current, &graph);
        assert_eq!(first, second);
    }

    #[test]
    fn never_contains_duplicate_names() {
        let graph = test_graph::sample();
        let history = [
            StepId::from("docs_owner"),
            StepId::from("docs_tenant"),
            StepId::from("docs_owner"),
        ];
        let reqs = required_documents(&history, &StepId::from("docs_tenant"), &graph);

        let mut sorted: Vec<&str> = names(&reqs);
        sorted.sort_unstable();
        let mut deduped = sorted.clone();
        deduped.dedup();
        assert_eq!(sorted, deduped);
    }

    #[test]
    fn abandoned_branch_drops_out_when_not_on_path() {
        let graph = test_graph::sample();
        // Path goes through the tenant branch only; owner docs never appear.
        let history = [StepId::from("q1"), StepId::from("q2")];
        let reqs = required_documents(&history, &StepId::from("docs_tenant"), &graph);
        assert!(!names(&reqs).contains(&"Titulo de propiedad"));
    }
}
