//! Breadcrumb trail
//!
//! Localized, human-readable rendering of the navigation history: a
//! synthetic home entry, then every visited step and the current one
//! resolved to display text. Rebuilt whenever the locale or the path
//! changes, so the same ids relabel under a new language.

use crate::graph::{FlowGraph, StepId, SUMMARY_STEP};
use serde::{Deserialize, Serialize};

/// Id used for the synthetic home entry
pub const HOME_CRUMB_ID: &str = "start";

/// One breadcrumb entry; wire shape matches the persisted flow path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Step id, or `start` for the home entry
    pub id: String,
    /// Localized label
    #[serde(rename = "text")]
    pub label: String,
}

/// Build the trail for `history` + `current`
///
/// `home_label` names the synthetic root; `summary_label` overrides the
/// summary step's (empty) display text.
#[must_use]
pub fn breadcrumb_trail(
    history: &[StepId],
    current: &StepId,
    graph: &FlowGraph,
    home_label: &str,
    summary_label: &str,
) -> Vec<Breadcrumb> {
    let mut trail = Vec::with_capacity(history.len() + 2);
    trail.push(Breadcrumb {
        id: HOME_CRUMB_ID.to_owned(),
        label: home_label.to_owned(),
    });

    for id in history.iter().chain(std::iter::once(current)) {
        let label = if id.as_str() == SUMMARY_STEP {
            summary_label.to_owned()
        } else {
            graph.display_text(id).to_owned()
        };
        trail.push(Breadcrumb {
            id: id.as_str().to_owned(),
            label,
        });
    }

    trail
}
