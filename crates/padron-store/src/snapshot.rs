//! Session snapshot
//!
//! The full-state record written on every mutation. Raw file payloads are
//! never serialized; the base64 captured at validation time is what
//! survives a reload.

use chrono::{DateTime, Utc};
use padron_flow::{Breadcrumb, StepId};
use padron_ledger::{DocumentLedger, PersonRegistry};
use serde::{Deserialize, Serialize};

/// Everything needed to resume a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Step the user is on
    pub current_step: StepId,
    /// Visited steps, oldest first
    pub history: Vec<StepId>,
    /// Uploaded documents and their validation state
    pub ledger: DocumentLedger,
    /// People derived from identity documents
    pub people: PersonRegistry,
    /// Registration address, once known
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub registration_address: Option<String>,
    /// Breadcrumb trail as last rendered
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Label of the root-question answer
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub selected_procedure: Option<String>,
    /// When this snapshot was taken
    pub saved_at: DateTime<Utc>,
}

impl SessionSnapshot {
    /// Fresh snapshot at a step with no accumulated state
    #[must_use]
    pub fn at_root(root: StepId) -> Self {
        Self {
            current_step: root,
            history: Vec::new(),
            ledger: DocumentLedger::default(),
            people: PersonRegistry::default(),
            registration_address: None,
            breadcrumbs: Vec::new(),
            selected_procedure: None,
            saved_at: Utc::now(),
        }
    }
}
