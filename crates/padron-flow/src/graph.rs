//! Static questionnaire flow graph
//!
//! The graph is a set of immutable steps (questions and info blocks) with
//! edges expressed as step-id references. Construction validates every
//! reference eagerly, so navigation never discovers a dangling edge at
//! runtime: a `FlowGraph` value is proof that all transitions resolve.

use crate::error::FlowError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Id of the final review step, where path-wide requirements are collected
pub const FINAL_REVIEW_STEP: &str = "final_document_review";

/// Id of the terminal summary pseudo-step
pub const SUMMARY_STEP: &str = "summary_screen";

/// Unique step identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub String);

impl StepId {
    /// View as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StepId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for StepId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document the user must provide at an info block
///
/// `name` is the ledger key and must be unique within its step. Wire field
/// names follow the original flow-data JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRequirement {
    /// Ledger key and display name
    pub name: String,
    /// Human-readable description of acceptable documents
    pub description: String,
    /// Whether more than one file may be attached
    #[serde(default)]
    pub multiple_files: bool,
    /// Whether a successful validation should yield a registrable person
    #[serde(default)]
    pub id_extractable: bool,
}

/// One selectable answer of a question step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOption {
    /// Answer label shown to the user
    #[serde(rename = "text")]
    pub label: String,
    /// Step the answer leads to
    #[serde(rename = "next_question_id")]
    pub next: StepId,
}

/// Step payload: a question or an informational document block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// Single-choice question
    Question {
        /// Question prompt
        prompt: String,
        /// Ordered answer options
        options: Vec<StepOption>,
    },
    /// Informational block, usually listing document requirements
    InfoBlock {
        /// Display text
        text: String,
        /// Documents requested at this step
        documents: Vec<DocumentRequirement>,
        /// Auto-advance target, if any
        next: Option<StepId>,
        /// Ends the guided portion of the flow
        terminal: bool,
    },
}

/// A node in the flow graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Unique id
    pub id: StepId,
    /// Question or info block payload
    pub kind: StepKind,
}

impl Step {
    /// Display text for breadcrumbs: the prompt, the info text, or the id
    #[must_use]
    pub fn display_text(&self) -> &str {
        match &self.kind {
            StepKind::Question { prompt, .. } if !prompt.is_empty() => prompt,
            StepKind::InfoBlock { text, .. } if !text.is_empty() => text,
            _ => self.id.as_str(),
        }
    }

    /// Documents requested at this step (empty for questions)
    #[must_use]
    pub fn documents(&self) -> &[DocumentRequirement] {
        match &self.kind {
            StepKind::InfoBlock { documents, .. } => documents,
            StepKind::Question { .. } => &[],
        }
    }

    /// Option list for question steps
    #[must_use]
    pub fn options(&self) -> &[StepOption] {
        match &self.kind {
            StepKind::Question { options, .. } => options,
            StepKind::InfoBlock { .. } => &[],
        }
    }

    /// Auto-advance target for info blocks
    #[must_use]
    pub fn next(&self) -> Option<&StepId> {
        match &self.kind {
            StepKind::InfoBlock { next, .. } => next.as_ref(),
            StepKind::Question { .. } => None,
        }
    }

    /// Whether this step ends the guided portion
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, StepKind::InfoBlock { terminal: true, .. })
    }
}

/// Wire representation of a step, matching the original flow-data JSON
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawStep {
    #[serde(rename = "single_choice")]
    Question {
        id: StepId,
        #[serde(default)]
        question: String,
        options: Vec<StepOption>,
    },
    #[serde(rename = "info_block")]
    InfoBlock {
        id: StepId,
        #[serde(default)]
        text: String,
        #[serde(default)]
        documents: Vec<DocumentRequirement>,
        #[serde(default)]
        next_question_id: Option<StepId>,
        #[serde(default)]
        end_flow: bool,
    },
}

impl From<RawStep> for Step {
    fn from(raw: RawStep) -> Self {
        match raw {
            RawStep::Question { id, question, options } => Step {
                id,
                kind: StepKind::Question { prompt: question, options },
            },
            RawStep::InfoBlock {
                id,
                text,
                documents,
                next_question_id,
                end_flow,
            } => Step {
                id,
                kind: StepKind::InfoBlock {
                    text,
                    documents,
                    next: next_question_id,
                    terminal: end_flow,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawFlow {
    flow: Vec<RawStep>,
}

/// The full immutable questionnaire graph for one locale
///
/// Can only be built through [`FlowGraph::from_steps`] or
/// [`FlowGraph::from_json`], both of which reject duplicate ids, dangling
/// references and empty questions.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    root: StepId,
    steps: IndexMap<StepId, Step>,
}

impl FlowGraph {
    /// Build a graph from steps; the first step becomes the root
    pub fn from_steps(steps: Vec<Step>) -> Result<Self, FlowError> {
        let root = steps.first().map(|s| s.id.clone()).ok_or(FlowError::EmptyGraph)?;

        let mut map: IndexMap<StepId, Step> = IndexMap::with_capacity(steps.len());
        for step in steps {
            if map.contains_key(&step.id) {
                return Err(FlowError::DuplicateStep(step.id));
            }
            map.insert(step.id.clone(), step);
        }

        // Every reference must resolve before the graph is usable.
        for step in map.values() {
            match &step.kind {
                StepKind::Question { options, .. } => {
                    if options.is_empty() {
                        return Err(FlowError::EmptyQuestion(step.id.clone()));
                    }
                    for option in options {
                        if !map.contains_key(&option.next) {
                            return Err(FlowError::DanglingReference {
                                from: step.id.clone(),
                                to: option.next.clone(),
                            });
                        }
                    }
                }
                StepKind::InfoBlock { next: Some(next), .. } => {
                    if !map.contains_key(next) {
                        return Err(FlowError::DanglingReference {
                            from: step.id.clone(),
                            to: next.clone(),
                        });
                    }
                }
                StepKind::InfoBlock { .. } => {}
            }
        }

        tracing::debug!(steps = map.len(), root = %root, "flow graph validated");
        Ok(Self { root, steps: map })
    }

    /// Parse and validate a graph from its JSON wire format
    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        let raw: RawFlow = serde_json::from_str(json)?;
        Self::from_steps(raw.flow.into_iter().map(Step::from).collect())
    }

    /// Root step id (the graph's designated entry point)
    #[inline]
    #[must_use]
    pub fn root(&self) -> &StepId {
        &self.root
    }

    /// Look up a step by id
    #[inline]
    #[must_use]
    pub fn step(&self, id: &StepId) -> Option<&Step> {
        self.steps.get(id)
    }

    /// Whether the id names a step in this graph
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &StepId) -> bool {
        self.steps.contains_key(id)
    }

    /// Display text for a step id, falling back to the id itself
    #[must_use]
    pub fn display_text<'a>(&'a self, id: &'a StepId) -> &'a str {
        self.step(id).map_or(id.as_str(), Step::display_text)
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the graph has no steps (never true for a constructed graph)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate steps in file order
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.values()
    }
}
