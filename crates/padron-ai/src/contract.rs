//! Collaborator contracts
//!
//! Trait seams for the external services the wizard orchestrates. The
//! session layer only sees these traits; the concrete Gemini client lives
//! behind them and tests substitute mocks.

use crate::error::AiError;
use async_trait::async_trait;
use padron_ledger::{ExtractedField, Person};
use serde::{Deserialize, Serialize};

/// Result of validating one document
///
/// Infallible by contract: a transport or parse failure must arrive here as
/// `is_valid == false` with a descriptive reason, never as an error the
/// caller could drop on the floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Whether the document was accepted
    pub is_valid: bool,
    /// Reason text ("Documento válido", rejection cause, or error text)
    pub reason: String,
    /// Entities extracted from the document
    pub extracted: Vec<ExtractedField>,
    /// Base64 of the payload, captured during the call
    pub encoded_payload: Option<String>,
}

impl ValidationOutcome {
    /// Synthesized failure outcome (connection errors, bad responses)
    #[must_use]
    pub fn failure(reason: impl Into<String>, encoded_payload: Option<String>) -> Self {
        Self {
            is_valid: false,
            reason: reason.into(),
            extracted: Vec::new(),
            encoded_payload,
        }
    }
}

/// Validates a document image/text against a document-type label
#[async_trait]
pub trait DocumentValidator: Send + Sync {
    /// Validate raw file bytes as a document of the given type
    async fn validate(&self, payload: &[u8], document_type: &str) -> ValidationOutcome;
}

/// AI-produced summary of the whole procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureSummary {
    /// Most probable registration address, when determinable
    #[serde(rename = "registrationAddress", skip_serializing_if = "Option::is_none", default)]
    pub registration_address: Option<String>,
    /// Final list of people to register
    #[serde(rename = "peopleToRegister")]
    pub people_to_register: Vec<Person>,
    /// Model confidence in [0, 1]
    #[serde(rename = "confidenceScore")]
    pub confidence_score: f64,
    /// Model reasoning, including ambiguities it found
    pub reasoning: String,
}

/// Summarizes the procedure from all extracted entities
#[async_trait]
pub trait ProcedureSummarizer: Send + Sync {
    /// Summarize; missing required response fields are a shape error
    async fn summarize(
        &self,
        procedure_type: &str,
        extracted_json: &str,
    ) -> Result<ProcedureSummary, AiError>;
}

/// Extracts plain text from non-image documents
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// POST the raw bytes, get the extracted text back
    async fn extract_text(&self, payload: &[u8]) -> Result<String, AiError>;
}
