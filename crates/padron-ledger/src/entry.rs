//! Uploaded file entries
//!
//! Each upload gets a stable generated id at attach time. Asynchronous
//! validation completions target entries by that id, never by list position,
//! so removals and reorders while a call is in flight cannot hit the wrong
//! file.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(pub Uuid);

impl FileId {
    /// Generate a new file id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation lifecycle of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Uploaded, not yet validated
    #[default]
    Pending,
    /// Accepted by the document validator
    Valid,
    /// Rejected, or the validation attempt itself failed
    Invalid,
}

/// One entity extracted from a validated document
///
/// Wire names follow the AI response schema (`fieldName` etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    /// camelCase identifier of the data kind
    #[serde(rename = "fieldName")]
    pub field_name: String,
    /// Human-readable label
    #[serde(default)]
    pub description: String,
    /// Extracted value
    pub value: String,
}

impl ExtractedField {
    /// Convenience constructor
    #[must_use]
    pub fn new(
        field_name: impl Into<String>,
        description: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            description: description.into(),
            value: value.into(),
        }
    }
}

/// An uploaded file and its validation outcome
///
/// `payload` holds the raw bytes only while the file lives in memory; it is
/// never persisted. `encoded` is the base64 captured at validation time and
/// is what survives in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFileEntry {
    /// Stable id, target of async validation completions
    pub id: FileId,
    /// Original file name
    #[serde(rename = "name")]
    pub display_name: String,
    /// Raw bytes, transient
    #[serde(skip)]
    pub payload: Option<Vec<u8>>,
    /// Base64 payload captured at validation time
    #[serde(rename = "base64")]
    pub encoded: Option<String>,
    /// Validation lifecycle state
    #[serde(rename = "validation_status")]
    pub status: ValidationStatus,
    /// Reason text from the validator (or error text)
    #[serde(rename = "validation_message", default)]
    pub message: String,
    /// Entities extracted by the validator
    #[serde(rename = "extracted_data", default)]
    pub extracted: Vec<ExtractedField>,
}

impl UploadedFileEntry {
    /// Fresh entry in `Pending` state with empty message and entities
    #[must_use]
    pub fn pending(display_name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            id: FileId::new(),
            display_name: display_name.into(),
            payload: Some(payload),
            encoded: None,
            status: ValidationStatus::Pending,
            message: String::new(),
            extracted: Vec::new(),
        }
    }

    /// Whether the entry passed validation
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}
