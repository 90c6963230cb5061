//! Document ledger
//!
//! Per-requirement-name lists of uploaded files. Single-file requirements
//! replace their list on a new upload; multi-file requirements append.
//! Validation completions are applied by stable file id and discarded when
//! their target no longer exists.

use crate::entry::{ExtractedField, FileId, UploadedFileEntry, ValidationStatus};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A file handed over for attachment
#[derive(Debug, Clone)]
pub struct NewUpload {
    /// Original file name
    pub display_name: String,
    /// Raw bytes
    pub payload: Vec<u8>,
}

impl NewUpload {
    /// Convenience constructor
    #[must_use]
    pub fn new(display_name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            display_name: display_name.into(),
            payload,
        }
    }
}

/// Result fields of one validation call, applied atomically to one entry
#[derive(Debug, Clone)]
pub struct ValidationUpdate {
    /// New lifecycle state (`Valid` or `Invalid`)
    pub status: ValidationStatus,
    /// Reason or error text
    pub message: String,
    /// Extracted entities (empty on failure)
    pub extracted: Vec<ExtractedField>,
    /// Base64 payload captured during the call
    pub encoded: Option<String>,
}

/// Whether a validation completion found its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Entry updated
    Applied,
    /// Target entry was removed while the call was in flight
    Discarded,
}

/// Mapping from requirement name to uploaded files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentLedger {
    entries: IndexMap<String, Vec<UploadedFileEntry>>,
}

impl DocumentLedger {
    /// Empty ledger
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty list for a requirement when its step is first shown
    pub fn ensure_slot(&mut self, requirement: &str) {
        self.entries.entry(requirement.to_owned()).or_default();
    }

    /// Whether the requirement has a slot (not necessarily any files)
    #[must_use]
    pub fn has_slot(&self, requirement: &str) -> bool {
        self.entries.contains_key(requirement)
    }

    /// Attach files to a requirement
    ///
    /// When `multiple` is false the new files replace the whole list;
    /// otherwise they are appended. Returns the ids of the new entries.
    pub fn attach(&mut self, requirement: &str, files: Vec<NewUpload>, multiple: bool) -> Vec<FileId> {
        let new_entries: Vec<UploadedFileEntry> = files
            .into_iter()
            .map(|f| UploadedFileEntry::pending(f.display_name, f.payload))
            .collect();
        let ids: Vec<FileId> = new_entries.iter().map(|e| e.id).collect();

        let slot = self.entries.entry(requirement.to_owned()).or_default();
        if multiple {
            slot.extend(new_entries);
        } else {
            *slot = new_entries;
        }

        tracing::debug!(requirement, count = ids.len(), multiple, "files attached");
        ids
    }

    /// Files attached to a requirement
    #[must_use]
    pub fn files(&self, requirement: &str) -> &[UploadedFileEntry] {
        self.entries.get(requirement).map_or(&[], Vec::as_slice)
    }

    /// Look up one entry by requirement name and file id
    #[must_use]
    pub fn entry(&self, requirement: &str, id: FileId) -> Option<&UploadedFileEntry> {
        self.entries.get(requirement)?.iter().find(|e| e.id == id)
    }

    /// Apply a validation completion to its target entry
    ///
    /// Status, message, entities and base64 are set together. If the
    /// (requirement, id) pair no longer resolves the completion is stale and
    /// gets discarded.
    pub fn apply_validation(
        &mut self,
        requirement: &str,
        id: FileId,
        update: ValidationUpdate,
    ) -> ApplyOutcome {
        let target = self
            .entries
            .get_mut(requirement)
            .and_then(|slot| slot.iter_mut().find(|e| e.id == id));

        let Some(entry) = target else {
            tracing::warn!(requirement, %id, "discarding validation result for removed file");
            return ApplyOutcome::Discarded;
        };

        entry.status = update.status;
        entry.message = update.message;
        entry.extracted = update.extracted;
        if update.encoded.is_some() {
            entry.encoded = update.encoded;
        }
        ApplyOutcome::Applied
    }

    /// Remove one entry, returning it for registry reconciliation
    pub fn remove(&mut self, requirement: &str, id: FileId) -> Option<UploadedFileEntry> {
        let slot = self.entries.get_mut(requirement)?;
        let position = slot.iter().position(|e| e.id == id)?;
        Some(slot.remove(position))
    }

    /// Whether any surviving entry still carries the given id number
    #[must_use]
    pub fn id_number_still_referenced(&self, id_number: &str) -> bool {
        self.entries.values().flatten().any(|entry| {
            crate::identity::find_id_number(&entry.extracted) == Some(id_number)
        })
    }

    /// Whether every named requirement has at least one entry and all of its
    /// entries are `Valid`; an empty requirement list is trivially satisfied
    #[must_use]
    pub fn is_fully_satisfied<'a>(&self, requirements: impl IntoIterator<Item = &'a str>) -> bool {
        requirements.into_iter().all(|name| {
            let files = self.files(name);
            !files.is_empty() && files.iter().all(UploadedFileEntry::is_valid)
        })
    }

    /// All extracted entities keyed `<requirement>_<index>`, for the
    /// procedure summarizer
    #[must_use]
    pub fn compile_extracted(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        for (name, files) in &self.entries {
            for (index, entry) in files.iter().enumerate() {
                if entry.extracted.is_empty() {
                    continue;
                }
                let key = format!("{name}_{index}");
                // Serializing ExtractedField cannot fail: plain strings only.
                let fields = serde_json::to_value(&entry.extracted).unwrap_or_default();
                out.insert(key, fields);
            }
        }
        serde_json::Value::Object(out)
    }

    /// Iterate requirement names and their files in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[UploadedFileEntry])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of requirement slots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger has no slots at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ExtractedField;
    use pretty_assertions::assert_eq;

    fn valid_update(fields: Vec<ExtractedField>) -> ValidationUpdate {
        ValidationUpdate {
            status: ValidationStatus::Valid,
            message: "Documento válido".into(),
            extracted: fields,
            encoded: Some("QUJD".into()),
        }
    }

    #[test]
    fn single_file_upload_replaces_list() {
        let mut ledger = DocumentLedger::new();
        ledger.attach("Contrato", vec![NewUpload::new("old.pdf", vec![1])], false);
        assert_eq!(ledger.files("Contrato").len(), 1);

        ledger.attach("Contrato", vec![NewUpload::new("new.pdf", vec![2])], false);
        let files = ledger.files("Contrato");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].display_name, "new.pdf");
        assert_eq!(files[0].status, ValidationStatus::Pending);
    }

    #[test]
    fn multi_file_upload_appends() {
        let mut ledger = DocumentLedger::new();
        ledger.attach("DNI", vec![NewUpload::new("front.png", vec![1])], true);
        ledger.attach("DNI", vec![NewUpload::new("back.png", vec![2])], true);
        assert_eq!(ledger.files("DNI").len(), 2);
    }

    #[test]
    fn apply_validation_sets_fields_atomically() {
        let mut ledger = DocumentLedger::new();
        let ids = ledger.attach("DNI", vec![NewUpload::new("dni.png", vec![1])], true);

        let outcome = ledger.apply_validation(
            "DNI",
            ids[0],
            valid_update(vec![ExtractedField::new("idNumber", "", "X1")]),
        );
        assert_eq!(outcome, ApplyOutcome::Applied);

        let entry = ledger.entry("DNI", ids[0]).unwrap();
        assert!(entry.is_valid());
        assert_eq!(entry.message, "Documento válido");
        assert_eq!(entry.extracted.len(), 1);
        assert_eq!(entry.encoded.as_deref(), Some("QUJD"));
    }

    #[test]
    fn stale_completion_is_discarded_after_removal() {
        let mut ledger = DocumentLedger::new();
        let ids = ledger.attach("DNI", vec![NewUpload::new("dni.png", vec![1])], true);
        ledger.remove("DNI", ids[0]).unwrap();

        let outcome = ledger.apply_validation("DNI", ids[0], valid_update(vec![]));
        assert_eq!(outcome, ApplyOutcome::Discarded);
    }

    #[test]
    fn completion_survives_removal_of_sibling_file() {
        let mut ledger = DocumentLedger::new();
        let first = ledger.attach("DNI", vec![NewUpload::new("front.png", vec![1])], true);
        let second = ledger.attach("DNI", vec![NewUpload::new("back.png", vec![2])], true);

        // Removing the first file must not redirect the second's completion.
        ledger.remove("DNI", first[0]).unwrap();
        let outcome = ledger.apply_validation("DNI", second[0], valid_update(vec![]));
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert!(ledger.entry("DNI", second[0]).unwrap().is_valid());
    }

    #[test]
    fn empty_requirement_list_is_trivially_satisfied() {
        let ledger = DocumentLedger::new();
        assert!(ledger.is_fully_satisfied(std::iter::empty()));
    }

    #[test]
    fn satisfaction_requires_an_entry_and_all_valid() {
        let mut ledger = DocumentLedger::new();
        assert!(!ledger.is_fully_satisfied(["DNI"]));

        let ids = ledger.attach("DNI", vec![NewUpload::new("dni.png", vec![1])], true);
        assert!(!ledger.is_fully_satisfied(["DNI"]));

        ledger.apply_validation("DNI", ids[0], valid_update(vec![]));
        assert!(ledger.is_fully_satisfied(["DNI"]));

        // A second pending file breaks satisfaction again.
        ledger.attach("DNI", vec![NewUpload::new("back.png", vec![2])], true);
        assert!(!ledger.is_fully_satisfied(["DNI"]));
    }

    #[test]
    fn compile_extracted_keys_by_name_and_index() {
        let mut ledger = DocumentLedger::new();
        let ids = ledger.attach(
            "DNI",
            vec![
                NewUpload::new("front.png", vec![1]),
                NewUpload::new("back.png", vec![2]),
            ],
            true,
        );
        ledger.apply_validation(
            "DNI",
            ids[1],
            valid_update(vec![ExtractedField::new("idNumber", "Numero", "X1")]),
        );

        let compiled = ledger.compile_extracted();
        let object = compiled.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("DNI_1"));
        assert_eq!(object["DNI_1"][0]["fieldName"], "idNumber");
    }

    #[test]
    fn id_number_reference_scan_covers_whole_ledger() {
        let mut ledger = DocumentLedger::new();
        let a = ledger.attach("DNI titular", vec![NewUpload::new("a.png", vec![1])], true);
        let b = ledger.attach("DNI autorizante", vec![NewUpload::new("b.png", vec![2])], true);

        ledger.apply_validation(
            "DNI titular",
            a[0],
            valid_update(vec![ExtractedField::new("id_number", "", "X1")]),
        );
        ledger.apply_validation(
            "DNI autorizante",
            b[0],
            valid_update(vec![ExtractedField::new("id_number", "", "X1")]),
        );

        assert!(ledger.id_number_still_referenced("X1"));
        ledger.remove("DNI titular", a[0]);
        assert!(ledger.id_number_still_referenced("X1"));
        ledger.remove("DNI autorizante", b[0]);
        assert!(!ledger.id_number_still_referenced("X1"));
    }
}
