//! Person registry
//!
//! People to register, derived from identity-bearing validated documents.
//! Keyed by identification number: upserts merge, and removing the last
//! ledger entry that carried an id number drops the person again.

use crate::entry::{ExtractedField, UploadedFileEntry};
use crate::identity;
use crate::ledger::DocumentLedger;
use serde::{Deserialize, Serialize};

/// A person to include in the registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Full name
    pub name: String,
    /// Identification number (DNI/NIE/passport), registry key
    pub id_number: String,
    /// Relation to the main applicant ("self", "child", ...), when known
    #[serde(rename = "relationToApplicant", skip_serializing_if = "Option::is_none", default)]
    pub relation_to_applicant: Option<String>,
}

impl Person {
    /// Person with name and id number only
    #[must_use]
    pub fn new(name: impl Into<String>, id_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_number: id_number.into(),
            relation_to_applicant: None,
        }
    }
}

/// Set of people to register, unique by id number, insertion-ordered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonRegistry {
    people: Vec<Person>,
}

impl PersonRegistry {
    /// Empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// People in insertion order
    #[inline]
    #[must_use]
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Whether a person with the id number exists
    #[must_use]
    pub fn contains(&self, id_number: &str) -> bool {
        self.people.iter().any(|p| p.id_number == id_number)
    }

    /// Insert or merge by id number
    ///
    /// On merge, non-empty incoming fields overwrite; everything else is
    /// preserved.
    pub fn upsert(&mut self, person: Person) {
        match self.people.iter_mut().find(|p| p.id_number == person.id_number) {
            Some(existing) => {
                if !person.name.trim().is_empty() {
                    existing.name = person.name;
                }
                if person.relation_to_applicant.is_some() {
                    existing.relation_to_applicant = person.relation_to_applicant;
                }
            }
            None => self.people.push(person),
        }
    }

    /// Remove by id number, returning the removed person
    pub fn remove(&mut self, id_number: &str) -> Option<Person> {
        let position = self.people.iter().position(|p| p.id_number == id_number)?;
        Some(self.people.remove(position))
    }

    /// Replace the whole set (applying AI summary suggestions)
    ///
    /// The incoming list is folded through `upsert`, so a collaborator
    /// response repeating an id number collapses into one entry instead of
    /// breaking the one-person-per-id invariant.
    pub fn replace_all(&mut self, people: Vec<Person>) {
        self.people.clear();
        for person in people {
            self.upsert(person);
        }
    }

    /// Absorb a successful identity-extractable validation
    ///
    /// Only a valid outcome on an id-extractable requirement that yielded
    /// both a name and an id number produces or updates a person. Returns
    /// the id number that was absorbed, if any.
    pub fn absorb_validation(
        &mut self,
        id_extractable: bool,
        is_valid: bool,
        extracted: &[ExtractedField],
    ) -> Option<String> {
        if !id_extractable || !is_valid {
            return None;
        }
        let id_number = identity::find_id_number(extracted)?.to_owned();
        let name = identity::find_name(extracted)?.to_owned();

        tracing::info!(%id_number, "person absorbed from validated identity document");
        self.upsert(Person::new(name, id_number.clone()));
        Some(id_number)
    }

    /// Consistency pass after a ledger removal
    ///
    /// If the removed entry carried an id number that no surviving ledger
    /// entry references, the corresponding person is dropped. Returns the
    /// removed person, if any.
    pub fn reconcile_removal(
        &mut self,
        removed: &UploadedFileEntry,
        ledger: &DocumentLedger,
    ) -> Option<Person> {
        let id_number = identity::find_id_number(&removed.extracted)?;
        if ledger.id_number_still_referenced(id_number) {
            return None;
        }
        tracing::info!(%id_number, "removing person, last identity document deleted");
        self.remove(id_number)
    }

    /// Number of people
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Whether the registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{NewUpload, ValidationUpdate};
    use crate::ValidationStatus;
    use pretty_assertions::assert_eq;

    fn id_fields(name: &str, id_number: &str) -> Vec<ExtractedField> {
        vec![
            ExtractedField::new("fullName", "Nombre", name),
            ExtractedField::new("idNumber", "Numero", id_number),
        ]
    }

    #[test]
    fn absorb_creates_exactly_one_person() {
        let mut registry = PersonRegistry::new();
        let absorbed = registry.absorb_validation(true, true, &id_fields("Ana", "X1"));
        assert_eq!(absorbed.as_deref(), Some("X1"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.people()[0], Person::new("Ana", "X1"));
    }

    #[test]
    fn absorb_requires_validity_flag_and_both_fields() {
        let mut registry = PersonRegistry::new();

        assert!(registry.absorb_validation(false, true, &id_fields("Ana", "X1")).is_none());
        assert!(registry.absorb_validation(true, false, &id_fields("Ana", "X1")).is_none());

        let only_name = vec![ExtractedField::new("name", "", "Ana")];
        assert!(registry.absorb_validation(true, true, &only_name).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn upsert_merges_on_same_id_number() {
        let mut registry = PersonRegistry::new();
        registry.upsert(Person::new("Ana", "X1"));
        registry.upsert(Person {
            name: "Ana Garcia".into(),
            id_number: "X1".into(),
            relation_to_applicant: Some("self".into()),
        });

        assert_eq!(registry.len(), 1);
        let person = &registry.people()[0];
        assert_eq!(person.name, "Ana Garcia");
        assert_eq!(person.relation_to_applicant.as_deref(), Some("self"));
    }

    #[test]
    fn merge_preserves_fields_the_update_omits() {
        let mut registry = PersonRegistry::new();
        registry.upsert(Person {
            name: "Ana".into(),
            id_number: "X1".into(),
            relation_to_applicant: Some("self".into()),
        });
        registry.upsert(Person::new("", "X1"));

        let person = &registry.people()[0];
        assert_eq!(person.name, "Ana");
        assert_eq!(person.relation_to_applicant.as_deref(), Some("self"));
    }

    #[test]
    fn replace_all_collapses_duplicate_id_numbers() {
        let mut registry = PersonRegistry::new();
        registry.upsert(Person::new("Old Entry", "Z9"));

        registry.replace_all(vec![
            Person::new("Ana García", "X1"),
            Person {
                name: "Ana G.".into(),
                id_number: "X1".into(),
                relation_to_applicant: Some("self".into()),
            },
            Person::new("Luis Pérez", "Y2"),
        ]);

        // Previous contents gone, duplicates merged, uniqueness restored.
        assert!(!registry.contains("Z9"));
        assert_eq!(registry.len(), 2);
        let ana = &registry.people()[0];
        assert_eq!(ana.name, "Ana G.");
        assert_eq!(ana.relation_to_applicant.as_deref(), Some("self"));

        // A single remove now clears the id number entirely.
        registry.remove("X1");
        assert!(!registry.contains("X1"));
    }

    #[test]
    fn reconcile_keeps_person_while_another_entry_references_id() {
        let mut ledger = DocumentLedger::new();
        let mut registry = PersonRegistry::new();

        let update = |fields: Vec<ExtractedField>| ValidationUpdate {
            status: ValidationStatus::Valid,
            message: String::new(),
            extracted: fields,
            encoded: None,
        };

        let a = ledger.attach("DNI", vec![NewUpload::new("a.png", vec![1])], true);
        let b = ledger.attach("DNI", vec![NewUpload::new("b.png", vec![2])], true);
        ledger.apply_validation("DNI", a[0], update(id_fields("Ana", "X1")));
        ledger.apply_validation("DNI", b[0], update(id_fields("Ana", "X1")));
        registry.absorb_validation(true, true, &id_fields("Ana", "X1"));

        // Remove one of two entries sharing the id number: person stays.
        let removed = ledger.remove("DNI", a[0]).unwrap();
        assert!(registry.reconcile_removal(&removed, &ledger).is_none());
        assert!(registry.contains("X1"));

        // Remove the last one: person goes.
        let removed = ledger.remove("DNI", b[0]).unwrap();
        assert!(registry.reconcile_removal(&removed, &ledger).is_some());
        assert!(!registry.contains("X1"));
    }

    #[test]
    fn reconcile_ignores_entries_without_identity_data() {
        let ledger = DocumentLedger::new();
        let mut registry = PersonRegistry::new();
        registry.upsert(Person::new("Ana", "X1"));

        let removed = UploadedFileEntry::pending("contract.pdf", vec![1]);
        assert!(registry.reconcile_removal(&removed, &ledger).is_none());
        assert!(registry.contains("X1"));
    }
}
