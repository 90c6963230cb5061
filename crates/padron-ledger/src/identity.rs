//! Identity field recognition
//!
//! The validator prompt asks for camelCase Spanish field names
//! (`numeroIdentificacion`, `nombreCompleto`), but earlier revisions of the
//! service returned flat `id_number`/`name` pairs and the English variants
//! also occur. Both shapes must keep producing people.

use crate::entry::ExtractedField;

const ID_NUMBER_FIELDS: &[&str] = &["id_number", "idNumber", "numeroIdentificacion"];
const NAME_FIELDS: &[&str] = &["name", "fullName", "nombreCompleto"];

fn find<'a>(fields: &'a [ExtractedField], names: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .find(|f| names.contains(&f.field_name.as_str()) && !f.value.trim().is_empty())
        .map(|f| f.value.as_str())
}

/// Extracted identification number, if any field carries one
#[must_use]
pub fn find_id_number(fields: &[ExtractedField]) -> Option<&str> {
    find(fields, ID_NUMBER_FIELDS)
}

/// Extracted full name, if any field carries one
#[must_use]
pub fn find_name(fields: &[ExtractedField]) -> Option<&str> {
    find(fields, NAME_FIELDS)
}
