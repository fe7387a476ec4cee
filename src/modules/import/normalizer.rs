//! Spreadsheet row normalization.
//!
//! Maps the human-readable Spanish headers of the import template to
//! canonical field names, coerces free-form cell values, resolves level and
//! course names against the pre-fetched catalogs, and validates every field.
//! All violations of one row are collected into a single combined message so
//! the administrator sees everything wrong with the row at once.

use std::collections::HashMap;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::modules::catalog::model::{Course, Level};
use crate::modules::families::model::Relationship;
use crate::modules::import::model::{CanonicalRow, RawRow, RowFailure, SecondaryContactRow};

/// Expected template headers and the canonical field each maps to.
///
/// Matching is trimmed and case-insensitive. Headers not in this dictionary
/// are kept verbatim with whitespace removed; downstream validation simply
/// ignores unrecognized fields.
pub const HEADER_DICTIONARY: &[(&str, &str)] = &[
    ("Nombre", "first_name"),
    ("Apellidos", "last_name"),
    ("Correo Electrónico", "email"),
    ("Fecha de Nacimiento", "birth_date"),
    ("Número de Documento", "document_number"),
    ("Teléfono", "phone"),
    ("Dirección", "address"),
    ("Número de Matrícula", "enrollment_number"),
    ("Nivel Educativo", "level"),
    ("Curso", "course"),
    ("Nombre del Contacto", "contact_first_name"),
    ("Apellidos del Contacto", "contact_last_name"),
    ("Correo del Contacto", "contact_email"),
    ("Teléfono del Contacto", "contact_phone"),
    ("Ocupación del Contacto", "contact_occupation"),
    ("Parentesco", "relationship"),
    ("¿Tiene Segundo Contacto?", "has_secondary_contact"),
    ("Nombre del Segundo Contacto", "secondary_first_name"),
    ("Apellidos del Segundo Contacto", "secondary_last_name"),
    ("Correo del Segundo Contacto", "secondary_email"),
    ("Teléfono del Segundo Contacto", "secondary_phone"),
];

/// Maps a raw column header to its canonical field name.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim();
    let lowered = trimmed.to_lowercase();
    for (label, canonical) in HEADER_DICTIONARY {
        if lowered == label.to_lowercase() {
            return (*canonical).to_string();
        }
    }
    trimmed.split_whitespace().collect()
}

/// Truthiness of a "has secondary contact" style cell.
pub fn parse_affirmative(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "sí" | "si" | "yes" | "true" | "1"
    )
}

/// Case-insensitive name → id lookup over the pre-fetched catalogs.
///
/// Built once per batch run, never per row.
pub struct CatalogIndex {
    levels: HashMap<String, Uuid>,
    courses: HashMap<String, Uuid>,
}

impl CatalogIndex {
    pub fn new(levels: &[Level], courses: &[Course]) -> Self {
        Self {
            levels: levels
                .iter()
                .map(|level| (normalize_name(&level.name), level.id))
                .collect(),
            courses: courses
                .iter()
                .map(|course| (normalize_name(&course.name), course.id))
                .collect(),
        }
    }

    pub fn level(&self, name: &str) -> Option<Uuid> {
        self.levels.get(&normalize_name(name)).copied()
    }

    pub fn course(&self, name: &str) -> Option<Uuid> {
        self.courses.get(&normalize_name(name)).copied()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Validates and converts one raw row into its canonical form.
///
/// Returns a [`RowFailure`] carrying every violation in one combined
/// message; when exactly one field is at fault the failure names it.
pub fn normalize_row(raw: &RawRow, catalogs: &CatalogIndex) -> Result<CanonicalRow, RowFailure> {
    let mut violations: Vec<(&str, String)> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let first_name = required_field(raw, "first_name", "Nombre", &mut violations);
    let last_name = required_field(raw, "last_name", "Apellidos", &mut violations);
    let email = required_email(raw, "email", "Correo Electrónico", &mut violations);

    let birth_date = match field(raw, "birth_date") {
        Some(value) => match parse_date(value) {
            Some(date) => Some(date),
            None => {
                violations.push((
                    "birth_date",
                    format!(
                        "Fecha de Nacimiento \"{value}\" is not a valid date (expected DD/MM/YYYY)"
                    ),
                ));
                None
            }
        },
        None => {
            violations.push(("birth_date", "Fecha de Nacimiento is required".to_string()));
            None
        }
    };

    let relationship = match field(raw, "relationship") {
        Some(value) => match Relationship::parse(value) {
            Some(relationship) => Some(relationship),
            None => {
                violations.push((
                    "relationship",
                    format!("Parentesco \"{value}\" is not one of: padre, madre, tutor, otro"),
                ));
                None
            }
        },
        None => {
            violations.push(("relationship", "Parentesco is required".to_string()));
            None
        }
    };

    let level_id = match field(raw, "level") {
        Some(name) => match catalogs.level(name) {
            Some(id) => Some(id),
            None => {
                violations.push(("level", format!("Nivel Educativo \"{name}\" does not exist")));
                None
            }
        },
        None => None,
    };

    let course_id = match field(raw, "course") {
        Some(name) => match catalogs.course(name) {
            Some(id) => Some(id),
            None => {
                violations.push(("course", format!("Curso \"{name}\" does not exist")));
                None
            }
        },
        None => None,
    };

    let contact_first_name =
        required_field(raw, "contact_first_name", "Nombre del Contacto", &mut violations);
    let contact_last_name = required_field(
        raw,
        "contact_last_name",
        "Apellidos del Contacto",
        &mut violations,
    );
    let contact_email = required_email(raw, "contact_email", "Correo del Contacto", &mut violations);

    let has_secondary = field(raw, "has_secondary_contact").is_some_and(parse_affirmative);
    let secondary = if has_secondary {
        match field(raw, "secondary_email") {
            // A truthy flag with no usable email yields a primary-only
            // family, never an empty contact record.
            None => {
                warnings.push(
                    "Secondary contact ignored: Correo del Segundo Contacto is empty".to_string(),
                );
                None
            }
            Some(secondary_email) => {
                if !secondary_email.validate_email() {
                    violations.push((
                        "secondary_email",
                        format!(
                            "Correo del Segundo Contacto \"{secondary_email}\" is not a valid email"
                        ),
                    ));
                }
                let secondary_first = required_field(
                    raw,
                    "secondary_first_name",
                    "Nombre del Segundo Contacto",
                    &mut violations,
                );
                let secondary_last = required_field(
                    raw,
                    "secondary_last_name",
                    "Apellidos del Segundo Contacto",
                    &mut violations,
                );
                Some(SecondaryContactRow {
                    first_name: secondary_first.unwrap_or_default(),
                    last_name: secondary_last.unwrap_or_default(),
                    email: secondary_email.to_string(),
                    phone: field(raw, "secondary_phone").map(str::to_string),
                })
            }
        }
    } else {
        None
    };

    if !violations.is_empty() {
        let field = match violations.as_slice() {
            [(field, _)] => Some((*field).to_string()),
            _ => None,
        };
        let message = violations
            .iter()
            .map(|(_, message)| message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(RowFailure { field, message });
    }

    Ok(CanonicalRow {
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        birth_date: birth_date.unwrap_or_default(),
        enrollment_number: field(raw, "enrollment_number").map(str::to_string),
        document_number: field(raw, "document_number").map(str::to_string),
        phone: field(raw, "phone").map(str::to_string),
        address: field(raw, "address").map(str::to_string),
        level_id,
        course_id,
        relationship: relationship.unwrap_or(Relationship::Otro),
        contact_first_name: contact_first_name.unwrap_or_default(),
        contact_last_name: contact_last_name.unwrap_or_default(),
        contact_email: contact_email.unwrap_or_default(),
        contact_phone: field(raw, "contact_phone").map(str::to_string),
        contact_occupation: field(raw, "contact_occupation").map(str::to_string),
        secondary,
        warnings,
    })
}

/// A trimmed, non-empty cell value.
fn field<'a>(raw: &'a RawRow, key: &str) -> Option<&'a str> {
    raw.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn required_field<'a>(
    raw: &RawRow,
    key: &'a str,
    label: &str,
    violations: &mut Vec<(&'a str, String)>,
) -> Option<String> {
    match field(raw, key) {
        Some(value) => Some(value.to_string()),
        None => {
            violations.push((key, format!("{label} is required")));
            None
        }
    }
}

fn required_email<'a>(
    raw: &RawRow,
    key: &'a str,
    label: &str,
    violations: &mut Vec<(&'a str, String)>,
) -> Option<String> {
    match field(raw, key) {
        Some(value) => {
            if value.validate_email() {
                Some(value.to_string())
            } else {
                violations.push((key, format!("{label} \"{value}\" is not a valid email")));
                None
            }
        }
        None => {
            violations.push((key, format!("{label} is required")));
            None
        }
    }
}

fn parse_date(value: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .or_else(|_| chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}
