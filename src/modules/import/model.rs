//! Bulk-import report and row types.
//!
//! The report is ephemeral: it is built while the batch runs and returned as
//! the response body, never persisted. Every data row ends up either in
//! `imported` or in `errors`; `warnings` carries non-fatal notes (e.g. an
//! ignored secondary contact).

use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::families::model::Relationship;

/// A raw spreadsheet row keyed by normalized header names.
pub type RawRow = BTreeMap<String, String>;

/// The outcome report of one bulk-import run.
#[derive(Serialize, Debug, Default, ToSchema)]
pub struct BatchImportReport {
    pub total_rows: usize,
    pub successful_imports: usize,
    pub failed_imports: usize,
    pub errors: Vec<RowError>,
    pub warnings: Vec<RowWarning>,
    pub imported: Vec<ImportedStudent>,
}

impl BatchImportReport {
    /// Folds one row's outcome into the report.
    pub fn absorb(&mut self, row: usize, raw: &RawRow, outcome: Result<RowSuccess, RowFailure>) {
        match outcome {
            Ok(success) => {
                self.successful_imports += 1;
                for message in success.warnings {
                    self.warnings.push(RowWarning { row, message });
                }
                self.imported.push(success.student);
            }
            Err(failure) => {
                self.failed_imports += 1;
                self.errors.push(RowError {
                    row,
                    field: failure.field,
                    message: failure.message,
                    raw: raw.clone(),
                });
            }
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct RowError {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    /// The original raw row, so the administrator can fix the source sheet.
    pub raw: RawRow,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct RowWarning {
    pub row: usize,
    pub message: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ImportedStudent {
    pub row: usize,
    pub name: String,
    pub enrollment_number: String,
    pub family_id: Uuid,
}

/// A successfully imported row, before folding into the report.
#[derive(Debug)]
pub struct RowSuccess {
    pub student: ImportedStudent,
    pub warnings: Vec<String>,
}

/// A failed row, before folding into the report.
#[derive(Debug)]
pub struct RowFailure {
    pub field: Option<String>,
    pub message: String,
}

impl RowFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// A spreadsheet row after header mapping, value coercion, and validation.
///
/// Catalog names have been resolved to identifiers, the secondary contact is
/// present only when it is actually usable, and `warnings` carries anything
/// the administrator should know that did not fail the row.
#[derive(Debug, Clone)]
pub struct CanonicalRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: chrono::NaiveDate,
    pub enrollment_number: Option<String>,
    pub document_number: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub level_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub relationship: Relationship,
    pub contact_first_name: String,
    pub contact_last_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub contact_occupation: Option<String>,
    pub secondary: Option<SecondaryContactRow>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SecondaryContactRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}
