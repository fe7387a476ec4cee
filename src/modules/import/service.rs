use std::io::Cursor;
use std::time::Duration;

use calamine::{Data, Reader, Xlsx};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::catalog::service::CatalogService;
use crate::modules::enrollment::model::{
    ContactPayload, EnrollmentRequest, FamilyPayload, StudentPayload,
};
use crate::modules::enrollment::service::EnrollmentService;
use crate::modules::import::model::{
    BatchImportReport, CanonicalRow, ImportedStudent, RawRow, RowFailure, RowSuccess,
};
use crate::modules::import::normalizer::{CatalogIndex, normalize_header, normalize_row};
use crate::utils::errors::AppError;

/// One pathological row must not stall the whole batch; expiry becomes that
/// row's failure.
const ROW_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ImportService;

impl ImportService {
    /// Runs the bulk import over an uploaded workbook.
    ///
    /// Rows are processed strictly sequentially, each as its own
    /// transaction, so a row's committed writes are visible to the next
    /// row's uniqueness checks. A row's failure never aborts the batch: the
    /// call returns a full report even if every row failed.
    pub async fn run(db: &PgPool, bytes: &[u8]) -> Result<BatchImportReport, AppError> {
        Self::run_with_timeout(db, bytes, ROW_TIMEOUT).await
    }

    /// Same as [`Self::run`], with an explicit per-row time limit. A row
    /// that exceeds it is recorded as that row's failure and the batch
    /// moves on.
    #[instrument(skip(db, bytes), fields(bytes = bytes.len()))]
    pub async fn run_with_timeout(
        db: &PgPool,
        bytes: &[u8],
        row_timeout: Duration,
    ) -> Result<BatchImportReport, AppError> {
        let rows = read_rows(bytes)?;

        // Catalogs are fetched once for the whole batch.
        let levels = CatalogService::list_levels(db).await?;
        let courses = CatalogService::list_courses(db).await?;
        let catalogs = CatalogIndex::new(&levels, &courses);

        let mut report = BatchImportReport {
            total_rows: rows.len(),
            ..Default::default()
        };

        for (row_number, raw) in &rows {
            let outcome = Self::import_row(db, &catalogs, raw, *row_number, row_timeout).await;
            report.absorb(*row_number, raw, outcome);
        }

        Ok(report)
    }

    async fn import_row(
        db: &PgPool,
        catalogs: &CatalogIndex,
        raw: &RawRow,
        row_number: usize,
        row_timeout: Duration,
    ) -> Result<RowSuccess, RowFailure> {
        let row = normalize_row(raw, catalogs)?;
        let name = format!("{} {}", row.first_name, row.last_name);
        let warnings = row.warnings.clone();
        let request = build_request(row);

        let response = tokio::time::timeout(
            row_timeout,
            EnrollmentService::process_enrollment(db, request),
        )
        .await
        .map_err(|_| {
            RowFailure::new(format!(
                "Row processing timed out after {} seconds",
                row_timeout.as_secs()
            ))
        })?
        .map_err(|err| RowFailure::new(err.error.to_string()))?;

        Ok(RowSuccess {
            student: ImportedStudent {
                row: row_number,
                name,
                enrollment_number: response.student.enrollment_number,
                family_id: response.family.id,
            },
            warnings,
        })
    }
}

/// Converts a canonical row into the orchestrator's request shape.
///
/// Imported accounts get a random initial password; credentials are
/// delivered through the password-reset flow, never through the spreadsheet.
fn build_request(row: CanonicalRow) -> EnrollmentRequest {
    EnrollmentRequest {
        student: StudentPayload {
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password: generated_password(),
            birth_date: row.birth_date,
            enrollment_number: row.enrollment_number,
            document_number: row.document_number,
            phone: row.phone,
            address: row.address,
            level_id: row.level_id,
            course_id: row.course_id,
        },
        family: FamilyPayload::New {
            primary_contact: ContactPayload {
                first_name: row.contact_first_name,
                last_name: row.contact_last_name,
                email: row.contact_email,
                password: generated_password(),
                phone: row.contact_phone,
                document_number: None,
                occupation: row.contact_occupation,
            },
            secondary_contact: row.secondary.map(|secondary| ContactPayload {
                first_name: secondary.first_name,
                last_name: secondary.last_name,
                email: secondary.email,
                password: generated_password(),
                phone: secondary.phone,
                document_number: None,
                occupation: None,
            }),
            relationship: row.relationship,
        },
    }
}

fn generated_password() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Reads the first sheet into rows keyed by normalized headers.
///
/// Returns `(row_number, row)` pairs where numbering matches the source
/// spreadsheet: the header is row 1, so the first data row is 2. Fully
/// blank rows are skipped without disturbing the numbering.
fn read_rows(bytes: &[u8]) -> Result<Vec<(usize, RawRow)>, AppError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook: Xlsx<_> = Xlsx::new(cursor)
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Failed to open workbook: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Workbook has no sheets")))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Failed to read sheet: {e}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Workbook has no header row")))?
        .iter()
        .map(|cell| normalize_header(&cell_to_string(cell)))
        .collect();

    let data_rows = rows
        .enumerate()
        .map(|(idx, row)| {
            let raw: RawRow = headers
                .iter()
                .zip(row.iter())
                .map(|(header, cell)| (header.clone(), cell_to_string(cell)))
                .collect();
            (idx + 2, raw)
        })
        .filter(|(_, raw)| raw.values().any(|value| !value.trim().is_empty()))
        .collect();

    Ok(data_rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{f:.0}")
            } else {
                format!("{f}")
            }
        }
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_owned(),
        Data::DateTime(dt) => format!("{dt}"),
        Data::Error(e) => format!("#ERROR: {e:?}"),
    }
}
