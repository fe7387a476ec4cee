mod common;

use std::time::Duration;

use rust_xlsxwriter::Workbook;
use sqlx::PgPool;

use common::{count_rows, seed_level, unique_email};
use matriweb::modules::import::service::ImportService;

const BASE_HEADERS: &[&str] = &[
    "Nombre",
    "Apellidos",
    "Correo Electrónico",
    "Fecha de Nacimiento",
    "Parentesco",
    "Nombre del Contacto",
    "Apellidos del Contacto",
    "Correo del Contacto",
];

fn workbook_bytes(headers: &[&str], rows: &[Vec<String>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write(0, col as u16, *header).unwrap();
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            sheet
                .write((row_idx + 1) as u32, col as u16, value)
                .unwrap();
        }
    }
    workbook.save_to_buffer().unwrap()
}

fn valid_row(student_email: &str, contact_email: &str) -> Vec<String> {
    vec![
        "Ana".to_string(),
        "Ruiz".to_string(),
        student_email.to_string(),
        "15/03/2015".to_string(),
        "madre".to_string(),
        "Lucía".to_string(),
        "Ruiz".to_string(),
        contact_email.to_string(),
    ]
}

#[sqlx::test(migrations = "./migrations")]
async fn test_batch_isolation_around_a_bad_row(pool: PgPool) {
    let mut bad = valid_row(&unique_email(), &unique_email());
    bad[2] = String::new(); // missing student email

    let rows = vec![
        valid_row(&unique_email(), &unique_email()),
        bad,
        valid_row(&unique_email(), &unique_email()),
    ];
    let bytes = workbook_bytes(BASE_HEADERS, &rows);

    let report = ImportService::run(&pool, &bytes).await.unwrap();

    assert_eq!(report.total_rows, 3);
    assert_eq!(report.successful_imports, 2);
    assert_eq!(report.failed_imports, 1);

    // successes sit on both sides of the failed row
    let imported_rows: Vec<usize> = report.imported.iter().map(|s| s.row).collect();
    assert_eq!(imported_rows, vec![2, 4]);
    assert_eq!(report.errors[0].row, 3);

    // only the two good rows persisted anything
    assert_eq!(count_rows(&pool, "students").await, 2);
    assert_eq!(count_rows(&pool, "users").await, 4);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_first_data_row_is_reported_as_row_two(pool: PgPool) {
    let mut bad = valid_row(&unique_email(), &unique_email());
    bad[3] = "not-a-date".to_string();

    let bytes = workbook_bytes(BASE_HEADERS, &[bad]);
    let report = ImportService::run(&pool, &bytes).await.unwrap();

    assert_eq!(report.failed_imports, 1);
    assert_eq!(report.errors[0].row, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_error_entry_carries_original_raw_row(pool: PgPool) {
    let mut bad = valid_row(&unique_email(), &unique_email());
    bad[2] = "broken-email".to_string();

    let bytes = workbook_bytes(BASE_HEADERS, &[bad]);
    let report = ImportService::run(&pool, &bytes).await.unwrap();

    let error = &report.errors[0];
    assert!(error.message.contains("broken-email"));
    assert_eq!(error.field.as_deref(), Some("email"));
    assert_eq!(error.raw.get("email").unwrap(), "broken-email");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_level_name_matched_case_insensitively(pool: PgPool) {
    seed_level(&pool, "Educación Primaria").await;

    let mut headers = BASE_HEADERS.to_vec();
    headers.push("Nivel Educativo");
    let mut row = valid_row(&unique_email(), &unique_email());
    row.push("educación primaria".to_string());

    let bytes = workbook_bytes(&headers, &[row]);
    let report = ImportService::run(&pool, &bytes).await.unwrap();

    assert_eq!(report.successful_imports, 1);
    let with_level = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM students WHERE level_id IS NOT NULL",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(with_level, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_level_fails_only_that_row(pool: PgPool) {
    let mut headers = BASE_HEADERS.to_vec();
    headers.push("Nivel Educativo");

    let mut bad = valid_row(&unique_email(), &unique_email());
    bad.push("Nivel Fantasma".to_string());
    let mut good = valid_row(&unique_email(), &unique_email());
    good.push(String::new());

    let bytes = workbook_bytes(&headers, &[bad, good]);
    let report = ImportService::run(&pool, &bytes).await.unwrap();

    assert_eq!(report.successful_imports, 1);
    assert_eq!(report.failed_imports, 1);
    assert!(report.errors[0].message.contains("Nivel Fantasma"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_within_batch_fails_second_row(pool: PgPool) {
    let shared_email = unique_email();
    let rows = vec![
        valid_row(&shared_email, &unique_email()),
        valid_row(&shared_email, &unique_email()),
    ];

    let bytes = workbook_bytes(BASE_HEADERS, &rows);
    let report = ImportService::run(&pool, &bytes).await.unwrap();

    assert_eq!(report.successful_imports, 1);
    assert_eq!(report.failed_imports, 1);
    assert_eq!(report.errors[0].row, 3);
    assert!(report.errors[0].message.contains(&shared_email));
    assert_eq!(count_rows(&pool, "students").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_truthy_secondary_with_empty_email_warns_and_imports(pool: PgPool) {
    let mut headers = BASE_HEADERS.to_vec();
    headers.push("¿Tiene Segundo Contacto?");
    headers.push("Correo del Segundo Contacto");

    let mut row = valid_row(&unique_email(), &unique_email());
    row.push("Sí".to_string());
    row.push(String::new());

    let bytes = workbook_bytes(&headers, &[row]);
    let report = ImportService::run(&pool, &bytes).await.unwrap();

    assert_eq!(report.successful_imports, 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].row, 2);

    // primary-only family: student + one contact
    assert_eq!(count_rows(&pool, "users").await, 2);
    let secondary = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM families WHERE secondary_contact_id IS NOT NULL",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(secondary, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_report_returned_even_when_every_row_fails(pool: PgPool) {
    let mut bad_one = valid_row(&unique_email(), &unique_email());
    bad_one[0] = String::new();
    let mut bad_two = valid_row(&unique_email(), &unique_email());
    bad_two[4] = "vecino".to_string();

    let bytes = workbook_bytes(BASE_HEADERS, &[bad_one, bad_two]);
    let report = ImportService::run(&pool, &bytes).await.unwrap();

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.successful_imports, 0);
    assert_eq!(report.failed_imports, 2);
    assert_eq!(count_rows(&pool, "users").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_blank_trailing_rows_are_skipped(pool: PgPool) {
    let rows = vec![
        valid_row(&unique_email(), &unique_email()),
        vec![String::new(); BASE_HEADERS.len()],
    ];

    let bytes = workbook_bytes(BASE_HEADERS, &rows);
    let report = ImportService::run(&pool, &bytes).await.unwrap();

    assert_eq!(report.total_rows, 1);
    assert_eq!(report.successful_imports, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_generated_numbers_are_sequential_across_rows(pool: PgPool) {
    let rows = vec![
        valid_row(&unique_email(), &unique_email()),
        valid_row(&unique_email(), &unique_email()),
    ];

    let bytes = workbook_bytes(BASE_HEADERS, &rows);
    let report = ImportService::run(&pool, &bytes).await.unwrap();

    assert_eq!(report.successful_imports, 2);
    let first: u32 = report.imported[0]
        .enrollment_number
        .rsplit('-')
        .next()
        .unwrap()
        .parse()
        .unwrap();
    let second: u32 = report.imported[1]
        .enrollment_number
        .rsplit('-')
        .next()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(second, first + 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stalled_row_fails_by_timeout_and_batch_continues(pool: PgPool) {
    let blocked_email = unique_email();

    // An uncommitted insert holds the unique-index slot for this email, so
    // the first row's identity insert blocks until the timeout fires.
    let mut holder = pool.begin().await.unwrap();
    sqlx::query("INSERT INTO users (email, password, role) VALUES ($1, 'x', 'student')")
        .bind(&blocked_email)
        .execute(&mut *holder)
        .await
        .unwrap();

    let rows = vec![
        valid_row(&blocked_email, &unique_email()),
        valid_row(&unique_email(), &unique_email()),
    ];
    let bytes = workbook_bytes(BASE_HEADERS, &rows);

    let report = ImportService::run_with_timeout(&pool, &bytes, Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(report.failed_imports, 1);
    assert_eq!(report.errors[0].row, 2);
    assert!(report.errors[0].message.contains("timed out"));

    // the row after the stalled one still went through
    assert_eq!(report.successful_imports, 1);
    assert_eq!(report.imported[0].row, 3);

    holder.rollback().await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unreadable_bytes_rejected(pool: PgPool) {
    let err = ImportService::run(&pool, b"definitely not a workbook")
        .await
        .unwrap_err();
    assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
}
