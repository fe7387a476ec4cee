//! Enrollment number validation and allocation.
//!
//! Enrollment numbers follow the pattern `MW-YYYY-NNNN`: the fixed prefix,
//! a four-digit year, and a four-digit zero-padded sequence. Format checks
//! are pure; allocation runs on the caller's transaction so that sequential
//! batch rows observe each other's writes. The unique index on
//! `students.enrollment_number` remains the authoritative uniqueness guard.

use anyhow::Context;
use chrono::{Datelike, Utc};
use sqlx::{Postgres, Transaction};

use crate::utils::errors::AppError;

pub const ENROLLMENT_PREFIX: &str = "MW";

/// Pure structural check of `MW-YYYY-NNNN`. Does not touch storage.
pub fn validate_format(code: &str) -> bool {
    let mut parts = code.split('-');
    let (Some(prefix), Some(year), Some(sequence), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    prefix == ENROLLMENT_PREFIX
        && year.len() == 4
        && year.bytes().all(|b| b.is_ascii_digit())
        && sequence.len() == 4
        && sequence.bytes().all(|b| b.is_ascii_digit())
}

/// Resolves the enrollment number for one enrollment.
///
/// An explicitly supplied code is format-checked first, then checked for
/// uniqueness; a missing code is allocated.
pub async fn resolve(
    tx: &mut Transaction<'_, Postgres>,
    supplied: Option<&str>,
) -> Result<String, AppError> {
    match supplied {
        Some(code) => {
            if !validate_format(code) {
                return Err(AppError::invalid_format(anyhow::anyhow!(
                    "Enrollment number {} does not match the {}-YYYY-NNNN format",
                    code,
                    ENROLLMENT_PREFIX
                )));
            }
            if is_taken(tx, code).await? {
                return Err(AppError::conflict(anyhow::anyhow!(
                    "Enrollment number {} already exists",
                    code
                )));
            }
            Ok(code.to_string())
        }
        None => allocate(tx).await,
    }
}

/// Allocates the next free number for the current year.
///
/// Starts from the highest stored sequence and increments until an unused
/// code is found, so it stays correct even with gaps or manually supplied
/// numbers ahead of the counter. The sequence is four digits; once `9999`
/// is taken the year's space is exhausted and allocation fails, so a
/// generated number always satisfies [`validate_format`].
pub async fn allocate(tx: &mut Transaction<'_, Postgres>) -> Result<String, AppError> {
    let year = Utc::now().year();
    let pattern = format!("{ENROLLMENT_PREFIX}-{year}-%");

    let latest = sqlx::query_scalar::<_, String>(
        r#"SELECT enrollment_number FROM students
           WHERE enrollment_number LIKE $1
           ORDER BY enrollment_number DESC
           LIMIT 1"#,
    )
    .bind(&pattern)
    .fetch_optional(&mut **tx)
    .await
    .context("Failed to read latest enrollment number")
    .map_err(AppError::database)?;

    let mut sequence = latest
        .as_deref()
        .and_then(|code| code.rsplit('-').next())
        .and_then(|seq| seq.parse::<u32>().ok())
        .map_or(1, |n| n + 1);

    loop {
        if sequence > 9999 {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Enrollment number space for {} is exhausted",
                year
            )));
        }
        let candidate = format!("{ENROLLMENT_PREFIX}-{year}-{sequence:04}");
        if !is_taken(tx, &candidate).await? {
            return Ok(candidate);
        }
        sequence += 1;
    }
}

async fn is_taken(tx: &mut Transaction<'_, Postgres>, code: &str) -> Result<bool, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM students WHERE enrollment_number = $1",
    )
    .bind(code)
    .fetch_one(&mut **tx)
    .await
    .context("Failed to check enrollment number uniqueness")
    .map_err(AppError::database)?;

    Ok(count > 0)
}
