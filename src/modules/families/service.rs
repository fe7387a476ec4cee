use anyhow::Context;
use sqlx::{Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::families::model::{Family, FamilyStudentLink, Relationship};
use crate::utils::errors::AppError;

pub struct FamilyService;

impl FamilyService {
    #[instrument(skip(tx))]
    pub async fn find_family_by_id(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Family, AppError> {
        sqlx::query_as::<_, Family>(
            r#"SELECT id, primary_contact_id, secondary_contact_id, created_at
               FROM families
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .context("Failed to fetch family by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Family with id {} not found", id)))
    }

    #[instrument(skip(tx))]
    pub async fn create_family(
        tx: &mut Transaction<'_, Postgres>,
        primary_contact_id: Uuid,
        secondary_contact_id: Option<Uuid>,
    ) -> Result<Family, AppError> {
        sqlx::query_as::<_, Family>(
            r#"INSERT INTO families (primary_contact_id, secondary_contact_id)
               VALUES ($1, $2)
               RETURNING id, primary_contact_id, secondary_contact_id, created_at"#,
        )
        .bind(primary_contact_id)
        .bind(secondary_contact_id)
        .fetch_one(&mut **tx)
        .await
        .context("Failed to insert family")
        .map_err(AppError::database)
    }

    /// Links a student to a family. One link per enrollment; the
    /// `(family_id, student_id)` unique constraint rejects duplicates.
    #[instrument(skip(tx))]
    pub async fn link_student(
        tx: &mut Transaction<'_, Postgres>,
        family_id: Uuid,
        student_id: Uuid,
        relationship: Relationship,
    ) -> Result<FamilyStudentLink, AppError> {
        sqlx::query_as::<_, FamilyStudentLink>(
            r#"INSERT INTO family_students (family_id, student_id, relationship)
               VALUES ($1, $2, $3)
               RETURNING id, family_id, student_id, relationship"#,
        )
        .bind(family_id)
        .bind(student_id)
        .bind(relationship.as_str())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow::anyhow!(
                    "Student is already linked to this family"
                ));
            }
            AppError::database(anyhow::Error::from(e))
        })
    }
}
