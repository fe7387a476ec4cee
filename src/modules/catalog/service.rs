use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::catalog::model::{Course, Level};
use crate::utils::errors::AppError;

pub struct CatalogService;

impl CatalogService {
    #[instrument(skip(tx))]
    pub async fn find_level_by_id(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Level, AppError> {
        sqlx::query_as::<_, Level>("SELECT id, name, description FROM levels WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
            .context("Failed to fetch level by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Level with id {} not found", id)))
    }

    #[instrument(skip(tx))]
    pub async fn find_course_by_id(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>("SELECT id, name, level_id FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
            .context("Failed to fetch course by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course with id {} not found", id)))
    }

    #[instrument(skip(db))]
    pub async fn list_levels(db: &PgPool) -> Result<Vec<Level>, AppError> {
        sqlx::query_as::<_, Level>("SELECT id, name, description FROM levels ORDER BY name")
            .fetch_all(db)
            .await
            .context("Failed to fetch levels")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list_courses(db: &PgPool) -> Result<Vec<Course>, AppError> {
        sqlx::query_as::<_, Course>("SELECT id, name, level_id FROM courses ORDER BY name")
            .fetch_all(db)
            .await
            .context("Failed to fetch courses")
            .map_err(AppError::database)
    }
}
