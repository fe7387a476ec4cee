use anyhow::Context;
use sqlx::{Postgres, Transaction};
use tracing::instrument;

use crate::modules::users::model::{Identity, ProfileFields, UserRole};
use crate::utils::{errors::AppError, password::hash_password};

pub struct UserService;

impl UserService {
    /// Creates an identity and its profile on the caller's transaction.
    ///
    /// The email pre-check is an optimization; the unique index on
    /// `users.email` is the authoritative guard, and its violation is mapped
    /// to the same conflict error.
    #[instrument(skip(tx, raw_password, profile), fields(email = %email))]
    pub async fn create_identity(
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        raw_password: &str,
        role: UserRole,
        profile: &ProfileFields,
    ) -> Result<Identity, AppError> {
        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&mut **tx)
            .await
            .context("Failed to check email uniqueness")
            .map_err(AppError::database)?;

        if existing > 0 {
            return Err(AppError::conflict(anyhow::anyhow!(
                "A user with email {} already exists",
                email
            )));
        }

        let hashed_password = hash_password(raw_password)?;

        let identity = sqlx::query_as::<_, Identity>(
            r#"INSERT INTO users (email, password, role)
               VALUES ($1, $2, $3)
               RETURNING id, email, role, is_active, created_at, updated_at"#,
        )
        .bind(email)
        .bind(&hashed_password)
        .bind(role.as_str())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow::anyhow!(
                    "A user with email {} already exists",
                    email
                ));
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        sqlx::query(
            r#"INSERT INTO profiles
               (user_id, first_name, last_name, birth_date, document_number, phone, address, occupation)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(identity.id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.birth_date)
        .bind(&profile.document_number)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(&profile.occupation)
        .execute(&mut **tx)
        .await
        .context("Failed to insert profile")
        .map_err(AppError::database)?;

        Ok(identity)
    }

    #[instrument(skip(tx))]
    pub async fn get_identity(
        tx: &mut Transaction<'_, Postgres>,
        id: uuid::Uuid,
    ) -> Result<Identity, AppError> {
        let identity = sqlx::query_as::<_, Identity>(
            r#"SELECT id, email, role, is_active, created_at, updated_at
               FROM users
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .context("Failed to fetch user by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", id)))?;

        Ok(identity)
    }
}
