use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::catalog::service::CatalogService;
use crate::modules::enrollment::model::{
    EnrolledFamily, EnrolledStudent, EnrollmentRequest, EnrollmentResponse, FamilyPayload,
    StudentPayload, StudentRecord, UserSummary,
};
use crate::modules::enrollment::number;
use crate::modules::families::model::{Family, Relationship};
use crate::modules::families::service::FamilyService;
use crate::modules::users::model::{Identity, ProfileFields, UserRole};
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;

pub struct EnrollmentService;

impl EnrollmentService {
    /// Runs one complete enrollment inside a single transaction.
    ///
    /// Either every record (student identity + profile, student record,
    /// family, contacts, family link) is committed, or none of them is. On
    /// failure the transaction is rolled back and the original error is
    /// returned unchanged.
    #[instrument(skip(db, request), fields(student_email = %request.student.email))]
    pub async fn process_enrollment(
        db: &PgPool,
        request: EnrollmentRequest,
    ) -> Result<EnrollmentResponse, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin enrollment transaction")
            .map_err(AppError::database)?;

        match Self::enroll(&mut tx, request).await {
            Ok(response) => {
                tx.commit()
                    .await
                    .context("Failed to commit enrollment")
                    .map_err(AppError::database)?;
                Ok(response)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "enrollment rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn enroll(
        tx: &mut Transaction<'_, Postgres>,
        request: EnrollmentRequest,
    ) -> Result<EnrollmentResponse, AppError> {
        let EnrollmentRequest { student, family } = request;

        // 1. Student identity + profile
        let student_profile = ProfileFields {
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            birth_date: Some(student.birth_date),
            document_number: student.document_number.clone(),
            phone: student.phone.clone(),
            address: student.address.clone(),
            occupation: None,
        };
        let student_identity = UserService::create_identity(
            tx,
            &student.email,
            &student.password,
            UserRole::Student,
            &student_profile,
        )
        .await?;

        // 2. Enrollment number (format check before uniqueness check)
        let enrollment_number =
            number::resolve(tx, student.enrollment_number.as_deref()).await?;

        // 3. Catalog references
        if let Some(level_id) = student.level_id {
            CatalogService::find_level_by_id(tx, level_id).await?;
        }
        if let Some(course_id) = student.course_id {
            CatalogService::find_course_by_id(tx, course_id).await?;
        }

        // 4. Student record
        let record =
            Self::create_student_record(tx, student_identity.id, &enrollment_number, &student)
                .await?;

        // 5. Family (new or existing)
        let (family_unit, relationship, primary, secondary) =
            Self::resolve_family(tx, family).await?;

        // 6. Family-student link
        FamilyService::link_student(tx, family_unit.id, record.id, relationship).await?;

        Ok(EnrollmentResponse {
            message: "Enrollment completed successfully".to_string(),
            student: EnrolledStudent {
                id: record.id,
                enrollment_number: record.enrollment_number,
                user: summary(&student_identity),
            },
            family: EnrolledFamily {
                id: family_unit.id,
                primary_contact: primary,
                secondary_contact: secondary,
            },
        })
    }

    async fn create_student_record(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        enrollment_number: &str,
        student: &StudentPayload,
    ) -> Result<StudentRecord, AppError> {
        sqlx::query_as::<_, StudentRecord>(
            r#"INSERT INTO students (user_id, enrollment_number, birth_date, level_id, course_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, user_id, enrollment_number, birth_date, level_id, course_id"#,
        )
        .bind(user_id)
        .bind(enrollment_number)
        .bind(student.birth_date)
        .bind(student.level_id)
        .bind(student.course_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                // A concurrent enrollment won the number; the index is the
                // authoritative check.
                return AppError::conflict(anyhow::anyhow!(
                    "Enrollment number {} already exists",
                    enrollment_number
                ));
            }
            AppError::database(anyhow::Error::from(e))
        })
    }

    async fn resolve_family(
        tx: &mut Transaction<'_, Postgres>,
        family: FamilyPayload,
    ) -> Result<(Family, Relationship, UserSummary, Option<UserSummary>), AppError> {
        match family {
            FamilyPayload::Existing {
                family_id,
                relationship,
            } => {
                let family_unit = FamilyService::find_family_by_id(tx, family_id).await?;
                let primary =
                    UserService::get_identity(tx, family_unit.primary_contact_id).await?;
                let secondary = match family_unit.secondary_contact_id {
                    Some(id) => Some(summary(&UserService::get_identity(tx, id).await?)),
                    None => None,
                };
                Ok((family_unit, relationship, summary(&primary), secondary))
            }
            FamilyPayload::New {
                primary_contact,
                secondary_contact,
                relationship,
            } => {
                let primary_profile = ProfileFields {
                    first_name: primary_contact.first_name.clone(),
                    last_name: primary_contact.last_name.clone(),
                    birth_date: None,
                    document_number: primary_contact.document_number.clone(),
                    phone: primary_contact.phone.clone(),
                    address: None,
                    occupation: primary_contact.occupation.clone(),
                };
                let primary_identity = UserService::create_identity(
                    tx,
                    &primary_contact.email,
                    &primary_contact.password,
                    UserRole::Family,
                    &primary_profile,
                )
                .await?;

                let secondary_identity = match &secondary_contact {
                    Some(contact) => {
                        let profile = ProfileFields {
                            first_name: contact.first_name.clone(),
                            last_name: contact.last_name.clone(),
                            birth_date: None,
                            document_number: contact.document_number.clone(),
                            phone: contact.phone.clone(),
                            address: None,
                            occupation: contact.occupation.clone(),
                        };
                        Some(
                            UserService::create_identity(
                                tx,
                                &contact.email,
                                &contact.password,
                                UserRole::Family,
                                &profile,
                            )
                            .await?,
                        )
                    }
                    None => None,
                };

                let family_unit = FamilyService::create_family(
                    tx,
                    primary_identity.id,
                    secondary_identity.as_ref().map(|identity| identity.id),
                )
                .await?;

                Ok((
                    family_unit,
                    relationship,
                    summary(&primary_identity),
                    secondary_identity.as_ref().map(summary),
                ))
            }
        }
    }
}

fn summary(identity: &Identity) -> UserSummary {
    UserSummary {
        id: identity.id,
        email: identity.email.clone(),
    }
}
