//! Enrollment request and response DTOs.
//!
//! The request is a closed shape: a mandatory [`StudentPayload`] and a
//! [`FamilyPayload`] that is either a reference to an existing family or a
//! new family with one or two contacts. The two variants have disjoint
//! required fields, so the untagged serde representation is unambiguous.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::families::model::Relationship;

/// The student half of an enrollment request.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct StudentPayload {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub birth_date: chrono::NaiveDate,
    /// Explicit enrollment number; allocated when absent.
    pub enrollment_number: Option<String>,
    pub document_number: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub level_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
}

/// A family contact to be created together with the enrollment.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ContactPayload {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub phone: Option<String>,
    pub document_number: Option<String>,
    pub occupation: Option<String>,
}

/// The family half of an enrollment request.
#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(untagged)]
pub enum FamilyPayload {
    /// Link the student to an already existing family (e.g. a sibling's).
    Existing {
        family_id: Uuid,
        relationship: Relationship,
    },
    /// Create a new family with a primary and optionally a secondary contact.
    New {
        primary_contact: ContactPayload,
        #[serde(default)]
        secondary_contact: Option<ContactPayload>,
        relationship: Relationship,
    },
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct EnrollmentRequest {
    pub student: StudentPayload,
    pub family: FamilyPayload,
}

impl EnrollmentRequest {
    /// Validates the student payload and, for a new family, its contacts.
    pub fn validate(&self) -> Result<(), validator::ValidationErrors> {
        Validate::validate(&self.student)?;
        if let FamilyPayload::New {
            primary_contact,
            secondary_contact,
            ..
        } = &self.family
        {
            Validate::validate(primary_contact)?;
            if let Some(secondary) = secondary_contact {
                Validate::validate(secondary)?;
            }
        }
        Ok(())
    }
}

/// A student record as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub enrollment_number: String,
    pub birth_date: chrono::NaiveDate,
    pub level_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct EnrolledStudent {
    pub id: Uuid,
    pub enrollment_number: String,
    pub user: UserSummary,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct EnrolledFamily {
    pub id: Uuid,
    pub primary_contact: UserSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_contact: Option<UserSummary>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct EnrollmentResponse {
    pub message: String,
    pub student: EnrolledStudent,
    pub family: EnrolledFamily,
}
