use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A family unit: a required primary contact and an optional secondary one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Family {
    pub id: Uuid,
    pub primary_contact_id: Uuid,
    pub secondary_contact_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The relationship a family bears to a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Padre,
    Madre,
    Tutor,
    Otro,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Padre => "padre",
            Relationship::Madre => "madre",
            Relationship::Tutor => "tutor",
            Relationship::Otro => "otro",
        }
    }

    /// Parses a free-text relationship value (trimmed, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "padre" => Some(Relationship::Padre),
            "madre" => Some(Relationship::Madre),
            "tutor" | "tutora" => Some(Relationship::Tutor),
            "otro" | "otra" => Some(Relationship::Otro),
            _ => None,
        }
    }
}

/// The join record between a family and a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FamilyStudentLink {
    pub id: Uuid,
    pub family_id: Uuid,
    pub student_id: Uuid,
    pub relationship: String,
}
