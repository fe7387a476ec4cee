use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// An educational level (e.g. "Educación Primaria").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Level {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// A course within a level (e.g. "1º de Primaria").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub level_id: Option<Uuid>,
}
