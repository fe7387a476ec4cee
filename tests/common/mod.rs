use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use matriweb::modules::enrollment::model::{
    ContactPayload, EnrollmentRequest, FamilyPayload, StudentPayload,
};
use matriweb::modules::families::model::Relationship;

#[allow(dead_code)]
pub fn unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub async fn seed_level(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO levels (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn seed_course(pool: &PgPool, name: &str, level_id: Option<Uuid>) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO courses (name, level_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(level_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub fn student_payload(email: &str) -> StudentPayload {
    StudentPayload {
        first_name: "Ana".to_string(),
        last_name: "Ruiz".to_string(),
        email: email.to_string(),
        password: "studentpass123".to_string(),
        birth_date: NaiveDate::from_ymd_opt(2015, 3, 15).unwrap(),
        enrollment_number: None,
        document_number: Some("12345678A".to_string()),
        phone: None,
        address: None,
        level_id: None,
        course_id: None,
    }
}

#[allow(dead_code)]
pub fn contact_payload(email: &str) -> ContactPayload {
    ContactPayload {
        first_name: "Luis".to_string(),
        last_name: "Ruiz".to_string(),
        email: email.to_string(),
        password: "contactpass123".to_string(),
        phone: None,
        document_number: None,
        occupation: None,
    }
}

#[allow(dead_code)]
pub fn new_family_payload(contact_email: &str) -> FamilyPayload {
    FamilyPayload::New {
        primary_contact: contact_payload(contact_email),
        secondary_contact: None,
        relationship: Relationship::Padre,
    }
}

/// A minimal valid request: new student, new single-contact family.
#[allow(dead_code)]
pub fn enrollment_request(student_email: &str, contact_email: &str) -> EnrollmentRequest {
    EnrollmentRequest {
        student: student_payload(student_email),
        family: new_family_payload(contact_email),
    }
}
