use utoipa::OpenApi;

use crate::modules::catalog::model::{Course, Level};
use crate::modules::enrollment::controller::ErrorResponse;
use crate::modules::enrollment::model::{
    ContactPayload, EnrolledFamily, EnrolledStudent, EnrollmentRequest, EnrollmentResponse,
    FamilyPayload, StudentPayload, UserSummary,
};
use crate::modules::import::model::{
    BatchImportReport, ImportedStudent, RowError, RowWarning,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::enrollment::controller::create_enrollment,
        crate::modules::import::controller::import_enrollments,
        crate::modules::import::controller::download_template,
        crate::modules::catalog::controller::get_levels,
        crate::modules::catalog::controller::get_courses,
    ),
    components(
        schemas(
            EnrollmentRequest,
            StudentPayload,
            FamilyPayload,
            ContactPayload,
            EnrollmentResponse,
            EnrolledStudent,
            EnrolledFamily,
            UserSummary,
            BatchImportReport,
            RowError,
            RowWarning,
            ImportedStudent,
            Level,
            Course,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Enrollments", description = "Student enrollment and bulk import"),
        (name = "Catalog", description = "Educational level and course catalogs")
    ),
    info(
        title = "MatriWeb API",
        version = "0.1.0",
        description = "School administration API built with Rust, Axum, and PostgreSQL. Core: transactional student enrollment and spreadsheet bulk import.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
