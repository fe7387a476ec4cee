use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::modules::enrollment::model::{EnrollmentRequest, EnrollmentResponse};
use crate::modules::enrollment::service::EnrollmentService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Error body returned by every endpoint.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[utoipa::path(
    post,
    path = "/api/enrollments",
    request_body = EnrollmentRequest,
    responses(
        (status = 200, description = "Enrollment completed", body = EnrollmentResponse),
        (status = 400, description = "Malformed enrollment number", body = ErrorResponse),
        (status = 404, description = "Referenced level, course, or family not found", body = ErrorResponse),
        (status = 409, description = "Email or enrollment number already exists", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state, request))]
pub async fn create_enrollment(
    State(state): State<AppState>,
    Json(request): Json<EnrollmentRequest>,
) -> Result<Json<EnrollmentResponse>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let response = EnrollmentService::process_enrollment(&state.db, request).await?;
    Ok(Json(response))
}
