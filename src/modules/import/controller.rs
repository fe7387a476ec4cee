use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::header,
    response::IntoResponse,
};
use tracing::instrument;

use crate::modules::enrollment::controller::ErrorResponse;
use crate::modules::import::model::BatchImportReport;
use crate::modules::import::service::ImportService;
use crate::modules::import::template::build_template;
use crate::state::AppState;
use crate::utils::errors::AppError;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[utoipa::path(
    post,
    path = "/api/enrollments/import",
    request_body(content = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    responses(
        (status = 200, description = "Import report (returned even if every row failed)", body = BatchImportReport),
        (status = 400, description = "Unreadable workbook", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state, body))]
pub async fn import_enrollments(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BatchImportReport>, AppError> {
    if body.is_empty() {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Request body is empty; expected an xlsx workbook"
        )));
    }

    let report = ImportService::run(&state.db, &body).await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/enrollments/import/template",
    responses(
        (status = 200, description = "Import template workbook"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
#[instrument]
pub async fn download_template() -> Result<impl IntoResponse, AppError> {
    let bytes = build_template()
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build template: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"plantilla_matriculas.xlsx\"",
            ),
        ],
        bytes,
    ))
}
