use axum::{Json, extract::State};
use tracing::instrument;

use crate::modules::catalog::model::{Course, Level};
use crate::modules::catalog::service::CatalogService;
use crate::modules::enrollment::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[utoipa::path(
    get,
    path = "/api/levels",
    responses(
        (status = 200, description = "List of educational levels", body = [Level]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Catalog"
)]
#[instrument]
pub async fn get_levels(State(state): State<AppState>) -> Result<Json<Vec<Level>>, AppError> {
    let levels = CatalogService::list_levels(&state.db).await?;
    Ok(Json(levels))
}

#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "List of courses", body = [Course]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Catalog"
)]
#[instrument]
pub async fn get_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CatalogService::list_courses(&state.db).await?;
    Ok(Json(courses))
}
