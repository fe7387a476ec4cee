use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::enrollment::controller::create_enrollment;
use crate::modules::import::controller::{download_template, import_enrollments};
use crate::state::AppState;

pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_enrollment))
        .route("/import", post(import_enrollments))
        .route("/import/template", get(download_template))
}
