use axum::{Router, routing::get};

use crate::modules::catalog::controller::{get_courses, get_levels};
use crate::state::AppState;

pub fn init_levels_router() -> Router<AppState> {
    Router::new().route("/", get(get_levels))
}

pub fn init_courses_router() -> Router<AppState> {
    Router::new().route("/", get(get_courses))
}
