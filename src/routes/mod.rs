//! Router assembly: common routes plus resource CRUD routes.

pub mod common;
pub mod resource;

pub use common::common_routes;
pub use resource::resource_routes;

use crate::response::error_body;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, http::StatusCode, Json, Router};
use tower_http::trace::TraceLayer;

/// The full service: `/`, `/api/health`, `/api/ready`, `/api/:resource[/:id]`.
/// Bodies over `body_limit` are rejected by `JsonObject` with 413.
pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(resource_routes(state))
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(error_body("not_found", "no such route".into())),
            )
        })
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}
