//! Resource CRUD routes. Parameterized paths; handlers resolve the resource by its path segment.

use crate::handlers::resource::{create, delete as delete_handler, list, patch, read, replace};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/:path_segment", get(list).post(create))
        .route(
            "/api/:path_segment/:id",
            get(read).put(replace).patch(patch).delete(delete_handler),
        )
        .with_state(state)
}
