//! Common routes: discovery root, health, readiness.

use crate::handlers::common::{health, ready, root, HEALTH_PATH, READY_PATH};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route(HEALTH_PATH, get(health))
        .route(READY_PATH, get(ready))
        .with_state(state)
}
