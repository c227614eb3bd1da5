//! Discovery document, liveness and readiness.

use crate::config::ResolvedModel;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

pub const HEALTH_PATH: &str = "/api/health";
pub const READY_PATH: &str = "/api/ready";

#[derive(Serialize)]
pub struct Discovery {
    pub message: String,
    pub version: &'static str,
    pub endpoints: Map<String, Value>,
}

impl Discovery {
    pub fn from_model(model: &ResolvedModel) -> Self {
        let mut endpoints = Map::new();
        endpoints.insert("health".into(), Value::String(HEALTH_PATH.into()));
        endpoints.insert("ready".into(), Value::String(READY_PATH.into()));
        for resource in &model.resources {
            endpoints.insert(resource.path_segment.clone(), Value::String(resource.collection_path()));
        }
        Self {
            message: model.service_name.clone(),
            version: env!("CARGO_PKG_VERSION"),
            endpoints,
        }
    }
}

#[derive(Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ReadyBody {
    pub status: &'static str,
    pub store: &'static str,
}

pub async fn root(State(state): State<AppState>) -> Json<Discovery> {
    Json(Discovery::from_model(&state.model))
}

/// Liveness only: never consults the store.
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "OK",
        timestamp: Utc::now(),
    })
}

pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadyBody>, (StatusCode, Json<ReadyBody>)> {
    if let Err(e) = state.store.ping().await {
        tracing::warn!(error = %e, "store not ready");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                store: "unavailable",
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "OK",
        store: "ok",
    }))
}
