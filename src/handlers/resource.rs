//! Resource CRUD handlers: list, create, read, replace, patch, delete.

use crate::config::{Operation, ResolvedResource};
use crate::error::AppError;
use crate::extractors::{ActiveFilter, JsonObject};
use crate::model::ResourceId;
use crate::response::{created, ok};
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Resource and operation are checked before the body, so 404/405 win over 422.
fn resolve<'a>(state: &'a AppState, path_segment: &str, op: Operation) -> Result<&'a ResolvedResource, AppError> {
    let resource = state
        .model
        .resource_by_path(path_segment)
        .ok_or_else(|| AppError::NotFound(format!("resource '{}'", path_segment)))?;
    if !resource.allows(op) {
        return Err(AppError::MethodNotAllowed(format!(
            "{} not allowed on {}",
            op.as_str(),
            path_segment
        )));
    }
    Ok(resource)
}

/// Ids that cannot be parsed under the resource's strategy cannot exist.
fn parse_id(resource: &ResolvedResource, id_str: &str) -> Result<ResourceId, AppError> {
    resource
        .id_strategy
        .parse(id_str)
        .ok_or_else(|| AppError::NotFound(format!("{} {}", resource.name, id_str)))
}

pub async fn list(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    filter: ActiveFilter,
) -> Result<impl IntoResponse, AppError> {
    let resource = resolve(&state, &path_segment, Operation::List)?;
    let rows = CrudService::list(state.store.as_ref(), resource, filter.is_requested()).await?;
    Ok(ok(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    body: Result<JsonObject, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resolve(&state, &path_segment, Operation::Create)?;
    let JsonObject(body) = body?;
    let row = CrudService::create(state.store.as_ref(), resource, &body).await?;
    Ok(created(row))
}

pub async fn read(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resolve(&state, &path_segment, Operation::Read)?;
    let id = parse_id(resource, &id_str)?;
    let row = CrudService::read(state.store.as_ref(), resource, &id).await?;
    Ok(ok(row))
}

pub async fn replace(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
    body: Result<JsonObject, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resolve(&state, &path_segment, Operation::Update)?;
    let id = parse_id(resource, &id_str)?;
    let JsonObject(body) = body?;
    let row = CrudService::replace(state.store.as_ref(), resource, &id, &body).await?;
    Ok(ok(row))
}

pub async fn patch(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
    body: Result<JsonObject, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resolve(&state, &path_segment, Operation::Update)?;
    let id = parse_id(resource, &id_str)?;
    let JsonObject(body) = body?;
    let row = CrudService::patch(state.store.as_ref(), resource, &id, &body).await?;
    Ok(ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resolve(&state, &path_segment, Operation::Delete)?;
    let id = parse_id(resource, &id_str)?;
    CrudService::delete(state.store.as_ref(), resource, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
