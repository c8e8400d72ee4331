//! Resource CRUD handlers: create, list, read, update, delete. Handlers
//! resolve the descriptor by path segment and hand everything else to
//! the pipeline.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::descriptor::ResourceDescriptor;
use crate::error::AppError;
use crate::extractors::CallerIdentity;
use crate::response;
use crate::state::AppState;

fn resolve<'a>(state: &'a AppState, path: &str) -> Result<&'a ResourceDescriptor, AppError> {
    state
        .registry
        .by_path(path)
        .ok_or_else(|| AppError::NotFound(format!("resource '{}'", path)))
}

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    identity: CallerIdentity,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let desc = resolve(&state, &resource)?;
    let body = body_to_map(body)?;
    let record = state
        .pipeline
        .create(desc, identity.as_deref(), &body)
        .await?;
    tracing::info!(resource = %desc.path, "record created");
    Ok(response::created(record))
}

pub async fn list(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    identity: CallerIdentity,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let desc = resolve(&state, &resource)?;
    let envelope = state
        .pipeline
        .list(desc, identity.as_deref(), &params)
        .await?;
    Ok(Json(envelope))
}

pub async fn read(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    identity: CallerIdentity,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let desc = resolve(&state, &resource)?;
    let record = state.pipeline.get(desc, identity.as_deref(), &id).await?;
    Ok(response::ok(record))
}

pub async fn update(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    identity: CallerIdentity,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let desc = resolve(&state, &resource)?;
    let body = body_to_map(body)?;
    let record = state
        .pipeline
        .update(desc, identity.as_deref(), &id, &body)
        .await?;
    tracing::info!(resource = %desc.path, id = %id, "record updated");
    Ok(response::ok(record))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    identity: CallerIdentity,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let desc = resolve(&state, &resource)?;
    let record = state
        .pipeline
        .delete(desc, identity.as_deref(), &id)
        .await?;
    tracing::info!(resource = %desc.path, id = %id, "record deleted");
    Ok(response::ok(record))
}
