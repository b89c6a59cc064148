//! Header action endpoints: create, save, delete and export.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use freight_admin_core::{AppError, AppResult, Auth, ResultExt};
use freight_admin_db::Record;
use http::{HeaderValue, StatusCode, header};
use serde_json::Value;
use tracing::{instrument, warn};
use uuid::Uuid;

use super::{authorize_action, record_action, resolve};
use crate::panel::Resource;
use crate::startup::AppState;

/// Permission required to save an edit form.
pub const UPDATE_PERMISSION: &str = "update";

/// Validate a form body against the resource's field rules.
fn validate_form(resource: Resource, body: Value) -> AppResult<serde_json::Map<String, Value>> {
    let Value::Object(input) = body else {
        return Err(AppError::InvalidArgument(
            "Request body must be a JSON object".to_string(),
        ));
    };
    Ok(resource.rules().validate(&input)?)
}

#[instrument(skip(state, auth, body), fields(user_id = %auth.user_id))]
pub async fn create_record(
    State(state): State<AppState>,
    Auth(auth): Auth,
    Path(slug): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Record>)> {
    let (resource, pages) = resolve(&state.panel, &slug)?;
    let action = authorize_action(&pages.list, "create", &auth)?;

    let data = validate_form(resource, body)?;
    let record = state.store.create(resource.slug(), data).await?;

    record_action(resource, action.name(), &auth);
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state, auth, body), fields(user_id = %auth.user_id))]
pub async fn update_record(
    State(state): State<AppState>,
    Auth(auth): Auth,
    Path((slug, id)): Path<(String, Uuid)>,
    Json(body): Json<Value>,
) -> AppResult<Json<Record>> {
    let (resource, _) = resolve(&state.panel, &slug)?;
    auth.require(UPDATE_PERMISSION)?;

    let data = validate_form(resource, body)?;
    let record = state.store.update(resource.slug(), id, data).await?;

    record_action(resource, UPDATE_PERMISSION, &auth);
    Ok(Json(record))
}

#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn delete_record(
    State(state): State<AppState>,
    Auth(auth): Auth,
    Path((slug, id)): Path<(String, Uuid)>,
) -> AppResult<StatusCode> {
    let (resource, pages) = resolve(&state.panel, &slug)?;
    let action = authorize_action(&pages.edit, "delete", &auth)?;

    state.store.delete(resource.slug(), id).await?;

    record_action(resource, action.name(), &auth);
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn export_records(
    State(state): State<AppState>,
    Auth(auth): Auth,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let (resource, pages) = resolve(&state.panel, &slug)?;
    let action = authorize_action(&pages.list, "export", &auth)?;

    let exporter = action
        .exporter()
        .and_then(|id| state.exporters.get(id))
        .ok_or_else(|| AppError::Internal(format!("No exporter registered for {resource}")))?;

    let fetched = state
        .store
        .all(resource.slug(), state.export_max_rows.saturating_add(1))
        .await?;
    let (records, truncated) = cap_rows(fetched, state.export_max_rows);
    if truncated {
        warn!(
            resource = resource.slug(),
            limit = state.export_max_rows,
            "Export truncated at row limit"
        );
    }

    let base_name = format!("{}-{}", resource.slug(), Utc::now().format("%Y-%m-%d"));
    let file = exporter
        .export(&base_name, &records)
        .internal("Failed to write export")?;

    record_action(resource, action.name(), &auth);
    Ok(attachment(file.file_name, file.content_type, file.bytes))
}

/// Keep at most `limit` rows; report whether any were dropped.
fn cap_rows(mut records: Vec<Record>, limit: usize) -> (Vec<Record>, bool) {
    let truncated = records.len() > limit;
    records.truncate(limit);
    (records, truncated)
}

fn attachment(file_name: String, content_type: &'static str, bytes: Vec<u8>) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(bytes),
    )
        .into_response()
}
