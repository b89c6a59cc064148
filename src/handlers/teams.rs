//! Team write endpoint.

use axum::Json;
use axum::extract::State;
use freight_admin_core::{AppError, AppResult, Auth, ResultExt};
use freight_admin_db::Record;
use http::StatusCode;
use serde_json::Value;
use tracing::{info, instrument};

use crate::requests::{FormRequest, StoreTeamRequest};
use crate::startup::AppState;

/// Store key for team records.
pub const TEAMS: &str = "teams";

#[instrument(skip_all, fields(user_id = %auth.user_id))]
pub async fn store_team(
    State(state): State<AppState>,
    Auth(auth): Auth,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Record>)> {
    let input = StoreTeamRequest.validate(&auth, body)?;

    let Value::Object(data) = serde_json::to_value(&input).internal("Failed to encode team")? else {
        return Err(AppError::Internal(
            "Team did not encode as an object".to_string(),
        ));
    };
    let team = state.store.create(TEAMS, data).await?;

    info!(team_id = %team.id, name = %input.name, "Team created");
    Ok((StatusCode::CREATED, Json(team)))
}
