use axum::{extract::State, http::StatusCode, Json};
use common::{AppSettings, StatusResponse};
use tracing::info;

use crate::settings::{load_settings, save_settings as write_settings};
use crate::state::{AppState, JsonResult};
use crate::utils::{join_error, json_error};

pub async fn get_settings(State(state): State<AppState>) -> JsonResult<AppSettings> {
    let path = state.settings_path();
    let settings = tokio::task::spawn_blocking(move || load_settings(&path))
        .await
        .map_err(join_error)?;
    Ok(Json(settings))
}

pub async fn save_settings(
    State(state): State<AppState>,
    Json(settings): Json<AppSettings>,
) -> JsonResult<StatusResponse> {
    let path = state.settings_path();
    let shown = path.display().to_string();
    tokio::task::spawn_blocking(move || write_settings(&path, &settings))
        .await
        .map_err(join_error)?
        .map_err(|err| json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    info!("Saved settings to {}", shown);
    Ok(Json(StatusResponse {
        status: "saved".to_string(),
    }))
}
