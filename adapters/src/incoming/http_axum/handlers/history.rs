use axum::{Json, extract::State};
use serde_json::Value;
use tracing::instrument;

use crate::incoming::http_axum::{dto::responses::ApiResponse, error_mapper::HttpError};
use crate::shared::app_state::AppState;
use domain::history::{HistoryEntry, NewHistoryEntry};

#[instrument(skip(state))]
pub async fn get_action_history(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<HistoryEntry>>>, HttpError> {
    let entries = state.moderation_store.get_action_history().await?;
    Ok(Json(ApiResponse::success_with_data(Some(entries))))
}

#[instrument(skip(state, body))]
pub async fn add_history_entry(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<HistoryEntry>>, HttpError> {
    let entry = NewHistoryEntry::from_json(body).map_err(HttpError::from)?;
    let stored = state.moderation_store.add_history_entry(entry).await?;
    Ok(Json(ApiResponse::success_with_data(Some(stored))))
}
