use axum::{Json, extract::State};

use crate::incoming::http_axum::{dto::responses::ApiResponse, error_mapper::HttpError};
use crate::shared::app_state::AppState;

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, HttpError> {
    let now = state.moderation_store.now_ms();

    Ok(Json(ApiResponse::success_with_data(Some(
        serde_json::json!({
            "status": "ok",
            "now_ms": now,
            "environment": state.config.environment.env,
        }),
    ))))
}
