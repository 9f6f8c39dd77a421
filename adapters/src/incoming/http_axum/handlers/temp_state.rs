use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use validator::Validate;

use crate::incoming::http_axum::{
    dto::{
        requests::AddTempEntryRequest,
        responses::{ApiResponse, SweepResponse, TempEntryResponse},
    },
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use domain::{
    actor::ActorId,
    temp_entry::{TempEntryMap, TempKind},
};
use tempmod_application::error::AppError;

fn validated(request: &AddTempEntryRequest) -> Result<(), HttpError> {
    request.validate().map_err(|e| {
        HttpError(AppError::ValidationError {
            message: e.to_string(),
        })
    })
}

async fn list(state: &AppState, kind: TempKind) -> Result<TempEntryMap, HttpError> {
    Ok(state.moderation_store.temp_state(kind).get_all().await?)
}

async fn add(
    state: &AppState,
    kind: TempKind,
    request: AddTempEntryRequest,
) -> Result<TempEntryResponse, HttpError> {
    validated(&request)?;
    let identifier = ActorId::parse(request.identifier)?;

    let entry = state
        .moderation_store
        .temp_state(kind)
        .add(identifier.clone(), request.handle, request.duration_ms)
        .await?;

    Ok(TempEntryResponse::new(&identifier, entry))
}

async fn remove(state: &AppState, kind: TempKind, identifier: String) -> Result<(), HttpError> {
    let identifier = ActorId::parse(identifier)?;
    state
        .moderation_store
        .temp_state(kind)
        .remove(&identifier)
        .await?;
    Ok(())
}

async fn sweep(state: &AppState, kind: TempKind) -> Result<SweepResponse, HttpError> {
    let evicted = match kind {
        TempKind::Block => state.moderation_store.remove_all_expired_blocks().await?,
        TempKind::Mute => state.moderation_store.remove_all_expired_mutes().await?,
    };
    Ok(SweepResponse { evicted })
}

#[instrument(skip(state))]
pub async fn list_temp_blocks(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TempEntryMap>>, HttpError> {
    let entries = list(&state, TempKind::Block).await?;
    Ok(Json(ApiResponse::success_with_data(Some(entries))))
}

#[instrument(skip(state))]
pub async fn add_temp_block(
    State(state): State<AppState>,
    Json(request): Json<AddTempEntryRequest>,
) -> Result<Json<ApiResponse<TempEntryResponse>>, HttpError> {
    let entry = add(&state, TempKind::Block, request).await?;
    Ok(Json(ApiResponse::success_with_data(Some(entry))))
}

#[instrument(skip(state))]
pub async fn remove_temp_block(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<ApiResponse<()>>, HttpError> {
    remove(&state, TempKind::Block, identifier).await?;
    Ok(Json(ApiResponse::success()))
}

#[instrument(skip(state))]
pub async fn sweep_temp_blocks(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SweepResponse>>, HttpError> {
    let result = sweep(&state, TempKind::Block).await?;
    Ok(Json(ApiResponse::success_with_data(Some(result))))
}

#[instrument(skip(state))]
pub async fn list_temp_mutes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TempEntryMap>>, HttpError> {
    let entries = list(&state, TempKind::Mute).await?;
    Ok(Json(ApiResponse::success_with_data(Some(entries))))
}

#[instrument(skip(state))]
pub async fn add_temp_mute(
    State(state): State<AppState>,
    Json(request): Json<AddTempEntryRequest>,
) -> Result<Json<ApiResponse<TempEntryResponse>>, HttpError> {
    let entry = add(&state, TempKind::Mute, request).await?;
    Ok(Json(ApiResponse::success_with_data(Some(entry))))
}

#[instrument(skip(state))]
pub async fn remove_temp_mute(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<ApiResponse<()>>, HttpError> {
    remove(&state, TempKind::Mute, identifier).await?;
    Ok(Json(ApiResponse::success()))
}

#[instrument(skip(state))]
pub async fn sweep_temp_mutes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SweepResponse>>, HttpError> {
    let result = sweep(&state, TempKind::Mute).await?;
    Ok(Json(ApiResponse::success_with_data(Some(result))))
}
