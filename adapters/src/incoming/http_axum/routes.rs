use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::incoming::http_axum::{
    handlers::{
        health::health_check,
        history::{add_history_entry, get_action_history},
        temp_state::{
            add_temp_block, add_temp_mute, list_temp_blocks, list_temp_mutes, remove_temp_block,
            remove_temp_mute, sweep_temp_blocks, sweep_temp_mutes,
        },
    },
    router_ext::RouterExt,
};
use crate::shared::app_state::AppState;

pub fn build_application_router() -> Router<AppState> {
    build_core_routes()
        .merge(build_temp_state_routes())
        .merge(build_history_routes())
        .with_request_id()
}

fn build_core_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

fn build_temp_state_routes() -> Router<AppState> {
    Router::new()
        .route("/temp-blocks", get(list_temp_blocks).post(add_temp_block))
        .route("/temp-blocks/sweep", post(sweep_temp_blocks))
        .route("/temp-blocks/{identifier}", delete(remove_temp_block))
        .route("/temp-mutes", get(list_temp_mutes).post(add_temp_mute))
        .route("/temp-mutes/sweep", post(sweep_temp_mutes))
        .route("/temp-mutes/{identifier}", delete(remove_temp_mute))
}

fn build_history_routes() -> Router<AppState> {
    Router::new().route("/history", get(get_action_history).post(add_history_entry))
}
