use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

use domain::error::DomainError;
use tempmod_application::error::AppError;

pub struct HttpError(pub AppError);

impl HttpError {
    fn is_client_error(&self) -> bool {
        matches!(
            self.0,
            AppError::Domain(_) | AppError::ValidationError { .. } | AppError::JsonError(_)
        )
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        if self.is_client_error() {
            debug!("Client error response generated: {}", app_error);
        } else {
            error!("Server error response generated: {}", app_error);
        }

        let (status_code, message) = match app_error {
            AppError::Domain(_) => (StatusCode::BAD_REQUEST, app_error.to_string()),

            AppError::ValidationError { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, app_error.to_string())
            }

            AppError::JsonError(_) => (StatusCode::BAD_REQUEST, "Invalid JSON format".to_string()),

            // The change may or may not have been written; clients re-read
            // and decide whether to retry.
            AppError::SubstrateUnavailable { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Moderation state change not guaranteed, storage unavailable".to_string(),
            ),

            AppError::ConfigError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),

            AppError::NotificationUndeliverable { .. }
            | AppError::IoError(_)
            | AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let error_response = json!({
            "ok": false,
            "error": message,
            "status": status_code.as_u16()
        });

        (status_code, Json(error_response)).into_response()
    }
}

impl From<AppError> for HttpError {
    fn from(app_error: AppError) -> Self {
        HttpError(app_error)
    }
}

impl From<DomainError> for HttpError {
    fn from(domain_error: DomainError) -> Self {
        HttpError(AppError::Domain(domain_error))
    }
}
