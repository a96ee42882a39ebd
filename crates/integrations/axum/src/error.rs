//! Error to HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use usersync_core::SyncError;
use usersync_webhooks::WebhookError;

/// Any failure that ends a webhook request.
#[derive(Debug)]
pub enum ApiError {
    /// Header, signature or payload rejected before any mutation.
    Webhook(WebhookError),
    /// The handler failed to apply the event.
    Sync(SyncError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Webhook(err) => err.status_code(),
            ApiError::Sync(err) => err.status_code(),
        }
    }

    /// Stable error name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Webhook(err) => err.kind(),
            ApiError::Sync(err) => err.kind(),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Webhook(err) => err.to_string(),
            ApiError::Sync(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({
            "error": self.message(),
            "code": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        ApiError::Webhook(err)
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        ApiError::Sync(err)
    }
}
