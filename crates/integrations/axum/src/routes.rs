//! Webhook and health routes.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use usersync_handlers::SyncOutcome;
use usersync_webhooks::{DeliveryHeaders, ProviderEvent, DELIVERY_ID_HEADER};

use crate::error::ApiError;
use crate::state::WebhookState;

/// Default path of the webhook endpoint.
pub const DEFAULT_WEBHOOK_PATH: &str = "/api/webhooks/clerk";

/// Path of the liveness route.
pub const HEALTH_PATH: &str = "/health";

/// Creates a router with the webhook endpoint at `path` and the health route.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(webhook_routes(state, "/api/webhooks/clerk"));
/// ```
pub fn webhook_routes<S>(state: WebhookState, path: &str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(path, post(receive_webhook))
        .route(HEALTH_PATH, get(health_handler))
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Fields of the one log line written per delivery.
struct DeliverySummary {
    delivery_id: String,
    event_kind: &'static str,
    provider_user_id: Option<String>,
    outcome: &'static str,
}

impl DeliverySummary {
    fn new(headers: &HeaderMap) -> Self {
        Self {
            delivery_id: header_value(headers, DELIVERY_ID_HEADER).unwrap_or("-").to_string(),
            event_kind: "-",
            provider_user_id: None,
            outcome: "-",
        }
    }

    fn record_event(&mut self, event: &ProviderEvent) {
        self.event_kind = event.kind().as_str();
        self.provider_user_id = event.provider_user_id().map(str::to_string);
    }

    fn log(&self, status: StatusCode) {
        let provider_user_id = self.provider_user_id.as_deref().unwrap_or("-");

        if status.is_server_error() {
            tracing::error!(
                delivery_id = %self.delivery_id,
                event_kind = self.event_kind,
                provider_user_id,
                outcome = self.outcome,
                status = status.as_u16(),
                "Webhook delivery failed"
            );
        } else if status.is_success() {
            tracing::info!(
                delivery_id = %self.delivery_id,
                event_kind = self.event_kind,
                provider_user_id,
                outcome = self.outcome,
                status = status.as_u16(),
                "Webhook delivery processed"
            );
        } else {
            tracing::warn!(
                delivery_id = %self.delivery_id,
                event_kind = self.event_kind,
                provider_user_id,
                outcome = self.outcome,
                status = status.as_u16(),
                "Webhook delivery rejected"
            );
        }
    }
}

/// `POST {path}`: verify, decode, apply.
///
/// The body is taken as raw bytes so the MAC covers exactly what was sent.
async fn receive_webhook(State(state): State<WebhookState>, headers: HeaderMap, body: Bytes) -> Response {
    let mut summary = DeliverySummary::new(&headers);

    let response = match process(&state, &headers, &body, &mut summary).await {
        Ok(response) => response,
        Err(err) => {
            summary.outcome = err.kind();
            err.into_response()
        }
    };

    summary.log(response.status());
    response
}

async fn process(
    state: &WebhookState,
    headers: &HeaderMap,
    body: &[u8],
    summary: &mut DeliverySummary,
) -> Result<Response, ApiError> {
    let delivery = DeliveryHeaders::from_lookup(|name| header_value(headers, name))?;
    let event = state.receiver.verify(&delivery, body)?;
    summary.record_event(&event);

    let outcome = state.service.handle(&event).await?;
    summary.outcome = outcome.label();

    Ok(outcome_response(&outcome, outcome.status_code(state.service.policy())))
}

fn outcome_response(outcome: &SyncOutcome, status: u16) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
    let message = if status.is_success() { "OK" } else { "User already exists" };

    let body = json!({
        "message": message,
        "outcome": outcome.label(),
        "user": outcome.user(),
        "write_back": outcome.write_back().label(),
    });

    (status, Json(body)).into_response()
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
