//! # Usersync Axum Integration
//!
//! Mounts the webhook endpoint and a health route on an Axum router.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use usersync_axum::{webhook_routes, WebhookState, DEFAULT_WEBHOOK_PATH};
//!
//! let state = WebhookState::new(receiver, service);
//! let app = webhook_routes(state, DEFAULT_WEBHOOK_PATH);
//! axum::serve(listener, app).await?;
//! ```

mod error;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::{webhook_routes, DEFAULT_WEBHOOK_PATH, HEALTH_PATH};
pub use state::WebhookState;
