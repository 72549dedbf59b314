//! Telegram inbound webhook handler.
//!
//! Receives Bot API updates, maps them to conversation events and runs
//! the engine. The transport redelivers anything that is not acknowledged,
//! so this handler always returns 200 OK: processing failures are logged,
//! never surfaced, and a redelivery storm is avoided. Per-user session
//! locking (not the transport) is what makes duplicate deliveries safe.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;

use telegram::models::Update;

use crate::domains::conversation::{self, events};
use crate::kernel::ServerDeps;

/// State shared with the webhook handler.
#[derive(Clone)]
pub struct WebhookState {
    pub deps: Arc<ServerDeps>,
}

/// Build the axum router for webhook endpoints.
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/webhooks/telegram", post(handle_telegram_update))
        .with_state(state)
}

/// Handle one update from Telegram.
///
/// The body is taken as a raw string and parsed leniently inside the
/// handler: a malformed or unrecognized payload must still be
/// acknowledged, not bounced back as a 4xx for the transport to retry
/// forever.
async fn handle_telegram_update(
    State(state): State<WebhookState>,
    body: String,
) -> StatusCode {
    let update = match serde_json::from_str::<Update>(&body) {
        Ok(update) => update,
        Err(error) => {
            tracing::debug!(%error, "Dropping unparseable update");
            return StatusCode::OK;
        }
    };

    let update_id = update.update_id;
    let Some(inbound) = events::from_update(update) else {
        tracing::debug!(update_id, "Dropping non-actionable update");
        return StatusCode::OK;
    };

    if let Err(error) = conversation::handle_inbound(&state.deps, inbound).await {
        tracing::error!(update_id, %error, "Failed to process update");
    }

    StatusCode::OK
}
