// --- File: crates/voxcal_webhook/src/routes.rs ---

use crate::handlers::{voice_webhook_handler, WebhookState};
use axum::{routing::post, Router};
use std::sync::Arc;

/// Creates a router containing the voice webhook route.
/// The state is built by the caller so collaborator handles stay injected.
pub fn routes(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/webhook/voice", post(voice_webhook_handler))
        .with_state(state)
}
