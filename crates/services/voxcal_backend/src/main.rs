// File: services/voxcal_backend/src/main.rs
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use voxcal_common::{logging, InMemoryIntegrationStore, HTTP_CLIENT};
use voxcal_config::load_config;
use voxcal_google::{GoogleCalendarClient, GoogleTokenExchanger};
use voxcal_webhook::handlers::WebhookState;
use voxcal_webhook::routes as webhook_routes;

#[tokio::main]
async fn main() {
    logging::init();
    let config = Arc::new(load_config().expect("Failed to load config"));

    // The only secret: everything else is plain config.
    let client_secret =
        std::env::var("GOOGLE_CLIENT_SECRET").expect("GOOGLE_CLIENT_SECRET must be set");

    let provider = Arc::new(GoogleCalendarClient::new(
        HTTP_CLIENT.clone(),
        config.google.api_base.clone(),
        config.google.calendar_id.clone(),
    ));
    let exchanger = Arc::new(GoogleTokenExchanger::new(
        HTTP_CLIENT.clone(),
        config.google.token_uri.clone(),
        config.google.client_id.clone(),
        client_secret,
    ));
    // Integrations are written by the external OAuth consent flow; this
    // process keeps them in memory until a shared store is wired in.
    let store = Arc::new(InMemoryIntegrationStore::new());

    let state = Arc::new(WebhookState::new(
        config.clone(),
        provider,
        store,
        exchanger,
    ));

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the VoxCal API!" }))
        .merge(webhook_routes::routes(state));

    let app = Router::new()
        .nest("/api", api_router)
        .route("/healthz", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind address");
    info!("listening on {}", addr);
    axum::serve(listener, app).await.expect("server error");
}
