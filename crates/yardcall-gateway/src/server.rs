// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the driver API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use yardcall_config::YardcallConfig;
use yardcall_core::{PushSender, YardcallError};
use yardcall_engine::{SnapshotStore, StatusSweeper, SubscriptionRegistry};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Current planning snapshot.
    pub store: Arc<SnapshotStore>,
    /// Push subscriptions, keyed by normalized plate.
    pub registry: Arc<SubscriptionRegistry>,
    /// Sweeper, for the immediate re-evaluation after an upload.
    pub sweeper: Arc<StatusSweeper>,
    /// Push sender, for enablement checks.
    pub sender: Arc<dyn PushSender>,
    /// Full service configuration.
    pub config: Arc<YardcallConfig>,
}

/// Build the gateway router.
///
/// `/health` is public; everything under `/api` is driver- or
/// planner-facing and carries its own checks (geofence, upload secret)
/// inside the handlers.
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/api/status", get(handlers::get_status))
        .route("/api/upload", post(handlers::post_upload))
        .route("/api/subscribe", post(handlers::post_subscribe))
        .route("/api/unsubscribe", post(handlers::post_unsubscribe))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves until the process exits.
pub async fn start_server(state: GatewayState) -> Result<(), YardcallError> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| YardcallError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| YardcallError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
