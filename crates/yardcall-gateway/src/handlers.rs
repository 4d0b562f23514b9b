// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the driver status API.
//!
//! Handles GET /health, GET /api/status, POST /api/upload,
//! POST /api/subscribe, POST /api/unsubscribe.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use yardcall_core::{LookupError, Movement, Snapshot, StatusKind};

use crate::geofence::{self, GeofenceError, GeofenceReport};
use crate::server::GatewayState;

/// Query parameters for driver-facing, geofenced requests.
#[derive(Debug, Deserialize)]
pub struct DriverQuery {
    /// License plate as typed by the driver.
    pub plate: String,
    /// Device latitude.
    pub lat: f64,
    /// Device longitude.
    pub lon: f64,
    /// Unix epoch seconds at which the device captured its position.
    pub ts: i64,
}

/// Query parameters for POST /api/upload.
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Shared upload secret.
    pub secret: String,
}

/// Query parameters for POST /api/unsubscribe.
#[derive(Debug, Deserialize)]
pub struct UnsubscribeQuery {
    /// License plate the subscription was registered under.
    pub plate: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub push_enabled: bool,
    pub snapshot_loaded: bool,
}

/// Response body for GET /api/status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Normalized plate that was matched.
    pub plate: String,
    /// Status classification.
    pub status_key: StatusKind,
    /// Driver-facing status text.
    pub status_text: String,
    /// Destination description, if any.
    pub destination_text: String,
    /// Navigation link to the destination, when coordinates are known.
    pub destination_nav_url: Option<String>,
    /// Raw scheduled departure as uploaded.
    pub scheduled_departure: String,
    /// When to report in the office, formatted for display.
    pub report_office_at: String,
    /// When the snapshot was last refreshed.
    pub last_refresh: Option<String>,
    /// Geofence check result.
    pub geofence: GeofenceReport,
    /// Whether push subscriptions can be registered.
    pub push_enabled: bool,
    /// VAPID public key for browser subscription, when push is enabled.
    pub vapid_public_key: String,
}

/// Response body for POST /api/upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub count: usize,
    pub push_enabled: bool,
}

/// Response body for POST /api/subscribe and /api/unsubscribe.
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub ok: bool,
    pub plate: String,
    pub count: usize,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for GeofenceError {
    fn into_response(self) -> Response {
        match self {
            GeofenceError::StaleTimestamp => error_response(
                StatusCode::UNAUTHORIZED,
                "Location timestamp too old. Refresh and try again.",
            ),
            GeofenceError::OutsideRadius {
                radius_km,
                hub_name,
            } => error_response(
                StatusCode::FORBIDDEN,
                format!("Access denied (outside {radius_km:.0} km of {hub_name})."),
            ),
        }
    }
}

/// Build the navigation link for a movement's destination, if it has one.
fn destination_nav_url(movement: &Movement) -> Option<String> {
    let (lat, lon) = movement.destination_coords()?;
    Some(format!(
        "https://www.google.com/maps/search/?api=1&query={lat},{lon}"
    ))
}

/// GET /health
///
/// Public liveness endpoint, outside the geofence.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        push_enabled: state.sender.is_enabled(),
        snapshot_loaded: state.store.is_loaded(),
    })
}

/// GET /api/status
///
/// Geofence check, then plate lookup against the current snapshot. The
/// three-way lookup outcome maps to distinct response codes: found -> 200,
/// not found -> 404, ambiguous -> 409.
pub async fn get_status(
    State(state): State<GatewayState>,
    Query(query): Query<DriverQuery>,
) -> Response {
    let report = match geofence::check(
        &state.config.geofence,
        query.lat,
        query.lon,
        query.ts,
        chrono::Utc::now().timestamp(),
    ) {
        Ok(report) => report,
        Err(e) => return e.into_response(),
    };

    let snapshot = state.store.current();
    let movement = match yardcall_engine::find(&query.plate, &snapshot) {
        Ok(m) => m,
        Err(LookupError::NotFound) => {
            return error_response(StatusCode::NOT_FOUND, "No movement found for this plate.");
        }
        Err(LookupError::Ambiguous) => {
            warn!(
                plate = query.plate.as_str(),
                "ambiguous plate in snapshot, refusing lookup"
            );
            return error_response(
                StatusCode::CONFLICT,
                "Multiple movements found for this plate. Contact the office.",
            );
        }
    };

    let status = yardcall_engine::resolve(movement, chrono::Local::now().naive_local());
    metrics::counter!("yardcall_status_lookups_total").increment(1);

    let push_enabled = state.sender.is_enabled();
    Json(StatusResponse {
        plate: yardcall_engine::normalize_plate(&query.plate),
        status_key: status.kind,
        status_text: status.display_text,
        destination_text: movement.destination_text.clone().unwrap_or_default(),
        destination_nav_url: destination_nav_url(movement),
        scheduled_departure: movement.scheduled_departure.clone().unwrap_or_default(),
        report_office_at: status
            .report_office_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        last_refresh: snapshot.last_update.clone(),
        geofence: report,
        push_enabled,
        vapid_public_key: if push_enabled {
            state
                .config
                .push
                .vapid_public_key
                .clone()
                .unwrap_or_default()
        } else {
            String::new()
        },
    })
    .into_response()
}

/// POST /api/upload?secret=...
///
/// Replaces the current snapshot wholesale and triggers one immediate
/// notification sweep. The dedup watermark makes the extra sweep idempotent
/// with respect to the periodic one.
pub async fn post_upload(
    State(state): State<GatewayState>,
    Query(query): Query<UploadQuery>,
    body: Option<Json<serde_json::Value>>,
) -> Response {
    let Some(expected) = state.config.upload.secret.as_deref() else {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server not configured: upload secret missing.",
        );
    };
    if query.secret != expected {
        return error_response(StatusCode::UNAUTHORIZED, "Unauthorized.");
    }

    let Some(Json(body)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid JSON body.");
    };
    if !body
        .as_object()
        .is_some_and(|o| o.contains_key("movements"))
    {
        return error_response(StatusCode::BAD_REQUEST, "Snapshot must contain 'movements'.");
    }
    let snapshot: Snapshot = match serde_json::from_value(body) {
        Ok(s) => s,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid snapshot: {e}"));
        }
    };

    let count = snapshot.movements.len();
    state.store.replace(snapshot);
    info!(movements = count, "snapshot uploaded");

    // Re-evaluate right away so upload-driven transitions do not wait for
    // the next timer tick.
    let sweeper = state.sweeper.clone();
    tokio::spawn(async move {
        sweeper.sweep_once().await;
    });

    Json(UploadResponse {
        ok: true,
        count,
        push_enabled: state.sender.is_enabled(),
    })
    .into_response()
}

/// POST /api/subscribe?plate=...&lat=...&lon=...&ts=...
///
/// Registers a push endpoint for a plate, after the geofence check.
pub async fn post_subscribe(
    State(state): State<GatewayState>,
    Query(query): Query<DriverQuery>,
    body: Option<Json<yardcall_core::PushEndpoint>>,
) -> Response {
    if !state.sender.is_enabled() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Push is not enabled on the server.",
        );
    }

    if let Err(e) = geofence::check(
        &state.config.geofence,
        query.lat,
        query.lon,
        query.ts,
        chrono::Utc::now().timestamp(),
    ) {
        return e.into_response();
    }

    let Some(Json(endpoint)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid subscription.");
    };
    if endpoint.endpoint.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Invalid subscription.");
    }

    let plate = yardcall_engine::normalize_plate(&query.plate);
    let count = state.registry.subscribe(&plate, endpoint).await;
    metrics::counter!("yardcall_subscriptions_total").increment(1);

    Json(SubscribeResponse {
        ok: true,
        plate,
        count,
    })
    .into_response()
}

/// POST /api/unsubscribe?plate=...
///
/// Removes the subscription matching the posted endpoint.
pub async fn post_unsubscribe(
    State(state): State<GatewayState>,
    Query(query): Query<UnsubscribeQuery>,
    body: Option<Json<yardcall_core::PushEndpoint>>,
) -> Response {
    let Some(Json(endpoint)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid subscription.");
    };

    let plate = yardcall_engine::normalize_plate(&query.plate);
    let removed = state.registry.unsubscribe(&plate, &endpoint.endpoint).await;
    if !removed {
        return error_response(StatusCode::NOT_FOUND, "No such subscription.");
    }

    Json(SubscribeResponse {
        ok: true,
        plate,
        count: 0,
    })
    .into_response()
}
