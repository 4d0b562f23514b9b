// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Yardcall workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Returns true when an optional spreadsheet-sourced field carries a real value.
///
/// Upload snapshots come from exported spreadsheets, so empty cells arrive as
/// `""`, `"nan"`, `"none"`, or `"nat"` about as often as they arrive as null.
fn field_present(value: &Option<String>) -> bool {
    match value {
        None => false,
        Some(v) => {
            let v = v.trim();
            !v.is_empty() && !matches!(v.to_ascii_lowercase().as_str(), "nan" | "none" | "nat")
        }
    }
}

/// One fleet vehicle's current job state within a snapshot.
///
/// Plates need not be unique within a snapshot; duplicates are a valid
/// real-world condition that the matcher detects and rejects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// License plate, the match key. Compared after normalization.
    #[serde(default)]
    pub license_plate: String,

    /// Human-readable destination description.
    #[serde(default)]
    pub destination_text: Option<String>,

    /// Destination latitude, surfaced for navigation links.
    #[serde(default)]
    pub destination_lat: Option<f64>,

    /// Destination longitude, surfaced for navigation links.
    #[serde(default)]
    pub destination_lon: Option<f64>,

    /// Scheduled departure timestamp, as exported (parsed lazily).
    #[serde(default)]
    pub scheduled_departure: Option<String>,

    /// Door-closed marker. Presence-only semantics: any real value counts.
    #[serde(default)]
    pub close_door: Option<String>,

    /// Yard location where the trailer is parked, if assigned.
    #[serde(default)]
    pub location: Option<String>,

    /// Trailer identifier, if assigned.
    #[serde(default)]
    pub trailer: Option<String>,
}

impl Movement {
    /// Whether the door-closed marker carries a value.
    pub fn close_door_present(&self) -> bool {
        field_present(&self.close_door)
    }

    /// The yard location, when one is actually set.
    pub fn location_value(&self) -> Option<&str> {
        if field_present(&self.location) {
            self.location.as_deref().map(str::trim)
        } else {
            None
        }
    }

    /// The trailer id, when one is actually set.
    pub fn trailer_value(&self) -> Option<&str> {
        if field_present(&self.trailer) {
            self.trailer.as_deref().map(str::trim)
        } else {
            None
        }
    }

    /// Destination coordinates, when both components are present.
    pub fn destination_coords(&self) -> Option<(f64, f64)> {
        Some((self.destination_lat?, self.destination_lon?))
    }
}

/// One complete, atomically-replaced fleet status batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the source data was last refreshed, as reported by the uploader.
    #[serde(default)]
    pub last_update: Option<String>,

    /// Movement records, in upload order.
    #[serde(default)]
    pub movements: Vec<Movement>,
}

impl Snapshot {
    /// The well-defined sentinel observed before any upload has happened.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Derived status classification for a movement at a point in time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    /// Door closed, no yard location: trailer is ready, report in the office.
    ReadyReportOffice,
    /// Trailer parked on a yard location: connect it and fetch documents.
    ConnectTrailer,
    /// Still being loaded, departure far enough away. Informational only.
    LoadingWait,
    /// Departure imminent, past, or unknown: report in the office.
    ReportOffice45,
}

impl StatusKind {
    /// Whether this kind is eligible to trigger a push notification.
    ///
    /// `LoadingWait` is purely informational and is never pushed.
    pub fn is_notifiable(self) -> bool {
        !matches!(self, StatusKind::LoadingWait)
    }
}

/// Derived, never persisted result of status resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResult {
    /// Status classification.
    pub kind: StatusKind,
    /// Driver-facing display text.
    pub display_text: String,
    /// `scheduled_departure - 45min`, whenever the departure parses.
    /// Computed independently of which rule fired, for display purposes.
    pub report_office_at: Option<chrono::NaiveDateTime>,
}

/// Cryptographic key material of a browser push registration. Opaque to us.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushKeys {
    #[serde(default)]
    pub p256dh: String,
    #[serde(default)]
    pub auth: String,
}

/// A browser push registration as posted by the subscribe endpoint.
///
/// Owned exclusively by the subscription record that carries it. The
/// endpoint URL doubles as the identity for upsert/unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEndpoint {
    /// Push service URL to deliver to.
    pub endpoint: String,
    /// Encryption keys for the push service. Passed through opaquely.
    #[serde(default)]
    pub keys: PushKeys,
}

/// A recipient's push registration plus its dedup watermark.
///
/// Held only in memory; subscriptions do not survive a process restart.
/// That is a documented limitation of the service, not a defect.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    /// Normalized plate the recipient subscribed for.
    pub plate: String,
    /// Where to deliver pushes.
    pub endpoint: PushEndpoint,
    /// Last status kind already delivered. Prevents repeat notifications
    /// for an unchanged condition.
    pub last_notified_kind: Option<StatusKind>,
}
