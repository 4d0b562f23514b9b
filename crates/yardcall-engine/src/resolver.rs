// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure status derivation for one movement at a point in time.
//!
//! Rules are an ordered list evaluated top to bottom; the first match wins.
//! Ordering matters because `close_door` and `location` can both be present
//! on the same record.

use chrono::{Duration, NaiveDateTime};
use yardcall_core::{Movement, StatusKind, StatusResult};

/// Minutes before the scheduled departure at which a driver must report in
/// the office.
pub const REPORT_OFFICE_LEAD_MINUTES: i64 = 45;

/// Accepted `scheduled_departure` formats, tried in order. The upload side
/// exports ISO-8601 most of the time, but older sheets use day-first
/// European notation.
const DEPARTURE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse a raw scheduled-departure cell into a naive timestamp.
///
/// Returns `None` for empty cells, spreadsheet sentinels (`nan`/`none`/`nat`),
/// and anything that matches no accepted format.
pub fn parse_departure(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() || matches!(s.to_ascii_lowercase().as_str(), "nan" | "none" | "nat") {
        return None;
    }
    let s = s.strip_suffix('Z').unwrap_or(s);

    DEPARTURE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Derive the driver-facing status for a movement at time `now`.
///
/// Deterministic and pure: same movement and same `now` always yield the
/// same result. `report_office_at` is computed whenever the departure
/// parses, independent of which rule fired.
pub fn resolve(movement: &Movement, now: NaiveDateTime) -> StatusResult {
    let departure = movement
        .scheduled_departure
        .as_deref()
        .and_then(parse_departure);
    let report_office_at = departure.map(|d| d - Duration::minutes(REPORT_OFFICE_LEAD_MINUTES));

    let rules = [rule_trailer_ready, rule_connect_trailer, rule_loading_wait];
    let (kind, display_text) = rules
        .iter()
        .find_map(|rule| rule(movement, departure, now))
        .unwrap_or_else(|| {
            // Fallback: departure imminent, past, or unknown. Treating an
            // unknown departure as imminent errs toward the driver reporting in.
            (
                StatusKind::ReportOffice45,
                "Please report in the office!".to_string(),
            )
        });

    StatusResult {
        kind,
        display_text,
        report_office_at,
    }
}

/// Rule 1: door closed and no yard location means the trailer is ready.
fn rule_trailer_ready(
    movement: &Movement,
    _departure: Option<NaiveDateTime>,
    _now: NaiveDateTime,
) -> Option<(StatusKind, String)> {
    if movement.close_door_present() && movement.location_value().is_none() {
        Some((
            StatusKind::ReadyReportOffice,
            "Your trailer is ready, please report in the office for further information!"
                .to_string(),
        ))
    } else {
        None
    }
}

/// Rule 2: a yard location is set (regardless of `close_door`): connect the
/// trailer there and fetch the CMR documents.
fn rule_connect_trailer(
    movement: &Movement,
    _departure: Option<NaiveDateTime>,
    _now: NaiveDateTime,
) -> Option<(StatusKind, String)> {
    let location = movement.location_value()?;
    let text = match movement.trailer_value() {
        Some(trailer) => format!(
            "Please connect the {trailer} trailer on location: {location} \
             and pick up the CMR documents in the office!"
        ),
        None => format!(
            "Please connect the trailer on location: {location} \
             and pick up the CMR documents in the office!"
        ),
    };
    Some((StatusKind::ConnectTrailer, text))
}

/// Rule 3: departure more than the lead time away, still loading.
///
/// The boundary is inclusive on the report-office side: exactly 45 minutes
/// away already means report in.
fn rule_loading_wait(
    movement: &Movement,
    departure: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Option<(StatusKind, String)> {
    if movement.close_door_present() {
        return None;
    }
    let minutes_left = (departure? - now).num_seconds() as f64 / 60.0;
    if minutes_left > REPORT_OFFICE_LEAD_MINUTES as f64 {
        Some((
            StatusKind::LoadingWait,
            "Your trailer is being loaded, please wait!".to_string(),
        ))
    } else {
        None
    }
}
