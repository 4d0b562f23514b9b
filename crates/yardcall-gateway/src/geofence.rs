// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Geofence enforcement for driver-facing requests.
//!
//! Lookup and subscribe calls carry the device's reported position and a
//! capture timestamp. Requests are refused when the timestamp is stale or
//! the position lies outside the configured radius around the hub. This is
//! an enforcement point only; the engine never sees geography.

use serde::Serialize;
use yardcall_config::model::GeofenceConfig;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Successful geofence check, echoed back to the driver page.
#[derive(Debug, Clone, Serialize)]
pub struct GeofenceReport {
    /// Hub the fence is centered on.
    pub hub_name: String,
    /// Distance from the device to the hub, in kilometers.
    pub distance_km: f64,
    /// Configured fence radius, in kilometers.
    pub radius_km: f64,
}

/// Why a geofence check refused the request.
#[derive(Debug, Clone, PartialEq)]
pub enum GeofenceError {
    /// The device-reported timestamp is older than the freshness window.
    StaleTimestamp,
    /// The device is outside the fence.
    OutsideRadius { radius_km: f64, hub_name: String },
}

/// Great-circle distance between two points, via the haversine formula.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Check a device position against the configured fence.
///
/// `ts` is the device-reported capture time and `now` the server clock,
/// both in Unix epoch seconds. The staleness window guards against replayed
/// coordinates from an earlier, in-fence visit.
pub fn check(
    config: &GeofenceConfig,
    lat: f64,
    lon: f64,
    ts: i64,
    now: i64,
) -> Result<GeofenceReport, GeofenceError> {
    if (now - ts).unsigned_abs() > config.max_location_age_secs {
        return Err(GeofenceError::StaleTimestamp);
    }

    let distance_km = haversine_km(lat, lon, config.hub_lat, config.hub_lon);
    if distance_km > config.radius_km {
        return Err(GeofenceError::OutsideRadius {
            radius_km: config.radius_km,
            hub_name: config.hub_name.clone(),
        });
    }

    Ok(GeofenceReport {
        hub_name: config.hub_name.clone(),
        distance_km,
        radius_km: config.radius_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeofenceConfig {
        GeofenceConfig::default()
    }

    #[test]
    fn haversine_matches_known_distance() {
        // Duiven hub to Amsterdam Centraal, roughly 89 km great-circle.
        let d = haversine_km(51.9672245, 6.0205411, 52.3791, 4.9003);
        assert!((85.0..95.0).contains(&d), "got {d}");
    }

    #[test]
    fn position_at_hub_passes() {
        let report = check(&config(), 51.9672245, 6.0205411, 1_700_000_000, 1_700_000_000)
            .unwrap();
        assert!(report.distance_km < 0.001);
        assert_eq!(report.radius_km, 30.0);
        assert_eq!(report.hub_name, "QAR Duiven");
    }

    #[test]
    fn nearby_position_passes() {
        // Arnhem station, ~11 km from the hub.
        let report =
            check(&config(), 51.9851, 5.8987, 1_700_000_000, 1_700_000_030).unwrap();
        assert!(report.distance_km < 30.0);
    }

    #[test]
    fn faraway_position_is_refused() {
        // Amsterdam is well outside the 30 km fence.
        let err = check(&config(), 52.3791, 4.9003, 1_700_000_000, 1_700_000_000).unwrap_err();
        assert!(matches!(err, GeofenceError::OutsideRadius { .. }));
    }

    #[test]
    fn stale_timestamp_is_refused() {
        let err = check(
            &config(),
            51.9672245,
            6.0205411,
            1_700_000_000,
            1_700_000_000 + 121,
        )
        .unwrap_err();
        assert_eq!(err, GeofenceError::StaleTimestamp);
    }

    #[test]
    fn timestamp_from_the_future_is_refused_symmetrically() {
        let err = check(
            &config(),
            51.9672245,
            6.0205411,
            1_700_000_000 + 500,
            1_700_000_000,
        )
        .unwrap_err();
        assert_eq!(err, GeofenceError::StaleTimestamp);
    }

    #[test]
    fn age_boundary_is_inclusive() {
        // Exactly at the freshness window still passes.
        assert!(check(
            &config(),
            51.9672245,
            6.0205411,
            1_700_000_000,
            1_700_000_000 + 120
        )
        .is_ok());
    }
}
