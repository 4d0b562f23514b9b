// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Yardcall service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Yardcall configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct YardcallConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Geofence enforcement settings.
    #[serde(default)]
    pub geofence: GeofenceConfig,

    /// Snapshot upload settings.
    #[serde(default)]
    pub upload: UploadConfig,

    /// Web push delivery settings.
    #[serde(default)]
    pub push: PushConfig,

    /// Notification re-evaluation scheduler settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "yardcall".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Geofence enforcement configuration.
///
/// Defaults describe the QAR Duiven hub with a 30 km radius.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeofenceConfig {
    /// Display name of the hub the fence is centered on.
    #[serde(default = "default_hub_name")]
    pub hub_name: String,

    /// Hub latitude.
    #[serde(default = "default_hub_lat")]
    pub hub_lat: f64,

    /// Hub longitude.
    #[serde(default = "default_hub_lon")]
    pub hub_lon: f64,

    /// Fence radius in kilometers.
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Maximum age of the device-reported location timestamp, in seconds.
    #[serde(default = "default_max_location_age_secs")]
    pub max_location_age_secs: u64,
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            hub_name: default_hub_name(),
            hub_lat: default_hub_lat(),
            hub_lon: default_hub_lon(),
            radius_km: default_radius_km(),
            max_location_age_secs: default_max_location_age_secs(),
        }
    }
}

fn default_hub_name() -> String {
    "QAR Duiven".to_string()
}

fn default_hub_lat() -> f64 {
    51.9672245
}

fn default_hub_lon() -> f64 {
    6.0205411
}

fn default_radius_km() -> f64 {
    30.0
}

fn default_max_location_age_secs() -> u64 {
    120
}

/// Snapshot upload configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// Shared secret required for snapshot uploads. `None` disables uploads.
    #[serde(default)]
    pub secret: Option<String>,
}

/// Web push delivery configuration.
///
/// Push is enabled only when both the public key and the authorization
/// material are configured. The authorization value is opaque to the
/// service; it is handed to the push service verbatim.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PushConfig {
    /// VAPID public key, served to browsers for subscription.
    #[serde(default)]
    pub vapid_public_key: Option<String>,

    /// VAPID subject claim (contact URI).
    #[serde(default = "default_vapid_subject")]
    pub vapid_subject: String,

    /// Opaque authorization header value for push service requests.
    #[serde(default)]
    pub authorization: Option<String>,

    /// TTL for queued push messages, in seconds.
    #[serde(default = "default_push_ttl_secs")]
    pub ttl_secs: u32,
}

impl PushConfig {
    /// Whether push delivery is fully configured.
    pub fn enabled(&self) -> bool {
        self.vapid_public_key.is_some() && self.authorization.is_some()
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            vapid_public_key: None,
            vapid_subject: default_vapid_subject(),
            authorization: None,
            ttl_secs: default_push_ttl_secs(),
        }
    }
}

fn default_vapid_subject() -> String {
    "mailto:admin@example.com".to_string()
}

fn default_push_ttl_secs() -> u32 {
    3600
}

/// Notification re-evaluation scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Seconds between re-evaluation sweeps. The sweep interval is also the
    /// implicit retry policy for transient delivery failures.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = YardcallConfig::default();
        assert_eq!(config.service.name, "yardcall");
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.geofence.hub_name, "QAR Duiven");
        assert_eq!(config.geofence.radius_km, 30.0);
        assert_eq!(config.geofence.max_location_age_secs, 120);
        assert_eq!(config.scheduler.poll_interval_secs, 60);
        assert!(config.upload.secret.is_none());
        assert!(!config.push.enabled());
    }

    #[test]
    fn push_enabled_requires_both_key_and_authorization() {
        let mut push = PushConfig::default();
        assert!(!push.enabled());
        push.vapid_public_key = Some("pk".into());
        assert!(!push.enabled());
        push.authorization = Some("vapid t=...,k=...".into());
        assert!(push.enabled());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let toml_str = r#"
[geofence]
raduis_km = 25.0
"#;
        assert!(toml::from_str::<YardcallConfig>(toml_str).is_err());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let toml_str = r#"
[server]
port = 9000

[scheduler]
poll_interval_secs = 15
"#;
        let config: YardcallConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.scheduler.poll_interval_secs, 15);
        assert_eq!(config.geofence.radius_km, 30.0);
    }
}
