// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as coordinate ranges and the push all-or-nothing rule.

use crate::diagnostic::ConfigError;
use crate::model::YardcallConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &YardcallConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must be nonzero".to_string(),
        });
    }

    if !(-90.0..=90.0).contains(&config.geofence.hub_lat) {
        errors.push(ConfigError::Validation {
            message: format!(
                "geofence.hub_lat must be within [-90, 90], got {}",
                config.geofence.hub_lat
            ),
        });
    }

    if !(-180.0..=180.0).contains(&config.geofence.hub_lon) {
        errors.push(ConfigError::Validation {
            message: format!(
                "geofence.hub_lon must be within [-180, 180], got {}",
                config.geofence.hub_lon
            ),
        });
    }

    if config.geofence.radius_km <= 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "geofence.radius_km must be positive, got {}",
                config.geofence.radius_km
            ),
        });
    }

    if config.geofence.max_location_age_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "geofence.max_location_age_secs must be at least 1".to_string(),
        });
    }

    if let Some(secret) = &config.upload.secret
        && secret.len() < 8
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "upload.secret must be at least 8 characters, got {}",
                secret.len()
            ),
        });
    }

    // Push config is all-or-nothing: a public key without authorization
    // material (or the reverse) is a half-configured deployment.
    let has_key = config.push.vapid_public_key.is_some();
    let has_auth = config.push.authorization.is_some();
    if has_key != has_auth {
        errors.push(ConfigError::Validation {
            message: "push.vapid_public_key and push.authorization must be set together"
                .to_string(),
        });
    }

    if config.scheduler.poll_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.poll_interval_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = YardcallConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_port_fails_validation() {
        let mut config = YardcallConfig::default();
        config.server.port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("port"))));
    }

    #[test]
    fn out_of_range_latitude_fails_validation() {
        let mut config = YardcallConfig::default();
        config.geofence.hub_lat = 123.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("hub_lat"))));
    }

    #[test]
    fn short_upload_secret_fails_validation() {
        let mut config = YardcallConfig::default();
        config.upload.secret = Some("short".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("secret"))));
    }

    #[test]
    fn half_configured_push_fails_validation() {
        let mut config = YardcallConfig::default();
        config.push.vapid_public_key = Some("BP....".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("set together"))
        ));
    }

    #[test]
    fn zero_poll_interval_fails_validation() {
        let mut config = YardcallConfig::default();
        config.scheduler.poll_interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("poll_interval"))
        ));
    }

    #[test]
    fn fully_configured_push_passes() {
        let mut config = YardcallConfig::default();
        config.push.vapid_public_key = Some("BP....".to_string());
        config.push.authorization = Some("vapid t=a,k=b".to_string());
        config.upload.secret = Some("longenough".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
