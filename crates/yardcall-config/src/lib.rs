// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Yardcall service.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and miette diagnostic rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use yardcall_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("hub: {}", config.geofence.hub_name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::YardcallConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to miette diagnostics with typo suggestions
///
/// Returns either a valid `YardcallConfig` or a list of diagnostic errors.
pub fn load_and_validate() -> Result<YardcallConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<YardcallConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_str_rejects_semantic_errors() {
        let errors = load_and_validate_str(
            r#"
[scheduler]
poll_interval_secs = 0
"#,
        )
        .unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn validate_str_accepts_complete_config() {
        let config = load_and_validate_str(
            r#"
[server]
host = "0.0.0.0"
port = 8080

[upload]
secret = "change-me-please"

[push]
vapid_public_key = "BP...."
authorization = "vapid t=a,k=b"
"#,
        )
        .unwrap();
        assert!(config.push.enabled());
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
