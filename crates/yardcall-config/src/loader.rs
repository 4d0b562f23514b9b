// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./yardcall.toml` > `~/.config/yardcall/yardcall.toml`
//! > `/etc/yardcall/yardcall.toml` with environment variable overrides via the
//! `YARDCALL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::YardcallConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/yardcall/yardcall.toml` (system-wide)
/// 3. `~/.config/yardcall/yardcall.toml` (user XDG config)
/// 4. `./yardcall.toml` (local directory)
/// 5. `YARDCALL_*` environment variables
pub fn load_config() -> Result<YardcallConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(YardcallConfig::default()))
        .merge(Toml::file("/etc/yardcall/yardcall.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("yardcall/yardcall.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("yardcall.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<YardcallConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(YardcallConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<YardcallConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(YardcallConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `YARDCALL_PUSH_VAPID_PUBLIC_KEY` must map
/// to `push.vapid_public_key`, not `push.vapid.public.key`.
fn env_provider() -> Env {
    Env::prefixed("YARDCALL_").map(|key| {
        // Figment hands over the prefix-stripped key in its original case,
        // so lowercase before the section replacements can match.
        // Example: YARDCALL_GEOFENCE_RADIUS_KM -> "geofence_radius_km"
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("server_", "server.", 1)
            .replacen("geofence_", "geofence.", 1)
            .replacen("upload_", "upload.", 1)
            .replacen("push_", "push.", 1)
            .replacen("scheduler_", "scheduler.", 1);
        mapped.into()
    })
}
