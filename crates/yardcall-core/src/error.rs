// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Yardcall service.

use thiserror::Error;

/// The primary error type used across Yardcall components.
#[derive(Debug, Error)]
pub enum YardcallError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Gateway errors (bind failure, serve failure, malformed request plumbing).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Push sender errors outside the per-delivery taxonomy (client construction,
    /// payload serialization).
    #[error("push error: {message}")]
    Push {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Outcome of resolving a driver-supplied plate against the current snapshot.
///
/// The three-way contract (found / not found / ambiguous) is the defining
/// edge case of the whole system: an ambiguous plate must never be silently
/// auto-resolved, since delivering another driver's status is a safety issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No movement in the snapshot matches the normalized plate.
    #[error("no movement found for this plate")]
    NotFound,

    /// More than one movement matches the plate. Signals an upstream
    /// data-quality conflict that the office has to resolve.
    #[error("multiple movements found for this plate")]
    Ambiguous,
}

/// Per-delivery failure classification for push notifications.
///
/// Transient failures are retried implicitly on the next scheduler tick;
/// permanent failures prune the subscription from the registry.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Temporary condition (network error, 429, 5xx). Safe to retry.
    #[error("transient delivery failure: {0}")]
    Transient(String),

    /// The endpoint is gone or rejected the message outright (404, 410,
    /// other 4xx). The subscription is dead and must be removed.
    #[error("permanent delivery failure: {0}")]
    Permanent(String),
}

impl DeliveryError {
    /// Whether this failure should prune the subscription.
    pub fn is_permanent(&self) -> bool {
        matches!(self, DeliveryError::Permanent(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_error_variants_are_distinct() {
        assert_ne!(LookupError::NotFound, LookupError::Ambiguous);
    }

    #[test]
    fn delivery_error_classification() {
        assert!(!DeliveryError::Transient("timeout".into()).is_permanent());
        assert!(DeliveryError::Permanent("410 Gone".into()).is_permanent());
    }

    #[test]
    fn error_messages_render() {
        let e = YardcallError::Gateway {
            message: "failed to bind".into(),
            source: None,
        };
        assert!(e.to_string().contains("failed to bind"));
        assert_eq!(
            LookupError::Ambiguous.to_string(),
            "multiple movements found for this plate"
        );
    }
}
