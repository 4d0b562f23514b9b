// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web push delivery adapter for Yardcall.
//!
//! Implements [`PushSender`] by POSTing the notification payload to the
//! subscription's push service endpoint. VAPID authorization material is
//! opaque configuration handed to the push service verbatim; this crate
//! performs no signing or key handling of its own.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use yardcall_config::model::PushConfig;
use yardcall_core::error::{DeliveryError, YardcallError};
use yardcall_core::traits::PushSender;
use yardcall_core::types::PushEndpoint;

/// Request timeout for push service calls. Deliveries run inside the
/// scheduler sweep, so a hung push service must not stall a tick.
const DELIVER_TIMEOUT: Duration = Duration::from_secs(10);

/// Push sender delivering over HTTP to browser push service endpoints.
pub struct HttpPushSender {
    client: reqwest::Client,
    config: PushConfig,
}

impl HttpPushSender {
    /// Creates a new sender from push configuration.
    ///
    /// Construction succeeds even when push is not configured; the sender
    /// then reports itself as disabled and the scheduler stays idle.
    pub fn new(config: PushConfig) -> Result<Self, YardcallError> {
        let client = reqwest::Client::builder()
            .timeout(DELIVER_TIMEOUT)
            .build()
            .map_err(|e| YardcallError::Push {
                message: format!("failed to build push HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, config })
    }

    /// Classify a push service response status into a delivery outcome.
    ///
    /// `404`/`410` mean the endpoint is gone (browser unsubscribed or the
    /// registration expired); `429` and `5xx` are worth retrying on the next
    /// sweep; any other rejection is treated as permanent.
    fn classify_status(status: reqwest::StatusCode) -> Result<(), DeliveryError> {
        if status.is_success() {
            return Ok(());
        }
        match status.as_u16() {
            404 | 410 => Err(DeliveryError::Permanent(format!(
                "endpoint gone ({status})"
            ))),
            429 => Err(DeliveryError::Transient("rate limited (429)".into())),
            s if status.is_server_error() => {
                Err(DeliveryError::Transient(format!("push service error ({s})")))
            }
            _ => Err(DeliveryError::Permanent(format!(
                "push service rejected message ({status})"
            ))),
        }
    }
}

#[async_trait]
impl PushSender for HttpPushSender {
    fn is_enabled(&self) -> bool {
        self.config.enabled()
    }

    async fn deliver(
        &self,
        endpoint: &PushEndpoint,
        title: &str,
        body: &str,
    ) -> Result<(), DeliveryError> {
        let payload = serde_json::json!({ "title": title, "body": body }).to_string();

        let mut request = self
            .client
            .post(&endpoint.endpoint)
            .header("TTL", self.config.ttl_secs)
            .header("Content-Type", "application/json")
            .body(payload);
        if let Some(authorization) = &self.config.authorization {
            request = request.header("Authorization", authorization.clone());
        }

        let response = request.send().await.map_err(|e| {
            // Connect errors and timeouts are the push service's bad day,
            // not the subscription's.
            DeliveryError::Transient(format!("push request failed: {e}"))
        })?;

        let status = response.status();
        match Self::classify_status(status) {
            Ok(()) => {
                metrics::counter!("yardcall_push_requests_total", "outcome" => "ok").increment(1);
                debug!(status = status.as_u16(), "push accepted by service");
                Ok(())
            }
            Err(e) => {
                let outcome = if e.is_permanent() { "permanent" } else { "transient" };
                metrics::counter!("yardcall_push_requests_total", "outcome" => outcome)
                    .increment(1);
                warn!(status = status.as_u16(), outcome, "push rejected by service");
                Err(e)
            }
        }
    }
}
