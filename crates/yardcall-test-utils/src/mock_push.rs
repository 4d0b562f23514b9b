// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock push sender for deterministic testing.
//!
//! `MockPushSender` implements `PushSender` with scriptable failure outcomes
//! and captured successful deliveries for assertion in tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use yardcall_core::error::DeliveryError;
use yardcall_core::traits::PushSender;
use yardcall_core::types::PushEndpoint;

/// One successfully delivered notification, as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDelivery {
    pub endpoint: String,
    pub title: String,
    pub body: String,
}

/// Scripted outcome for an upcoming delivery attempt.
enum ScriptedOutcome {
    Transient,
    Permanent,
}

/// A mock push sender for testing.
///
/// Deliveries succeed and are captured unless a failure has been scripted
/// via `fail_next_transient()` / `fail_next_permanent()`; scripted failures
/// are consumed in order, one per delivery attempt.
pub struct MockPushSender {
    enabled: bool,
    scripted: Mutex<VecDeque<ScriptedOutcome>>,
    delivered: Mutex<Vec<RecordedDelivery>>,
    attempts: Mutex<usize>,
}

impl MockPushSender {
    /// Create an enabled mock whose deliveries all succeed.
    pub fn new() -> Self {
        Self {
            enabled: true,
            scripted: Mutex::new(VecDeque::new()),
            delivered: Mutex::new(Vec::new()),
            attempts: Mutex::new(0),
        }
    }

    /// Create a mock that reports push as not configured.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Script the next delivery attempt to fail transiently.
    pub async fn fail_next_transient(&self) {
        self.scripted.lock().await.push_back(ScriptedOutcome::Transient);
    }

    /// Script the next delivery attempt to fail permanently.
    pub async fn fail_next_permanent(&self) {
        self.scripted.lock().await.push_back(ScriptedOutcome::Permanent);
    }

    /// All successful deliveries, in order.
    pub async fn delivered(&self) -> Vec<RecordedDelivery> {
        self.delivered.lock().await.clone()
    }

    /// Count of successful deliveries.
    pub async fn delivered_count(&self) -> usize {
        self.delivered.lock().await.len()
    }

    /// Count of delivery attempts, including failed ones.
    pub async fn attempt_count(&self) -> usize {
        *self.attempts.lock().await
    }

    /// Clear captured deliveries.
    pub async fn clear_delivered(&self) {
        self.delivered.lock().await.clear();
    }
}

impl Default for MockPushSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushSender for MockPushSender {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn deliver(
        &self,
        endpoint: &PushEndpoint,
        title: &str,
        body: &str,
    ) -> Result<(), DeliveryError> {
        *self.attempts.lock().await += 1;

        if let Some(outcome) = self.scripted.lock().await.pop_front() {
            return Err(match outcome {
                ScriptedOutcome::Transient => {
                    DeliveryError::Transient("scripted transient failure".into())
                }
                ScriptedOutcome::Permanent => {
                    DeliveryError::Permanent("scripted permanent failure".into())
                }
            });
        }

        self.delivered.lock().await.push(RecordedDelivery {
            endpoint: endpoint.endpoint.clone(),
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yardcall_core::types::PushKeys;

    fn endpoint() -> PushEndpoint {
        PushEndpoint {
            endpoint: "https://push.example/send/abc".into(),
            keys: PushKeys::default(),
        }
    }

    #[tokio::test]
    async fn deliver_captures_successful_sends() {
        let sender = MockPushSender::new();
        sender.deliver(&endpoint(), "Status update", "hello").await.unwrap();

        let delivered = sender.delivered().await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].title, "Status update");
        assert_eq!(delivered[0].body, "hello");
        assert_eq!(sender.attempt_count().await, 1);
    }

    #[tokio::test]
    async fn scripted_failures_are_consumed_in_order() {
        let sender = MockPushSender::new();
        sender.fail_next_transient().await;
        sender.fail_next_permanent().await;

        let e1 = sender.deliver(&endpoint(), "t", "b").await.unwrap_err();
        assert!(!e1.is_permanent());
        let e2 = sender.deliver(&endpoint(), "t", "b").await.unwrap_err();
        assert!(e2.is_permanent());

        // Queue exhausted: back to succeeding.
        sender.deliver(&endpoint(), "t", "b").await.unwrap();
        assert_eq!(sender.delivered_count().await, 1);
        assert_eq!(sender.attempt_count().await, 3);
    }

    #[tokio::test]
    async fn disabled_mock_reports_disabled() {
        let sender = MockPushSender::disabled();
        assert!(!sender.is_enabled());
        assert!(MockPushSender::new().is_enabled());
    }
}
