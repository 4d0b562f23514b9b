// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory registry of push subscriptions, keyed by normalized plate.
//!
//! One mutex guards the whole mapping. Expected load is a yard's worth of
//! drivers, so a single mutual-exclusion boundary is sufficient; what
//! matters is that subscribe/unsubscribe never interleave with the
//! scheduler's sweep into an inconsistent partial state. The sweep works on
//! a cloned view from [`SubscriptionRegistry::list`], so the lock is only
//! held during registry access, never across push deliveries.
//!
//! Subscriptions live in memory only and do not survive a restart. That is
//! a documented limitation of the service.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;
use yardcall_core::{PushEndpoint, StatusKind, Subscription};

use crate::matcher::normalize_plate;

/// Registry of recipients awaiting status notifications.
pub struct SubscriptionRegistry {
    by_plate: Mutex<HashMap<String, Vec<Subscription>>>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            by_plate: Mutex::new(HashMap::new()),
        }
    }

    /// Upsert a subscription for a plate.
    ///
    /// The endpoint URL is the identity: re-subscribing with a known endpoint
    /// replaces the registration but keeps its dedup watermark, so a page
    /// refresh does not re-trigger the last notification. Returns the number
    /// of subscriptions now held for the plate.
    pub async fn subscribe(&self, plate: &str, endpoint: PushEndpoint) -> usize {
        let plate = normalize_plate(plate);
        let mut map = self.by_plate.lock().await;
        let subs = map.entry(plate.clone()).or_default();

        let watermark = subs
            .iter()
            .find(|s| s.endpoint.endpoint == endpoint.endpoint)
            .and_then(|s| s.last_notified_kind);
        subs.retain(|s| s.endpoint.endpoint != endpoint.endpoint);
        subs.push(Subscription {
            plate: plate.clone(),
            endpoint,
            last_notified_kind: watermark,
        });

        debug!(plate = plate.as_str(), count = subs.len(), "subscription upserted");
        subs.len()
    }

    /// Remove the subscription with the given endpoint URL for a plate.
    ///
    /// Used both by the unsubscribe endpoint and by the scheduler when a
    /// delivery fails permanently. Returns whether anything was removed.
    pub async fn unsubscribe(&self, plate: &str, endpoint_url: &str) -> bool {
        let plate = normalize_plate(plate);
        let mut map = self.by_plate.lock().await;
        let Some(subs) = map.get_mut(&plate) else {
            return false;
        };
        let before = subs.len();
        subs.retain(|s| s.endpoint.endpoint != endpoint_url);
        let removed = subs.len() < before;
        if subs.is_empty() {
            map.remove(&plate);
        }
        if removed {
            debug!(plate = plate.as_str(), "subscription removed");
        }
        removed
    }

    /// A cloned view of every subscription, for the scheduler's sweep.
    pub async fn list(&self) -> Vec<Subscription> {
        self.by_plate
            .lock()
            .await
            .values()
            .flat_map(|subs| subs.iter().cloned())
            .collect()
    }

    /// Advance the dedup watermark after a successful delivery.
    ///
    /// A no-op when the subscription was removed between the sweep's read
    /// and the delivery completing.
    pub async fn record_notified(&self, plate: &str, endpoint_url: &str, kind: StatusKind) {
        let plate = normalize_plate(plate);
        let mut map = self.by_plate.lock().await;
        if let Some(subs) = map.get_mut(&plate)
            && let Some(sub) = subs.iter_mut().find(|s| s.endpoint.endpoint == endpoint_url)
        {
            sub.last_notified_kind = Some(kind);
        }
    }

    /// Total number of registered subscriptions.
    pub async fn len(&self) -> usize {
        self.by_plate.lock().await.values().map(Vec::len).sum()
    }

    /// Whether the registry holds no subscriptions.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
