// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic notification re-evaluation sweep.
//!
//! The [`StatusSweeper`] re-resolves the status of every subscribed plate on
//! a fixed interval and delivers a push when the resolved kind is notifiable
//! and differs from the subscription's dedup watermark. The periodic sweep is
//! what lets a purely time-driven transition (crossing the 45-minute
//! boundary) trigger a push with no new upload.
//!
//! Each subscription is an isolated unit of work: a failure resolving or
//! delivering one never aborts the sweep of the others. The registry lock is
//! held only while reading the subscription list and recording outcomes,
//! never across deliveries.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use yardcall_core::{PushSender, Snapshot, Subscription};

use crate::matcher;
use crate::registry::SubscriptionRegistry;
use crate::resolver;
use crate::store::SnapshotStore;

/// Title used for every status push.
const NOTIFICATION_TITLE: &str = "Status update";

/// Aggregate outcome of one sweep, for logging and metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Subscriptions examined this sweep.
    pub evaluated: usize,
    /// Plate not found or ambiguous in the current snapshot.
    pub skipped: usize,
    /// Kind not notifiable or already delivered.
    pub unchanged: usize,
    /// Pushes delivered and recorded.
    pub delivered: usize,
    /// Subscriptions removed after a permanent delivery failure.
    pub pruned: usize,
    /// Transient delivery failures, retried implicitly next sweep.
    pub transient_failures: usize,
}

/// Per-subscription evaluation outcome.
enum Outcome {
    Skipped,
    Unchanged,
    Delivered,
    Pruned,
    Transient,
}

/// Re-evaluates statuses for all subscriptions and triggers push delivery.
pub struct StatusSweeper {
    store: Arc<SnapshotStore>,
    registry: Arc<SubscriptionRegistry>,
    sender: Arc<dyn PushSender>,
}

impl StatusSweeper {
    /// Create a sweeper over the shared store, registry, and push sender.
    pub fn new(
        store: Arc<SnapshotStore>,
        registry: Arc<SubscriptionRegistry>,
        sender: Arc<dyn PushSender>,
    ) -> Self {
        Self {
            store,
            registry,
            sender,
        }
    }

    /// Run one sweep using the wall clock.
    pub async fn sweep_once(&self) -> SweepStats {
        self.sweep_at(chrono::Local::now().naive_local()).await
    }

    /// Run one sweep with an explicit `now`, shared by every evaluation in
    /// the sweep.
    pub async fn sweep_at(&self, now: NaiveDateTime) -> SweepStats {
        if !self.sender.is_enabled() {
            return SweepStats::default();
        }

        let snapshot = self.store.current();
        let subscriptions = self.registry.list().await;

        let units = subscriptions
            .into_iter()
            .map(|sub| self.evaluate(&snapshot, sub, now));
        let outcomes = futures::future::join_all(units).await;

        let mut stats = SweepStats {
            evaluated: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Skipped => stats.skipped += 1,
                Outcome::Unchanged => stats.unchanged += 1,
                Outcome::Delivered => stats.delivered += 1,
                Outcome::Pruned => stats.pruned += 1,
                Outcome::Transient => stats.transient_failures += 1,
            }
        }

        metrics::counter!("yardcall_sweeps_total").increment(1);
        metrics::counter!("yardcall_pushes_delivered_total").increment(stats.delivered as u64);
        metrics::counter!("yardcall_subscriptions_pruned_total").increment(stats.pruned as u64);

        stats
    }

    /// Evaluate one subscription: match, resolve, and deliver if warranted.
    async fn evaluate(
        &self,
        snapshot: &Snapshot,
        sub: Subscription,
        now: NaiveDateTime,
    ) -> Outcome {
        let movement = match matcher::find(&sub.plate, snapshot) {
            Ok(m) => m,
            // Not found or ambiguous: the vehicle may simply not be in the
            // latest snapshot yet. No notification, no state change.
            Err(e) => {
                debug!(plate = sub.plate.as_str(), reason = %e, "sweep skipping subscription");
                return Outcome::Skipped;
            }
        };

        let status = resolver::resolve(movement, now);
        if !status.kind.is_notifiable() || sub.last_notified_kind == Some(status.kind) {
            return Outcome::Unchanged;
        }

        match self
            .sender
            .deliver(&sub.endpoint, NOTIFICATION_TITLE, &status.display_text)
            .await
        {
            Ok(()) => {
                self.registry
                    .record_notified(&sub.plate, &sub.endpoint.endpoint, status.kind)
                    .await;
                info!(
                    plate = sub.plate.as_str(),
                    kind = %status.kind,
                    "status push delivered"
                );
                Outcome::Delivered
            }
            Err(e) if e.is_permanent() => {
                warn!(
                    plate = sub.plate.as_str(),
                    error = %e,
                    "push endpoint gone, removing subscription"
                );
                self.registry
                    .unsubscribe(&sub.plate, &sub.endpoint.endpoint)
                    .await;
                Outcome::Pruned
            }
            Err(e) => {
                // The sweep interval is the retry policy; no separate backoff.
                debug!(
                    plate = sub.plate.as_str(),
                    error = %e,
                    "transient push failure, retrying next sweep"
                );
                Outcome::Transient
            }
        }
    }

    /// Run the sweep on a fixed period until cancelled.
    pub async fn run(&self, period: std::time::Duration, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(period);
        // Skip the first immediate tick.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let stats = self.sweep_once().await;
                    if stats.delivered > 0 || stats.pruned > 0 {
                        info!(
                            evaluated = stats.evaluated,
                            delivered = stats.delivered,
                            pruned = stats.pruned,
                            "notification sweep completed"
                        );
                    } else {
                        debug!(evaluated = stats.evaluated, "notification sweep completed");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("notification sweep shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use yardcall_core::{Movement, PushEndpoint, PushKeys};
    use yardcall_test_utils::MockPushSender;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn endpoint(url: &str) -> PushEndpoint {
        PushEndpoint {
            endpoint: url.to_string(),
            keys: PushKeys::default(),
        }
    }

    fn ready_movement(plate: &str) -> Movement {
        Movement {
            license_plate: plate.to_string(),
            close_door: Some("2024-01-01T10:00".into()),
            ..Default::default()
        }
    }

    fn snapshot(movements: Vec<Movement>) -> Snapshot {
        Snapshot {
            last_update: Some("2024-01-01 09:00".into()),
            movements,
        }
    }

    struct Fixture {
        store: Arc<SnapshotStore>,
        registry: Arc<SubscriptionRegistry>,
        sender: Arc<MockPushSender>,
        sweeper: StatusSweeper,
    }

    fn fixture(sender: MockPushSender) -> Fixture {
        let store = Arc::new(SnapshotStore::new());
        let registry = Arc::new(SubscriptionRegistry::new());
        let sender = Arc::new(sender);
        let sweeper = StatusSweeper::new(store.clone(), registry.clone(), sender.clone());
        Fixture {
            store,
            registry,
            sender,
            sweeper,
        }
    }

    #[tokio::test]
    async fn first_notifiable_resolution_fires_once() {
        let f = fixture(MockPushSender::new());
        f.store.replace(snapshot(vec![ready_movement("AB-12-CD")]));
        f.registry.subscribe("AB12CD", endpoint("https://push/1")).await;

        let stats = f.sweeper.sweep_at(at(11, 0)).await;
        assert_eq!(stats.delivered, 1);

        // Same condition again: dedup watermark suppresses the repeat.
        let stats = f.sweeper.sweep_at(at(11, 1)).await;
        assert_eq!(stats.delivered, 0);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(f.sender.delivered_count().await, 1);
    }

    #[tokio::test]
    async fn kind_change_fires_exactly_one_more_delivery() {
        let f = fixture(MockPushSender::new());
        f.store.replace(snapshot(vec![ready_movement("AB-12-CD")]));
        f.registry.subscribe("AB12CD", endpoint("https://push/1")).await;
        f.sweeper.sweep_at(at(11, 0)).await;

        // New upload moves the trailer onto a yard location.
        let mut moved = ready_movement("AB-12-CD");
        moved.location = Some("D14".into());
        f.store.replace(snapshot(vec![moved]));

        let stats = f.sweeper.sweep_at(at(11, 5)).await;
        assert_eq!(stats.delivered, 1);

        let deliveries = f.sender.delivered().await;
        assert_eq!(deliveries.len(), 2);
        assert!(deliveries[1].body.contains("D14"));
    }

    #[tokio::test]
    async fn loading_wait_is_never_pushed() {
        let f = fixture(MockPushSender::new());
        let m = Movement {
            license_plate: "AB-12-CD".into(),
            scheduled_departure: Some("2024-01-01T13:00".into()),
            ..Default::default()
        };
        f.store.replace(snapshot(vec![m]));
        f.registry.subscribe("AB12CD", endpoint("https://push/1")).await;

        // Two hours before departure: still loading, informational only.
        let stats = f.sweeper.sweep_at(at(11, 0)).await;
        assert_eq!(stats.delivered, 0);
        assert_eq!(stats.unchanged, 1);
    }

    #[tokio::test]
    async fn crossing_the_45_minute_boundary_fires_without_an_upload() {
        let f = fixture(MockPushSender::new());
        let m = Movement {
            license_plate: "AB-12-CD".into(),
            scheduled_departure: Some("2024-01-01T12:00".into()),
            ..Default::default()
        };
        f.store.replace(snapshot(vec![m]));
        f.registry.subscribe("AB12CD", endpoint("https://push/1")).await;

        // 50 minutes out: LoadingWait, nothing pushed.
        assert_eq!(f.sweeper.sweep_at(at(11, 10)).await.delivered, 0);

        // 40 minutes out: same snapshot, time alone crossed the boundary.
        let stats = f.sweeper.sweep_at(at(11, 20)).await;
        assert_eq!(stats.delivered, 1);
        let deliveries = f.sender.delivered().await;
        assert_eq!(deliveries[0].body, "Please report in the office!");
    }

    #[tokio::test]
    async fn absent_plate_is_skipped_without_state_change() {
        let f = fixture(MockPushSender::new());
        f.store.replace(snapshot(vec![ready_movement("EF-34-GH")]));
        f.registry.subscribe("AB12CD", endpoint("https://push/1")).await;

        let stats = f.sweeper.sweep_at(at(11, 0)).await;
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.delivered, 0);

        let subs = f.registry.list().await;
        assert_eq!(subs.len(), 1);
        assert!(subs[0].last_notified_kind.is_none());
    }

    #[tokio::test]
    async fn ambiguous_plate_is_skipped() {
        let f = fixture(MockPushSender::new());
        f.store.replace(snapshot(vec![
            ready_movement("XY-99-ZZ"),
            ready_movement("XY 99 ZZ"),
        ]));
        f.registry.subscribe("XY99ZZ", endpoint("https://push/1")).await;

        let stats = f.sweeper.sweep_at(at(11, 0)).await;
        assert_eq!(stats.skipped, 1);
        assert_eq!(f.sender.delivered_count().await, 0);
    }

    #[tokio::test]
    async fn permanent_failure_prunes_the_subscription() {
        let sender = MockPushSender::new();
        sender.fail_next_permanent().await;
        let f = fixture(sender);
        f.store.replace(snapshot(vec![ready_movement("AB-12-CD")]));
        f.registry.subscribe("AB12CD", endpoint("https://push/dead")).await;

        let stats = f.sweeper.sweep_at(at(11, 0)).await;
        assert_eq!(stats.pruned, 1);
        assert!(f.registry.is_empty().await);
    }

    #[tokio::test]
    async fn transient_failure_retries_on_the_next_sweep() {
        let sender = MockPushSender::new();
        sender.fail_next_transient().await;
        let f = fixture(sender);
        f.store.replace(snapshot(vec![ready_movement("AB-12-CD")]));
        f.registry.subscribe("AB12CD", endpoint("https://push/1")).await;

        let stats = f.sweeper.sweep_at(at(11, 0)).await;
        assert_eq!(stats.transient_failures, 1);
        assert_eq!(f.registry.len().await, 1);

        // Next tick: scripted failure consumed, delivery succeeds.
        let stats = f.sweeper.sweep_at(at(11, 1)).await;
        assert_eq!(stats.delivered, 1);
        assert_eq!(f.sender.delivered_count().await, 1);
    }

    #[tokio::test]
    async fn one_failing_delivery_does_not_abort_the_rest() {
        let sender = MockPushSender::new();
        sender.fail_next_permanent().await;
        let f = fixture(sender);
        f.store.replace(snapshot(vec![
            ready_movement("AB-12-CD"),
            ready_movement("EF-34-GH"),
        ]));
        f.registry.subscribe("AB12CD", endpoint("https://push/dead")).await;
        f.registry.subscribe("EF34GH", endpoint("https://push/2")).await;

        let stats = f.sweeper.sweep_at(at(11, 0)).await;
        assert_eq!(stats.evaluated, 2);
        assert_eq!(stats.delivered + stats.pruned, 2);
        assert_eq!(f.registry.len().await, 1);
    }

    #[tokio::test]
    async fn disabled_sender_makes_the_sweep_a_noop() {
        let f = fixture(MockPushSender::disabled());
        f.store.replace(snapshot(vec![ready_movement("AB-12-CD")]));
        f.registry.subscribe("AB12CD", endpoint("https://push/1")).await;

        let stats = f.sweeper.sweep_at(at(11, 0)).await;
        assert_eq!(stats, SweepStats::default());
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let f = fixture(MockPushSender::new());
        let cancel = CancellationToken::new();
        let sweeper = Arc::new(f.sweeper);

        let handle = {
            let sweeper = sweeper.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                sweeper
                    .run(std::time::Duration::from_secs(60), cancel)
                    .await;
            })
        };

        cancel.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(2), handle)
            .await
            .expect("run should stop promptly after cancellation")
            .unwrap();
    }
}
