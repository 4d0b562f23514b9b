// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `yardcall serve` command implementation.
//!
//! Wires the snapshot store, subscription registry, push sender, and
//! notification sweeper together, starts the HTTP gateway, and runs until
//! a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use yardcall_config::YardcallConfig;
use yardcall_core::{PushSender, YardcallError};
use yardcall_engine::{SnapshotStore, StatusSweeper, SubscriptionRegistry};
use yardcall_gateway::GatewayState;
use yardcall_webpush::HttpPushSender;

use crate::shutdown;

/// Runs the `yardcall serve` command.
///
/// The notification sweep only runs when push is fully configured; without
/// it the service still answers status lookups, it just never pushes.
pub async fn run_serve(config: YardcallConfig) -> Result<(), YardcallError> {
    init_tracing(&config.service.log_level);

    info!(
        hub = config.geofence.hub_name.as_str(),
        "starting yardcall serve"
    );

    let store = Arc::new(SnapshotStore::new());
    let registry = Arc::new(SubscriptionRegistry::new());
    let sender: Arc<dyn PushSender> = Arc::new(HttpPushSender::new(config.push.clone())?);
    let sweeper = Arc::new(StatusSweeper::new(
        store.clone(),
        registry.clone(),
        sender.clone(),
    ));

    if config.upload.secret.is_none() {
        warn!("no upload secret configured, snapshot uploads are disabled");
    }

    let cancel = shutdown::install_signal_handler();

    // Spawn the periodic sweep when push is configured.
    if sender.is_enabled() {
        let sweep_sweeper = sweeper.clone();
        let sweep_cancel = cancel.clone();
        let period = Duration::from_secs(config.scheduler.poll_interval_secs);

        tokio::spawn(async move {
            sweep_sweeper.run(period, sweep_cancel).await;
        });
        info!(
            interval_secs = config.scheduler.poll_interval_secs,
            "notification sweep started"
        );
    } else {
        info!("push not configured, notification sweep disabled");
    }

    let state = GatewayState {
        store,
        registry,
        sweeper,
        sender,
        config: Arc::new(config),
    };

    tokio::select! {
        result = yardcall_gateway::start_server(state) => result?,
        _ = cancel.cancelled() => {
            info!("shutdown signal received, stopping gateway");
        }
    }

    info!("yardcall serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with env filter support.
///
/// `RUST_LOG` takes precedence; otherwise the configured log level applies
/// to yardcall crates and `warn` to everything else.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("yardcall={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
