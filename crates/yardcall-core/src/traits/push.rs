// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push sender trait for delivering notifications to browser push endpoints.

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::types::PushEndpoint;

/// Capability to deliver a notification to a push endpoint.
///
/// Implementations own the wire protocol and authorization material; callers
/// only see the three-way delivery outcome (success, transient failure,
/// permanent failure) from [`DeliveryError`].
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Whether push delivery is configured and usable at all.
    ///
    /// When false, the gateway refuses subscribe requests and the scheduler
    /// sweep is not started.
    fn is_enabled(&self) -> bool;

    /// Deliver one notification to one endpoint.
    async fn deliver(
        &self,
        endpoint: &PushEndpoint,
        title: &str,
        body: &str,
    ) -> Result<(), DeliveryError>;
}
