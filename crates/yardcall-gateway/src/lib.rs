// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Yardcall driver status service.
//!
//! The gateway is a thin surface over the engine: it enforces the geofence,
//! maps the three-way plate lookup onto response codes, and accepts snapshot
//! uploads and push subscription changes. All status semantics live in
//! `yardcall-engine`; nothing here resolves a status on its own.

pub mod geofence;
pub mod handlers;
pub mod server;

pub use server::{router, start_server, GatewayState};
