// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Yardcall driver status service.
//!
//! This crate provides the shared domain types, error taxonomy, and the
//! push sender trait used throughout the Yardcall workspace. The engine,
//! gateway, and push crates all build on the definitions here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{DeliveryError, LookupError, YardcallError};
pub use traits::PushSender;
pub use types::{
    Movement, PushEndpoint, PushKeys, Snapshot, StatusKind, StatusResult, Subscription,
};
