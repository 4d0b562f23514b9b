// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test doubles for the Yardcall workspace.

pub mod mock_push;

pub use mock_push::{MockPushSender, RecordedDelivery};
