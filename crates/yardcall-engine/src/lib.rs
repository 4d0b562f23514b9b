// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status derivation and notification re-evaluation engine.
//!
//! This crate is the core of Yardcall: it holds the current fleet snapshot,
//! matches driver-supplied plates to movement records, derives the
//! driver-facing status from time-relative and field-presence rules, and
//! periodically re-evaluates every subscription to decide whether a push
//! notification must fire, idempotently: at most once per distinct-kind
//! transition.

pub mod matcher;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod sweeper;

pub use matcher::{find, normalize_plate};
pub use registry::SubscriptionRegistry;
pub use resolver::{parse_departure, resolve, REPORT_OFFICE_LEAD_MINUTES};
pub use store::SnapshotStore;
pub use sweeper::{StatusSweeper, SweepStats};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use yardcall_core::{Movement, Snapshot, StatusKind};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn lookup_then_resolve_end_to_end() {
        let store = SnapshotStore::new();
        store.replace(Snapshot {
            last_update: Some("2024-01-01 10:30".into()),
            movements: vec![Movement {
                license_plate: "AB-12-CD".into(),
                close_door: Some("2024-01-01T10:00".into()),
                location: Some("".into()),
                scheduled_departure: Some("2024-01-01T12:00".into()),
                ..Default::default()
            }],
        });

        let snapshot = store.current();
        let movement = find("ab 12 cd", &snapshot).unwrap();
        let status = resolve(movement, at(11, 0));
        assert_eq!(status.kind, StatusKind::ReadyReportOffice);
        assert_eq!(status.report_office_at, Some(at(11, 15)));
    }
}
