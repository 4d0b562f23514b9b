// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide holder of the latest uploaded fleet snapshot.
//!
//! Snapshots are replaced wholesale on upload. Readers (lookup handlers and
//! the scheduler sweep) always observe one consistent snapshot: `ArcSwap`
//! makes the replacement atomic, so a reader can never see a mix of an old
//! and a new snapshot's movements.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;
use yardcall_core::Snapshot;

/// Holds the current snapshot behind an atomic pointer swap.
///
/// Before the first upload, readers observe the empty sentinel snapshot.
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
}

impl SnapshotStore {
    /// Create a store holding the empty sentinel.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::empty()),
        }
    }

    /// Atomically replace the current snapshot.
    pub fn replace(&self, snapshot: Snapshot) {
        info!(
            movements = snapshot.movements.len(),
            last_update = snapshot.last_update.as_deref().unwrap_or("-"),
            "snapshot replaced"
        );
        self.current.store(Arc::new(snapshot));
    }

    /// The latest snapshot. Cheap to call; holds no lock.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Whether any snapshot has been uploaded yet.
    pub fn is_loaded(&self) -> bool {
        !self.current.load().movements.is_empty()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yardcall_core::Movement;

    fn snapshot_with_plates(plates: &[&str]) -> Snapshot {
        Snapshot {
            last_update: Some("2024-01-01 09:00".into()),
            movements: plates
                .iter()
                .map(|p| Movement {
                    license_plate: p.to_string(),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn starts_with_empty_sentinel() {
        let store = SnapshotStore::new();
        assert!(!store.is_loaded());
        assert!(store.current().movements.is_empty());
        assert!(store.current().last_update.is_none());
    }

    #[test]
    fn replace_swaps_wholesale() {
        let store = SnapshotStore::new();
        store.replace(snapshot_with_plates(&["AB-12-CD", "EF-34-GH"]));
        assert_eq!(store.current().movements.len(), 2);

        // A second upload replaces, never merges.
        store.replace(snapshot_with_plates(&["XY-99-ZZ"]));
        let current = store.current();
        assert_eq!(current.movements.len(), 1);
        assert_eq!(current.movements[0].license_plate, "XY-99-ZZ");
    }

    #[test]
    fn readers_keep_their_snapshot_across_replacement() {
        let store = SnapshotStore::new();
        store.replace(snapshot_with_plates(&["AB-12-CD"]));

        let held = store.current();
        store.replace(snapshot_with_plates(&["XY-99-ZZ", "QQ-00-QQ"]));

        // The reader that loaded before the replacement still sees the old
        // batch in full; new readers see the new one.
        assert_eq!(held.movements.len(), 1);
        assert_eq!(store.current().movements.len(), 2);
    }
}
