// SPDX-FileCopyrightText: 2026 Yardcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plate matching against the current snapshot.
//!
//! Plates are compared after normalization (uppercase, whitespace and dashes
//! stripped) so `ab-12-cd`, `AB 12 CD`, and `AB12CD` all match the same
//! record. The outcome is strictly three-way: found, not found, or ambiguous.
//! An ambiguous plate is never auto-resolved: showing one driver another
//! driver's status is worse than showing an error.

use yardcall_core::{LookupError, Movement, Snapshot};

/// Normalize a plate for comparison: uppercase, strip spaces and dashes.
pub fn normalize_plate(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Resolve a driver-supplied plate to exactly one movement record.
///
/// Returns [`LookupError::NotFound`] for zero matches and
/// [`LookupError::Ambiguous`] for more than one.
pub fn find<'a>(plate: &str, snapshot: &'a Snapshot) -> Result<&'a Movement, LookupError> {
    let wanted = normalize_plate(plate);
    if wanted.is_empty() {
        return Err(LookupError::NotFound);
    }

    let mut matched = None;
    for movement in &snapshot.movements {
        if normalize_plate(&movement.license_plate) == wanted {
            if matched.is_some() {
                return Err(LookupError::Ambiguous);
            }
            matched = Some(movement);
        }
    }

    matched.ok_or(LookupError::NotFound)
}
