//! # Domain Types
//!
//! Core domain types used throughout the Work Order Checker.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  SessionConfig  │   │    Accepted     │   │   ScanEntry     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  part_number    │   │  serial         │   │  serial         │       │
//! │  │  date           │   │  destination    │   │  seq (global)   │       │
//! │  │  cart_number    │   └─────────────────┘   └─────────────────┘       │
//! │  │  delivery_number│                                                    │
//! │  │  active_shelf   │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  └─────────────────┘   │  Destination    │   │    ShelfRef     │       │
//! │                        │  ─────────────  │   │  ─────────────  │       │
//! │  ┌─────────────────┐   │  Shelf(bucket)  │   │  shelf (0-based)│       │
//! │  │   ScanEvent     │   │  Separate       │   │  pos   (0-based)│       │
//! │  │  history entry  │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Indexing Convention
//! Operator-facing shelf numbers are 1-based (`active_shelf`, move targets);
//! everything structural (`Destination::Shelf`, `ShelfRef`) is a 0-based
//! bucket index. The session converts exactly once, at the boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Session Configuration
// =============================================================================

/// Operator-entered order configuration for the current session.
///
/// Mutated only through [`crate::Session::update_config`]; the session is
/// the single mutator and clamps `active_shelf` into range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Part number written into the export header and the CSV `PN` column.
    pub part_number: String,

    /// Order date. Defaults to the local day the station started.
    pub date: NaiveDate,

    /// Cart number written into the export header.
    pub cart_number: String,

    /// Delivery number written into the export header.
    pub delivery_number: String,

    /// Active shelf for routing accepted scans. 1-based, always within
    /// `[1, shelf_count]`.
    pub active_shelf: usize,
}

impl SessionConfig {
    /// Creates a fresh config with blank order fields and shelf 1 active.
    pub fn new(date: NaiveDate) -> Self {
        SessionConfig {
            part_number: String::new(),
            date,
            cart_number: String::new(),
            delivery_number: String::new(),
            active_shelf: 1,
        }
    }
}

/// A partial configuration update. `None` fields are left untouched.
///
/// ## Example
/// ```rust
/// use wocheck_core::ConfigUpdate;
///
/// let update = ConfigUpdate {
///     part_number: Some("PN-1138".to_string()),
///     ..ConfigUpdate::default()
/// };
/// assert!(update.date.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub part_number: Option<String>,
    pub date: Option<NaiveDate>,
    pub cart_number: Option<String>,
    pub delivery_number: Option<String>,
    /// 1-based shelf number. Out-of-range values are clamped, not rejected.
    pub active_shelf: Option<usize>,
}

// =============================================================================
// Classification Outcome
// =============================================================================

/// Where an accepted scan is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// The shelf bucket at this 0-based index.
    Shelf(usize),
    /// The separate (quarantine) list: the serial is on the hold list.
    Separate,
}

/// A scan the classifier accepted, ready to be committed.
///
/// Produced by [`crate::classify::classify`] and applied atomically by
/// [`crate::Session::apply`]: one history append plus one container append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accepted {
    /// The normalized serial.
    pub serial: String,
    /// Routing decision, with the active shelf read at classification time.
    pub destination: Destination,
}

// =============================================================================
// Committed State Entries
// =============================================================================

/// One committed entry in a shelf bucket or the separate list.
///
/// ## Why carry a sequence number?
/// `seq` is the global scan order assigned at commit time. Bucket positions
/// change under moves and removals, but `seq` does not, so cross-bucket
/// move ordering stays exact even when duplicate scanning repeats a serial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    /// The normalized serial.
    pub serial: String,
    /// Global scan sequence number (0-based, monotonic per session).
    pub seq: u64,
}

/// One entry in the append-only scan history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    /// The normalized serial.
    pub serial: String,
    /// Where the scan was routed.
    pub destination: Destination,
    /// Global scan sequence number, shared with the container entry.
    pub seq: u64,
}

// =============================================================================
// Selection Reference
// =============================================================================

/// A structural reference to one shelf-bucket entry.
///
/// Replaces the `"shelfIdx-serialIdx"` composite string keys of the old
/// implementation: a value tuple cannot be mis-parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShelfRef {
    /// 0-based bucket index.
    pub shelf: usize,
    /// 0-based position within the bucket.
    pub pos: usize,
}

impl ShelfRef {
    /// Creates a reference to `bucket[shelf][pos]`.
    #[inline]
    pub const fn new(shelf: usize, pos: usize) -> Self {
        ShelfRef { shelf, pos }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_starts_on_shelf_one() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let config = SessionConfig::new(date);
        assert_eq!(config.active_shelf, 1);
        assert!(config.part_number.is_empty());
        assert!(config.cart_number.is_empty());
        assert!(config.delivery_number.is_empty());
    }

    #[test]
    fn test_config_update_default_is_all_none() {
        let update = ConfigUpdate::default();
        assert!(update.part_number.is_none());
        assert!(update.date.is_none());
        assert!(update.cart_number.is_none());
        assert!(update.delivery_number.is_none());
        assert!(update.active_shelf.is_none());
    }

    #[test]
    fn test_shelf_ref_equality() {
        assert_eq!(ShelfRef::new(1, 3), ShelfRef::new(1, 3));
        assert_ne!(ShelfRef::new(1, 3), ShelfRef::new(3, 1));
    }
}
