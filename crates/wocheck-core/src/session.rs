//! # Session State
//!
//! Owns all mutable state for one receiving session and is its single
//! mutator: classification commits, selection move/remove, config updates
//! and resets all go through command methods on [`Session`].
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State Operations                             │
//! │                                                                         │
//! │  Operator Action          Command Method          State Change          │
//! │  ───────────────          ──────────────          ────────────          │
//! │                                                                         │
//! │  Scan serial ────────────► scan() ──────────────► history + container   │
//! │                                                                         │
//! │  Tap entry ──────────────► toggle_*_selection() ► selection set flip    │
//! │                                                                         │
//! │  Move button ────────────► move_selected() ─────► buckets reshuffled    │
//! │                                                                         │
//! │  Remove button ──────────► remove_selected_*() ─► container + history   │
//! │                                                                         │
//! │  Clear button ───────────► clear() ─────────────► session emptied       │
//! │                                                                         │
//! │  New Order button ───────► reset_order() ───────► clear + order fields  │
//! │                                                                         │
//! │  NOTE: One mutator, synchronous methods. No operation ever observes     │
//! │        a half-applied mutation from another.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::classify::classify;
use crate::error::ScanResult;
use crate::registry::Registry;
use crate::types::{Accepted, ConfigUpdate, Destination, ScanEntry, ScanEvent, SessionConfig, ShelfRef};

/// The mutable state of one receiving session.
///
/// ## Invariants
/// - `buckets.len() == shelf_count`, fixed for the session lifetime
/// - `config.active_shelf` stays within `[1, shelf_count]`
/// - History is append-only between resets; every accepted scan appends
///   exactly one event
/// - Selection sets only ever reference live positions and are cleared by
///   every move/remove and by both resets
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    shelf_count: usize,
    serial_length: usize,
    buckets: Vec<Vec<ScanEntry>>,
    separate: Vec<ScanEntry>,
    history: Vec<ScanEvent>,
    shelf_selection: HashSet<ShelfRef>,
    separate_selection: HashSet<usize>,
    dup_allowed: bool,
    next_seq: u64,
}

impl Session {
    /// Creates an empty session.
    ///
    /// `shelf_count` and `serial_length` come from station settings and are
    /// immutable for the session; `date` is the order date (the local day
    /// at startup, editable by the operator).
    pub fn new(shelf_count: usize, serial_length: usize, date: NaiveDate) -> Self {
        let shelf_count = shelf_count.max(1);
        Session {
            config: SessionConfig::new(date),
            shelf_count,
            serial_length,
            buckets: vec![Vec::new(); shelf_count],
            separate: Vec::new(),
            history: Vec::new(),
            shelf_selection: HashSet::new(),
            separate_selection: HashSet::new(),
            dup_allowed: false,
            next_seq: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The operator-entered order configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Number of shelf buckets.
    pub fn shelf_count(&self) -> usize {
        self.shelf_count
    }

    /// Required serial length for this station.
    pub fn serial_length(&self) -> usize {
        self.serial_length
    }

    /// Whether duplicate scanning is currently allowed.
    pub fn dup_allowed(&self) -> bool {
        self.dup_allowed
    }

    /// Enables or disables duplicate scanning.
    pub fn set_dup_allowed(&mut self, allowed: bool) {
        self.dup_allowed = allowed;
    }

    /// The entries of one shelf bucket, in current display order.
    pub fn bucket(&self, shelf: usize) -> &[ScanEntry] {
        &self.buckets[shelf]
    }

    /// All shelf buckets.
    pub fn buckets(&self) -> &[Vec<ScanEntry>] {
        &self.buckets
    }

    /// The separate (quarantine) list.
    pub fn separate(&self) -> &[ScanEntry] {
        &self.separate
    }

    /// The append-only scan history, oldest first.
    pub fn history(&self) -> &[ScanEvent] {
        &self.history
    }

    /// The newest `limit` history events, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &ScanEvent> {
        self.history.iter().rev().take(limit)
    }

    /// Whether this serial is anywhere in the scan history.
    pub fn history_contains(&self, serial: &str) -> bool {
        self.history.iter().any(|event| event.serial == serial)
    }

    /// Total entries across all shelf buckets.
    pub fn total_scanned(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Entries on the separate list.
    pub fn separate_count(&self) -> usize {
        self.separate.len()
    }

    /// Current shelf-bucket selection.
    pub fn shelf_selection(&self) -> &HashSet<ShelfRef> {
        &self.shelf_selection
    }

    /// Current separate-list selection.
    pub fn separate_selection(&self) -> &HashSet<usize> {
        &self.separate_selection
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Classifies one raw scan and, if accepted, commits it atomically.
    ///
    /// Rejections leave the session untouched; the operator can rescan
    /// immediately.
    pub fn scan(&mut self, raw: &str, registry: &Registry) -> ScanResult<Accepted> {
        let accepted = classify(raw, self, registry)?;
        self.apply(accepted.clone());
        Ok(accepted)
    }

    /// Commits an accepted classification: one history append plus one
    /// append to the destination container, under the same sequence number.
    pub fn apply(&mut self, accepted: Accepted) {
        let seq = self.next_seq;
        self.next_seq += 1;

        let Accepted {
            serial,
            destination,
        } = accepted;

        self.history.push(ScanEvent {
            serial: serial.clone(),
            destination,
            seq,
        });

        match destination {
            Destination::Shelf(shelf) => {
                // classify() only emits in-range indexes; the clamp keeps
                // a hand-built Accepted from panicking.
                let shelf = shelf.min(self.shelf_count - 1);
                self.buckets[shelf].push(ScanEntry { serial, seq });
            }
            Destination::Separate => {
                self.separate.push(ScanEntry { serial, seq });
            }
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Applies a partial config update. Out-of-range shelf numbers are
    /// clamped into `[1, shelf_count]`, never rejected.
    pub fn update_config(&mut self, update: ConfigUpdate) {
        if let Some(part_number) = update.part_number {
            self.config.part_number = part_number;
        }
        if let Some(date) = update.date {
            self.config.date = date;
        }
        if let Some(cart_number) = update.cart_number {
            self.config.cart_number = cart_number;
        }
        if let Some(delivery_number) = update.delivery_number {
            self.config.delivery_number = delivery_number;
        }
        if let Some(shelf) = update.active_shelf {
            self.config.active_shelf = shelf.clamp(1, self.shelf_count);
        }
    }

    /// Sets the active shelf (1-based, clamped).
    pub fn set_active_shelf(&mut self, shelf: usize) {
        self.update_config(ConfigUpdate {
            active_shelf: Some(shelf),
            ..ConfigUpdate::default()
        });
    }

    // =========================================================================
    // Resets
    // =========================================================================

    /// The "Clear" action: empties history, all buckets, the separate list
    /// and both selections, and returns to shelf 1. Part, cart and delivery
    /// numbers survive so the operator can restart the same order.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.separate.clear();
        self.history.clear();
        self.shelf_selection.clear();
        self.separate_selection.clear();
        self.config.active_shelf = 1;
        self.next_seq = 0;
    }

    /// The "New Order" action: [`clear`](Self::clear) plus blanking the
    /// part, cart and delivery numbers. The registry is not touched by
    /// either reset.
    pub fn reset_order(&mut self) {
        self.clear();
        self.config.part_number.clear();
        self.config.cart_number.clear();
        self.config.delivery_number.clear();
    }

    // =========================================================================
    // Selections
    // =========================================================================

    /// Flips membership of a shelf-bucket reference in the selection set.
    /// Out-of-range references are ignored. Returns whether the entry is
    /// selected after the call.
    pub fn toggle_shelf_selection(&mut self, r: ShelfRef) -> bool {
        let valid = r.shelf < self.shelf_count && r.pos < self.buckets[r.shelf].len();
        if !valid {
            return false;
        }
        if !self.shelf_selection.insert(r) {
            self.shelf_selection.remove(&r);
            return false;
        }
        true
    }

    /// Flips membership of a separate-list position in the selection set.
    /// Out-of-range positions are ignored. Returns whether the entry is
    /// selected after the call.
    pub fn toggle_separate_selection(&mut self, pos: usize) -> bool {
        if pos >= self.separate.len() {
            return false;
        }
        if !self.separate_selection.insert(pos) {
            self.separate_selection.remove(&pos);
            return false;
        }
        true
    }

    // =========================================================================
    // Allocator: move / remove
    // =========================================================================

    /// Moves the selected shelf entries to the end of `target_shelf`
    /// (1-based, clamped), ordered by their global scan sequence — earliest
    /// scan first, across source buckets. Survivors keep their relative
    /// order; the total entry count across all buckets is unchanged.
    ///
    /// Clears the shelf selection. Returns how many entries moved.
    pub fn move_selected(&mut self, target_shelf: usize) -> usize {
        if self.shelf_selection.is_empty() {
            return 0;
        }
        let target = target_shelf.clamp(1, self.shelf_count) - 1;
        let selection = std::mem::take(&mut self.shelf_selection);

        let mut moved: Vec<ScanEntry> = Vec::new();
        for (shelf, bucket) in self.buckets.iter_mut().enumerate() {
            let mut pos = 0;
            bucket.retain(|entry| {
                let keep = !selection.contains(&ShelfRef::new(shelf, pos));
                if !keep {
                    moved.push(entry.clone());
                }
                pos += 1;
                keep
            });
        }

        // Cross-bucket scan order, not source-bucket order.
        moved.sort_by_key(|entry| entry.seq);
        let count = moved.len();
        self.buckets[target].extend(moved);
        count
    }

    /// Removes the selected shelf entries from their buckets and purges the
    /// same serial values from History. Survivors keep their order; the
    /// selection is cleared. Returns the removed serials.
    pub fn remove_selected_shelf(&mut self) -> Vec<String> {
        if self.shelf_selection.is_empty() {
            return Vec::new();
        }
        let selection = std::mem::take(&mut self.shelf_selection);

        let mut removed: Vec<String> = Vec::new();
        for (shelf, bucket) in self.buckets.iter_mut().enumerate() {
            let mut pos = 0;
            bucket.retain(|entry| {
                let keep = !selection.contains(&ShelfRef::new(shelf, pos));
                if !keep {
                    removed.push(entry.serial.clone());
                }
                pos += 1;
                keep
            });
        }

        self.purge_history(&removed);
        removed
    }

    /// Removes the selected separate-list entries and purges the same
    /// serial values from History. The selection is cleared. Returns the
    /// removed serials.
    pub fn remove_selected_separate(&mut self) -> Vec<String> {
        if self.separate_selection.is_empty() {
            return Vec::new();
        }
        let selection = std::mem::take(&mut self.separate_selection);

        let mut removed: Vec<String> = Vec::new();
        let mut pos = 0;
        self.separate.retain(|entry| {
            let keep = !selection.contains(&pos);
            if !keep {
                removed.push(entry.serial.clone());
            }
            pos += 1;
            keep
        });

        self.purge_history(&removed);
        removed
    }

    /// Removes history entries matching the removed serials by value:
    /// exactly as many events as occurrences removed, oldest first. With
    /// duplicate scanning enabled the same serial can appear several times;
    /// dropping the oldest keeps any surviving occurrence still blocking a
    /// rescan once duplicates are disabled again.
    fn purge_history(&mut self, removed: &[String]) {
        let mut budget: HashMap<&str, usize> = HashMap::new();
        for serial in removed {
            *budget.entry(serial.as_str()).or_insert(0) += 1;
        }

        self.history.retain(|event| {
            if let Some(remaining) = budget.get_mut(event.serial.as_str()) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return false;
                }
            }
            true
        });
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
