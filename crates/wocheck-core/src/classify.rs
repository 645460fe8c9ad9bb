//! # Classification
//!
//! The pure decision function mapping one raw scan onto an outcome.
//!
//! ## Decision Ladder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    classify(raw, session, registry)                     │
//! │                                                                         │
//! │  raw scan                                                               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  normalize (trim + uppercase)                                           │
//! │     │                                                                   │
//! │     ├── empty? ──────────────────────► Rejected(EmptyInput)             │
//! │     │                                                                   │
//! │     ├── in history & dups off? ──────► Rejected(Duplicate)              │
//! │     │                                                                   │
//! │     ├── wrong length? ───────────────► Rejected(InvalidLength)          │
//! │     │                                                                   │
//! │     ├── on the hold list? ───────────► Accepted(Separate)               │
//! │     │                                                                   │
//! │     └── otherwise ───────────────────► Accepted(Shelf(active shelf))    │
//! │                                                                         │
//! │  Rejections never mutate. Accepted outcomes are committed atomically    │
//! │  by Session::apply (history append + destination append).               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The active shelf is read here, at classification time, not at commit
//! time. The model is single-mutator and synchronous, so no config change
//! can slip between the two.

use crate::error::{ScanReject, ScanResult};
use crate::registry::Registry;
use crate::serial;
use crate::session::Session;
use crate::types::{Accepted, Destination};

/// Classifies one raw scan against the session state and the registry.
///
/// Pure: reads the session, never mutates it. The caller commits the
/// accepted outcome via [`Session::apply`] (or uses [`Session::scan`],
/// which does both in one call).
pub fn classify(raw: &str, session: &Session, registry: &Registry) -> ScanResult<Accepted> {
    let serial = serial::normalize(raw);

    if serial.is_empty() {
        return Err(ScanReject::EmptyInput);
    }

    if !session.dup_allowed() && session.history_contains(&serial) {
        return Err(ScanReject::Duplicate { serial });
    }

    let expected = session.serial_length();
    let actual = serial.chars().count();
    if actual != expected {
        return Err(ScanReject::InvalidLength {
            serial,
            expected,
            actual,
        });
    }

    let destination = if registry.contains(&serial) {
        Destination::Separate
    } else {
        // active_shelf is 1-based operator input; buckets are 0-based.
        Destination::Shelf(session.config().active_shelf - 1)
    };

    Ok(Accepted {
        serial,
        destination,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
