//! # wocheck-core: Pure Business Logic for the Work Order Checker
//!
//! This crate is the **heart** of the Work Order Checker. It contains the
//! whole scan-classification-allocation engine as pure, synchronous code
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Work Order Checker Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  apps/station (operator shell)                  │   │
//! │  │   scan loop ──► command dispatch ──► export orchestration       │   │
//! │  │   registry/template/file collaborators • audio feedback         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ wocheck-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  serial  │ │ registry │ │ classify │ │ session  │          │   │
//! │  │   │normalize │ │ approved │ │ decision │ │ buckets  │          │   │
//! │  │   │ validate │ │   set    │ │  ladder  │ │selections│          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                       ┌──────────┐                              │   │
//! │  │                       │  export  │  CSV rows + workbook plan    │   │
//! │  │                       └──────────┘                              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO AUDIO • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`serial`] - Serial normalization (trim + uppercase)
//! - [`types`] - Domain types (config, destinations, scan entries)
//! - [`error`] - Domain error types
//! - [`registry`] - The approved/"hold" serial set
//! - [`classify`] - The pure classification decision
//! - [`session`] - Session state, commits, selection move/remove
//! - [`export`] - Deterministic export-data assembly
//!
//! ## Design Principles
//!
//! 1. **Single Mutator**: all state changes go through [`session::Session`]
//!    command methods; no operation ever observes a half-applied mutation
//! 2. **Pure Classification**: [`classify::classify`] reads state and the
//!    registry but never mutates anything
//! 3. **Rejections Are Recoverable**: every scan rejection leaves the
//!    session byte-for-byte unchanged and the operator can rescan
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use wocheck_core::{Destination, Registry, Session};
//!
//! let registry = Registry::from_rows(["ABC1234567"]);
//! let today = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
//! let mut session = Session::new(4, 10, today);
//!
//! // Serial on the hold list goes to the separate (quarantine) list
//! let accepted = session.scan("abc1234567", &registry).unwrap();
//! assert_eq!(accepted.destination, Destination::Separate);
//!
//! // Unknown serial of valid length goes to the active shelf
//! let accepted = session.scan("XYZ7654321", &registry).unwrap();
//! assert_eq!(accepted.destination, Destination::Shelf(0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod classify;
pub mod error;
pub mod export;
pub mod registry;
pub mod serial;
pub mod session;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use wocheck_core::Session` instead of
// `use wocheck_core::session::Session`

pub use classify::classify;
pub use error::{ExportError, ScanReject, ScanResult};
pub use export::{assemble, ExportBundle, SheetLayout, WorkbookPlan};
pub use registry::Registry;
pub use session::Session;
pub use types::{Accepted, ConfigUpdate, Destination, ScanEntry, ScanEvent, SessionConfig, ShelfRef};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default number of physical shelves when the settings file does not say.
///
/// ## Why a constant?
/// The receiving stations this replaces all had four shelves; deployments
/// with a different layout override `shelf_count` in their settings file.
pub const DEFAULT_SHELF_COUNT: usize = 4;
