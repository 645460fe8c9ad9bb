//! # Station Error Type
//!
//! Unified error type for the station's collaborators and bootstrap.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Error Flow in the Station                           │
//! │                                                                         │
//! │  Scan rejections (core ScanReject)  ──► printed, operator rescans       │
//! │  Registry load failure              ──► warn + empty registry           │
//! │  Template/save failures             ──► printed, operator retries       │
//! │  Settings failure at startup        ──► fatal (nothing to run with)     │
//! │                                                                         │
//! │  Only the settings file is load-bearing at startup; everything else     │
//! │  degrades and the session keeps going.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use wocheck_core::ExportError;

/// Errors raised by the station's collaborators and bootstrap.
#[derive(Debug, Error)]
pub enum StationError {
    /// The settings file is missing a required field or malformed.
    #[error("settings error: {0}")]
    Settings(String),

    /// An I/O failure from a file-backed collaborator.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file (or fill document) failed to (de)serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The approved-list report or the CSV artifact failed to parse/write.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An export-side failure from the core taxonomy.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Convenience type alias for station operations.
pub type StationResult<T> = Result<T, StationError>;
