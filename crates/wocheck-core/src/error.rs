//! # Error Types
//!
//! Domain-specific error types for wocheck-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wocheck-core errors (this file)                                        │
//! │  ├── ScanReject   - Recoverable scan rejections (no state change)       │
//! │  └── ExportError  - Export assembly/write failures (session untouched)  │
//! │                                                                         │
//! │  Station errors (apps/station)                                          │
//! │  └── StationError - Collaborator/bootstrap failures                     │
//! │                                                                         │
//! │  Flow: ScanReject → transient notice → operator rescans immediately     │
//! │        ExportError → notice → operator retries the export               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (the offending serial, lengths)
//! 3. Errors are enum variants, never String
//! 4. Nothing here is fatal to the session

use thiserror::Error;

// =============================================================================
// Scan Rejection
// =============================================================================

/// A scan that was rejected before committing anything.
///
/// Every variant is recoverable: the session state is untouched and the
/// operator can immediately scan again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanReject {
    /// The input normalized to an empty string (blank scan, stray Enter).
    #[error("please enter a serial number")]
    EmptyInput,

    /// The serial is already in the scan history and duplicate scanning
    /// is disabled.
    #[error("already scanned: {serial}")]
    Duplicate { serial: String },

    /// The normalized serial does not have the configured length.
    ///
    /// ## When This Occurs
    /// - Scanner misread (partial barcode)
    /// - Operator scanned the wrong label (order number, lot code)
    #[error("invalid serial length for {serial}: expected {expected}, got {actual}")]
    InvalidLength {
        serial: String,
        expected: usize,
        actual: usize,
    },
}

// =============================================================================
// Export Error
// =============================================================================

/// Export failures. The session state is never modified by a failed
/// (or canceled) export, so the operator can always retry.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output template bytes could not be obtained from the template
    /// collaborator. Only the spreadsheet artifact aborts; the CSV side
    /// has already been assembled by then.
    #[error("output template unavailable: {0}")]
    TemplateUnavailable(String),

    /// The file-write collaborator reported a failure.
    #[error("export write failed: {0}")]
    WriteFailed(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for scan outcomes.
pub type ScanResult<T> = Result<T, ScanReject>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_messages() {
        let err = ScanReject::Duplicate {
            serial: "ABC1234567".to_string(),
        };
        assert_eq!(err.to_string(), "already scanned: ABC1234567");

        let err = ScanReject::InvalidLength {
            serial: "ABC".to_string(),
            expected: 10,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid serial length for ABC: expected 10, got 3"
        );
    }

    #[test]
    fn test_export_error_messages() {
        let err = ExportError::TemplateUnavailable("input/outputTemplate.xlsx".to_string());
        assert_eq!(
            err.to_string(),
            "output template unavailable: input/outputTemplate.xlsx"
        );
    }
}
