//! # Serial Normalization
//!
//! Every serial that enters the system goes through [`normalize`] exactly
//! once, at the boundary: scans before classification, approved-list rows
//! at registry ingestion. After that, all comparisons are plain equality.
//!
//! ## Normalization Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Normalization Boundary                               │
//! │                                                                         │
//! │  Scanner input  "  abc1234567 "  ──► normalize ──► "ABC1234567"         │
//! │  Registry row   "abc1234567"     ──► normalize ──► "ABC1234567"         │
//! │                                                                         │
//! │  Inside the core: equality only. No re-trimming, no case folding.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

/// Normalizes a raw scan: trims surrounding whitespace and uppercases.
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)` for all inputs.
///
/// ## Example
/// ```rust
/// use wocheck_core::serial::normalize;
///
/// assert_eq!(normalize("  abc1234567 "), "ABC1234567");
/// assert_eq!(normalize("ABC1234567"), "ABC1234567");
/// ```
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_uppercases() {
        assert_eq!(normalize("  abc1234567 "), "ABC1234567");
        assert_eq!(normalize("\txyz7654321\n"), "XYZ7654321");
        assert_eq!(normalize("MiXeD0123"), "MIXED0123");
    }

    #[test]
    fn test_normalize_blank_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("\t\n"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["  abc1234567 ", "ABC1234567", "", "  ", "a b c"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }
}
