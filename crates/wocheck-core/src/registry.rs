//! # Approved-Serial Registry
//!
//! The registry is the pre-approved "hold" list for the session: serials on
//! it are flagged "move aside" and routed to the separate list.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Registry Lifecycle                                 │
//! │                                                                         │
//! │  Session start                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RegistrySource (station collaborator) ──► ordered rows                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Registry::from_rows ──► normalize each row, drop blanks ──► HashSet    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Read-only for the rest of the session (resets never touch it)          │
//! │                                                                         │
//! │  Load failure? Registry::empty() — nothing gets flagged, session        │
//! │  continues, the station logs a warning.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::serial;

/// The immutable set of approved ("hold") serials for one session.
///
/// Membership is case-insensitive by construction: every row is normalized
/// at ingestion, and lookups normalize their argument the same way.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    serials: HashSet<String>,
}

impl Registry {
    /// Builds a registry from collaborator rows, normalizing each row and
    /// dropping anything that normalizes to empty.
    ///
    /// ## Example
    /// ```rust
    /// use wocheck_core::Registry;
    ///
    /// let registry = Registry::from_rows(["abc1234567", "  ", "XYZ7654321"]);
    /// assert_eq!(registry.len(), 2);
    /// assert!(registry.contains("ABC1234567"));
    /// ```
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let serials = rows
            .into_iter()
            .map(|row| serial::normalize(row.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        Registry { serials }
    }

    /// An empty registry: the degraded mode when the approved-list source
    /// is unavailable. No serial will ever be flagged.
    pub fn empty() -> Self {
        Registry::default()
    }

    /// Membership test. The argument is normalized before lookup, so the
    /// test is total over raw scanner input as well.
    pub fn contains(&self, serial: &str) -> bool {
        self.serials.contains(&serial::normalize(serial))
    }

    /// Number of approved serials.
    pub fn len(&self) -> usize {
        self.serials.len()
    }

    /// Whether the registry holds no serials at all.
    pub fn is_empty(&self) -> bool {
        self.serials.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_normalizes_and_drops_blanks() {
        let registry = Registry::from_rows(["  abc1234567 ", "", "   ", "xyz7654321"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("ABC1234567"));
        assert!(registry.contains("XYZ7654321"));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let registry = Registry::from_rows(["ABC1234567"]);
        assert!(registry.contains("abc1234567"));
        assert!(registry.contains(" ABC1234567 "));
        assert!(!registry.contains("ABC123456"));
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let registry = Registry::from_rows(["ABC1234567", "abc1234567", " ABC1234567"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_registry_flags_nothing() {
        let registry = Registry::empty();
        assert!(registry.is_empty());
        assert!(!registry.contains("ABC1234567"));
    }
}
