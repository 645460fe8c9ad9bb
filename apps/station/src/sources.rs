//! # External Collaborators
//!
//! The narrow interfaces the core's surroundings are accessed through:
//! the approved-list source, the template source, and the file sink.
//! Each trait has one file-backed implementation; tests substitute
//! in-memory fakes.
//!
//! ## Collaborator Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      External Collaborators                             │
//! │                                                                         │
//! │  RegistrySource ──► ordered rows ──► Registry::from_rows (core)         │
//! │    CsvRegistrySource: first column of the report, row 2 onward          │
//! │                                                                         │
//! │  TemplateSource ──► raw template bytes ──► WorkbookRenderer             │
//! │    FileTemplateSource: reads the deployed outputTemplate                │
//! │                                                                         │
//! │  FileSink ──► (suggested name, bytes) ──► Saved(path) | Canceled        │
//! │    DirectorySink: writes into the export directory (the "offer as       │
//! │    downloadable file" fallback; a native save dialog would be another   │
//! │    implementation of the same trait)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StationResult;

// =============================================================================
// Registry Source
// =============================================================================

/// Supplies the ordered approved-serial rows for the session.
pub trait RegistrySource {
    fn load(&self) -> StationResult<Vec<String>>;
}

/// Reads the approved-list report: first column, row 2 onward (row 1 is
/// the report header), blanks stripped. The core normalizes independently.
#[derive(Debug, Clone)]
pub struct CsvRegistrySource {
    path: PathBuf,
}

impl CsvRegistrySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvRegistrySource { path: path.into() }
    }
}

impl RegistrySource for CsvRegistrySource {
    fn load(&self) -> StationResult<Vec<String>> {
        let file = fs::File::open(&self.path)?;
        let rows = first_column_rows(file)?;
        debug!(path = %self.path.display(), rows = rows.len(), "approved list loaded");
        Ok(rows)
    }
}

/// First-column extraction, shared with tests via any reader.
fn first_column_rows<R: Read>(reader: R) -> StationResult<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if let Some(first) = record.get(0) {
            let first = first.trim();
            if !first.is_empty() {
                rows.push(first.to_string());
            }
        }
    }
    Ok(rows)
}

// =============================================================================
// Template Source
// =============================================================================

/// Supplies the raw bytes of the output template.
pub trait TemplateSource {
    fn load(&self) -> StationResult<Vec<u8>>;
}

/// Reads the deployed template file as-is.
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    path: PathBuf,
}

impl FileTemplateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTemplateSource { path: path.into() }
    }

    /// The path, for error messages.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateSource for FileTemplateSource {
    fn load(&self) -> StationResult<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}

// =============================================================================
// File Sink
// =============================================================================

/// How a save attempt ended. A canceled save is an outcome, not an error:
/// the operator backed out and the session is untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    Canceled,
}

/// Accepts a suggested filename and a byte payload.
pub trait FileSink {
    fn save(&self, suggested_name: &str, bytes: &[u8]) -> StationResult<SaveOutcome>;
}

/// Writes artifacts into an output directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }
}

impl FileSink for DirectorySink {
    fn save(&self, suggested_name: &str, bytes: &[u8]) -> StationResult<SaveOutcome> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(suggested_name);
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "artifact written");
        Ok(SaveOutcome::Saved(path))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_first_column_skips_header_and_blanks() {
        let report = "Serial,Batch,Status\nabc1234567,B1,ok\n ,B2,ok\nXYZ7654321,B3,ok\n";
        let rows = first_column_rows(Cursor::new(report)).unwrap();
        assert_eq!(rows, vec!["abc1234567", "XYZ7654321"]);
    }

    #[test]
    fn test_first_column_tolerates_ragged_rows() {
        let report = "Serial\nabc1234567\nXYZ7654321,extra,columns\n";
        let rows = first_column_rows(Cursor::new(report)).unwrap();
        assert_eq!(rows, vec!["abc1234567", "XYZ7654321"]);
    }

    #[test]
    fn test_first_column_empty_report() {
        let rows = first_column_rows(Cursor::new("Serial\n")).unwrap();
        assert!(rows.is_empty());
    }
}
