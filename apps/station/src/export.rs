//! # Export Orchestration
//!
//! Drives one export request end to end: assemble both artifacts from the
//! session, write the CSV (when there is one), then load the template,
//! render the workbook plan and hand the result to the file sink.
//!
//! ## Independence Guarantee
//! The CSV side always runs to completion before anything on the
//! spreadsheet side can fail: a missing template aborts only the workbook
//! artifact. A canceled save, like any export failure, leaves the session
//! completely unmodified — nothing in this module takes `&mut Session`.

use wocheck_core::export::WorkbookPlan;
use wocheck_core::{assemble, ExportError, Session, SheetLayout};

use crate::sources::{FileSink, SaveOutcome, TemplateSource};

// =============================================================================
// Workbook Renderer
// =============================================================================

/// Applies a workbook plan to the raw template bytes and yields the output
/// payload plus its file extension.
pub trait WorkbookRenderer {
    fn render(&self, template: &[u8], plan: &WorkbookPlan) -> Result<Vec<u8>, ExportError>;
    fn extension(&self) -> &'static str;
}

/// Emits the plan as a JSON fill document for the downstream template
/// filler, which owns the actual spreadsheet mutation. The template bytes
/// must still be present: a deployment without its template has nothing to
/// fill, and that surfaces before any file is written.
#[derive(Debug, Default)]
pub struct JsonFillRenderer;

impl WorkbookRenderer for JsonFillRenderer {
    fn render(&self, template: &[u8], plan: &WorkbookPlan) -> Result<Vec<u8>, ExportError> {
        if template.is_empty() {
            return Err(ExportError::TemplateUnavailable(
                "template file is empty".to_string(),
            ));
        }
        serde_json::to_vec_pretty(plan).map_err(|e| ExportError::WriteFailed(e.to_string()))
    }

    fn extension(&self) -> &'static str {
        "fill.json"
    }
}

// =============================================================================
// Export Run
// =============================================================================

/// Per-artifact outcome of one export request.
#[derive(Debug)]
pub struct ExportReport {
    /// `None` when the separate list was empty (nothing to export);
    /// otherwise the save outcome of the CSV artifact.
    pub csv: Option<Result<SaveOutcome, ExportError>>,
    /// The save outcome of the workbook artifact.
    pub workbook: Result<SaveOutcome, ExportError>,
}

/// Filesystem-safe timestamp for export filenames.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// Runs one export request against the given collaborators.
///
/// `stamp` is injected so filenames are deterministic under test; callers
/// use [`timestamp`].
pub fn run_export(
    session: &Session,
    layout: &SheetLayout,
    template: &dyn TemplateSource,
    renderer: &dyn WorkbookRenderer,
    sink: &dyn FileSink,
    stamp: &str,
) -> ExportReport {
    let bundle = assemble(session, layout);

    // CSV first: it must not be blocked by anything on the workbook side.
    let csv = bundle.separated.as_ref().map(|rows| {
        csv_bytes(rows).and_then(|bytes| {
            sink.save(&format!("separated_serials_{stamp}.csv"), &bytes)
                .map_err(|e| ExportError::WriteFailed(e.to_string()))
        })
    });

    let workbook = export_workbook(&bundle.plan, template, renderer, sink, stamp);

    ExportReport { csv, workbook }
}

fn csv_bytes(rows: &[wocheck_core::export::SeparatedRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| ExportError::WriteFailed(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::WriteFailed(e.to_string()))
}

fn export_workbook(
    plan: &WorkbookPlan,
    template: &dyn TemplateSource,
    renderer: &dyn WorkbookRenderer,
    sink: &dyn FileSink,
    stamp: &str,
) -> Result<SaveOutcome, ExportError> {
    let template_bytes = template
        .load()
        .map_err(|e| ExportError::TemplateUnavailable(e.to_string()))?;
    let payload = renderer.render(&template_bytes, plan)?;
    sink.save(
        &format!("scanned_serials_{stamp}.{}", renderer.extension()),
        &payload,
    )
    .map_err(|e| ExportError::WriteFailed(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StationResult;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use wocheck_core::{ConfigUpdate, Registry};

    struct StaticTemplate(Vec<u8>);

    impl TemplateSource for StaticTemplate {
        fn load(&self) -> StationResult<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    struct MissingTemplate;

    impl TemplateSource for MissingTemplate {
        fn load(&self) -> StationResult<Vec<u8>> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no template").into())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        saves: RefCell<Vec<(String, Vec<u8>)>>,
    }

    impl FileSink for RecordingSink {
        fn save(&self, suggested_name: &str, bytes: &[u8]) -> StationResult<SaveOutcome> {
            self.saves
                .borrow_mut()
                .push((suggested_name.to_string(), bytes.to_vec()));
            Ok(SaveOutcome::Saved(PathBuf::from(suggested_name)))
        }
    }

    struct CancelingSink;

    impl FileSink for CancelingSink {
        fn save(&self, _suggested_name: &str, _bytes: &[u8]) -> StationResult<SaveOutcome> {
            Ok(SaveOutcome::Canceled)
        }
    }

    fn session_with_hold() -> Session {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let mut session = Session::new(4, 10, date);
        session.update_config(ConfigUpdate {
            part_number: Some("PN-1138".to_string()),
            ..ConfigUpdate::default()
        });
        let registry = Registry::from_rows(["HLD0000001"]);
        session.scan("SN00000001", &registry).unwrap();
        session.scan("HLD0000001", &registry).unwrap();
        session
    }

    #[test]
    fn test_export_writes_both_artifacts() {
        let session = session_with_hold();
        let sink = RecordingSink::default();

        let report = run_export(
            &session,
            &SheetLayout::default(),
            &StaticTemplate(b"xlsx-bytes".to_vec()),
            &JsonFillRenderer,
            &sink,
            "2026-08-25T10-00-00",
        );

        assert!(matches!(report.csv, Some(Ok(SaveOutcome::Saved(_)))));
        assert!(matches!(report.workbook, Ok(SaveOutcome::Saved(_))));

        let saves = sink.saves.borrow();
        assert_eq!(saves.len(), 2);
        assert_eq!(saves[0].0, "separated_serials_2026-08-25T10-00-00.csv");
        let csv_text = String::from_utf8(saves[0].1.clone()).unwrap();
        assert!(csv_text.starts_with("SN,PN\n"));
        assert!(csv_text.contains("HLD0000001,PN-1138"));

        assert_eq!(saves[1].0, "scanned_serials_2026-08-25T10-00-00.fill.json");
        let plan: WorkbookPlan = serde_json::from_slice(&saves[1].1).unwrap();
        assert!(plan.writes.iter().any(|w| w.value == "SN00000001"));
    }

    #[test]
    fn test_empty_separate_list_skips_csv_only() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let mut session = Session::new(4, 10, date);
        session.scan("SN00000001", &Registry::empty()).unwrap();
        let sink = RecordingSink::default();

        let report = run_export(
            &session,
            &SheetLayout::default(),
            &StaticTemplate(b"xlsx-bytes".to_vec()),
            &JsonFillRenderer,
            &sink,
            "stamp",
        );

        assert!(report.csv.is_none());
        assert!(matches!(report.workbook, Ok(SaveOutcome::Saved(_))));
        assert_eq!(sink.saves.borrow().len(), 1);
    }

    #[test]
    fn test_missing_template_aborts_workbook_after_csv() {
        let session = session_with_hold();
        let sink = RecordingSink::default();

        let report = run_export(
            &session,
            &SheetLayout::default(),
            &MissingTemplate,
            &JsonFillRenderer,
            &sink,
            "stamp",
        );

        // CSV got through before the template failure surfaced.
        assert!(matches!(report.csv, Some(Ok(SaveOutcome::Saved(_)))));
        assert!(matches!(
            report.workbook,
            Err(ExportError::TemplateUnavailable(_))
        ));
        assert_eq!(sink.saves.borrow().len(), 1);
    }

    #[test]
    fn test_canceled_save_is_an_outcome_not_an_error() {
        let session = session_with_hold();
        let history_before = session.history().len();

        let report = run_export(
            &session,
            &SheetLayout::default(),
            &StaticTemplate(b"xlsx-bytes".to_vec()),
            &JsonFillRenderer,
            &CancelingSink,
            "stamp",
        );

        assert!(matches!(report.csv, Some(Ok(SaveOutcome::Canceled))));
        assert!(matches!(report.workbook, Ok(SaveOutcome::Canceled)));
        assert_eq!(session.history().len(), history_before);
    }

    #[test]
    fn test_empty_template_bytes_rejected_by_renderer() {
        let plan = WorkbookPlan::default();
        let result = JsonFillRenderer.render(&[], &plan);
        assert!(matches!(result, Err(ExportError::TemplateUnavailable(_))));
    }
}
