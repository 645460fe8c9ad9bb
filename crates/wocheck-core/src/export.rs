//! # Export Assembly
//!
//! Derives the two export artifacts from a session snapshot,
//! deterministically and with no side effects:
//!
//! - the **separated CSV** rows (`SN`, `PN`), omitted entirely when the
//!   separate list is empty;
//! - the **workbook plan**, a flat list of cell writes the spreadsheet
//!   filler applies to the output template.
//!
//! ## Export Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Export Request                                  │
//! │                                                                         │
//! │  Session snapshot ──► assemble(session, layout)                         │
//! │                            │                                            │
//! │             ┌──────────────┴──────────────┐                             │
//! │             ▼                             ▼                             │
//! │   separated rows (Option)        workbook plan (always)                 │
//! │             │                             │                             │
//! │             ▼                             ▼                             │
//! │   csv::Writer (station)      TemplateSource + WorkbookRenderer          │
//! │                              + FileSink (station)                       │
//! │                                                                         │
//! │  The two artifacts are independent: a missing template aborts only      │
//! │  the spreadsheet side, after the CSV side has already been assembled.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Default per-shelf starting rows in the output template.
pub const DEFAULT_SHELF_OFFSETS: [u32; 4] = [7, 35, 64, 92];

/// Default column the serials are written into.
pub const DEFAULT_SERIAL_COLUMN: &str = "C";

// =============================================================================
// Sheet Layout
// =============================================================================

/// Where the output template expects each value.
///
/// Loaded from station settings; the defaults match the stock template
/// shipped with the station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Cell for the part number.
    pub pn_cell: String,
    /// Cell for the order date.
    pub date_cell: String,
    /// Cell for the cart number.
    pub cart_cell: String,
    /// Cell for the delivery number.
    pub dn_cell: String,
    /// Column the serials are written into, one row per serial.
    pub serial_column: String,
    /// Starting row per shelf. A shelf without its own offset falls back
    /// to the first one, matching the old station behavior.
    pub shelf_offsets: Vec<u32>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        SheetLayout {
            pn_cell: "B2".to_string(),
            date_cell: "E2".to_string(),
            cart_cell: "B4".to_string(),
            dn_cell: "E4".to_string(),
            serial_column: DEFAULT_SERIAL_COLUMN.to_string(),
            shelf_offsets: DEFAULT_SHELF_OFFSETS.to_vec(),
        }
    }
}

// =============================================================================
// Artifacts
// =============================================================================

/// One row of the separated-serials CSV.
///
/// Field names are serde-renamed so the `csv` crate writes the
/// `SN,PN` header directly from this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparatedRow {
    /// The held serial.
    #[serde(rename = "SN")]
    pub sn: String,
    /// The session part number, repeated per row.
    #[serde(rename = "PN")]
    pub pn: String,
}

/// One cell write in the workbook plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellWrite {
    /// Target cell address, e.g. `C7`.
    pub cell: String,
    /// Value to write, already formatted as text.
    pub value: String,
}

/// The complete, ordered set of cell writes for one export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbookPlan {
    pub writes: Vec<CellWrite>,
}

/// Both export artifacts, assembled together from one snapshot.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    /// `None` when the separate list is empty: no CSV is emitted at all.
    pub separated: Option<Vec<SeparatedRow>>,
    /// Always produced, independent of the CSV artifact.
    pub plan: WorkbookPlan,
}

// =============================================================================
// Assembly
// =============================================================================

/// Assembles the separated-CSV rows, or `None` when there is nothing to
/// separate.
pub fn separated_rows(session: &Session) -> Option<Vec<SeparatedRow>> {
    if session.separate().is_empty() {
        return None;
    }
    let pn = &session.config().part_number;
    Some(
        session
            .separate()
            .iter()
            .map(|entry| SeparatedRow {
                sn: entry.serial.clone(),
                pn: pn.clone(),
            })
            .collect(),
    )
}

/// Assembles the workbook plan: the four header cells followed by each
/// bucket's serials written down the serial column from that shelf's
/// starting row.
pub fn workbook_plan(session: &Session, layout: &SheetLayout) -> WorkbookPlan {
    let config = session.config();
    let mut writes = vec![
        CellWrite {
            cell: layout.pn_cell.clone(),
            value: config.part_number.clone(),
        },
        CellWrite {
            cell: layout.date_cell.clone(),
            value: config.date.format("%Y-%m-%d").to_string(),
        },
        CellWrite {
            cell: layout.cart_cell.clone(),
            value: config.cart_number.clone(),
        },
        CellWrite {
            cell: layout.dn_cell.clone(),
            value: config.delivery_number.clone(),
        },
    ];

    for (shelf, bucket) in session.buckets().iter().enumerate() {
        let start = layout
            .shelf_offsets
            .get(shelf)
            .or_else(|| layout.shelf_offsets.first())
            .copied();
        let Some(start) = start else {
            // No offsets configured at all: header cells only.
            break;
        };
        for (i, entry) in bucket.iter().enumerate() {
            writes.push(CellWrite {
                cell: format!("{}{}", layout.serial_column, start + i as u32),
                value: entry.serial.clone(),
            });
        }
    }

    WorkbookPlan { writes }
}

/// Assembles both artifacts from one snapshot.
pub fn assemble(session: &Session, layout: &SheetLayout) -> ExportBundle {
    ExportBundle {
        separated: separated_rows(session),
        plan: workbook_plan(session, layout),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::types::ConfigUpdate;
    use chrono::NaiveDate;

    fn loaded_session() -> Session {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let mut session = Session::new(4, 10, date);
        session.update_config(ConfigUpdate {
            part_number: Some("PN-1138".to_string()),
            cart_number: Some("C7".to_string()),
            delivery_number: Some("D-42".to_string()),
            ..ConfigUpdate::default()
        });

        let registry = Registry::from_rows(["HLD0000001"]);
        session.scan("SN00000001", &registry).unwrap();
        session.scan("SN00000002", &registry).unwrap();
        session.set_active_shelf(3);
        session.scan("SN00000003", &registry).unwrap();
        session.scan("HLD0000001", &registry).unwrap();
        session
    }

    #[test]
    fn test_separated_rows_carry_part_number() {
        let session = loaded_session();

        let rows = separated_rows(&session).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sn, "HLD0000001");
        assert_eq!(rows[0].pn, "PN-1138");
    }

    #[test]
    fn test_empty_separate_list_yields_no_csv_artifact() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let mut session = Session::new(4, 10, date);
        let registry = Registry::empty();
        session.scan("SN00000001", &registry).unwrap();

        let bundle = assemble(&session, &SheetLayout::default());
        assert!(bundle.separated.is_none());
        // The workbook plan is still complete.
        assert!(bundle
            .plan
            .writes
            .iter()
            .any(|w| w.cell == "C7" && w.value == "SN00000001"));
    }

    #[test]
    fn test_workbook_plan_header_cells() {
        let session = loaded_session();
        let plan = workbook_plan(&session, &SheetLayout::default());

        let find = |cell: &str| {
            plan.writes
                .iter()
                .find(|w| w.cell == cell)
                .map(|w| w.value.as_str())
        };
        assert_eq!(find("B2"), Some("PN-1138"));
        assert_eq!(find("E2"), Some("2026-08-25"));
        assert_eq!(find("B4"), Some("C7"));
        assert_eq!(find("E4"), Some("D-42"));
    }

    #[test]
    fn test_workbook_plan_serial_runs_per_shelf() {
        let session = loaded_session();
        let plan = workbook_plan(&session, &SheetLayout::default());

        let serial_writes: Vec<(&str, &str)> = plan.writes[4..]
            .iter()
            .map(|w| (w.cell.as_str(), w.value.as_str()))
            .collect();

        // Shelf 1 starts at row 7, shelf 3 at row 64.
        assert_eq!(
            serial_writes,
            vec![
                ("C7", "SN00000001"),
                ("C8", "SN00000002"),
                ("C64", "SN00000003"),
            ]
        );
    }

    #[test]
    fn test_missing_shelf_offset_falls_back_to_first() {
        let session = loaded_session();
        let layout = SheetLayout {
            shelf_offsets: vec![7],
            ..SheetLayout::default()
        };

        let plan = workbook_plan(&session, &layout);
        let shelf3_write = plan
            .writes
            .iter()
            .find(|w| w.value == "SN00000003")
            .unwrap();
        assert_eq!(shelf3_write.cell, "C7");
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let session = loaded_session();
        let layout = SheetLayout::default();

        let a = assemble(&session, &layout);
        let b = assemble(&session, &layout);
        assert_eq!(a.plan, b.plan);
        assert_eq!(a.separated, b.separated);
    }
}
