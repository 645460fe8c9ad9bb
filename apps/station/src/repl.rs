//! # Operator Loop
//!
//! The thin command layer between the scanner/keyboard and the core's
//! command methods. A bare line is a scan; everything else is a `:command`.
//!
//! ## Command Set
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  <serial>                 scan (classify + commit)                      │
//! │  :shelf <n>               set the active shelf                          │
//! │  :pn|:cart|:dn <value>    set part / cart / delivery number             │
//! │  :date <YYYY-MM-DD>       set the order date                            │
//! │  :dups on|off             allow duplicate scanning                      │
//! │  :audio on|off            audio feedback toggle                         │
//! │  :select shelf <s> <p>    toggle shelf selection (1-based)              │
//! │  :select sep <p>          toggle separate-list selection (1-based)      │
//! │  :move <n>                move selected entries to shelf n              │
//! │  :remove shelf|sep        remove selected entries                       │
//! │  :status                  session counters                              │
//! │  :recent                  latest scans, newest first                    │
//! │  :list                    full bucket / separate contents               │
//! │  :clear                   Clear (keeps order fields)                    │
//! │  :new                     New Order (clears order fields too)           │
//! │  :export                  write the CSV + workbook artifacts            │
//! │  :quit                    exit                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop is the single mutator: one line is handled to completion before
//! the next is read, so no operation ever interleaves with another.

use chrono::NaiveDate;
use tracing::debug;
use wocheck_core::{ConfigUpdate, Destination, Registry, Session, SheetLayout, ShelfRef};

use crate::export::{run_export, timestamp, WorkbookRenderer};
use crate::feedback::Feedback;
use crate::sources::{FileSink, SaveOutcome, TemplateSource};

/// What the loop should do after a handled line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    Quit,
}

/// Number of history entries `:recent` shows.
const RECENT_LIMIT: usize = 10;

/// One running station: the session plus its collaborators.
pub struct Station {
    session: Session,
    registry: Registry,
    layout: SheetLayout,
    feedback: Feedback,
    template: Box<dyn TemplateSource>,
    renderer: Box<dyn WorkbookRenderer>,
    sink: Box<dyn FileSink>,
}

impl Station {
    pub fn new(
        session: Session,
        registry: Registry,
        layout: SheetLayout,
        feedback: Feedback,
        template: Box<dyn TemplateSource>,
        renderer: Box<dyn WorkbookRenderer>,
        sink: Box<dyn FileSink>,
    ) -> Self {
        Station {
            session,
            registry,
            layout,
            feedback,
            template,
            renderer,
            sink,
        }
    }

    /// Read access for assertions and the startup banner.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handles one input line and returns the response to print.
    pub fn handle_line(&mut self, line: &str) -> (LoopAction, String) {
        let line = line.trim();
        if line.is_empty() {
            return (LoopAction::Continue, "please enter a serial number".to_string());
        }
        if let Some(command) = line.strip_prefix(':') {
            return self.handle_command(command);
        }
        (LoopAction::Continue, self.handle_scan(line))
    }

    fn handle_scan(&mut self, raw: &str) -> String {
        match self.session.scan(raw, &self.registry) {
            Ok(accepted) => match accepted.destination {
                Destination::Separate => {
                    self.feedback.trigger();
                    format!("MOVE ASIDE  {} is on the list", accepted.serial)
                }
                Destination::Shelf(shelf) => {
                    format!("Continue  {} -> shelf {}", accepted.serial, shelf + 1)
                }
            },
            Err(reject) => format!("Rejected: {reject}"),
        }
    }

    fn handle_command(&mut self, command: &str) -> (LoopAction, String) {
        let mut parts = command.split_whitespace();
        let verb = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        debug!(verb, ?args, "command");

        let reply = match verb {
            "quit" | "q" => return (LoopAction::Quit, "bye".to_string()),
            "shelf" => self.cmd_shelf(&args),
            "pn" => self.cmd_config_field(&args, "pn", "part number", |v| ConfigUpdate {
                part_number: Some(v),
                ..ConfigUpdate::default()
            }),
            "cart" => self.cmd_config_field(&args, "cart", "cart number", |v| ConfigUpdate {
                cart_number: Some(v),
                ..ConfigUpdate::default()
            }),
            "dn" => self.cmd_config_field(&args, "dn", "delivery number", |v| ConfigUpdate {
                delivery_number: Some(v),
                ..ConfigUpdate::default()
            }),
            "date" => self.cmd_date(&args),
            "dups" => self.cmd_dups(&args),
            "audio" => self.cmd_audio(&args),
            "select" => self.cmd_select(&args),
            "move" => self.cmd_move(&args),
            "remove" => self.cmd_remove(&args),
            "status" => self.cmd_status(),
            "recent" => self.cmd_recent(),
            "list" => self.cmd_list(),
            "clear" => {
                self.session.clear();
                "cleared".to_string()
            }
            "new" => {
                self.session.reset_order();
                "new order started".to_string()
            }
            "export" => self.cmd_export(),
            other => format!("unknown command: :{other}"),
        };
        (LoopAction::Continue, reply)
    }

    fn cmd_shelf(&mut self, args: &[&str]) -> String {
        match args.first().and_then(|a| a.parse::<usize>().ok()) {
            Some(n) => {
                self.session.set_active_shelf(n);
                format!("active shelf: {}", self.session.config().active_shelf)
            }
            None => "usage: :shelf <n>".to_string(),
        }
    }

    fn cmd_config_field(
        &mut self,
        args: &[&str],
        command: &str,
        label: &str,
        build: impl FnOnce(String) -> ConfigUpdate,
    ) -> String {
        if args.is_empty() {
            return format!("usage: :{command} <value>");
        }
        let value = args.join(" ");
        self.session.update_config(build(value.clone()));
        format!("{label}: {value}")
    }

    fn cmd_date(&mut self, args: &[&str]) -> String {
        match args
            .first()
            .and_then(|a| NaiveDate::parse_from_str(a, "%Y-%m-%d").ok())
        {
            Some(date) => {
                self.session.update_config(ConfigUpdate {
                    date: Some(date),
                    ..ConfigUpdate::default()
                });
                format!("date: {date}")
            }
            None => "usage: :date <YYYY-MM-DD>".to_string(),
        }
    }

    fn cmd_dups(&mut self, args: &[&str]) -> String {
        match args.first() {
            Some(&"on") => {
                self.session.set_dup_allowed(true);
                "duplicate scanning: on".to_string()
            }
            Some(&"off") => {
                self.session.set_dup_allowed(false);
                "duplicate scanning: off".to_string()
            }
            _ => "usage: :dups on|off".to_string(),
        }
    }

    fn cmd_audio(&mut self, args: &[&str]) -> String {
        match args.first() {
            Some(&"on") => {
                self.feedback.set_enabled(true);
                "audio: on".to_string()
            }
            Some(&"off") => {
                self.feedback.set_enabled(false);
                "audio: off".to_string()
            }
            _ => "usage: :audio on|off".to_string(),
        }
    }

    fn cmd_select(&mut self, args: &[&str]) -> String {
        match args {
            ["shelf", shelf, pos] => {
                match (shelf.parse::<usize>(), pos.parse::<usize>()) {
                    (Ok(shelf), Ok(pos)) if shelf >= 1 && pos >= 1 => {
                        let r = ShelfRef::new(shelf - 1, pos - 1);
                        let selected = self.session.toggle_shelf_selection(r);
                        format!(
                            "shelf {shelf} #{pos}: {}",
                            if selected { "selected" } else { "deselected" }
                        )
                    }
                    _ => "usage: :select shelf <shelf> <pos>".to_string(),
                }
            }
            ["sep", pos] => match pos.parse::<usize>() {
                Ok(pos) if pos >= 1 => {
                    let selected = self.session.toggle_separate_selection(pos - 1);
                    format!(
                        "separate #{pos}: {}",
                        if selected { "selected" } else { "deselected" }
                    )
                }
                _ => "usage: :select sep <pos>".to_string(),
            },
            _ => "usage: :select shelf <shelf> <pos> | :select sep <pos>".to_string(),
        }
    }

    fn cmd_move(&mut self, args: &[&str]) -> String {
        match args.first().and_then(|a| a.parse::<usize>().ok()) {
            Some(target) => {
                let moved = self.session.move_selected(target);
                format!("moved {moved} to shelf {}", target.clamp(1, self.session.shelf_count()))
            }
            None => "usage: :move <shelf>".to_string(),
        }
    }

    fn cmd_remove(&mut self, args: &[&str]) -> String {
        match args.first() {
            Some(&"shelf") => {
                let removed = self.session.remove_selected_shelf();
                format!("removed {} from shelves", removed.len())
            }
            Some(&"sep") => {
                let removed = self.session.remove_selected_separate();
                format!("removed {} from separate list", removed.len())
            }
            _ => "usage: :remove shelf|sep".to_string(),
        }
    }

    fn cmd_status(&self) -> String {
        let config = self.session.config();
        format!(
            "part {} | cart {} | delivery {} | shelf {}/{} | scanned {} | separate {} | history {}",
            display_or_dash(&config.part_number),
            display_or_dash(&config.cart_number),
            display_or_dash(&config.delivery_number),
            config.active_shelf,
            self.session.shelf_count(),
            self.session.total_scanned(),
            self.session.separate_count(),
            self.session.history().len(),
        )
    }

    fn cmd_recent(&self) -> String {
        let mut lines = Vec::new();
        for event in self.session.recent(RECENT_LIMIT) {
            let destination = match event.destination {
                Destination::Separate => "separate".to_string(),
                Destination::Shelf(shelf) => format!("shelf {}", shelf + 1),
            };
            lines.push(format!("#{} {} -> {}", event.seq + 1, event.serial, destination));
        }
        if lines.is_empty() {
            "no scans yet".to_string()
        } else {
            lines.join("\n")
        }
    }

    fn cmd_list(&self) -> String {
        let mut lines = Vec::new();
        for (shelf, bucket) in self.session.buckets().iter().enumerate() {
            lines.push(format!("shelf {} ({} items)", shelf + 1, bucket.len()));
            for (pos, entry) in bucket.iter().enumerate() {
                lines.push(format!("  {}. {}", pos + 1, entry.serial));
            }
        }
        lines.push(format!(
            "separate ({} items)",
            self.session.separate_count()
        ));
        for (pos, entry) in self.session.separate().iter().enumerate() {
            lines.push(format!("  {}. {}", pos + 1, entry.serial));
        }
        lines.join("\n")
    }

    fn cmd_export(&self) -> String {
        let report = run_export(
            &self.session,
            &self.layout,
            self.template.as_ref(),
            self.renderer.as_ref(),
            self.sink.as_ref(),
            &timestamp(),
        );

        let mut lines = Vec::new();
        match &report.csv {
            None => lines.push("no separated serials to export".to_string()),
            Some(Ok(SaveOutcome::Saved(path))) => {
                lines.push(format!("separated CSV written: {}", path.display()))
            }
            Some(Ok(SaveOutcome::Canceled)) => lines.push("CSV save canceled".to_string()),
            Some(Err(e)) => lines.push(format!("CSV export failed: {e}")),
        }
        match &report.workbook {
            Ok(SaveOutcome::Saved(path)) => {
                lines.push(format!("workbook fill written: {}", path.display()))
            }
            Ok(SaveOutcome::Canceled) => lines.push("workbook save canceled".to_string()),
            Err(e) => lines.push(format!("workbook export failed: {e}")),
        }
        lines.join("\n")
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StationResult;
    use crate::export::JsonFillRenderer;
    use crate::feedback::Cue;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::sync::Arc;

    struct SilentCue;

    impl Cue for SilentCue {
        fn play(&self) {}
    }

    struct StaticTemplate;

    impl TemplateSource for StaticTemplate {
        fn load(&self) -> StationResult<Vec<u8>> {
            Ok(b"xlsx-bytes".to_vec())
        }
    }

    struct NullSink;

    impl FileSink for NullSink {
        fn save(&self, suggested_name: &str, _bytes: &[u8]) -> StationResult<SaveOutcome> {
            Ok(SaveOutcome::Saved(PathBuf::from(suggested_name)))
        }
    }

    fn test_station() -> Station {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        Station::new(
            Session::new(4, 10, date),
            Registry::from_rows(["ABC1234567"]),
            SheetLayout::default(),
            Feedback::new(Arc::new(SilentCue)),
            Box::new(StaticTemplate),
            Box::new(JsonFillRenderer),
            Box::new(NullSink),
        )
    }

    #[test]
    fn test_scan_line_routes_and_reports() {
        let mut station = test_station();

        let (_, reply) = station.handle_line("abc1234567");
        assert!(reply.starts_with("MOVE ASIDE"));

        let (_, reply) = station.handle_line("XYZ7654321");
        assert_eq!(reply, "Continue  XYZ7654321 -> shelf 1");
    }

    #[test]
    fn test_duplicate_scan_reports_rejection() {
        let mut station = test_station();
        station.handle_line("XYZ7654321");

        let (_, reply) = station.handle_line("xyz7654321");
        assert_eq!(reply, "Rejected: already scanned: XYZ7654321");
        assert_eq!(station.session().history().len(), 1);
    }

    #[test]
    fn test_shelf_command_clamps() {
        let mut station = test_station();
        let (_, reply) = station.handle_line(":shelf 99");
        assert_eq!(reply, "active shelf: 4");
    }

    #[test]
    fn test_select_move_round_trip() {
        let mut station = test_station();
        station.handle_line("SN00000001");
        station.handle_line("SN00000002");

        station.handle_line(":select shelf 1 1");
        let (_, reply) = station.handle_line(":move 2");
        assert_eq!(reply, "moved 1 to shelf 2");
        assert_eq!(station.session().bucket(1)[0].serial, "SN00000001");
    }

    #[test]
    fn test_remove_separate_round_trip() {
        let mut station = test_station();
        station.handle_line("abc1234567");
        station.handle_line(":select sep 1");

        let (_, reply) = station.handle_line(":remove sep");
        assert_eq!(reply, "removed 1 from separate list");
        assert_eq!(station.session().separate_count(), 0);
    }

    #[test]
    fn test_quit_command() {
        let mut station = test_station();
        let (action, _) = station.handle_line(":quit");
        assert_eq!(action, LoopAction::Quit);
    }

    #[test]
    fn test_unknown_command() {
        let mut station = test_station();
        let (_, reply) = station.handle_line(":frobnicate");
        assert_eq!(reply, "unknown command: :frobnicate");
    }

    #[test]
    fn test_export_reports_both_artifacts() {
        let mut station = test_station();
        station.handle_line("abc1234567");
        station.handle_line("SN00000001");

        let (_, reply) = station.handle_line(":export");
        assert!(reply.contains("separated CSV written"));
        assert!(reply.contains("workbook fill written"));
    }
}
