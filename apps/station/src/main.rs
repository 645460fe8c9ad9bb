//! # Work Order Checker Station
//!
//! The operator-facing binary. Wires the pure engine to its collaborators
//! and runs the scan loop over stdin.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Station Startup                                   │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: INFO, can be overridden with RUST_LOG                    │
//! │                                                                         │
//! │  2. Load Settings ────────────────────────────────────────────────────► │
//! │     • JSON file, serial_length required (fatal if missing)              │
//! │                                                                         │
//! │  3. Load Approved List ───────────────────────────────────────────────► │
//! │     • CSV report, first column, row 2 onward                            │
//! │     • Failure degrades to an empty registry with a warning              │
//! │                                                                         │
//! │  4. Build Session + Collaborators ────────────────────────────────────► │
//! │     • Empty session, local date, shelf 1 active                         │
//! │     • Template source, directory sink, terminal-bell feedback           │
//! │                                                                         │
//! │  5. Run the Scan Loop ────────────────────────────────────────────────► │
//! │     • One line handled to completion at a time (single mutator)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod error;
mod export;
mod feedback;
mod repl;
mod settings;
mod sources;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wocheck_core::{Registry, Session};

use crate::error::StationResult;
use crate::export::JsonFillRenderer;
use crate::feedback::{Feedback, TerminalBell};
use crate::repl::{LoopAction, Station};
use crate::settings::Settings;
use crate::sources::{CsvRegistrySource, DirectorySink, FileTemplateSource, RegistrySource};

/// Work Order Checker scan station.
#[derive(Debug, Parser)]
#[command(name = "wocheck", version, about)]
struct Args {
    /// Station settings file (serial length, shelf layout, cell addresses).
    #[arg(long, env = "WOCHECK_SETTINGS", default_value = "input/settings.json")]
    settings: PathBuf,

    /// Approved-list report (CSV; first column, row 2 onward).
    #[arg(long, env = "WOCHECK_REGISTRY", default_value = "input/batchall_report.csv")]
    registry: PathBuf,

    /// Output spreadsheet template.
    #[arg(long, env = "WOCHECK_TEMPLATE", default_value = "input/outputTemplate.xlsx")]
    template: PathBuf,

    /// Directory export artifacts are written into.
    #[arg(long, env = "WOCHECK_OUTPUT", default_value = "export")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> StationResult<()> {
    init_tracing();
    let args = Args::parse();

    info!("Starting Work Order Checker station");

    // Settings are the only fatal load: without serial_length there is no
    // valid classification rule to run.
    let settings = Settings::load(&args.settings)?;
    info!(
        shelf_count = settings.shelf_count,
        serial_length = settings.serial_length,
        "settings loaded"
    );

    // Approved-list failure degrades to an empty registry: nothing gets
    // flagged, but scanning continues.
    let registry = match CsvRegistrySource::new(&args.registry).load() {
        Ok(rows) => Registry::from_rows(rows),
        Err(e) => {
            warn!(path = %args.registry.display(), error = %e, "approved list unavailable, continuing with an empty registry");
            Registry::empty()
        }
    };
    info!(approved = registry.len(), "registry ready");

    let session = Session::new(
        settings.shelf_count,
        settings.serial_length,
        chrono::Local::now().date_naive(),
    );

    let mut station = Station::new(
        session,
        registry,
        settings.layout(),
        Feedback::new(Arc::new(TerminalBell)),
        Box::new(FileTemplateSource::new(&args.template)),
        Box::new(JsonFillRenderer),
        Box::new(DirectorySink::new(&args.output)),
    );

    println!("Ready to scan ( :quit to exit, :status for counters )");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let (action, reply) = station.handle_line(&line);
        println!("{reply}");
        if action == LoopAction::Quit {
            break;
        }
    }

    info!("Station stopped");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=wocheck=trace` - Show trace for wocheck crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wocheck=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
