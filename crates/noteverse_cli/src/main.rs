//! CLI probe for the notes universe core.
//!
//! # Responsibility
//! - Verify `noteverse_core` linkage with deterministic output.
//! - Optionally open a universe database and print its notes and edges.
//!
//! Usage: `noteverse_cli [db_path [config.json]]`. Set `NOTEVERSE_LOG_DIR`
//! to an absolute path to enable file logging.

use noteverse_core::db::open_db;
use noteverse_core::{
    core_version, default_log_level, init_logging, ping, SqliteSnapshotBackend, Universe,
    UniverseConfig,
};
use std::error::Error;
use std::process::ExitCode;

const PROBE_WIDTH: u32 = 1280;
const PROBE_HEIGHT: u32 = 720;

fn main() -> ExitCode {
    println!("noteverse_core ping={}", ping());
    println!("noteverse_core version={}", core_version());

    if let Ok(log_dir) = std::env::var("NOTEVERSE_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        return ExitCode::SUCCESS;
    };

    match print_universe(&db_path, args.next()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_universe(db_path: &str, config_path: Option<String>) -> Result<(), Box<dyn Error>> {
    let config = match config_path {
        Some(path) => UniverseConfig::from_path(path)?,
        None => UniverseConfig::default(),
    };
    let conn = open_db(db_path)?;
    let universe = Universe::open(
        SqliteSnapshotBackend::new(&conn),
        config,
        PROBE_WIDTH,
        PROBE_HEIGHT,
    )?;

    for note in universe.notes() {
        let position = note.position.unwrap_or_default();
        println!(
            "note id={} title={:?} color={} date={} position=({:.2}, {:.2}, {:.2})",
            note.id, note.title, note.color, note.date, position.x, position.y, position.z
        );
    }
    for edge in universe.edges() {
        println!("edge {}-{}", edge.a, edge.b);
    }
    if let Some(err) = universe.store().last_persist_error() {
        eprintln!("warning: snapshot not persisted: {err}");
    }
    Ok(())
}
