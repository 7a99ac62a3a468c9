//! Core domain logic for the notes universe.
//! This crate is the single source of truth for placement, storage and scene
//! invariants; renderers only consume what it produces.

pub mod config;
pub mod db;
pub mod graph;
pub mod layout;
pub mod logging;
pub mod model;
pub mod runtime;
pub mod scene;
pub mod service;
pub mod store;

pub use config::{ConfigError, UniverseConfig};
pub use graph::proximity::{build_edges, Edge, DEFAULT_EDGE_THRESHOLD};
pub use layout::allocator::{allocate, allocate_at, LayoutError, Shell};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{
    Note, NoteDraft, NoteId, NotePatch, NoteValidationError, Position, SUN_NOTE_ID,
};
pub use runtime::frame_loop::{FrameLoop, FrameTick, StopHandle};
pub use scene::{HoverChange, SceneError, SphereInstance, SphereStyle};
pub use service::universe::{ClickOutcome, FrameReport, Universe, UniverseError};
pub use store::backend::{MemorySnapshotBackend, SnapshotBackend, SqliteSnapshotBackend};
pub use store::note_store::{generate_color, NoteStore, StoreChange, DEFAULT_STORAGE_KEY};
pub use store::{StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
