//! Domain model for notes placed in the universe.
//!
//! # Responsibility
//! - Define canonical data structures used by store, layout and scene logic.
//!
//! # Invariants
//! - Every note is identified by a positive, store-unique `NoteId`.
//! - Edges between notes are derived data and never live in the model.

pub mod note;
