//! Placement of notes in universe space.
//!
//! # Responsibility
//! - Assign each new note a point on concentric orbit shells by creation order.
//!
//! # Invariants
//! - Placement never reads existing positions; only the index and rng matter.

pub mod allocator;
