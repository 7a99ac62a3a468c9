//! Use-case facade over store, layout, graph and scene.
//!
//! # Responsibility
//! - Keep presentation callers decoupled from storage and geometry details.

pub mod universe;
