//! Proximity ("constellation") edge builder.
//!
//! # Invariants
//! - Each unordered pair is emitted at most once, as `(earlier, later)` in
//!   input order.
//! - A pair is linked only when its distance is strictly below the threshold.

use crate::model::note::{NoteId, Position};

/// Link distance used when the caller has no configured threshold.
pub const DEFAULT_EDGE_THRESHOLD: f64 = 15.0;

/// Unordered pair of linked notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: NoteId,
    pub b: NoteId,
}

impl Edge {
    pub fn new(a: NoteId, b: NoteId) -> Self {
        Self { a, b }
    }

    /// Whether this edge links `first` and `second` in either order.
    pub fn connects(&self, first: NoteId, second: NoteId) -> bool {
        (self.a == first && self.b == second) || (self.a == second && self.b == first)
    }
}

/// Computes all pairs closer than `threshold`.
///
/// Pairs are emitted in `(i, j)` order for `i < j`. The scan is quadratic,
/// which is fine for a universe of tens of notes.
pub fn build_edges(positions: &[(NoteId, Position)], threshold: f64) -> Vec<Edge> {
    let mut edges = Vec::new();
    for (i, (id_a, pos_a)) in positions.iter().enumerate() {
        for (id_b, pos_b) in &positions[i + 1..] {
            if pos_a.distance_to(pos_b) < threshold {
                edges.push(Edge::new(*id_a, *id_b));
            }
        }
    }
    edges
}

/// Resolves edges into line segment endpoints for rendering.
///
/// Edges referring to ids missing from `positions` are skipped.
pub fn segments(positions: &[(NoteId, Position)], edges: &[Edge]) -> Vec<(Position, Position)> {
    let lookup = |id: NoteId| {
        positions
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, position)| *position)
    };

    edges
        .iter()
        .filter_map(|edge| Some((lookup(edge.a)?, lookup(edge.b)?)))
        .collect()
}
