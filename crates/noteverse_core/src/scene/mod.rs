//! Rendering-surface contract: what gets drawn and how pointers hit it.
//!
//! # Responsibility
//! - Turn notes into positioned sphere instances (sun larger and emissive).
//! - Provide the camera, pointer-to-ray conversion and nearest-hit testing.
//! - Track hover transitions so a renderer only toggles highlight on change.
//!
//! # Invariants
//! - Hit-testing always reports the nearest sphere along the ray.
//! - Instances are rebuilt from store data; they never own note state.

pub mod camera;
pub mod hit;
pub mod hover;

use crate::model::note::{Note, NoteId, Position};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use camera::{pointer_to_ndc, Camera, Ray};
pub use hit::{hit_test, Hit};
pub use hover::{HoverChange, HoverTracker};

#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Viewport with a zero dimension.
    EmptyViewport { width: u32, height: u32 },
}

impl Display for SceneError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyViewport { width, height } => {
                write!(f, "viewport must be non-empty, got {width}x{height}")
            }
        }
    }
}

impl Error for SceneError {}

/// One drawable note sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereInstance {
    pub id: NoteId,
    pub center: Position,
    pub radius: f64,
    pub color: String,
    pub emissive: bool,
}

/// Sphere sizes used when building instances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereStyle {
    pub sun_radius: f64,
    pub note_radius: f64,
}

impl Default for SphereStyle {
    fn default() -> Self {
        Self {
            sun_radius: 2.0,
            note_radius: 1.0,
        }
    }
}

/// Builds one instance per placed note, in store order.
///
/// Notes without a position are not drawable and are skipped.
pub fn build_instances(notes: &[Note], style: SphereStyle) -> Vec<SphereInstance> {
    notes
        .iter()
        .filter_map(|note| {
            let center = note.position?;
            let is_sun = note.is_sun();
            Some(SphereInstance {
                id: note.id,
                center,
                radius: if is_sun {
                    style.sun_radius
                } else {
                    style.note_radius
                },
                color: note.color.clone(),
                emissive: is_sun,
            })
        })
        .collect()
}
