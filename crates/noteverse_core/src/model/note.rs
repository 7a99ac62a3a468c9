//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record rendered as one sphere in the universe.
//! - Provide field validation shared by store writes and snapshot decode.
//!
//! # Invariants
//! - `id` is positive and unique within one store.
//! - `color` is always a `#RRGGBB` hex string.
//! - `position`, once assigned, never changes until the note is deleted.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color regex"));

/// Integer identity of one note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = i64;

/// Id of the distinguished first note rendered at the origin.
pub const SUN_NOTE_ID: NoteId = 1;

/// Point in universe space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Euclidean distance between two points.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance from the Y axis, i.e. the orbit radius on the XZ plane.
    pub fn horizontal_radius(&self) -> f64 {
        self.x.hypot(self.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Validation failures for note records.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteValidationError {
    NonPositiveId(NoteId),
    InvalidColor(String),
    NonFinitePosition(NoteId),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId(id) => write!(f, "note id must be positive, got {id}"),
            Self::InvalidColor(value) => {
                write!(f, "note color must be a #RRGGBB hex string, got `{value}`")
            }
            Self::NonFinitePosition(id) => {
                write!(f, "note {id} has a non-finite position component")
            }
        }
    }
}

impl Error for NoteValidationError {}

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub color: String,
    /// Creation date as display text.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Note {
    /// Creates a note without a position; the store allocates one on insert.
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        color: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            color: color.into(),
            date: date.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether this note is the sun rendered at the center of the universe.
    pub fn is_sun(&self) -> bool {
        self.id == SUN_NOTE_ID
    }

    /// Checks record-level invariants.
    ///
    /// Uniqueness of `id` is a store-level concern and is not checked here.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id <= 0 {
            return Err(NoteValidationError::NonPositiveId(self.id));
        }
        validate_color(&self.color)?;
        if let Some(position) = self.position {
            if !position.is_finite() {
                return Err(NoteValidationError::NonFinitePosition(self.id));
            }
        }
        Ok(())
    }
}

/// Input for creating a note whose id, date and position are store-assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    /// Random color is generated when `None`.
    pub color: Option<String>,
    /// Allocated from the insertion index when `None`.
    pub position: Option<Position>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Partial edit applied by `NoteStore::update`.
///
/// Identity, creation date and position are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<String>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.color.is_none()
    }

    /// Returns a new record with the patch applied on top of `note`.
    pub fn apply_to(&self, note: &Note) -> Note {
        let mut next = note.clone();
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(content) = &self.content {
            next.content = content.clone();
        }
        if let Some(color) = &self.color {
            next.color = color.clone();
        }
        next
    }
}

/// Validates a `#RRGGBB` color string.
pub fn validate_color(color: &str) -> Result<(), NoteValidationError> {
    if HEX_COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(NoteValidationError::InvalidColor(color.to_string()))
    }
}
