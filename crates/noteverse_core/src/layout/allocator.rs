//! Orbital position allocator.
//!
//! # Responsibility
//! - Map a note's insertion index to a point on one of the concentric shells.
//!
//! # Invariants
//! - Index 0 is always the origin.
//! - Shell radius and base angle depend only on the index; jitter and height
//!   come from the caller's rng, so a seeded rng reproduces a layout exactly.
//! - Spiral indices (> 20) carry no angular jitter, so their radius is exact.

use crate::model::note::Position;
use rand::Rng;
use std::error::Error;
use std::f64::consts::TAU;
use std::fmt::{Display, Formatter};

const INNER_RADIUS: f64 = 8.0;
const INNER_SLOTS: f64 = 5.0;
const INNER_LAST_INDEX: usize = 5;
const OUTER_RADIUS: f64 = 16.0;
const OUTER_SLOTS: f64 = 15.0;
const OUTER_LAST_INDEX: usize = 20;
const SPIRAL_BASE_RADIUS: f64 = 24.0;
const SPIRAL_RADIUS_STEP: f64 = 0.5;
const SPIRAL_ANGLE_STEP: f64 = 0.5;
const MAX_ANGLE_JITTER: f64 = 0.5;
const HEIGHT_MIN: f64 = -2.0;
const HEIGHT_MAX: f64 = 2.0;

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Index is outside the allocator's domain (negative).
    InvalidArgument(String),
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
        }
    }
}

impl Error for LayoutError {}

/// Radius band a note index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// Index 0, fixed at the origin.
    Sun,
    /// Indices 1..=5.
    Inner,
    /// Indices 6..=20.
    Outer,
    /// Indices past 20, spiralling outward.
    Spiral,
}

impl Shell {
    pub fn of(index: usize) -> Self {
        match index {
            0 => Self::Sun,
            1..=INNER_LAST_INDEX => Self::Inner,
            6..=OUTER_LAST_INDEX => Self::Outer,
            _ => Self::Spiral,
        }
    }

    /// Orbit radius for `index`; spiral indices below the spiral start clamp
    /// to the base radius.
    pub fn radius(self, index: usize) -> f64 {
        match self {
            Self::Sun => 0.0,
            Self::Inner => INNER_RADIUS,
            Self::Outer => OUTER_RADIUS,
            Self::Spiral => {
                let steps = index.saturating_sub(OUTER_LAST_INDEX);
                SPIRAL_BASE_RADIUS + steps as f64 * SPIRAL_RADIUS_STEP
            }
        }
    }

    /// Angle before jitter, in radians.
    pub fn base_angle(self, index: usize) -> f64 {
        let index = index as f64;
        match self {
            Self::Sun => 0.0,
            Self::Inner => index * (TAU / INNER_SLOTS),
            Self::Outer => index * (TAU / OUTER_SLOTS),
            Self::Spiral => index * SPIRAL_ANGLE_STEP,
        }
    }

    pub fn has_jitter(self) -> bool {
        matches!(self, Self::Inner | Self::Outer)
    }
}

/// Allocates a position for a possibly untrusted index.
///
/// # Errors
/// - `LayoutError::InvalidArgument` when `index` is negative.
pub fn allocate<R: Rng + ?Sized>(index: i64, rng: &mut R) -> LayoutResult<Position> {
    let index = usize::try_from(index).map_err(|_| {
        LayoutError::InvalidArgument(format!("allocator index must be >= 0, got {index}"))
    })?;
    Ok(allocate_at(index, rng))
}

/// Allocates a position for a known-valid insertion index.
///
/// Rules:
/// - index 0: origin, no rng draws.
/// - inner/outer shells: angle = base + jitter in `[0, 0.5)`.
/// - spiral: angle = base, radius grows by 0.5 per index past 20.
/// - every non-sun index draws a height in `[-2, 2)`.
pub fn allocate_at<R: Rng + ?Sized>(index: usize, rng: &mut R) -> Position {
    let shell = Shell::of(index);
    if shell == Shell::Sun {
        return Position::origin();
    }

    let radius = shell.radius(index);
    let mut angle = shell.base_angle(index);
    if shell.has_jitter() {
        angle += rng.gen_range(0.0..MAX_ANGLE_JITTER);
    }
    let y = rng.gen_range(HEIGHT_MIN..HEIGHT_MAX);

    Position::new(angle.cos() * radius, y, angle.sin() * radius)
}
