//! Universe configuration.
//!
//! # Responsibility
//! - Hold tunables for storage, layout, scene and frame pacing.
//! - Parse them from JSON with every field optional.
//!
//! # Invariants
//! - A validated config has positive radii, threshold, distance and rate.

use crate::graph::proximity::DEFAULT_EDGE_THRESHOLD;
use crate::scene::SphereStyle;
use crate::store::note_store::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UniverseConfig {
    /// Snapshot key the note collection is stored under.
    pub storage_key: String,
    /// Notes closer than this are linked by a constellation line.
    pub edge_threshold: f64,
    pub sun_radius: f64,
    pub note_radius: f64,
    pub frames_per_second: u32,
    /// Group rotation about Y applied every frame, in radians.
    pub rotation_per_frame: f64,
    pub camera_distance: f64,
    /// Fixes placement jitter and generated colors when set.
    pub seed: Option<u64>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        let style = SphereStyle::default();
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            sun_radius: style.sun_radius,
            note_radius: style.note_radius,
            frames_per_second: 60,
            rotation_per_frame: 0.002,
            camera_distance: 30.0,
            seed: None,
        }
    }
}

impl UniverseConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key cannot be empty".to_string()));
        }
        for (name, value) in [
            ("edge_threshold", self.edge_threshold),
            ("sun_radius", self.sun_radius),
            ("note_radius", self.note_radius),
            ("camera_distance", self.camera_distance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.frames_per_second == 0 {
            return Err(ConfigError::Invalid(
                "frames_per_second must be at least 1".to_string(),
            ));
        }
        if !self.rotation_per_frame.is_finite() {
            return Err(ConfigError::Invalid(
                "rotation_per_frame must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sphere_style(&self) -> SphereStyle {
        SphereStyle {
            sun_radius: self.sun_radius,
            note_radius: self.note_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, UniverseConfig};

    #[test]
    fn empty_object_yields_defaults() {
        let config = UniverseConfig::from_json_str("{}").unwrap();
        assert_eq!(config, UniverseConfig::default());
        assert_eq!(config.storage_key, "universe_notes");
        assert_eq!(config.edge_threshold, 15.0);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = UniverseConfig::from_json_str(r#"{"edge_threshold": 9.5, "seed": 7}"#).unwrap();
        assert_eq!(config.edge_threshold, 9.5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.frames_per_second, 60);
    }

    #[test]
    fn rejects_non_positive_values_and_unknown_fields() {
        let err = UniverseConfig::from_json_str(r#"{"note_radius": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = UniverseConfig::from_json_str(r#"{"colour": 1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
