//! Editor configuration

use crate::action::DEFAULT_MAX_UNDO_DEPTH;
use crate::actions::MAX_TRACK_NAME_LEN;
use crate::coords::{Viewport, MAX_PIXELS_PER_SECOND, MIN_PIXELS_PER_SECOND};
use crate::error::EditorError;
use serde::{Deserialize, Serialize};
use sync_backend::DEFAULT_SAMPLE_RATE;

/// Tunables for an editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo history length
    pub max_undo_depth: usize,
    /// Sample rate assumed until a project is loaded
    pub default_sample_rate: u32,
    pub track_height_px: f64,
    pub ruler_height_px: f64,
    /// Initial zoom
    pub pixels_per_second: f64,
    pub max_track_name_len: usize,
    /// Distance from a clip edge that starts a trim instead of a move
    pub edge_detection_px: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_undo_depth: DEFAULT_MAX_UNDO_DEPTH,
            default_sample_rate: DEFAULT_SAMPLE_RATE,
            track_height_px: 60.0,
            ruler_height_px: 30.0,
            pixels_per_second: 100.0,
            max_track_name_len: MAX_TRACK_NAME_LEN,
            edge_detection_px: 8.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: EditorConfig =
            serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        serde_json::to_string_pretty(self).map_err(|e| EditorError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        if self.max_undo_depth == 0 {
            return Err(EditorError::Config("max_undo_depth must be at least 1".into()));
        }
        if self.default_sample_rate == 0 {
            return Err(EditorError::Config("default_sample_rate must be positive".into()));
        }
        if !(self.track_height_px > 0.0) || !(self.ruler_height_px >= 0.0) {
            return Err(EditorError::Config(format!(
                "invalid track/ruler height {}/{}",
                self.track_height_px, self.ruler_height_px
            )));
        }
        if !(MIN_PIXELS_PER_SECOND..=MAX_PIXELS_PER_SECOND).contains(&self.pixels_per_second) {
            return Err(EditorError::Config(format!(
                "pixels_per_second {} outside [{}, {}]",
                self.pixels_per_second, MIN_PIXELS_PER_SECOND, MAX_PIXELS_PER_SECOND
            )));
        }
        if self.max_track_name_len == 0 || self.max_track_name_len > MAX_TRACK_NAME_LEN {
            return Err(EditorError::Config(format!(
                "max_track_name_len must be in 1..={}",
                MAX_TRACK_NAME_LEN
            )));
        }
        if !(self.edge_detection_px >= 0.0) {
            return Err(EditorError::Config("edge_detection_px must not be negative".into()));
        }
        Ok(())
    }

    /// Initial viewport for a project at `sample_rate`
    pub fn viewport(&self, sample_rate: u32) -> Viewport {
        Viewport::new(
            self.pixels_per_second,
            self.ruler_height_px,
            self.track_height_px,
            sample_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.max_undo_depth, 50);
        assert_eq!(config.default_sample_rate, 44_100);
        assert_eq!(config.edge_detection_px, 8.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EditorConfig::from_json(r#"{ "max_undo_depth": 10, "track_height_px": 80.0 }"#).unwrap();
        assert_eq!(config.max_undo_depth, 10);
        assert_eq!(config.track_height_px, 80.0);
        assert_eq!(config.pixels_per_second, 100.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EditorConfig::from_json(r#"{ "pixels_per_second": 900.0 }"#),
            Err(EditorError::Config(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "max_undo_depth": 0 }"#),
            Err(EditorError::Config(_))
        ));
        assert!(matches!(EditorConfig::from_json("not json"), Err(EditorError::Config(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = EditorConfig {
            edge_detection_px: 4.0,
            ..Default::default()
        };
        assert_eq!(EditorConfig::from_json(&config.to_json().unwrap()).unwrap(), config);
    }
}
