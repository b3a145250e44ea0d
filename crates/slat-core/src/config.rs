//! Editor configuration.
//!
//! Every field has a default, so the host may pass a partial JSON object
//! (or nothing at all).

use crate::error::EditorError;
use crate::grid::GridConfig;
use crate::model::SlatStyle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub grid: GridConfig,

    /// Slat length in grid cells.
    pub slat_length: u32,

    /// Style given to newly placed slats.
    pub slat_style: SlatStyle,

    /// Cargo marker radius as a fraction of the grid pitch.
    pub cargo_radius: f64,

    /// How far (in grid pitches) a pointer may be from a slat and still pick it.
    pub hit_tolerance: f64,

    /// Layers created when a session starts.
    pub initial_layers: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            slat_length: 32,
            slat_style: SlatStyle::default(),
            cargo_radius: 0.4,
            hit_tolerance: 0.5,
            initial_layers: 2,
        }
    }
}

impl EditorConfig {
    /// Parse from JSON. An empty or whitespace-only string yields defaults.
    ///
    /// # Errors
    /// Returns the serde message for malformed JSON, or the validation error.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self = if json.trim().is_empty() {
            Self::default()
        } else {
            serde_json::from_str(json).map_err(|e| e.to_string())?
        };
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }

    /// # Errors
    /// `InvalidGridPitch` or `InvalidSlatLength`.
    pub fn validate(&self) -> Result<(), EditorError> {
        self.grid.validate()?;
        if self.slat_length == 0 {
            return Err(EditorError::InvalidSlatLength);
        }
        Ok(())
    }

    pub fn pitch(&self) -> f64 {
        self.grid.pitch
    }

    /// Pick distance in canvas units.
    pub fn hit_distance(&self) -> f64 {
        self.hit_tolerance * self.grid.pitch
    }

    pub fn cargo_radius_px(&self) -> f64 {
        self.cargo_radius * self.grid.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridStyle;

    #[test]
    fn empty_json_gives_defaults() {
        let cfg = EditorConfig::from_json("  ").unwrap();
        assert_eq!(cfg, EditorConfig::default());
        assert_eq!(cfg.slat_length, 32);
        assert_eq!(cfg.pitch(), 10.0);
    }

    #[test]
    fn partial_json_is_merged_with_defaults() {
        let cfg = EditorConfig::from_json(r#"{"grid":{"pitch":20,"style":"dots"},"initial_layers":1}"#)
            .unwrap();
        assert_eq!(cfg.grid.pitch, 20.0);
        assert_eq!(cfg.grid.major_every, 5);
        assert_eq!(cfg.grid.style, GridStyle::Dots);
        assert_eq!(cfg.initial_layers, 1);
        assert_eq!(cfg.hit_distance(), 10.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(EditorConfig::from_json(r#"{"grid":{"pitch":0}}"#).is_err());
        assert!(EditorConfig::from_json(r#"{"slat_length":0}"#).is_err());
        assert!(EditorConfig::from_json("[1,2]").is_err());
    }
}
