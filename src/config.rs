//! Maze construction configuration
//!
//! Read from JSON when a host wants file-driven setup; every field has a
//! default so partial documents are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, MazeError};
use crate::sim::CellPos;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Grid size for this preset
    pub fn grid_size(&self) -> usize {
        match self {
            Difficulty::Easy => 9,
            Difficulty::Medium => DEFAULT_GRID_SIZE,
            Difficulty::Hard => 31,
        }
    }
}

/// Construction-time settings for one maze instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Cells per side (n)
    pub grid_size: usize,
    /// Replaces the default entrance `(0, 1)`
    pub entrance_override: Option<CellPos>,
    /// Host view width in pixels; cell size is `view_width / grid_size`
    pub view_width: f32,
    /// Gap between the actor glyph and its cell edge
    pub actor_margin: f32,
    /// Pixels moved per tick; defaults to `cell_size / STEPS_PER_CELL`
    pub step_size: Option<f32>,
    /// Generation seed; random when absent
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            entrance_override: None,
            view_width: DEFAULT_VIEW_WIDTH,
            actor_margin: DEFAULT_ACTOR_MARGIN,
            step_size: None,
            seed: None,
        }
    }
}

impl MazeConfig {
    /// Config for a difficulty preset
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            grid_size: difficulty.grid_size(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn cell_size(&self) -> f32 {
        crate::cell_size(self.view_width, self.grid_size)
    }

    /// Reject view widths that would give a zero, negative or NaN cell size
    pub fn validate_view(&self) -> Result<(), MazeError> {
        if !self.view_width.is_finite() || self.view_width <= 0.0 {
            return Err(MazeError::InvalidViewWidth {
                width: self.view_width,
            });
        }
        Ok(())
    }

    /// Actor glyph edge length
    pub fn actor_size(&self) -> f32 {
        (self.cell_size() - self.actor_margin).max(0.0)
    }

    /// Step per tick; one discrete unit of the cell size
    pub fn effective_step(&self) -> f32 {
        match self.step_size {
            Some(step) if step > 0.0 => step,
            _ => self.cell_size() / STEPS_PER_CELL as f32,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read a JSON config file, falling back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded maze config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default maze config ({})", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MazeConfig::default();
        assert_eq!(config.grid_size, DEFAULT_GRID_SIZE);
        assert!((config.cell_size() - 40.0).abs() < 0.0001);
        assert!((config.effective_step() - 5.0).abs() < 0.0001);
        assert!((config.actor_size() - 36.0).abs() < 0.0001);
    }

    #[test]
    fn test_partial_json() {
        let config =
            MazeConfig::from_json(r#"{"grid_size": 7, "entrance_override": {"col": 1, "row": 0}}"#)
                .unwrap();
        assert_eq!(config.grid_size, 7);
        assert_eq!(config.entrance_override, Some(CellPos::new(1, 0)));
        assert_eq!(config.view_width, DEFAULT_VIEW_WIDTH);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_json_round_trip() {
        let config = MazeConfig::from_difficulty(Difficulty::Hard).with_seed(42);
        let back = MazeConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_bad_json_and_missing_file() {
        assert!(matches!(
            MazeConfig::from_json("{grid_size: }"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            MazeConfig::load("/nonexistent/gridwalk.json"),
            Err(ConfigError::Io(_))
        ));
        assert_eq!(
            MazeConfig::load_or_default("/nonexistent/gridwalk.json"),
            MazeConfig::default()
        );
    }

    #[test]
    fn test_explicit_step_wins() {
        let config = MazeConfig {
            step_size: Some(2.0),
            ..MazeConfig::default()
        };
        assert_eq!(config.effective_step(), 2.0);

        let config = MazeConfig {
            step_size: Some(-1.0),
            ..MazeConfig::default()
        };
        assert!((config.effective_step() - 5.0).abs() < 0.0001);
    }

    #[test]
    fn test_difficulty_names() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("med"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("nightmare"), None);
        assert_eq!(Difficulty::Easy.as_str(), "Easy");
        assert!(Difficulty::Easy.grid_size() < Difficulty::Hard.grid_size());
    }

    #[test]
    fn test_view_width_validated() {
        assert!(MazeConfig::default().validate_view().is_ok());
        for width in [0.0, -50.0, f32::NAN, f32::INFINITY] {
            let config = MazeConfig {
                view_width: width,
                ..MazeConfig::default()
            };
            assert!(
                matches!(config.validate_view(), Err(MazeError::InvalidViewWidth { .. })),
                "width {}",
                width
            );
        }
    }
}
