//! Configuration types for the simulation.

use crate::{Boundary, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the grid
    pub width: i32,
    /// Height of the grid
    pub height: i32,
    /// Edge semantics
    pub boundary: Boundary,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            boundary: Boundary::Bounded,
        }
    }
}

/// Named ANSI colors used by the frame printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// Frame printer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Background color of live cells
    pub alive_color: CellColor,
    /// Background color of dead cells
    pub dead_color: CellColor,
    /// Clip the printed frame to this many columns
    pub max_width: Option<u16>,
    /// Clip the printed frame to this many rows
    pub max_height: Option<u16>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            alive_color: CellColor::Green,
            dead_color: CellColor::Black,
            max_width: None,
            max_height: None,
        }
    }
}

/// Initial population of the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Patterns stamped by name at the given origin
    pub patterns: Vec<PatternPlacement>,
    /// Fraction of cells set alive at random (0.0 to 1.0)
    pub random_density: Option<f64>,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            patterns: vec![PatternPlacement {
                name: "glider".to_string(),
                x: 10,
                y: 10,
            }],
            random_density: None,
            seed: 0,
        }
    }
}

/// A named pattern stamped with its top-left corner at `(x, y)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternPlacement {
    pub name: String,
    pub x: i32,
    pub y: i32,
}

/// Full run configuration for the terminal driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of generations to play
    pub generations: u64,
    /// Delay between frames (milliseconds)
    pub frame_interval_ms: u64,
    /// Smallest grid edge derived from the terminal size
    pub min_terminal_size: u16,
    /// Terminal rows kept free below the grid for the status line
    pub reserved_rows: u16,
    /// World configuration; width/height are replaced by the terminal size
    /// unless `fixed_size` is set
    pub world: WorldConfig,
    /// Use `world.width`/`world.height` instead of the terminal size
    pub fixed_size: bool,
    /// Frame printer configuration
    pub render: RenderConfig,
    /// Initial population
    pub seed: SeedConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            frame_interval_ms: 50,
            min_terminal_size: 20,
            reserved_rows: 2,
            world: WorldConfig::default(),
            fixed_size: false,
            render: RenderConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load a run configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(density) = self.seed.random_density {
            if !(0.0..=1.0).contains(&density) {
                return Err(Error::Config(format!(
                    "random_density must be within 0.0..=1.0, got {}",
                    density
                )));
            }
        }
        if self.fixed_size && (self.world.width < 1 || self.world.height < 1) {
            return Err(Error::InvalidDimensions {
                width: self.world.width,
                height: self.world.height,
            });
        }
        Ok(())
    }
}
