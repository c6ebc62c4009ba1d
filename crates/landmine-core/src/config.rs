//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::Position;
use serde::{Deserialize, Serialize};

/// World layout parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Side length of the square grid
    pub grid_size: i32,
    /// Number of landmines scattered at world creation
    pub landmine_count: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: 25,
            landmine_count: 20,
        }
    }
}

impl WorldConfig {
    pub fn finder_start(&self) -> Position {
        Position::new(0, 0)
    }

    pub fn destroyer_start(&self) -> Position {
        Position::new(self.grid_size - 1, self.grid_size - 1)
    }

    pub fn scout_start(&self) -> Position {
        Position::new(self.grid_size / 2, self.grid_size / 2)
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// World configuration
    pub world: WorldConfig,
    /// Stop `run` early once every landmine is destroyed
    pub stop_when_cleared: bool,
    /// Emit a progress log every this many ticks (0 disables)
    pub progress_every: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world: WorldConfig::default(),
            stop_when_cleared: true,
            progress_every: 100,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        // Detectors need at least one neighbor to move to.
        if self.world.grid_size < 2 {
            return Err(Error::Validation(format!(
                "grid_size must be at least 2, got {}",
                self.world.grid_size
            )));
        }
        if self.world.grid_size.checked_mul(self.world.grid_size).is_none() {
            return Err(Error::Validation(format!(
                "grid_size {} has too many cells",
                self.world.grid_size
            )));
        }
        Ok(())
    }
}

/// Headless runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Simulation configuration
    pub sim: SimConfig,
    /// Maximum number of ticks to advance
    pub max_ticks: u64,
    /// Log the details panel every this many ticks (0 disables)
    pub report_every: u64,
    /// Print an ASCII map of the final grid
    pub print_map: bool,
    /// Write the run result as JSON to this path
    pub result_path: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            max_ticks: 1000,
            report_every: 10,
            print_map: true,
            result_path: None,
        }
    }
}
