//! Per-agent activity counters.

use serde::{Deserialize, Serialize};

/// Activity metrics for one agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMetrics {
    /// Grid moves made
    pub moves: u64,
    /// Number of distinct cells visited, including the start cell
    pub cells_visited: u32,
    /// Landmines this agent added to the registry
    pub detections: u32,
    /// Landmines this agent destroyed
    pub destroyed: u32,
    /// Ticks spent without anything to do
    pub idle_ticks: u64,
    /// Registry entries dropped because the landmine was already gone
    pub stale_targets: u32,
}

impl AgentMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct cells visited per move made
    pub fn coverage_ratio(&self) -> f64 {
        if self.moves == 0 {
            return 0.0;
        }
        self.cells_visited as f64 / self.moves as f64
    }
}

/// World-wide counters, bumped by agents at the moment they act
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub detected: u64,
    pub destroyed: u64,
}
