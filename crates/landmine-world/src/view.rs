//! Read-only views of the world for presentation layers.

use crate::grid::Grid;
use landmine_core::{DestroyerState, EntityKind, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Values shown in the details panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    pub finder_position: Position,
    pub scout_position: Position,
    pub destroyer_position: Position,
    pub destroyer_state: DestroyerState,
    pub landmines_found: usize,
    pub landmines_destroyed: u64,
}

impl Details {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Finder Position: {}", self.finder_position),
            format!("Scout Position: {}", self.scout_position),
            format!("Destroyer Position: {}", self.destroyer_position),
            format!("Destroyer State: {}", self.destroyer_state),
            format!("Landmines Found: {}", self.landmines_found),
            format!("Landmines Destroyed: {}", self.landmines_destroyed),
        ]
    }
}

impl fmt::Display for Details {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// Occupants of one non-empty cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub position: Position,
    pub occupants: Vec<EntityKind>,
}

/// Serializable copy of everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub grid_size: i32,
    pub cells: Vec<CellSnapshot>,
    pub details: Details,
}

impl WorldSnapshot {
    pub fn capture(tick: u64, grid: &Grid, details: Details) -> Self {
        let cells = grid
            .occupied_cells()
            .map(|(position, occupants)| CellSnapshot {
                position,
                occupants: occupants.iter().map(|occupant| occupant.kind).collect(),
            })
            .collect();

        Self {
            tick,
            grid_size: grid.size,
            cells,
            details,
        }
    }

    /// Kinds present at `pos`
    pub fn kinds_at(&self, pos: Position) -> &[EntityKind] {
        self.cells
            .iter()
            .find(|cell| cell.position == pos)
            .map(|cell| cell.occupants.as_slice())
            .unwrap_or(&[])
    }
}

/// Text map of the grid, one row per line. Cells holding more than one
/// entity are drawn as `*`.
pub fn render_ascii(grid: &Grid) -> String {
    let mut out = String::with_capacity(((grid.size + 1) * grid.size) as usize);
    for (pos, occupants) in grid.iter_cells() {
        let glyph = match occupants {
            [] => '.',
            [single] => single.kind.glyph(),
            _ => '*',
        };
        out.push(glyph);
        if pos.x == grid.size - 1 {
            out.push('\n');
        }
    }
    out
}
