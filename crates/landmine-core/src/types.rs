//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for anything placed on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 2D position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Whether the position lies inside a `size` x `size` grid
    pub fn in_bounds(&self, size: i32) -> bool {
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }

    /// Chebyshev (king-move) distance to another position
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Manhattan distance to another position
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// One greedy step toward `target`: each axis moves by the sign of its delta.
    pub fn step_toward(&self, target: &Position) -> Self {
        self.add((target.x - self.x).signum(), (target.y - self.y).signum())
    }

    /// True when `other` differs by exactly one on exactly one axis.
    pub fn is_orthogonal_step(&self, other: &Position) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// True when `other` differs by exactly one on both axes.
    pub fn is_diagonal_step(&self, other: &Position) -> bool {
        (self.x - other.x).abs() == 1 && (self.y - other.y).abs() == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Kind of entity occupying a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Landmine,
    Finder,
    Scout,
    Destroyer,
}

impl EntityKind {
    pub fn is_agent(&self) -> bool {
        !matches!(self, EntityKind::Landmine)
    }

    /// Single-character glyph used by text renderers
    pub fn glyph(&self) -> char {
        match self {
            EntityKind::Landmine => 'M',
            EntityKind::Finder => 'F',
            EntityKind::Scout => 'S',
            EntityKind::Destroyer => 'D',
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Landmine => "Landmine",
            EntityKind::Finder => "Finder",
            EntityKind::Scout => "Scout",
            EntityKind::Destroyer => "Destroyer",
        };
        f.write_str(name)
    }
}

/// Visible status of the destroyer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyerState {
    #[default]
    Idle,
    Moving,
    Destroying,
}

impl DestroyerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestroyerState::Idle => "Idle",
            DestroyerState::Moving => "Moving",
            DestroyerState::Destroying => "Destroying",
        }
    }
}

impl fmt::Display for DestroyerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
