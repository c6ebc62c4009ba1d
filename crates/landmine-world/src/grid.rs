//! Bounded 2D grid holding any number of entities per cell.

use landmine_core::{EntityId, EntityKind, Error, Position, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An entity reference stored in a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub id: EntityId,
    pub kind: EntityKind,
}

/// A square, non-wrapping grid
#[derive(Debug, Clone)]
pub struct Grid {
    pub size: i32,
    cells: Vec<Vec<Occupant>>,
    index: HashMap<EntityId, Position>,
}

impl Grid {
    pub fn new(size: i32) -> Self {
        let cell_count = (size.max(0) * size.max(0)) as usize;
        Self {
            size,
            cells: vec![Vec::new(); cell_count],
            index: HashMap::new(),
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.in_bounds(self.size)
    }

    fn check_bounds(&self, pos: Position) -> Result<()> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                position: pos,
                size: self.size,
            })
        }
    }

    /// Put an entity into the cell at `pos`
    pub fn place(&mut self, id: EntityId, kind: EntityKind, pos: Position) -> Result<()> {
        self.check_bounds(pos)?;
        if let Some(existing) = self.index.get(&id) {
            return Err(Error::InvalidState(format!(
                "entity {} is already placed at {}",
                id, existing
            )));
        }

        let index = self.pos_to_index(pos);
        self.cells[index].push(Occupant { id, kind });
        self.index.insert(id, pos);
        Ok(())
    }

    /// Take an entity off the grid, returning the position it occupied
    pub fn remove(&mut self, id: EntityId) -> Result<Position> {
        let (pos, _) = self.detach(id)?;
        self.index.remove(&id);
        Ok(pos)
    }

    /// Relocate an entity, returning its previous position
    pub fn move_entity(&mut self, id: EntityId, new_pos: Position) -> Result<Position> {
        self.check_bounds(new_pos)?;
        let (old_pos, occupant) = self.detach(id)?;

        let index = self.pos_to_index(new_pos);
        self.cells[index].push(occupant);
        self.index.insert(id, new_pos);
        Ok(old_pos)
    }

    fn detach(&mut self, id: EntityId) -> Result<(Position, Occupant)> {
        let pos = *self.index.get(&id).ok_or(Error::LookupFailure(id))?;
        let index = self.pos_to_index(pos);
        let cell = &mut self.cells[index];
        let slot = cell
            .iter()
            .position(|occupant| occupant.id == id)
            .ok_or(Error::LookupFailure(id))?;
        Ok((pos, cell.remove(slot)))
    }

    /// Orthogonally adjacent in-bounds positions (west, east, north, south)
    pub fn neighborhood(&self, pos: Position, include_center: bool) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(5);
        if include_center && self.in_bounds(pos) {
            neighbors.push(pos);
        }

        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let neighbor = pos.add(dx, dy);
            if self.in_bounds(neighbor) {
                neighbors.push(neighbor);
            }
        }

        neighbors
    }

    /// Everything in the cell at `pos`; empty for off-grid positions
    pub fn cell_contents(&self, pos: Position) -> &[Occupant] {
        if !self.in_bounds(pos) {
            return &[];
        }
        &self.cells[self.pos_to_index(pos)]
    }

    /// Landmine ids in the cell at `pos`
    pub fn landmines_at(&self, pos: Position) -> Vec<EntityId> {
        self.cell_contents(pos)
            .iter()
            .filter(|occupant| occupant.kind == EntityKind::Landmine)
            .map(|occupant| occupant.id)
            .collect()
    }

    pub fn position_of(&self, id: EntityId) -> Option<Position> {
        self.index.get(&id).copied()
    }

    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        let pos = self.position_of(id)?;
        self.cell_contents(pos)
            .iter()
            .find(|occupant| occupant.id == id)
            .map(|occupant| occupant.kind)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of entities of the given kind currently on the grid
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|occupant| occupant.kind == kind)
            .count()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        (pos.y * self.size + pos.x) as usize
    }

    fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.size;
        let y = (index as i32) / self.size;
        Position::new(x, y)
    }

    /// Iterator over all cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (Position, &[Occupant])> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell.as_slice()))
    }

    /// Iterator over the cells holding at least one entity
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Position, &[Occupant])> + '_ {
        self.iter_cells().filter(|(_, cell)| !cell.is_empty())
    }
}
