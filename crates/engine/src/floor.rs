//! The floor line: surplus tiles and the first-player marker, each costing
//! points at the end of the round.

use serde::Serialize;

use crate::tile::Tile;

pub const FLOOR_CAPACITY: usize = 7;

/// Floor penalties (fixed table, applied left to right)
pub const FLOOR_PENALTY: [i16; FLOOR_CAPACITY] = [-1, -1, -2, -2, -2, -3, -3];

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct FloorLine {
    slots: Vec<Tile>,
}

impl FloorLine {
    pub fn new() -> Self {
        FloorLine {
            slots: Vec::with_capacity(FLOOR_CAPACITY),
        }
    }

    /// Place tiles in order while slots remain. Returns how many were placed;
    /// the rest leave the game.
    pub fn add_overflow(&mut self, tiles: &[Tile]) -> usize {
        let accepted = self.remaining().min(tiles.len());
        self.slots.extend_from_slice(&tiles[..accepted]);
        accepted
    }

    /// Place one tile if a slot is free.
    pub fn push(&mut self, tile: Tile) -> bool {
        self.add_overflow(&[tile]) == 1
    }

    /// Sum of the penalty table over the occupied slots (always <= 0)
    pub fn penalty(&self) -> i16 {
        FLOOR_PENALTY[..self.slots.len()].iter().sum()
    }

    /// Empty the line, returning what it held.
    pub fn clear(&mut self) -> Vec<Tile> {
        std::mem::take(&mut self.slots)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn remaining(&self) -> usize {
        FLOOR_CAPACITY - self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == FLOOR_CAPACITY
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.slots
    }

    pub fn has_marker(&self) -> bool {
        self.slots.contains(&Tile::FirstPlayerMarker)
    }

    /// Colored tiles on the line
    pub fn tile_count(&self) -> usize {
        self.slots.iter().filter(|t| !t.is_marker()).count()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.slots.truncate(len);
    }
}
