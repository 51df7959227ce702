//! Pattern lines: per-player staging rows of capacity 1 through 5.

use serde::Serialize;

use crate::error::PatternLineError;
use crate::tile::TileColor;

/// How a batch of tiles was split by [`PatternLine::try_add`]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Accepted {
    /// Tiles now on the line
    pub accepted: usize,
    /// Tiles the caller must route to the floor line
    pub rejected: usize,
}

/// A single pattern line. Every tile on it has the same color.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PatternLine {
    capacity: u8,
    color: Option<TileColor>, // None => empty
    count: u8,
}

impl PatternLine {
    /// The line for wall row `row` (capacity `row + 1`)
    pub fn new(row: usize) -> Self {
        PatternLine {
            capacity: row as u8 + 1,
            color: None,
            count: 0,
        }
    }

    pub fn color(&self) -> Option<TileColor> {
        self.color
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    pub fn remaining(&self) -> usize {
        self.capacity() - self.len()
    }

    pub fn is_full(&self) -> bool {
        self.count == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Add a single-colored batch of tiles, front first.
    ///
    /// Takes `min(remaining, tiles.len())` tiles and reports the rest as
    /// rejected. A full line of the same color accepts nothing. Fails without
    /// touching the line if it holds a different color or if the batch mixes
    /// colors.
    pub fn try_add(&mut self, tiles: &[TileColor]) -> Result<Accepted, PatternLineError> {
        let Some(&first) = tiles.first() else {
            return Ok(Accepted::default());
        };
        if tiles.iter().any(|&c| c != first) {
            return Err(PatternLineError::MixedColors);
        }
        if let Some(existing) = self.color {
            if existing != first {
                return Err(PatternLineError::ColorMismatch {
                    line: existing,
                    offered: first,
                });
            }
        }

        let accepted = self.remaining().min(tiles.len());
        if accepted > 0 {
            self.color = Some(first);
            self.count += accepted as u8;
        }
        Ok(Accepted {
            accepted,
            rejected: tiles.len() - accepted,
        })
    }

    /// Empty the line, returning its color and how many tiles it held.
    pub fn take_all(&mut self) -> Option<(TileColor, usize)> {
        let color = self.color.take()?;
        let count = std::mem::take(&mut self.count) as usize;
        Some((color, count))
    }

    pub(crate) fn restore(&mut self, line: PatternLine) {
        debug_assert_eq!(self.capacity, line.capacity);
        *self = line;
    }
}
