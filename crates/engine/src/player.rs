//! Per-player board: wall, pattern lines, floor line and score.

use serde::Serialize;

use crate::error::DraftError;
use crate::floor::FloorLine;
use crate::pattern_line::PatternLine;
use crate::tile::TileColor;
use crate::wall::{Wall, WALL_SIZE};

/// Index into the player list: 0..num_players-1
pub type PlayerIdx = usize;

/// Complete state for one player. Only the engine mutates it.
#[derive(Clone, Debug, Serialize)]
pub struct Player {
    name: String,
    wall: Wall,
    pattern_lines: [PatternLine; WALL_SIZE],
    floor: FloorLine,
    score: i16, // can go negative from floor penalties
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            wall: Wall::new(),
            pattern_lines: std::array::from_fn(PatternLine::new),
            floor: FloorLine::new(),
            score: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> i16 {
        self.score
    }

    pub fn wall(&self) -> &Wall {
        &self.wall
    }

    pub fn pattern_lines(&self) -> &[PatternLine; WALL_SIZE] {
        &self.pattern_lines
    }

    pub fn pattern_line(&self, row: usize) -> Option<&PatternLine> {
        self.pattern_lines.get(row)
    }

    pub fn floor(&self) -> &FloorLine {
        &self.floor
    }

    /// Whether `color` may be drafted onto pattern line `row`
    pub fn can_place(&self, color: TileColor, row: usize) -> Result<(), DraftError> {
        let line = self
            .pattern_lines
            .get(row)
            .ok_or(DraftError::NoSuchPatternLine(row))?;

        // Wall constraint: can't place if color already in wall row
        if !self.wall.can_accept(row, color) {
            return Err(DraftError::WallRowHasColor { row, color });
        }

        // Pattern line homogeneity
        if let Some(held) = line.color() {
            if held != color {
                return Err(DraftError::LineHoldsOtherColor { row, held });
            }
        }

        if line.is_full() {
            return Err(DraftError::LineFull(row));
        }

        Ok(())
    }

    /// Colored tiles on this board (lines, wall and floor)
    pub fn tile_count(&self) -> usize {
        let lines: usize = self.pattern_lines.iter().map(PatternLine::len).sum();
        lines + self.wall.tile_count() + self.floor.tile_count()
    }

    pub(crate) fn wall_mut(&mut self) -> &mut Wall {
        &mut self.wall
    }

    pub(crate) fn pattern_line_mut(&mut self, row: usize) -> &mut PatternLine {
        &mut self.pattern_lines[row]
    }

    pub(crate) fn floor_mut(&mut self) -> &mut FloorLine {
        &mut self.floor
    }

    pub(crate) fn add_score(&mut self, delta: i16) {
        self.score += delta;
    }
}
