//! The 5x5 scoring wall.
//!
//! Each row holds every color exactly once, at the position fixed by
//! [`WALL_PATTERN`]: row `r` is the first row shifted right by `r`. Placement
//! scoring counts the contiguous occupied runs through the new tile.

use serde::Serialize;

use crate::error::WallError;
use crate::tile::{TileColor, TILE_COLORS};

pub const WALL_SIZE: usize = 5;

/// Bonus per complete horizontal row at game end
pub const ROW_BONUS: i16 = 2;
/// Bonus per complete vertical column at game end
pub const COLUMN_BONUS: i16 = 7;
/// Bonus per color with all five tiles on the wall at game end
pub const COLOR_BONUS: i16 = 10;

/// Wall pattern: WALL_PATTERN[row][col] = color at that position
pub const WALL_PATTERN: [[TileColor; WALL_SIZE]; WALL_SIZE] = {
    use TileColor::*;
    [
        [Blue, Yellow, Red, Black, White],
        [White, Blue, Yellow, Red, Black],
        [Black, White, Blue, Yellow, Red],
        [Red, Black, White, Blue, Yellow],
        [Yellow, Red, Black, White, Blue],
    ]
};

/// Column of each color (by index) in the first row of [`WALL_PATTERN`]
const FIRST_ROW_COLUMN: [usize; TILE_COLORS] = [0, 4, 2, 3, 1];

/// End-of-game bonus breakdown for one wall
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EndGameBonus {
    pub rows: u8,
    pub columns: u8,
    pub colors: u8,
}

impl EndGameBonus {
    pub fn total(&self) -> i16 {
        ROW_BONUS * self.rows as i16
            + COLUMN_BONUS * self.columns as i16
            + COLOR_BONUS * self.colors as i16
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Wall {
    occupied: [[bool; WALL_SIZE]; WALL_SIZE],
}

impl Wall {
    pub fn new() -> Self {
        Wall::default()
    }

    /// Column where `color` goes in `row`
    pub fn column_for(row: usize, color: TileColor) -> usize {
        (FIRST_ROW_COLUMN[color.index()] + row) % WALL_SIZE
    }

    /// Whether `row` can still take a tile of `color`
    pub fn can_accept(&self, row: usize, color: TileColor) -> bool {
        row < WALL_SIZE && !self.occupied[row][Self::column_for(row, color)]
    }

    /// Place a tile and return the points it scores.
    pub fn place(&mut self, row: usize, color: TileColor) -> Result<u8, WallError> {
        if row >= WALL_SIZE {
            return Err(WallError::RowOutOfRange(row));
        }
        let col = Self::column_for(row, color);
        if self.occupied[row][col] {
            return Err(WallError::ColorAlreadyInRow { row, color });
        }
        self.occupied[row][col] = true;
        Ok(self.score_at(row, col))
    }

    /// Points for the (occupied) cell at `row`, `col` given its neighbors.
    pub fn score_at(&self, row: usize, col: usize) -> u8 {
        let grid = &self.occupied;

        // Count horizontal run (including placed tile)
        let left = (0..col).rev().take_while(|&c| grid[row][c]).count();
        let right = (col + 1..WALL_SIZE).take_while(|&c| grid[row][c]).count();
        let horiz = 1 + left + right;

        // Count vertical run (including placed tile)
        let up = (0..row).rev().take_while(|&r| grid[r][col]).count();
        let down = (row + 1..WALL_SIZE).take_while(|&r| grid[r][col]).count();
        let vert = 1 + up + down;

        if horiz == 1 && vert == 1 {
            // Isolated tile
            1
        } else {
            let h_score = if horiz > 1 { horiz } else { 0 };
            let v_score = if vert > 1 { vert } else { 0 };
            (h_score + v_score) as u8
        }
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < WALL_SIZE && col < WALL_SIZE && self.occupied[row][col]
    }

    /// The color at `row`, `col` if a tile is there
    pub fn tile_at(&self, row: usize, col: usize) -> Option<TileColor> {
        self.is_occupied(row, col).then(|| WALL_PATTERN[row][col])
    }

    pub fn is_row_complete(&self, row: usize) -> bool {
        row < WALL_SIZE && self.occupied[row].iter().all(|&o| o)
    }

    pub fn is_column_complete(&self, col: usize) -> bool {
        col < WALL_SIZE && self.occupied.iter().all(|r| r[col])
    }

    pub fn is_color_complete(&self, color: TileColor) -> bool {
        (0..WALL_SIZE).all(|row| self.occupied[row][Self::column_for(row, color)])
    }

    /// Whether any row is complete (the end-of-game trigger)
    pub fn has_complete_row(&self) -> bool {
        (0..WALL_SIZE).any(|row| self.is_row_complete(row))
    }

    pub fn completed_rows(&self) -> usize {
        (0..WALL_SIZE).filter(|&r| self.is_row_complete(r)).count()
    }

    pub fn completed_columns(&self) -> usize {
        (0..WALL_SIZE).filter(|&c| self.is_column_complete(c)).count()
    }

    pub fn completed_colors(&self) -> usize {
        TileColor::ALL
            .iter()
            .filter(|&&color| self.is_color_complete(color))
            .count()
    }

    /// Row, column and color-set bonuses, each counted independently
    pub fn end_game_bonus(&self) -> EndGameBonus {
        EndGameBonus {
            rows: self.completed_rows() as u8,
            columns: self.completed_columns() as u8,
            colors: self.completed_colors() as u8,
        }
    }

    pub fn tile_count(&self) -> usize {
        self.occupied.iter().flatten().filter(|&&o| o).count()
    }
}
