//! Tile colors and the tokens that move between containers.

use std::fmt;

use serde::Serialize;

/// Number of distinct tile colors
pub const TILE_COLORS: usize = 5;

/// Tiles of each color in a fresh bag
pub const TILES_PER_COLOR: usize = 20;

/// Total colored tiles in a game
pub const TOTAL_TILES: usize = TILE_COLORS * TILES_PER_COLOR;

/// Tile colors (order fixed; it is the index order used by the wall pattern)
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileColor {
    Blue = 0,
    White = 1,
    Red = 2,
    Black = 3,
    Yellow = 4,
}

impl TileColor {
    pub const ALL: [TileColor; TILE_COLORS] = [
        TileColor::Blue,
        TileColor::White,
        TileColor::Red,
        TileColor::Black,
        TileColor::Yellow,
    ];

    /// Position of this color in [`TileColor::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Convert from u8 index to TileColor
    pub fn from_index(idx: u8) -> Option<TileColor> {
        TileColor::ALL.get(idx as usize).copied()
    }

    /// Single-letter code for compact rendering
    pub fn symbol(self) -> char {
        match self {
            TileColor::Blue => 'B',
            TileColor::White => 'W',
            TileColor::Red => 'R',
            TileColor::Black => 'K',
            TileColor::Yellow => 'Y',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TileColor::Blue => "blue",
            TileColor::White => "white",
            TileColor::Red => "red",
            TileColor::Black => "black",
            TileColor::Yellow => "yellow",
        }
    }
}

impl fmt::Display for TileColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Token in the center pool or on a floor line
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(tag = "kind", content = "color", rename_all = "snake_case")]
pub enum Tile {
    Colored(TileColor),
    /// Colorless; whoever drafts it from the center starts the next round
    FirstPlayerMarker,
}

impl Tile {
    /// The tile's color, `None` for the first-player marker
    pub fn color(self) -> Option<TileColor> {
        match self {
            Tile::Colored(color) => Some(color),
            Tile::FirstPlayerMarker => None,
        }
    }

    pub fn is_marker(self) -> bool {
        matches!(self, Tile::FirstPlayerMarker)
    }
}

impl From<TileColor> for Tile {
    fn from(color: TileColor) -> Self {
        Tile::Colored(color)
    }
}
