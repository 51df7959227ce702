//! The tile bag: a shuffled queue that refills the factories.
//!
//! The bag is shuffled once when it is built. Tiles that leave play are never
//! returned to it, so a long game can run it dry; draws then simply come back
//! empty and factories are filled short.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::tile::{TileColor, TILES_PER_COLOR, TILE_COLORS};

#[derive(Clone, Debug)]
pub struct TileBag {
    /// Draw order; the next tile drawn is the last element
    tiles: Vec<TileColor>,
}

impl TileBag {
    /// A full bag (20 tiles of each color) in random order
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut tiles = Vec::with_capacity(TILES_PER_COLOR * TILE_COLORS);
        for color in TileColor::ALL {
            tiles.extend(std::iter::repeat(color).take(TILES_PER_COLOR));
        }
        tiles.shuffle(rng);
        TileBag { tiles }
    }

    /// A bag that yields `tiles` front to back, without shuffling.
    pub fn from_tiles(mut tiles: Vec<TileColor>) -> Self {
        tiles.reverse();
        TileBag { tiles }
    }

    /// Remove and return the next tile, or `None` once the bag is empty.
    pub fn draw(&mut self) -> Option<TileColor> {
        self.tiles.pop()
    }

    pub fn has_next(&self) -> bool {
        !self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
