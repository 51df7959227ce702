//! Factory displays and the center pool.

use serde::Serialize;

use crate::bag::TileBag;
use crate::tile::{Tile, TileColor};

/// Tiles placed on a factory at round start (fewer if the bag runs dry)
pub const FACTORY_CAPACITY: usize = 4;

/// A single factory display
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Factory {
    tiles: Vec<TileColor>,
}

/// Result of taking one color from a factory
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Selection {
    /// Tiles of the chosen color, in factory order
    pub selected: Vec<TileColor>,
    /// Everything else, in factory order; bound for the center pool
    pub leftover: Vec<TileColor>,
}

impl Factory {
    pub fn new() -> Self {
        Factory {
            tiles: Vec::with_capacity(FACTORY_CAPACITY),
        }
    }

    /// Draw from `bag` until the factory holds 4 tiles or the bag is empty.
    /// Returns the number of tiles drawn.
    pub fn fill(&mut self, bag: &mut TileBag) -> usize {
        let before = self.tiles.len();
        while self.tiles.len() < FACTORY_CAPACITY {
            match bag.draw() {
                Some(color) => self.tiles.push(color),
                None => break,
            }
        }
        self.tiles.len() - before
    }

    /// Split the contents by `color`. The factory is always empty afterwards.
    pub fn select_by_color(&mut self, color: TileColor) -> Selection {
        let (selected, leftover): (Vec<_>, Vec<_>) =
            self.tiles.drain(..).partition(|&c| c == color);
        Selection { selected, leftover }
    }

    pub fn contains(&self, color: TileColor) -> bool {
        self.tiles.contains(&color)
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[TileColor] {
        &self.tiles
    }

    /// Empty the factory, returning what it held.
    pub fn clear(&mut self) -> Vec<TileColor> {
        std::mem::take(&mut self.tiles)
    }

    /// Put back exactly these contents (undo only).
    pub(crate) fn restore(&mut self, tiles: Vec<TileColor>) {
        self.tiles = tiles;
    }
}

/// Shared pool of factory leftovers plus, until someone drafts from it, the
/// first-player marker.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CenterPool {
    items: Vec<Tile>,
}

impl CenterPool {
    pub fn new() -> Self {
        CenterPool::default()
    }

    /// Start-of-round state: just the marker. Returns any colored tiles
    /// still present so the caller can retire them.
    pub fn reset_with_marker(&mut self) -> Vec<TileColor> {
        let stale = self.items.drain(..).filter_map(Tile::color).collect();
        self.items.push(Tile::FirstPlayerMarker);
        stale
    }

    /// Receive factory leftovers.
    pub fn extend(&mut self, tiles: impl IntoIterator<Item = TileColor>) {
        self.items.extend(tiles.into_iter().map(Tile::Colored));
    }

    /// Take every tile of `color`, and the marker if it is still here.
    /// Returns the taken tiles and whether the marker came with them.
    pub fn take_color(&mut self, color: TileColor) -> (Vec<TileColor>, bool) {
        let mut taken = Vec::new();
        let mut took_marker = false;
        self.items.retain(|&item| match item {
            Tile::Colored(c) if c == color => {
                taken.push(c);
                false
            }
            Tile::FirstPlayerMarker => {
                took_marker = true;
                false
            }
            Tile::Colored(_) => true,
        });
        (taken, took_marker)
    }

    pub fn contains(&self, color: TileColor) -> bool {
        self.items.contains(&Tile::Colored(color))
    }

    pub fn has_marker(&self) -> bool {
        self.items.contains(&Tile::FirstPlayerMarker)
    }

    /// Whether any colored tile remains (the marker alone does not count)
    pub fn has_tiles(&self) -> bool {
        self.items.iter().any(|item| !item.is_marker())
    }

    /// Colored tiles in the pool
    pub fn tile_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_marker()).count()
    }

    pub fn items(&self) -> &[Tile] {
        &self.items
    }

    pub(crate) fn restore(&mut self, items: Vec<Tile>) {
        self.items = items;
    }
}
