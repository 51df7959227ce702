//! Owned, serializable view of a game for renderers and relays.
//!
//! Colors are written as lowercase names and the first-player marker as
//! `"marker"`, so the JSON form needs no knowledge of engine types.

use serde::Serialize;

use crate::engine::{GameEngine, Phase};
use crate::player::{Player, PlayerIdx};
use crate::tile::{Tile, TILE_COLORS};
use crate::wall::{WALL_PATTERN, WALL_SIZE};

const MARKER: &str = "marker";

fn tile_slug(tile: Tile) -> String {
    match tile {
        Tile::Colored(color) => color.name().to_string(),
        Tile::FirstPlayerMarker => MARKER.to_string(),
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PatternLineView {
    pub color: Option<String>,
    pub count: u8,
    pub capacity: u8,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PlayerView {
    pub name: String,
    pub pattern_lines: Vec<PatternLineView>,
    /// `wall[row][col]`, the color name where a tile sits
    pub wall: Vec<Vec<Option<String>>>,
    pub floor: Vec<String>,
    pub score: i16,
}

impl PlayerView {
    fn capture(player: &Player) -> Self {
        let pattern_lines = player
            .pattern_lines()
            .iter()
            .map(|line| PatternLineView {
                color: line.color().map(|c| c.name().to_string()),
                count: line.len() as u8,
                capacity: line.capacity() as u8,
            })
            .collect();

        let mut wall = vec![vec![None; WALL_SIZE]; WALL_SIZE];
        for (row, cells) in wall.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                if player.wall().is_occupied(row, col) {
                    *cell = Some(WALL_PATTERN[row][col].name().to_string());
                }
            }
        }

        PlayerView {
            name: player.name().to_string(),
            pattern_lines,
            wall,
            floor: player.floor().tiles().iter().map(|&t| tile_slug(t)).collect(),
            score: player.score(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub round: u16,
    pub current_player: PlayerIdx,
    pub marker_holder: Option<PlayerIdx>,
    pub factories: Vec<Vec<String>>,
    pub center: Vec<String>,
    pub has_marker: bool,
    pub bag_len: usize,
    /// Tiles out of play, by color index
    pub discarded: [usize; TILE_COLORS],
    pub players: Vec<PlayerView>,
}

impl GameSnapshot {
    pub fn capture(engine: &GameEngine) -> Self {
        let factories = engine
            .factories()
            .iter()
            .map(|f| f.tiles().iter().map(|c| c.name().to_string()).collect())
            .collect();

        let center = engine
            .center()
            .items()
            .iter()
            .filter_map(|t| t.color())
            .map(|c| c.name().to_string())
            .collect();

        GameSnapshot {
            phase: engine.phase(),
            round: engine.round(),
            current_player: engine.current_player(),
            marker_holder: engine.marker_holder(),
            factories,
            center,
            has_marker: engine.center().has_marker(),
            bag_len: engine.bag().len(),
            discarded: *engine.discarded(),
            players: engine.players().iter().map(PlayerView::capture).collect(),
        }
    }
}
