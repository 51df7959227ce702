//! Azul Game Engine
//!
//! Rules engine for the board game Azul: tile drafting from factory displays,
//! pattern-line staging, wall tiling with adjacency scoring, floor penalties
//! and end-game bonuses for 2 to 4 players.
//!
//! [`GameEngine`] owns all state and is the only thing that mutates it. Every
//! call validates before it changes anything, so a rejected move leaves the
//! game untouched. The engine does no I/O; outcomes come back as data
//! ([`DraftOutcome`], [`RoundSummary`]) for the caller to show or log.

mod bag;
mod config;
mod engine;
mod error;
mod factory;
mod floor;
mod history;
mod pattern_line;
mod player;
mod snapshot;
mod tile;
mod wall;

pub use bag::TileBag;
pub use config::{FactoryPolicy, GameConfig, MAX_PLAYERS, MIN_PLAYERS};
pub use engine::{
    Destination, Draft, DraftOutcome, DraftSource, GameEngine, Phase, PlayerRoundScore,
    RoundSummary, TileCensus, UndoneDraft, WallPlacement,
};
pub use error::{DraftError, PatternLineError, PhaseError, SetupError, UndoError, WallError};
pub use factory::{CenterPool, Factory, Selection, FACTORY_CAPACITY};
pub use floor::{FloorLine, FLOOR_CAPACITY, FLOOR_PENALTY};
pub use pattern_line::{Accepted, PatternLine};
pub use player::{Player, PlayerIdx};
pub use snapshot::{GameSnapshot, PatternLineView, PlayerView};
pub use tile::{Tile, TileColor, TILES_PER_COLOR, TILE_COLORS, TOTAL_TILES};
pub use wall::{
    EndGameBonus, Wall, COLOR_BONUS, COLUMN_BONUS, ROW_BONUS, WALL_PATTERN, WALL_SIZE,
};
