//! Error types for the engine and its components.
//!
//! Every error is returned before any mutation, so a failed call leaves the
//! game exactly as it was.

use thiserror::Error;

use crate::engine::Phase;
use crate::tile::TileColor;

/// Construction-time failures
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SetupError {
    #[error("player count must be between 2 and 4, got {0}")]
    PlayerCount(usize),
    #[error("a game needs at least one factory")]
    NoFactories,
}

/// Why a draft was refused
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum DraftError {
    #[error("drafting is not allowed during {0:?}")]
    WrongPhase(Phase),
    #[error("there is no factory {0}")]
    NoSuchFactory(usize),
    #[error("there is no pattern line {0}")]
    NoSuchPatternLine(usize),
    #[error("the chosen source holds no {0} tiles")]
    ColorNotInSource(TileColor),
    #[error("pattern line {row} already holds {held} tiles")]
    LineHoldsOtherColor { row: usize, held: TileColor },
    #[error("pattern line {0} is full")]
    LineFull(usize),
    #[error("wall row {row} already has a {color} tile")]
    WallRowHasColor { row: usize, color: TileColor },
    #[error("pattern line {row} refused the tiles: {error}")]
    LineRejected { row: usize, error: PatternLineError },
}

/// An engine call made in the wrong phase
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[error("expected phase {expected:?}, engine is in {actual:?}")]
pub struct PhaseError {
    pub expected: Phase,
    pub actual: Phase,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum UndoError {
    #[error("nothing to undo")]
    NothingToUndo,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum PatternLineError {
    #[error("line holds {line} tiles, cannot add {offered}")]
    ColorMismatch { line: TileColor, offered: TileColor },
    #[error("tiles added to a pattern line must share one color")]
    MixedColors,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum WallError {
    #[error("wall row {0} does not exist")]
    RowOutOfRange(usize),
    #[error("wall row {row} already has a {color} tile")]
    ColorAlreadyInRow { row: usize, color: TileColor },
}
