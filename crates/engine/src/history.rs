//! Undo log for the drafts of a game.
//!
//! Each record keeps the prior contents of every container the draft
//! touched, so undoing restores tile order as well as tile counts. The draft
//! that empties the table also carries the table as it stood before
//! wall-tiling, so undoing it rolls back scoring and the next deal too.

use crate::bag::TileBag;
use crate::engine::{Destination, Draft, DraftSource, Phase};
use crate::factory::{CenterPool, Factory};
use crate::pattern_line::PatternLine;
use crate::player::{Player, PlayerIdx};
use crate::tile::{Tile, TileColor, TILE_COLORS};
use crate::wall::EndGameBonus;

/// Everything wall-tiling and the following deal can change
#[derive(Clone, Debug)]
pub(crate) struct RoundEndRecord {
    pub players: Vec<Player>,
    pub factories: Vec<Factory>,
    pub center: CenterPool,
    pub bag: TileBag,
    pub discarded: [usize; TILE_COLORS],
    pub current_player: PlayerIdx,
    pub marker_holder: Option<PlayerIdx>,
    pub phase: Phase,
    pub round: u16,
    pub final_bonus: Option<Vec<EndGameBonus>>,
}

#[derive(Clone, Debug)]
pub(crate) struct DraftRecord {
    pub player: PlayerIdx,
    pub draft: Draft,
    /// Factory contents before the draft (factory sources only)
    pub factory_before: Option<Vec<TileColor>>,
    pub center_before: Vec<Tile>,
    /// Target line before the draft (pattern-line destinations only)
    pub line_before: Option<PatternLine>,
    pub floor_len_before: usize,
    /// Overflow tiles that left play
    pub discarded: usize,
    pub marker_holder_before: Option<PlayerIdx>,
    /// Table before wall-tiling, when this draft ended the round
    pub round_end: Option<Box<RoundEndRecord>>,
}

impl DraftRecord {
    pub fn row(&self) -> Option<usize> {
        match self.draft.dest {
            Destination::PatternLine(row) => Some(row),
            Destination::Floor => None,
        }
    }

    pub fn factory(&self) -> Option<usize> {
        match self.draft.source {
            DraftSource::Factory(idx) => Some(idx),
            DraftSource::Center => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct History {
    records: Vec<DraftRecord>,
}

impl History {
    pub fn push(&mut self, record: DraftRecord) {
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<DraftRecord> {
        self.records.pop()
    }

    pub fn last(&self) -> Option<&DraftRecord> {
        self.records.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut DraftRecord> {
        self.records.last_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
