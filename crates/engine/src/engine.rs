//! The round and game state machine.
//!
//! A round runs `FactorySelection` (players draft in turn) until every factory
//! and the center pool are empty, then `WallTiling` moves full pattern lines
//! onto the walls and charges floor penalties. The game ends after a round in
//! which some wall row was completed; final bonuses are scored in `Scoring`
//! and the engine stops in `GameEnd`.

use rand::Rng;
use serde::Serialize;

use crate::bag::TileBag;
use crate::config::GameConfig;
use crate::error::{DraftError, PhaseError, SetupError, UndoError};
use crate::factory::{CenterPool, Factory};
use crate::history::{DraftRecord, History, RoundEndRecord};
use crate::player::{Player, PlayerIdx};
use crate::snapshot::GameSnapshot;
use crate::tile::{Tile, TileColor, TILE_COLORS};
use crate::wall::{EndGameBonus, WALL_SIZE};

// =============================================================================
// Phases and actions
// =============================================================================

/// Game phase / status
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    FactorySelection, // Players drafting
    WallTiling,
    Scoring,
    GameEnd, // Terminal; no more actions
}

/// Source of tiles for drafting
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum DraftSource {
    Factory(usize), // index 0..num_factories-1
    Center,
}

/// Destination for drafted tiles
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(tag = "kind", content = "row", rename_all = "snake_case")]
pub enum Destination {
    PatternLine(usize), // 0..4
    Floor,
}

/// A player action: draft tiles of a color from a source to a destination
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct Draft {
    pub source: DraftSource,
    pub color: TileColor,
    pub dest: Destination,
}

// =============================================================================
// Results reported back to the caller
// =============================================================================

/// What a successful draft did
#[derive(Clone, Debug, PartialEq)]
pub struct DraftOutcome {
    pub player: PlayerIdx,
    /// Tiles of the chosen color taken from the source
    pub taken: usize,
    pub to_line: usize,
    pub to_floor: usize,
    /// Overflow that did not fit on the floor line and left play
    pub discarded: usize,
    pub took_marker: bool,
    /// Present when this draft emptied the table and the round was resolved
    pub round_end: Option<RoundSummary>,
}

/// One tile moved from a pattern line onto the wall
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct WallPlacement {
    pub row: usize,
    pub color: TileColor,
    pub points: u8,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PlayerRoundScore {
    pub placements: Vec<WallPlacement>,
    pub floor_penalty: i16,
    /// Score after this round (before any final bonus)
    pub score: i16,
}

/// Everything that happened during wall-tiling
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundSummary {
    pub round: u16,
    pub players: Vec<PlayerRoundScore>,
    pub game_over: bool,
    /// Per-player end-game bonuses, when the game ended
    pub final_bonus: Option<Vec<EndGameBonus>>,
}

/// A draft taken back by [`GameEngine::undo`]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UndoneDraft {
    pub player: PlayerIdx,
    pub draft: Draft,
}

/// Where the colored tiles are right now
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TileCensus {
    pub bag: usize,
    pub factories: usize,
    pub center: usize,
    pub players: usize,
    pub discarded: usize,
}

impl TileCensus {
    pub fn total(&self) -> usize {
        self.bag + self.factories + self.center + self.players + self.discarded
    }
}

// =============================================================================
// Engine
// =============================================================================

#[derive(Clone, Debug)]
pub struct GameEngine {
    config: GameConfig,
    players: Vec<Player>,
    factories: Vec<Factory>,
    center: CenterPool,
    bag: TileBag,
    /// Tiles removed from play, by color; never drawn again
    discarded: [usize; TILE_COLORS],

    /// Whose turn it is in FactorySelection
    current_player: PlayerIdx,

    /// Who took the first-player marker this round (starts the next one)
    marker_holder: Option<PlayerIdx>,

    phase: Phase,

    /// Current round, 1-based (0 before the first round is dealt)
    round: u16,

    final_bonus: Option<Vec<EndGameBonus>>,
    history: History,
}

impl GameEngine {
    /// Start a game with a freshly shuffled bag and deal the first round.
    pub fn new(config: GameConfig, rng: &mut impl Rng) -> Result<Self, SetupError> {
        config.validate()?;
        Self::with_bag(config, TileBag::new(rng))
    }

    /// Start a game drawing from `bag` in its given order.
    pub fn with_bag(config: GameConfig, bag: TileBag) -> Result<Self, SetupError> {
        config.validate()?;

        let num_factories = config.factory_policy.factory_count(config.num_players());
        let mut engine = GameEngine {
            players: config.player_names.iter().map(Player::new).collect(),
            factories: (0..num_factories).map(|_| Factory::new()).collect(),
            center: CenterPool::new(),
            bag,
            discarded: [0; TILE_COLORS],
            current_player: 0,
            marker_holder: None,
            phase: Phase::Setup,
            round: 0,
            final_bonus: None,
            history: History::default(),
            config,
        };
        engine.initialize_round();
        Ok(engine)
    }

    // -------------------------------------------------------------------------
    // Round setup
    // -------------------------------------------------------------------------

    /// Deal a new round: refill every factory in index order, put the marker
    /// back in the center and hand the first turn to last round's marker
    /// holder. If the bag cannot supply a single tile the game is over and
    /// the round counter stays on the last round played.
    pub(crate) fn initialize_round(&mut self) {
        for f in 0..self.factories.len() {
            let stale = self.factories[f].clear();
            self.retire(stale);
            self.factories[f].fill(&mut self.bag);
        }
        let stale = self.center.reset_with_marker();
        self.retire(stale);

        if let Some(holder) = self.marker_holder.take() {
            self.current_player = holder;
        }

        if self.factories.iter().all(Factory::is_empty) {
            self.finish_game();
        } else {
            self.round += 1;
            self.phase = Phase::FactorySelection;
        }
    }

    // -------------------------------------------------------------------------
    // Drafting
    // -------------------------------------------------------------------------

    /// Take every `color` tile from `source` for the current player.
    ///
    /// Matching tiles go to `dest`; whatever a pattern line cannot hold goes
    /// to the floor line, and whatever the floor cannot hold leaves play. A
    /// factory's other tiles move to the center. The first draft from the
    /// center also takes the first-player marker. On error nothing changes.
    pub fn draft(
        &mut self,
        source: DraftSource,
        color: TileColor,
        dest: Destination,
    ) -> Result<DraftOutcome, DraftError> {
        if self.phase != Phase::FactorySelection {
            return Err(DraftError::WrongPhase(self.phase));
        }

        let available = match source {
            DraftSource::Factory(f) => {
                let factory = self.factories.get(f).ok_or(DraftError::NoSuchFactory(f))?;
                factory.tiles().iter().filter(|&&c| c == color).count()
            }
            DraftSource::Center => self
                .center
                .items()
                .iter()
                .filter(|&&t| t == Tile::Colored(color))
                .count(),
        };
        if available == 0 {
            return Err(DraftError::ColorNotInSource(color));
        }

        let p = self.current_player;

        // Work out the target line on a copy; nothing is mutated until it fits
        let line_after = match dest {
            Destination::PatternLine(row) => {
                self.players[p].can_place(color, row)?;
                let mut line = self.players[p].pattern_lines()[row];
                line.try_add(&vec![color; available])
                    .map_err(|error| DraftError::LineRejected { row, error })?;
                Some((row, line))
            }
            Destination::Floor => None,
        };

        // Everything below is infallible; snapshot the touched containers first.
        let record = DraftRecord {
            player: p,
            draft: Draft {
                source,
                color,
                dest,
            },
            factory_before: match source {
                DraftSource::Factory(f) => Some(self.factories[f].tiles().to_vec()),
                DraftSource::Center => None,
            },
            center_before: self.center.items().to_vec(),
            line_before: match dest {
                Destination::PatternLine(row) => Some(self.players[p].pattern_lines()[row]),
                Destination::Floor => None,
            },
            floor_len_before: self.players[p].floor().len(),
            discarded: 0,
            marker_holder_before: self.marker_holder,
            round_end: None,
        };

        // Step 1: Extract tiles from source
        let (taken, took_marker) = match source {
            DraftSource::Factory(f) => {
                let selection = self.factories[f].select_by_color(color);
                self.center.extend(selection.leftover);
                (selection.selected, false)
            }
            DraftSource::Center => self.center.take_color(color),
        };

        // Step 2: Marker first, so it keeps its floor slot
        let player = &mut self.players[p];
        if took_marker {
            self.marker_holder = Some(p);
            player.floor_mut().push(Tile::FirstPlayerMarker);
        }

        // Step 3: Place tiles into destination
        let to_line = match line_after {
            Some((row, line)) => {
                let before = player.pattern_lines()[row].len();
                player.pattern_line_mut(row).restore(line);
                line.len() - before
            }
            None => 0,
        };
        let overflow = vec![Tile::Colored(color); taken.len() - to_line];
        let to_floor = player.floor_mut().add_overflow(&overflow);
        let discarded = overflow.len() - to_floor;
        self.discarded[color.index()] += discarded;

        self.history.push(DraftRecord {
            discarded,
            ..record
        });

        // Step 4: Check if round ended, else advance to next player
        let round_end = if self.is_round_complete() {
            self.phase = Phase::WallTiling;
            if self.config.auto_resolve {
                Some(self.tile_walls())
            } else {
                None
            }
        } else {
            self.current_player = (self.current_player + 1) % self.players.len();
            None
        };

        Ok(DraftOutcome {
            player: p,
            taken: taken.len(),
            to_line,
            to_floor,
            discarded,
            took_marker,
            round_end,
        })
    }

    /// [`GameEngine::draft`] taking a [`Draft`] value
    pub fn apply(&mut self, draft: Draft) -> Result<DraftOutcome, DraftError> {
        self.draft(draft.source, draft.color, draft.dest)
    }

    /// All factories empty and no colored tile left in the center
    pub fn is_round_complete(&self) -> bool {
        self.factories.iter().all(Factory::is_empty) && !self.center.has_tiles()
    }

    /// Enumerate all legal drafts for the current player
    pub fn legal_drafts(&self) -> Vec<Draft> {
        if self.phase != Phase::FactorySelection {
            return Vec::new();
        }

        let player = &self.players[self.current_player];
        let mut sources: Vec<(DraftSource, [bool; TILE_COLORS])> = Vec::new();

        for (f, factory) in self.factories.iter().enumerate() {
            let mut seen = [false; TILE_COLORS];
            for &color in factory.tiles() {
                seen[color.index()] = true;
            }
            sources.push((DraftSource::Factory(f), seen));
        }
        let mut seen = [false; TILE_COLORS];
        for color in self.center.items().iter().filter_map(|t| t.color()) {
            seen[color.index()] = true;
        }
        sources.push((DraftSource::Center, seen));

        let mut drafts = Vec::new();
        for (source, seen) in sources {
            for color in TileColor::ALL.into_iter().filter(|c| seen[c.index()]) {
                for row in 0..WALL_SIZE {
                    if player.can_place(color, row).is_ok() {
                        drafts.push(Draft {
                            source,
                            color,
                            dest: Destination::PatternLine(row),
                        });
                    }
                }
                // Floor always allowed
                drafts.push(Draft {
                    source,
                    color,
                    dest: Destination::Floor,
                });
            }
        }
        drafts
    }

    // -------------------------------------------------------------------------
    // End of round
    // -------------------------------------------------------------------------

    /// Move one tile from each full pattern line onto its wall row, score it,
    /// charge floor penalties, then either deal the next round or end the game.
    pub fn resolve_wall_tiling(&mut self) -> Result<RoundSummary, PhaseError> {
        if self.phase != Phase::WallTiling {
            return Err(PhaseError {
                expected: Phase::WallTiling,
                actual: self.phase,
            });
        }
        Ok(self.tile_walls())
    }

    /// Wall-tiling proper; the caller has checked the phase.
    fn tile_walls(&mut self) -> RoundSummary {
        let before = Box::new(RoundEndRecord {
            players: self.players.clone(),
            factories: self.factories.clone(),
            center: self.center.clone(),
            bag: self.bag.clone(),
            discarded: self.discarded,
            current_player: self.current_player,
            marker_holder: self.marker_holder,
            phase: self.phase,
            round: self.round,
            final_bonus: self.final_bonus.clone(),
        });
        if let Some(record) = self.history.last_mut() {
            record.round_end = Some(before);
        }

        let round = self.round;
        let mut scores = Vec::with_capacity(self.players.len());
        let mut retired = Vec::new();

        for player in &mut self.players {
            let mut summary = PlayerRoundScore::default();

            for row in 0..WALL_SIZE {
                if !player.pattern_lines()[row].is_full() {
                    continue;
                }
                let Some((color, count)) = player.pattern_line_mut(row).take_all() else {
                    continue;
                };
                match player.wall_mut().place(row, color) {
                    Ok(points) => {
                        player.add_score(points as i16);
                        summary.placements.push(WallPlacement { row, color, points });
                        // One tile goes up; the rest of the line is discarded
                        retired.extend(std::iter::repeat(color).take(count - 1));
                    }
                    Err(_) => retired.extend(std::iter::repeat(color).take(count)),
                }
            }

            summary.floor_penalty = player.floor().penalty();
            player.add_score(summary.floor_penalty);
            retired.extend(player.floor_mut().clear().into_iter().filter_map(Tile::color));

            summary.score = player.score();
            scores.push(summary);
        }
        self.retire(retired);

        let row_complete = self.players.iter().any(|p| p.wall().has_complete_row());
        let out_of_rounds = self.config.round_limit.is_some_and(|limit| round >= limit);

        if row_complete || out_of_rounds {
            self.finish_game();
        } else {
            self.initialize_round();
        }

        let game_over = self.phase == Phase::GameEnd;
        RoundSummary {
            round,
            players: scores,
            game_over,
            final_bonus: if game_over { self.final_bonus.clone() } else { None },
        }
    }

    /// Apply end-game bonuses and stop.
    fn finish_game(&mut self) {
        self.phase = Phase::Scoring;
        let bonuses: Vec<EndGameBonus> = self
            .players
            .iter_mut()
            .map(|player| {
                let bonus = player.wall().end_game_bonus();
                player.add_score(bonus.total());
                bonus
            })
            .collect();
        self.final_bonus = Some(bonuses);
        self.phase = Phase::GameEnd;
    }

    fn retire(&mut self, tiles: impl IntoIterator<Item = TileColor>) {
        for color in tiles {
            self.discarded[color.index()] += 1;
        }
    }

    // -------------------------------------------------------------------------
    // Undo
    // -------------------------------------------------------------------------

    /// Take back the most recent draft.
    ///
    /// If that draft ended a round, wall-tiling, its scores and any deal or
    /// final scoring that followed are rolled back with it.
    pub fn undo(&mut self) -> Result<UndoneDraft, UndoError> {
        let mut record = self.history.pop().ok_or(UndoError::NothingToUndo)?;
        let p = record.player;

        if let Some(table) = record.round_end.take() {
            let table = *table;
            self.players = table.players;
            self.factories = table.factories;
            self.center = table.center;
            self.bag = table.bag;
            self.discarded = table.discarded;
            self.current_player = table.current_player;
            self.marker_holder = table.marker_holder;
            self.phase = table.phase;
            self.round = table.round;
            self.final_bonus = table.final_bonus;
        }

        if let (Some(f), Some(tiles)) = (record.factory(), record.factory_before.clone()) {
            self.factories[f].restore(tiles);
        }
        self.center.restore(record.center_before.clone());

        let player = &mut self.players[p];
        if let (Some(row), Some(line)) = (record.row(), record.line_before) {
            player.pattern_line_mut(row).restore(line);
        }
        player.floor_mut().truncate(record.floor_len_before);

        self.discarded[record.draft.color.index()] -= record.discarded;
        self.marker_holder = record.marker_holder_before;
        self.current_player = p;
        self.phase = Phase::FactorySelection;

        Ok(UndoneDraft {
            player: p,
            draft: record.draft,
        })
    }

    /// Whether [`GameEngine::undo`] has anything to take back
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The draft `undo` would take back
    pub fn last_draft(&self) -> Option<Draft> {
        self.history.last().map(|record| record.draft)
    }

    // -------------------------------------------------------------------------
    // Read-only views
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u16 {
        self.round
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameEnd
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, idx: PlayerIdx) -> Option<&Player> {
        self.players.get(idx)
    }

    pub fn current_player(&self) -> PlayerIdx {
        self.current_player
    }

    pub fn factories(&self) -> &[Factory] {
        &self.factories
    }

    pub fn center(&self) -> &CenterPool {
        &self.center
    }

    pub fn bag(&self) -> &TileBag {
        &self.bag
    }

    /// Tiles removed from play, by color index
    pub fn discarded(&self) -> &[usize; TILE_COLORS] {
        &self.discarded
    }

    /// Player holding the first-player marker this round, if taken
    pub fn marker_holder(&self) -> Option<PlayerIdx> {
        self.marker_holder
    }

    /// End-game bonuses, once the game is over
    pub fn final_bonus(&self) -> Option<&[EndGameBonus]> {
        self.final_bonus.as_deref()
    }

    /// Players with the highest score; ties go to most complete rows, and
    /// players still tied share the win.
    pub fn winners(&self) -> Vec<PlayerIdx> {
        let key = |p: &Player| (p.score(), p.wall().completed_rows());
        let Some(best) = self.players.iter().map(key).max() else {
            return Vec::new();
        };
        (0..self.players.len())
            .filter(|&i| key(&self.players[i]) == best)
            .collect()
    }

    pub fn tile_census(&self) -> TileCensus {
        TileCensus {
            bag: self.bag.len(),
            factories: self.factories.iter().map(Factory::len).sum(),
            center: self.center.tile_count(),
            players: self.players.iter().map(Player::tile_count).sum(),
            discarded: self.discarded.iter().sum(),
        }
    }

    /// Owned, serializable copy of the table for renderers and relays
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FactoryPolicy;
    use crate::floor::FLOOR_CAPACITY;
    use crate::tile::TOTAL_TILES;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use TileColor::*;

    fn new_game(num_players: usize, seed: u64) -> GameEngine {
        let mut rng = StdRng::seed_from_u64(seed);
        GameEngine::new(GameConfig::for_players(num_players), &mut rng).unwrap()
    }

    /// Two-player game whose factories are dealt from `tiles` (front first)
    fn rigged(tiles: &[TileColor], config: GameConfig) -> GameEngine {
        GameEngine::with_bag(config, TileBag::from_tiles(tiles.to_vec())).unwrap()
    }

    fn assert_conserved(engine: &GameEngine) {
        assert_eq!(engine.tile_census().total(), TOTAL_TILES);
    }

    /// Exactly one first-player marker is in play
    fn assert_one_marker(engine: &GameEngine) {
        let in_center = engine.center().has_marker() as usize;
        let held = engine.marker_holder().is_some() as usize;
        assert_eq!(in_center + held, 1);
    }

    /// Play random legal drafts until the game ends (or `max_steps` runs out)
    fn play_random(engine: &mut GameEngine, rng: &mut StdRng, max_steps: usize) {
        for _ in 0..max_steps {
            let drafts = engine.legal_drafts();
            if drafts.is_empty() {
                break;
            }
            let idx = rng.random_range(0..drafts.len());
            engine.apply(drafts[idx]).unwrap();
        }
    }

    // =========================================================================
    // Setup tests
    // =========================================================================

    #[test]
    fn test_new_game_two_players() {
        let engine = new_game(2, 42);

        assert_eq!(engine.phase(), Phase::FactorySelection);
        assert_eq!(engine.round(), 1);
        assert_eq!(engine.factories().len(), 5);
        assert!(engine.factories().iter().all(|f| f.len() == 4));
        assert_eq!(engine.center().items(), &[Tile::FirstPlayerMarker]);
        assert_eq!(engine.bag().len(), 100 - 20);
        assert_eq!(engine.current_player(), 0);
        assert_conserved(&engine);
    }

    #[test]
    fn test_factory_count_scales() {
        assert_eq!(new_game(3, 1).factories().len(), 7);
        assert_eq!(new_game(4, 1).factories().len(), 9);
        assert_eq!(new_game(4, 1).bag().len(), 100 - 36);
    }

    #[test]
    fn test_fixed_factory_policy() {
        let config = GameConfig {
            factory_policy: FactoryPolicy::fixed_five(),
            ..GameConfig::for_players(4)
        };
        let engine = GameEngine::new(config, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(engine.factories().len(), 5);
    }

    #[test]
    fn test_invalid_player_count() {
        let mut rng = StdRng::seed_from_u64(0);
        for n in [0, 1, 5] {
            let err = GameEngine::new(GameConfig::for_players(n), &mut rng).unwrap_err();
            assert_eq!(err, SetupError::PlayerCount(n));
        }
    }

    #[test]
    fn test_short_bag_fills_short_factories() {
        let engine = rigged(&[Red; 6], GameConfig::default());

        let sizes: Vec<usize> = engine.factories().iter().map(Factory::len).collect();
        assert_eq!(sizes, vec![4, 2, 0, 0, 0]);
        assert_eq!(engine.phase(), Phase::FactorySelection);
    }

    // =========================================================================
    // Drafting tests
    // =========================================================================

    #[test]
    fn test_draft_from_factory() {
        let tiles = [Red, Red, Blue, White, Black, Black, Black, Black];
        let mut engine = rigged(&tiles, GameConfig::default());

        let outcome = engine
            .draft(DraftSource::Factory(0), Red, Destination::PatternLine(1))
            .unwrap();

        assert_eq!(outcome.taken, 2);
        assert_eq!(outcome.to_line, 2);
        assert_eq!(outcome.to_floor, 0);
        assert!(!outcome.took_marker);
        assert!(engine.factories()[0].is_empty());
        assert_eq!(
            engine.center().items(),
            &[Tile::FirstPlayerMarker, Tile::Colored(Blue), Tile::Colored(White)]
        );
        let line = &engine.players()[0].pattern_lines()[1];
        assert_eq!((line.color(), line.len()), (Some(Red), 2));
        assert_eq!(engine.current_player(), 1);
        assert_conserved(&engine);
    }

    #[test]
    fn test_draft_overflow_to_floor() {
        let mut engine = rigged(&[Black; 8], GameConfig::default());

        let outcome = engine
            .draft(DraftSource::Factory(0), Black, Destination::PatternLine(0))
            .unwrap();

        assert_eq!((outcome.to_line, outcome.to_floor, outcome.discarded), (1, 3, 0));
        assert_eq!(engine.players()[0].floor().len(), 3);
    }

    #[test]
    fn test_overflow_beyond_floor_leaves_play() {
        let mut engine = rigged(&[Yellow; 20], GameConfig::default());
        for f in 0..2 {
            engine
                .draft(DraftSource::Factory(f), Yellow, Destination::Floor)
                .unwrap();
            engine
                .draft(DraftSource::Factory(f + 2), Yellow, Destination::PatternLine(4))
                .unwrap();
        }
        // Player 0 has 8 yellow offered to a floor of 7
        let floor = engine.players()[0].floor();
        assert_eq!(floor.len(), FLOOR_CAPACITY);
        assert_eq!(engine.discarded()[Yellow.index()], 1);
        assert_conserved(&engine);
    }

    #[test]
    fn test_first_center_draft_takes_marker() {
        let tiles = [Red, Blue, Blue, Blue, Red, White, White, White];
        let mut engine = rigged(&tiles, GameConfig::default());
        engine
            .draft(DraftSource::Factory(0), Blue, Destination::PatternLine(2))
            .unwrap();

        let outcome = engine
            .draft(DraftSource::Center, Red, Destination::PatternLine(0))
            .unwrap();

        assert!(outcome.took_marker);
        assert_eq!(engine.marker_holder(), Some(1));
        assert!(!engine.center().has_marker());
        assert_eq!(engine.players()[1].floor().tiles(), &[Tile::FirstPlayerMarker]);
        assert_one_marker(&engine);
    }

    #[test]
    fn test_marker_with_full_floor_is_still_held() {
        let mut tiles = vec![Red; 15];
        tiles.push(Blue);
        tiles.extend([Black; 4]);
        let mut engine = rigged(&tiles, GameConfig::default());

        engine.draft(DraftSource::Factory(0), Red, Destination::Floor).unwrap();
        engine.draft(DraftSource::Factory(1), Red, Destination::PatternLine(3)).unwrap();
        engine.draft(DraftSource::Factory(2), Red, Destination::Floor).unwrap();
        assert!(engine.players()[0].floor().is_full());
        // Factory 3 is R R R B: the blue lands in the center
        engine.draft(DraftSource::Factory(3), Red, Destination::PatternLine(4)).unwrap();

        let outcome = engine
            .draft(DraftSource::Center, Blue, Destination::Floor)
            .unwrap();

        assert!(outcome.took_marker);
        assert_eq!((outcome.to_floor, outcome.discarded), (0, 1));
        assert_eq!(engine.marker_holder(), Some(0));
        let floor = engine.players()[0].floor();
        assert!(!floor.has_marker(), "A full floor has no slot for the marker");
        assert_eq!(floor.penalty(), -14);
        assert_one_marker(&engine);
        assert_conserved(&engine);
    }

    #[test]
    fn test_illegal_color_leaves_state_unchanged() {
        let mut engine = new_game(2, 5);
        let absent = TileColor::ALL
            .into_iter()
            .find(|&c| !engine.factories()[0].contains(c))
            .unwrap();
        let before = engine.snapshot();

        let err = engine
            .draft(DraftSource::Factory(0), absent, Destination::PatternLine(3))
            .unwrap_err();

        assert_eq!(err, DraftError::ColorNotInSource(absent));
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.history_len(), 0);
    }

    #[test]
    fn test_illegal_destinations_rejected() {
        let tiles = [Red, Red, Blue, Blue, Red, White, Black, Yellow];
        let mut engine = rigged(&tiles, GameConfig::default());
        engine
            .draft(DraftSource::Factory(1), Red, Destination::PatternLine(2))
            .unwrap();
        engine
            .draft(DraftSource::Factory(0), Blue, Destination::PatternLine(0))
            .unwrap();

        // Player 0 again: row 2 holds red
        let before = engine.snapshot();
        assert_eq!(
            engine.draft(DraftSource::Center, White, Destination::PatternLine(2)),
            Err(DraftError::LineHoldsOtherColor { row: 2, held: Red })
        );
        assert_eq!(
            engine.draft(DraftSource::Center, White, Destination::PatternLine(9)),
            Err(DraftError::NoSuchPatternLine(9))
        );
        assert_eq!(
            engine.draft(DraftSource::Factory(9), White, Destination::Floor),
            Err(DraftError::NoSuchFactory(9))
        );
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_wall_row_with_color_rejected() {
        let tiles = [Blue, Red, Red, Red, White, White, White, White, Black, Black, Black, Black];
        let mut engine = rigged(&tiles, GameConfig::default());
        engine
            .draft(DraftSource::Factory(0), Blue, Destination::PatternLine(0))
            .unwrap();
        engine
            .draft(DraftSource::Factory(1), White, Destination::Floor)
            .unwrap();
        engine
            .draft(DraftSource::Factory(2), Black, Destination::Floor)
            .unwrap();
        engine
            .draft(DraftSource::Center, Red, Destination::Floor)
            .unwrap();

        // The bag is empty, so the game ended; the board keeps the rule
        assert!(engine.is_over());
        let player = &engine.players()[0];
        assert_eq!(player.wall().tile_at(0, 0), Some(Blue));
        assert_eq!(
            player.can_place(Blue, 0),
            Err(DraftError::WallRowHasColor { row: 0, color: Blue })
        );
    }

    // =========================================================================
    // Round resolution tests
    // =========================================================================

    #[test]
    fn test_round_completion_waits_for_resolution() {
        let config = GameConfig {
            auto_resolve: false,
            ..GameConfig::default()
        };
        let mut engine = rigged(&[Red, Red, Red, Red], config);

        let outcome = engine
            .draft(DraftSource::Factory(0), Red, Destination::PatternLine(3))
            .unwrap();

        assert!(outcome.round_end.is_none());
        assert!(engine.is_round_complete());
        assert_eq!(engine.phase(), Phase::WallTiling);
        assert!(engine.legal_drafts().is_empty());
        assert_eq!(
            engine.draft(DraftSource::Center, Red, Destination::Floor),
            Err(DraftError::WrongPhase(Phase::WallTiling))
        );

        let summary = engine.resolve_wall_tiling().unwrap();
        assert_eq!(summary.players[0].placements.len(), 1);
        assert_eq!(summary.players[0].placements[0].points, 1);
        assert_eq!(engine.players()[0].score(), 1);
        // Bag was empty, so no next round can be dealt
        assert!(summary.game_over);
        assert_eq!(engine.phase(), Phase::GameEnd);
        assert_eq!(engine.round(), 1, "A round that was never dealt is not counted");
        assert_eq!(engine.snapshot().round, 1);
    }

    #[test]
    fn test_resolve_outside_wall_tiling() {
        let mut engine = new_game(2, 9);
        assert_eq!(
            engine.resolve_wall_tiling(),
            Err(PhaseError {
                expected: Phase::WallTiling,
                actual: Phase::FactorySelection
            })
        );
    }

    #[test]
    fn test_round_end_scores_and_penalties() {
        // Factory 0: 3 blue + 1 red, factory 1: 4 white, rest from the bag
        let mut tiles = vec![Blue, Blue, Blue, Red, White, White, White, White];
        tiles.extend([Black; 12]);
        tiles.extend([Yellow; 40]);
        let mut engine = rigged(&tiles, GameConfig::default());

        // P0: 3 blue to line 2 (full)
        engine.draft(DraftSource::Factory(0), Blue, Destination::PatternLine(2)).unwrap();
        // P1: 4 white to line 1, 2 overflow
        engine.draft(DraftSource::Factory(1), White, Destination::PatternLine(1)).unwrap();
        // P0: the lone red from the center, with the marker
        engine.draft(DraftSource::Center, Red, Destination::PatternLine(0)).unwrap();
        // P1: 4 black to line 4
        engine.draft(DraftSource::Factory(2), Black, Destination::PatternLine(4)).unwrap();
        // P0: 4 black to line 3 (full)
        engine.draft(DraftSource::Factory(3), Black, Destination::PatternLine(3)).unwrap();
        // P1: fills line 4 with one black, 3 overflow
        let outcome = engine
            .draft(DraftSource::Factory(4), Black, Destination::PatternLine(4))
            .unwrap();

        let summary = outcome.round_end.expect("last draft resolves the round");
        assert_eq!(summary.round, 1);
        assert!(!summary.game_over);
        assert!(summary.final_bonus.is_none());

        // P0: red (0,2), blue (2,2), black (3,1), all isolated; marker -1
        let p0 = &summary.players[0];
        assert_eq!(p0.placements.len(), 3);
        assert!(p0.placements.iter().all(|p| p.points == 1));
        assert_eq!(p0.floor_penalty, -1);
        assert_eq!(p0.score, 2);
        // P1: white (1,0) and black (4,2); floor W W K K K
        let p1 = &summary.players[1];
        assert_eq!(p1.placements.len(), 2);
        assert_eq!(p1.floor_penalty, -8);
        assert_eq!(p1.score, -6, "Scores may go negative");

        // Next round: marker holder starts, lines and floors reset, walls persist
        assert_eq!(engine.round(), 2);
        assert_eq!(engine.current_player(), 0);
        assert_eq!(engine.phase(), Phase::FactorySelection);
        assert!(engine.players().iter().all(|p| p.floor().is_empty()));
        assert!(engine.players()[0].pattern_lines().iter().all(|l| l.is_empty()));
        assert_eq!(engine.players()[0].wall().tile_count(), 3);
        assert_eq!(engine.center().items(), &[Tile::FirstPlayerMarker]);
        assert_conserved(&engine);
    }

    #[test]
    fn test_round_limit_ends_game() {
        let config = GameConfig {
            round_limit: Some(1),
            ..GameConfig::default()
        };
        let mut engine = GameEngine::new(config, &mut StdRng::seed_from_u64(17)).unwrap();
        let mut rng = StdRng::seed_from_u64(18);

        play_random(&mut engine, &mut rng, 1000);

        assert_eq!(engine.phase(), Phase::GameEnd);
        assert_eq!(engine.round(), 1);
        assert!(engine.final_bonus().is_some());
    }

    #[test]
    fn test_random_games_terminate_and_conserve() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let num_players = 2 + (seed as usize % 3);
            let config = GameConfig::for_players(num_players);
            let mut engine = GameEngine::new(config, &mut rng).unwrap();

            for _ in 0..2000 {
                assert_conserved(&engine);
                assert_one_marker(&engine);
                let drafts = engine.legal_drafts();
                if drafts.is_empty() {
                    break;
                }
                let idx = rng.random_range(0..drafts.len());
                engine.apply(drafts[idx]).unwrap();
            }

            assert!(engine.is_over(), "seed {seed} did not finish");
            assert_conserved(&engine);
            assert!(!engine.winners().is_empty());
            assert_eq!(
                engine.draft(DraftSource::Center, Red, Destination::Floor),
                Err(DraftError::WrongPhase(Phase::GameEnd))
            );
        }
    }

    #[test]
    fn test_final_bonus_added_to_score() {
        let mut engine = new_game(2, 23);
        let mut rng = StdRng::seed_from_u64(24);
        play_random(&mut engine, &mut rng, 5000);

        let bonuses = engine.final_bonus().unwrap().to_vec();
        for (player, bonus) in engine.players().iter().zip(&bonuses) {
            assert_eq!(
                *bonus,
                player.wall().end_game_bonus(),
                "Bonus should reflect the final wall"
            );
        }
    }

    // =========================================================================
    // Undo tests
    // =========================================================================

    #[test]
    fn test_undo_with_empty_history() {
        let mut engine = new_game(2, 1);
        let before = engine.snapshot();

        assert_eq!(engine.undo(), Err(UndoError::NothingToUndo));
        assert!(!engine.can_undo());
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_undo_restores_exact_state() {
        let mut engine = new_game(2, 77);
        let mut rng = StdRng::seed_from_u64(78);
        let mut snapshots = vec![engine.snapshot()];

        // Long enough to cross at least one round end
        let mut rounds_ended = 0;
        for _ in 0..30 {
            let drafts = engine.legal_drafts();
            if drafts.is_empty() {
                break;
            }
            let idx = rng.random_range(0..drafts.len());
            if engine.apply(drafts[idx]).unwrap().round_end.is_some() {
                rounds_ended += 1;
            }
            snapshots.push(engine.snapshot());
        }
        assert!(rounds_ended >= 1);

        snapshots.pop();
        while let Some(expected) = snapshots.pop() {
            engine.undo().unwrap();
            assert_eq!(engine.snapshot(), expected);
        }
        assert!(!engine.can_undo());
    }

    #[test]
    fn test_undo_center_draft_returns_marker() {
        let tiles = [Red, Blue, Blue, Blue, Red, White, White, White];
        let mut engine = rigged(&tiles, GameConfig::default());
        engine
            .draft(DraftSource::Factory(0), Blue, Destination::PatternLine(2))
            .unwrap();
        let before = engine.snapshot();
        engine
            .draft(DraftSource::Center, Red, Destination::Floor)
            .unwrap();
        assert_eq!(engine.last_draft().map(|d| d.source), Some(DraftSource::Center));

        let undone = engine.undo().unwrap();

        assert_eq!(undone.player, 1);
        assert_eq!(engine.snapshot(), before);
        assert!(engine.center().has_marker());
        assert_eq!(engine.marker_holder(), None);
        assert_one_marker(&engine);
    }

    #[test]
    fn test_undo_from_pending_wall_tiling() {
        let config = GameConfig {
            auto_resolve: false,
            ..GameConfig::default()
        };
        let mut engine = rigged(&[Red, Red, Red, Red], config);
        engine
            .draft(DraftSource::Factory(0), Red, Destination::PatternLine(3))
            .unwrap();
        assert_eq!(engine.phase(), Phase::WallTiling);

        engine.undo().unwrap();

        assert_eq!(engine.phase(), Phase::FactorySelection);
        assert_eq!(engine.factories()[0].len(), 4);
        assert!(engine.players()[0].pattern_lines()[3].is_empty());
    }

    #[test]
    fn test_undo_round_ending_draft_restores_scores() {
        let mut engine = rigged(&[Red; 24], GameConfig::default());
        engine
            .draft(DraftSource::Factory(0), Red, Destination::PatternLine(3))
            .unwrap();
        for f in 1..4 {
            engine
                .draft(DraftSource::Factory(f), Red, Destination::Floor)
                .unwrap();
        }
        let before = engine.snapshot();

        let outcome = engine
            .draft(DraftSource::Factory(4), Red, Destination::Floor)
            .unwrap();
        let summary = outcome.round_end.expect("last draft resolves the round");
        assert_eq!(summary.players[0].score, -13);
        assert_eq!(summary.players[1].score, -14);
        assert_eq!(engine.round(), 2);

        let undone = engine.undo().unwrap();

        assert_eq!(undone.player, 0);
        assert_eq!(engine.snapshot(), before);
        assert!(engine.players().iter().all(|p| p.score() == 0));
        assert_eq!(engine.players()[0].wall().tile_count(), 0);
        assert_eq!(engine.round(), 1);
        assert_eq!(engine.bag().len(), 4);
        assert_conserved(&engine);

        // The same draft replays to the same round end
        let replay = engine
            .draft(DraftSource::Factory(4), Red, Destination::Floor)
            .unwrap();
        assert_eq!(replay.round_end, Some(summary));
    }

    #[test]
    fn test_undo_after_game_end() {
        let mut engine = rigged(&[Red, Red, Red, Red], GameConfig::default());
        let before = engine.snapshot();

        let outcome = engine
            .draft(DraftSource::Factory(0), Red, Destination::PatternLine(3))
            .unwrap();
        assert!(outcome.round_end.is_some_and(|s| s.game_over));
        assert!(engine.is_over());

        engine.undo().unwrap();

        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.phase(), Phase::FactorySelection);
        assert!(engine.final_bonus().is_none());
        assert_eq!(engine.players()[0].score(), 0);
    }

    #[test]
    fn test_undo_manual_resolution_with_its_draft() {
        let config = GameConfig {
            auto_resolve: false,
            ..GameConfig::default()
        };
        let mut engine = rigged(&[Red; 8], config);
        engine
            .draft(DraftSource::Factory(0), Red, Destination::PatternLine(3))
            .unwrap();
        let before = engine.snapshot();
        engine
            .draft(DraftSource::Factory(1), Red, Destination::Floor)
            .unwrap();
        engine.resolve_wall_tiling().unwrap();
        assert!(engine.is_over());

        engine.undo().unwrap();

        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.current_player(), 1);
    }

    // =========================================================================
    // Legal move tests
    // =========================================================================

    #[test]
    fn test_every_legal_draft_applies() {
        let engine = new_game(3, 12);
        let drafts = engine.legal_drafts();
        assert!(!drafts.is_empty());

        for draft in drafts {
            let mut copy = engine.clone();
            assert!(copy.apply(draft).is_ok(), "{draft:?} should be legal");
        }
    }

    #[test]
    fn test_winners_tie_break_on_rows() {
        let mut engine = new_game(2, 4);
        engine.players[0].add_score(10);
        engine.players[1].add_score(10);
        for color in TileColor::ALL {
            engine.players[1].wall_mut().place(3, color).unwrap();
        }
        assert_eq!(engine.winners(), vec![1]);
    }
}
