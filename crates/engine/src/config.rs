//! Game setup parameters

use crate::error::SetupError;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// How many factory displays a game uses
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FactoryPolicy {
    /// Official rules: `2 * players + 1` (5, 7 or 9)
    #[default]
    Scaled,
    /// A fixed count regardless of players
    Fixed(usize),
}

impl FactoryPolicy {
    /// Five factories for any player count
    pub fn fixed_five() -> Self {
        FactoryPolicy::Fixed(5)
    }

    pub fn factory_count(self, num_players: usize) -> usize {
        match self {
            FactoryPolicy::Scaled => 2 * num_players + 1,
            FactoryPolicy::Fixed(n) => n,
        }
    }
}

/// Game configuration parameters
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// One name per player (2..=4 entries); seat order is list order
    pub player_names: Vec<String>,

    pub factory_policy: FactoryPolicy,

    /// If true, the draft that empties the table also tiles the walls and
    /// sets up the next round. If false, the engine waits in
    /// `Phase::WallTiling` for `resolve_wall_tiling()`.
    pub auto_resolve: bool,

    /// End the game after this many rounds even if no wall row is complete
    pub round_limit: Option<u16>,
}

impl GameConfig {
    /// Default settings for `num_players` players named "Player 1".."Player n"
    pub fn for_players(num_players: usize) -> Self {
        GameConfig {
            player_names: (1..=num_players).map(|i| format!("Player {i}")).collect(),
            ..Default::default()
        }
    }

    pub fn num_players(&self) -> usize {
        self.player_names.len()
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        let n = self.num_players();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
            return Err(SetupError::PlayerCount(n));
        }
        if self.factory_policy.factory_count(n) == 0 {
            return Err(SetupError::NoFactories);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_names: vec!["Player 1".to_string(), "Player 2".to_string()],
            factory_policy: FactoryPolicy::default(),
            auto_resolve: true,
            round_limit: None,
        }
    }
}
