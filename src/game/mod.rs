pub mod globals;
use globals::DiceRoll;

pub mod cards;
pub mod economy;
pub mod error;
pub mod settings;
pub mod state;
pub mod victory;

mod agent;
pub use agent::Agent;

mod turn;

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use error::GameError;
use settings::Settings;
use state::GameState;
use victory::VictoryResult;

/// A game session: the game state plus the source of dice rolls and card draws.
pub struct Game {
    /// The current game state.
    state: GameState,
    /// Rolls the dice and draws the cards.
    rng: SmallRng,
}

impl Game {
    /*********        PUBLIC INTERFACES        *********/

    /// Return a new game waiting to be configured, with an unpredictable dice sequence.
    pub fn new(settings: Settings) -> Self {
        Self {
            state: GameState::new(settings),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Return a new game whose dice and card draws are determined by `seed`.
    pub fn with_seed(settings: Settings, seed: u64) -> Self {
        Self {
            state: GameState::new(settings),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn configure_and_start<S: AsRef<str>>(
        &mut self,
        player_count: usize,
        names: &[S],
    ) -> Result<(), GameError> {
        self.state.configure_and_start(player_count, names)
    }

    pub fn roll(&mut self) -> Result<DiceRoll, GameError> {
        self.state.roll(&mut self.rng)
    }

    /// Play out a roll decided elsewhere, such as a replay.
    pub fn roll_dice(&mut self, dice: DiceRoll) -> Result<(), GameError> {
        self.state.roll_dice(dice, &mut self.rng)
    }

    pub fn buy(&mut self, position: u8) -> Result<(), GameError> {
        self.state.buy(position)
    }

    pub fn upgrade(&mut self, position: u8) -> Result<(), GameError> {
        self.state.upgrade(position)
    }

    pub fn sell(&mut self, position: u8) -> Result<(), GameError> {
        self.state.sell(position)
    }

    pub fn apply_card(&mut self) -> Result<(), GameError> {
        self.state.apply_card()
    }

    pub fn end_turn(&mut self) -> Result<(), GameError> {
        self.state.end_turn()
    }

    pub fn use_anti_crisis(&mut self) -> Result<(), GameError> {
        self.state.use_anti_crisis()
    }

    pub fn concede(&mut self) -> Result<(), GameError> {
        self.state.concede()
    }

    /// Check the time limit without waiting for the next intent. A real-time
    /// front end can call this from its own clock.
    pub fn check_time_limit(&mut self) -> Option<VictoryResult> {
        self.state.evaluate_victory(Instant::now())
    }

    /*********        GETTERS        *********/

    /// The full game state, for rendering.
    pub fn snapshot(&self) -> &GameState {
        &self.state
    }

    /// The full game state as JSON.
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.state)
    }

    /// Whether a winner has been declared.
    pub fn is_over(&self) -> bool {
        self.state.winner.is_some()
    }
}
