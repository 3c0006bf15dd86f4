use super::economy;
use super::error::GameError;
use super::globals::*;
use super::state::Phase;
use super::Game;

/// A scripted controller for a seat, or the "brains" of a player.
#[derive(Clone, Debug)]
pub enum Agent {
    /// Buys whatever it can while keeping `reserve` in cash, and upgrades
    /// every channel the rules allow.
    Greedy {
        /// Cash the agent won't spend below.
        reserve: i64,
    },
    /// Only buys channels priced at or below `max_price`, and never upgrades.
    Cautious {
        max_price: i64,
    },
}

impl Agent {
    /*********        PUBLIC INTERFACES        *********/

    /// Return a new greedy agent.
    pub fn new_greedy(reserve: i64) -> Agent {
        Agent::Greedy { reserve }
    }

    /// Return a new cautious agent.
    pub fn new_cautious(max_price: i64) -> Agent {
        Agent::Cautious { max_price }
    }

    /// Play one full turn for the current seat of `game`.
    pub fn play_turn(&self, game: &mut Game) -> Result<(), GameError> {
        let state = game.snapshot();
        if !state.in_progress() {
            return Err(GameError::InvalidPhase {
                intent: "play turn",
                phase: state.phase,
            });
        }
        let seat = state.current_player_index;

        let player = game.snapshot().current_player();
        if player.is_jailed && player.has_anti_crisis {
            game.use_anti_crisis()?;
            if game.is_over() {
                return Ok(());
            }
        }

        game.roll()?;
        if !self.still_acting(game, seat) {
            // The turn ended on its own
            return Ok(());
        }

        if game.snapshot().pending_card.is_some() {
            game.apply_card()?;
            if !self.still_acting(game, seat) {
                return Ok(());
            }
        }

        let position = game.snapshot().current_player().position;
        if self.wants_to_buy(game, position) && self.still_acting(game, seat) {
            game.buy(position)?;
        }

        if let Agent::Greedy { reserve } = self {
            while self.still_acting(game, seat) {
                match self.upgrade_target(game, *reserve) {
                    Some(target) => game.upgrade(target)?,
                    None => break,
                }
            }
        }

        if !self.still_acting(game, seat) {
            // The time limit ran out mid-turn
            return Ok(());
        }
        game.end_turn()
    }

    /*********        DECISIONS        *********/

    /// Whether `seat` is still in its action phase.
    fn still_acting(&self, game: &Game, seat: usize) -> bool {
        let state = game.snapshot();
        state.phase == Phase::Action && state.current_player_index == seat
    }

    fn wants_to_buy(&self, game: &Game, position: u8) -> bool {
        let state = game.snapshot();
        let data = match cell_at(position).channel() {
            Some(data) if state.owner_of(position).is_none() => data,
            _ => return false,
        };
        let balance = state.current_player().balance;

        match self {
            Agent::Greedy { reserve } => balance - data.price >= *reserve,
            Agent::Cautious { max_price } => data.price <= *max_price && balance >= data.price,
        }
    }

    /// The cheapest channel to upgrade that keeps `reserve` in cash, if any.
    fn upgrade_target(&self, game: &Game, reserve: i64) -> Option<u8> {
        let state = game.snapshot();
        let player = state.current_player();

        player
            .owned_cells()
            .filter_map(|position| cell_at(position).channel().map(|data| (position, data)))
            .filter(|(position, data)| {
                player.level(*position) < MAX_LEVEL
                    && player.balance - data.upgrade_cost >= reserve
                    && (!state.settings.uniform_build || economy::has_monopoly(player, data.group))
            })
            .min_by_key(|(position, data)| (data.upgrade_cost, *position))
            .map(|(position, _)| position)
    }
}
