use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use serde::Serialize;

use super::economy;
use super::globals::*;
use super::settings::Settings;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
/// The phases of a game.
pub enum Phase {
    /// Waiting for the players to be configured.
    Setup,
    /// The current player has to roll.
    TurnStart,
    /// The current player has rolled and can manage channels or end the turn.
    Action,
    /// A winner has been declared. Nothing changes after this.
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A line in the game log.
pub struct LogEntry {
    /// The turn the entry was written in.
    pub turn: u32,
    pub message: String,
}

#[derive(Clone, Debug, Serialize)]
/// The state of a game session. All mutation goes through the turn engine.
pub struct GameState {
    /// The players playing the game, indexed by seat.
    pub players: Vec<Player>,
    /// The index of the player (from `players`) whose turn it currently is.
    pub current_player_index: usize,
    /// The turn counter, starting at 1.
    pub turn: u32,
    pub phase: Phase,
    /// The last pair of dice rolled.
    pub dice: DiceRoll,
    /// The most recent log entries, newest first.
    pub log: VecDeque<LogEntry>,
    pub settings: Settings,
    /// The id of the card the current player drew and hasn't applied yet.
    pub pending_card: Option<u16>,
    /// The seat index of the winner, once decided.
    pub winner: Option<usize>,
    /// When the session started. The time limit is measured from here.
    #[serde(skip)]
    pub started_at: Instant,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Turn \x1b[33m{}\x1b[0m, {:?}, dice {}+{}",
            self.turn, self.phase, self.dice.first, self.dice.second
        )?;

        for (i, player) in self.players.iter().enumerate() {
            write!(f, "{}", player)?;

            if self.current_player_index == i && self.phase != Phase::GameOver {
                write!(f, " < \x1b[36mto play\x1b[0m")?;
            }
            if self.winner == Some(i) {
                write!(f, " < \x1b[32mwinner\x1b[0m")?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

impl GameState {
    /*********        INITIALISATION INTERFACES        *********/

    /// Create a new game waiting for its players to be configured.
    pub fn new(settings: Settings) -> GameState {
        GameState {
            players: vec![],
            current_player_index: 0,
            turn: 1,
            phase: Phase::Setup,
            dice: DiceRoll::new(1, 1),
            log: VecDeque::with_capacity(LOG_CAPACITY),
            settings,
            pending_card: None,
            winner: None,
            started_at: Instant::now(),
        }
    }

    /*********        ALIASES (FOR CONVENIENCE)        *********/

    /// The player whose turn it currently is.
    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    /// A mutable reference to the player whose turn it currently is.
    pub fn current_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player_index]
    }

    /// The cell the current player is on.
    pub fn current_cell(&self) -> &'static Cell {
        cell_at(self.current_player().position)
    }

    /// The seat index of the player who owns the channel at `position`, if any.
    pub fn owner_of(&self, position: u8) -> Option<usize> {
        self.players.iter().position(|p| p.owns(position))
    }

    /// The card the current player has to apply, if any.
    pub fn pending_card(&self) -> Option<&'static Card> {
        self.pending_card.and_then(find_card)
    }

    /// Players that haven't been eliminated.
    pub fn solvent_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_bankrupt)
    }

    /// Whether the game has started and hasn't finished yet.
    pub fn in_progress(&self) -> bool {
        matches!(self.phase, Phase::TurnStart | Phase::Action)
    }

    /*********        HELPER FUNCTIONS        *********/

    /// Add a line to the log, dropping the oldest line past the capacity.
    pub fn push_log(&mut self, message: impl Into<String>) {
        self.log.push_front(LogEntry {
            turn: self.turn,
            message: message.into(),
        });
        self.log.truncate(LOG_CAPACITY);
    }

    /// Move the current player by the specified amount of cells. Return the new position.
    pub fn move_by(&mut self, amount: u8) -> u8 {
        let old_pos = self.current_player().position;
        let new_pos = ((u16::from(old_pos) + u16::from(amount)) % u16::from(BOARD_SIZE)) as u8;

        // Pay the lap bonus if the player wrapped past 'Start'
        if new_pos < old_pos {
            let bonus = economy::start_bonus(self.current_player().efficiency);
            self.current_player_mut().balance += bonus;

            let name = self.current_player().name.clone();
            self.push_log(format!("{} passed Start! +{}", name, bonus));
        }

        self.current_player_mut().position = new_pos;

        tracing::debug!(
            target: "media_monopoly::turn",
            player = self.current_player_index,
            from = old_pos,
            to = new_pos,
            "turn.moved"
        );

        new_pos
    }

    /// Send a player to the crisis zone.
    pub fn send_to_jail(&mut self, player_index: usize) {
        let player = &mut self.players[player_index];
        player.position = CRISIS_POSITION;
        player.is_jailed = true;
        player.jail_attempts = 0;
    }

    /// Send the current player to the crisis zone.
    pub fn send_current_to_jail(&mut self) {
        self.send_to_jail(self.current_player_index)
    }

    /// Eliminate a player. Their balance is zeroed and their channels go back
    /// to the free pool rather than to any other player.
    pub fn eliminate(&mut self, player_index: usize, reason: &str) {
        let player = &mut self.players[player_index];
        player.is_bankrupt = true;
        player.balance = 0;
        player.holdings.clear();
        player.is_jailed = false;
        player.jail_attempts = 0;

        let name = player.name.clone();

        tracing::info!(
            target: "media_monopoly::turn",
            player = player_index,
            reason,
            "turn.eliminated"
        );

        self.push_log(format!("{} went BANKRUPT! {}", name, reason));
    }

    /// Take `amount` from the current player for a payment they can't refuse.
    /// Eliminate them instead if they can't afford it. Return whether the payment was made.
    pub fn charge_current(&mut self, amount: i64, reason: &str) -> bool {
        if self.current_player().can_afford(amount) {
            self.current_player_mut().balance -= amount;
            true
        } else {
            self.eliminate(self.current_player_index, reason);
            false
        }
    }

    /// Change the `current_player_index` to the next player still in the game,
    /// and start their turn. Bankrupt seats are skipped, and the search gives
    /// up after one full pass around the table.
    pub fn setup_next_player(&mut self) {
        let seats = self.players.len();
        let mut next = (self.current_player_index + 1) % seats;
        let mut loops = 0;

        while self.players[next].is_bankrupt && loops < seats {
            next = (next + 1) % seats;
            loops += 1;
        }

        self.current_player_index = next;
        self.turn += 1;
        self.pending_card = None;
        self.phase = Phase::TurnStart;
    }
}
