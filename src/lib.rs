//! Rules engine for a turn-based media agency board game.
//!
//! Players move around a 40-cell board, buy and upgrade advertising
//! channels, collect rent, draw brief and market cards, and try to stay
//! solvent. The presentation layer issues intents against a [`Game`] and
//! renders its [`GameState`] snapshot.

pub mod game;

pub use game::error::{GameError, SettingsError};
pub use game::globals::{Card, Cell, CellKind, ChannelGroup, DiceRoll, Player};
pub use game::settings::Settings;
pub use game::state::{GameState, LogEntry, Phase};
pub use game::victory::{VictoryReason, VictoryResult};
pub use game::{Agent, Game};
