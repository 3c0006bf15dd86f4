use std::{io, path::PathBuf};

use thiserror::Error;

use super::globals::ChannelGroup;
use super::state::Phase;

/// Reasons an intent is rejected. A rejected intent never changes the
/// game state apart from a log entry explaining the rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{intent} is not allowed during the {phase:?} phase")]
    InvalidPhase { intent: &'static str, phase: Phase },
    #[error("not enough funds: {required} needed, {available} available")]
    InsufficientFunds { required: i64, available: i64 },
    #[error("dice {first}+{second} are outside 1 to 6")]
    InvalidDice { first: u8, second: u8 },
    #[error("cell {0} is not a valid target")]
    InvalidTarget(u8),
    #[error("upgrading requires owning every {0} channel")]
    MonopolyRequired(ChannelGroup),
    #[error("cell {0} is already at the maximum level")]
    MaxLevel(u8),
    #[error("a drawn card has to be applied first")]
    CardPending,
    #[error("no card is waiting to be applied")]
    NoPendingCard,
    #[error("a game needs 3 to 5 players, got {0}")]
    InvalidPlayerCount(usize),
    #[error("the current player is not in the crisis zone")]
    NotJailed,
    #[error("the current player has no anti-crisis card")]
    NoAntiCrisis,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
