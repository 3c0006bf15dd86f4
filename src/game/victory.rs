//! The win evaluator. It runs after every successful intent.

use std::time::Instant;

use serde::Serialize;

use super::economy;
use super::globals::Player;
use super::state::{GameState, Phase};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
/// Why a game ended.
pub enum VictoryReason {
    /// Every other player went bankrupt.
    LastSolvent,
    /// The time limit ran out and the winner had the highest net worth.
    TimeLimit,
}

impl VictoryReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            VictoryReason::LastSolvent => "last_solvent",
            VictoryReason::TimeLimit => "time_limit",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VictoryResult {
    /// The seat index of the winner.
    pub winner: usize,
    pub reason: VictoryReason,
}

/// Decide whether the game is won at `now`, without changing anything.
pub fn evaluate(state: &GameState, now: Instant) -> Option<VictoryResult> {
    if !state.in_progress() {
        return None;
    }

    let mut solvent = state.solvent_players();
    if let (Some(last), None) = (solvent.next(), solvent.next()) {
        return Some(VictoryResult {
            winner: last.id,
            reason: VictoryReason::LastSolvent,
        });
    }

    if now.saturating_duration_since(state.started_at) >= state.settings.time_limit() {
        return richest(&state.players).map(|winner| VictoryResult {
            winner,
            reason: VictoryReason::TimeLimit,
        });
    }

    None
}

/// The seat index of the solvent player with the highest net worth.
/// Ties go to the lowest seat index.
pub fn richest(players: &[Player]) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;

    for player in players.iter().filter(|p| !p.is_bankrupt) {
        let score = economy::net_worth(player);

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((player.id, score));
        }
    }

    best.map(|(id, _)| id)
}

impl GameState {
    /// Declare a winner and end the game if one has been decided at `now`.
    pub fn evaluate_victory(&mut self, now: Instant) -> Option<VictoryResult> {
        let result = evaluate(self, now)?;

        self.winner = Some(result.winner);
        self.phase = Phase::GameOver;
        self.pending_card = None;

        tracing::info!(
            target: "media_monopoly::victory",
            winner = result.winner,
            reason = result.reason.as_str(),
            turn = self.turn,
            "victory.declared"
        );

        let name = self.players[result.winner].name.clone();
        let message = match result.reason {
            VictoryReason::LastSolvent => format!("{} is the last agency standing and wins!", name),
            VictoryReason::TimeLimit => format!("Time is up! {} wins on net worth.", name),
        };
        self.push_log(message);

        Some(result)
    }
}
